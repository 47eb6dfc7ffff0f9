/// Primary keys are opaque UUID strings generated by the application.
pub type DbId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar dates (provide/selection dates) carry no time component.
pub type Date = chrono::NaiveDate;

/// Generate a fresh identifier for a new row.
pub fn new_id() -> DbId {
    uuid::Uuid::new_v4().to_string()
}
