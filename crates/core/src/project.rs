//! Project field constraints and validation helpers.

use crate::error::CoreError;

/// Maximum number of selling points kept per project.
pub const MAX_SELLING_POINTS: usize = 50;

/// Maximum length for a reviewer or assignee name.
pub const MAX_PERSON_NAME_LENGTH: usize = 100;

/// Maximum length for a review's problem description.
pub const MAX_PROBLEM_DESCRIPTION_LENGTH: usize = 10_000;

/// Validate that a price is non-negative.
pub fn validate_price(price: i64) -> Result<(), CoreError> {
    if price < 0 {
        return Err(CoreError::Validation(format!(
            "Price must be non-negative, got {price}"
        )));
    }
    Ok(())
}

/// Validate a required, non-blank text field.
pub fn validate_required(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Validate a reviewer or assignee name.
pub fn validate_person_name(field: &str, name: &str) -> Result<(), CoreError> {
    validate_required(field, name)?;
    if name.chars().count() > MAX_PERSON_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "{field} exceeds maximum length of {MAX_PERSON_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate an optional problem description.
pub fn validate_problem_description(description: Option<&str>) -> Result<(), CoreError> {
    if let Some(text) = description {
        if text.chars().count() > MAX_PROBLEM_DESCRIPTION_LENGTH {
            return Err(CoreError::Validation(format!(
                "Problem description exceeds maximum length of \
                 {MAX_PROBLEM_DESCRIPTION_LENGTH} characters"
            )));
        }
    }
    Ok(())
}

/// Validate the selling-points list: bounded size, no blank entries.
pub fn validate_selling_points(points: &[String]) -> Result<(), CoreError> {
    if points.len() > MAX_SELLING_POINTS {
        return Err(CoreError::Validation(format!(
            "At most {MAX_SELLING_POINTS} selling points are allowed, got {}",
            points.len()
        )));
    }
    if points.iter().any(|p| p.trim().is_empty()) {
        return Err(CoreError::Validation(
            "Selling points must not contain blank entries".to_string(),
        ));
    }
    Ok(())
}

/// Parse the legacy spreadsheet encoding of selling points.
///
/// The spreadsheet column holds a JSON array of strings. Anything else
/// (free text, malformed JSON, a non-string array) yields an empty list.
pub fn parse_selling_points(raw: Option<&str>) -> Vec<String> {
    raw.map(str::trim)
        .filter(|s| s.starts_with('['))
        .and_then(|s| serde_json::from_str::<Vec<String>>(s).ok())
        .map(|points| {
            points
                .into_iter()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

/// Normalise an optional text field: trimmed, with blanks mapped to `None`.
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
