//! Status derivation over a project's review log.
//!
//! The review log is append-only; the effective status of a review type is
//! the status of its latest record, ordered by `(review_time, seq)` where
//! `seq` is the insertion order. The SQL listing queries order the same way
//! so both paths agree.

use serde::Serialize;

use crate::types::Timestamp;
use crate::workflow::{
    CompletionStatus, DerivedStatus, ReviewStatus, ReviewType, Stage, STAGE_AFTER_ARTWORK_UPLOAD,
};

/// The parts of a review record that derivation looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewEvent {
    pub review_type: ReviewType,
    pub status: ReviewStatus,
    pub review_time: Timestamp,
    /// Insertion order, strictly increasing across the whole log.
    pub seq: i64,
}

impl ReviewEvent {
    fn order_key(&self) -> (Timestamp, i64) {
        (self.review_time, self.seq)
    }
}

/// Latest event of the given type, or of any type when `review_type` is `None`.
pub fn latest_event(events: &[ReviewEvent], review_type: Option<ReviewType>) -> Option<&ReviewEvent> {
    events
        .iter()
        .filter(|e| review_type.map_or(true, |t| e.review_type == t))
        .max_by_key(|e| e.order_key())
}

/// Effective status for one review type; `NotReviewed` when no record exists.
pub fn effective_status(events: &[ReviewEvent], review_type: ReviewType) -> DerivedStatus {
    latest_event(events, Some(review_type))
        .map(|e| e.status)
        .into()
}

/// Stage implied by the review log, the artwork upload, and the completion flag.
///
/// `completed` when uploaded. Otherwise whichever happened last decides: an
/// artwork upload strictly after the latest review queues the project for
/// UED review, a review yields the stage of the transition rule. With no
/// review and no artwork the project is still in `production`.
pub fn derive_stage(
    events: &[ReviewEvent],
    artwork_uploaded_at: Option<Timestamp>,
    completion: CompletionStatus,
) -> Stage {
    if completion == CompletionStatus::Uploaded {
        return Stage::Completed;
    }
    match (latest_event(events, None), artwork_uploaded_at) {
        (Some(latest), Some(uploaded)) if uploaded > latest.review_time => {
            STAGE_AFTER_ARTWORK_UPLOAD
        }
        (Some(latest), _) => latest.review_type.stage_after_review(),
        (None, Some(_)) => STAGE_AFTER_ARTWORK_UPLOAD,
        (None, None) => Stage::Production,
    }
}

/// Comparison of the cached stage against the one derived from the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageConsistency {
    pub cached: Stage,
    pub derived: Stage,
    pub consistent: bool,
}

impl StageConsistency {
    pub fn new(cached: Stage, derived: Stage) -> Self {
        Self {
            cached,
            derived,
            consistent: cached == derived,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn at(secs: i64) -> Timestamp {
        Utc.timestamp_opt(1_760_000_000 + secs, 0).unwrap()
    }

    fn event(review_type: ReviewType, status: ReviewStatus, secs: i64, seq: i64) -> ReviewEvent {
        ReviewEvent {
            review_type,
            status,
            review_time: at(secs),
            seq,
        }
    }

    #[test]
    fn empty_log_is_not_reviewed() {
        assert_eq!(
            effective_status(&[], ReviewType::Annotation),
            DerivedStatus::NotReviewed
        );
    }

    #[test]
    fn other_type_does_not_count() {
        let events = [event(ReviewType::Ued, ReviewStatus::Pass, 0, 1)];
        assert_eq!(
            effective_status(&events, ReviewType::Annotation),
            DerivedStatus::NotReviewed
        );
        assert_eq!(effective_status(&events, ReviewType::Ued), DerivedStatus::Pass);
    }

    #[test]
    fn later_record_wins() {
        let events = [
            event(ReviewType::Annotation, ReviewStatus::Fail, 0, 1),
            event(ReviewType::Annotation, ReviewStatus::Pass, 10, 2),
        ];
        assert_eq!(
            effective_status(&events, ReviewType::Annotation),
            DerivedStatus::Pass
        );
    }

    #[test]
    fn equal_timestamps_break_ties_by_insertion_order() {
        let events = [
            event(ReviewType::Annotation, ReviewStatus::Pass, 5, 7),
            event(ReviewType::Annotation, ReviewStatus::Fail, 5, 8),
        ];
        assert_eq!(
            effective_status(&events, ReviewType::Annotation),
            DerivedStatus::Fail
        );
    }

    #[test]
    fn older_record_appended_later_does_not_change_result() {
        let mut events = vec![event(ReviewType::Ued, ReviewStatus::Pass, 100, 1)];
        let before = effective_status(&events, ReviewType::Ued);

        events.push(ReviewEvent {
            review_time: at(100) - Duration::days(3),
            ..event(ReviewType::Ued, ReviewStatus::Fail, 0, 2)
        });

        assert_eq!(effective_status(&events, ReviewType::Ued), before);
    }

    #[test]
    fn stage_follows_latest_review_of_either_type() {
        assert_eq!(
            derive_stage(&[], None, CompletionStatus::NotUploaded),
            Stage::Production
        );

        let events = [
            event(ReviewType::Annotation, ReviewStatus::Pass, 0, 1),
            event(ReviewType::Ued, ReviewStatus::Fail, 1, 2),
        ];
        assert_eq!(
            derive_stage(&events, None, CompletionStatus::NotUploaded),
            Stage::Artwork
        );

        let events = [
            event(ReviewType::Ued, ReviewStatus::Pass, 0, 1),
            event(ReviewType::Annotation, ReviewStatus::Pass, 1, 2),
        ];
        assert_eq!(
            derive_stage(&events, None, CompletionStatus::NotUploaded),
            Stage::UedReview
        );
    }

    #[test]
    fn upload_overrides_review_log() {
        let events = [event(ReviewType::Annotation, ReviewStatus::Pass, 0, 1)];
        assert_eq!(
            derive_stage(&events, None, CompletionStatus::Uploaded),
            Stage::Completed
        );
    }

    #[test]
    fn artwork_upload_after_review_queues_ued_review() {
        let events = [event(ReviewType::Ued, ReviewStatus::Pass, 0, 1)];
        assert_eq!(
            derive_stage(&events, Some(at(60)), CompletionStatus::NotUploaded),
            Stage::UedReview
        );
        assert_eq!(
            derive_stage(&[], Some(at(60)), CompletionStatus::NotUploaded),
            Stage::UedReview
        );
    }

    #[test]
    fn review_after_artwork_upload_takes_over() {
        let events = [event(ReviewType::Ued, ReviewStatus::Fail, 120, 1)];
        assert_eq!(
            derive_stage(&events, Some(at(60)), CompletionStatus::NotUploaded),
            Stage::Artwork
        );
    }

    #[test]
    fn consistency_report() {
        let report = StageConsistency::new(Stage::Artwork, Stage::UedReview);
        assert!(!report.consistent);
        assert!(StageConsistency::new(Stage::Artwork, Stage::Artwork).consistent);
    }
}
