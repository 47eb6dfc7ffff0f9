//! Query parameter types for API handlers.

use serde::Deserialize;
use vidreview_core::error::CoreError;
use vidreview_core::importer::parse_date;
use vidreview_core::project::non_blank;
use vidreview_core::workflow::{CompletionStatus, DerivedStatus, Stage};
use vidreview_db::models::listing::ProjectFilter;

/// Listing filters as they arrive on the query string.
///
/// Blank values are treated as absent so a form that submits every field
/// does not filter on empty strings.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectListParams {
    /// Completion status.
    pub status: Option<String>,
    pub stage: Option<String>,
    pub reviewer: Option<String>,
    pub artwork_person: Option<String>,
    pub brand: Option<String>,
    pub product_id: Option<String>,
    pub provide_date_start: Option<String>,
    pub provide_date_end: Option<String>,
    pub selection_date_start: Option<String>,
    pub selection_date_end: Option<String>,
    pub annotation_status: Option<String>,
    pub ued_status: Option<String>,
}

impl ProjectListParams {
    /// Parse every parameter, rejecting unknown labels and malformed dates.
    pub fn into_filter(self) -> Result<ProjectFilter, CoreError> {
        let text = |v: Option<String>| non_blank(v.as_deref());
        let date = |field: &str, v: Option<String>| parse_date(field, v.as_deref());

        Ok(ProjectFilter {
            completion_status: text(self.status)
                .map(|v| CompletionStatus::parse(&v))
                .transpose()?,
            stage: text(self.stage).map(|v| Stage::parse(&v)).transpose()?,
            reviewer: text(self.reviewer),
            artwork_person: text(self.artwork_person),
            brand: text(self.brand),
            product_id: text(self.product_id),
            provide_date_start: date("provide_date_start", self.provide_date_start)?,
            provide_date_end: date("provide_date_end", self.provide_date_end)?,
            selection_date_start: date("selection_date_start", self.selection_date_start)?,
            selection_date_end: date("selection_date_end", self.selection_date_end)?,
            annotation_status: text(self.annotation_status)
                .map(|v| DerivedStatus::parse(&v))
                .transpose()?,
            ued_status: text(self.ued_status)
                .map(|v| DerivedStatus::parse(&v))
                .transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn blank_params_are_ignored() {
        let params = ProjectListParams {
            status: Some(String::new()),
            brand: Some("  ".to_string()),
            ..Default::default()
        };
        let filter = params.into_filter().unwrap();
        assert!(filter.completion_status.is_none());
        assert!(filter.brand.is_none());
    }

    #[test]
    fn legacy_labels_are_accepted() {
        let params = ProjectListParams {
            status: Some("未上传".to_string()),
            annotation_status: Some("未审核".to_string()),
            ued_status: Some("可用".to_string()),
            ..Default::default()
        };
        let filter = params.into_filter().unwrap();
        assert_eq!(filter.completion_status, Some(CompletionStatus::NotUploaded));
        assert_eq!(filter.annotation_status, Some(DerivedStatus::NotReviewed));
        assert_eq!(filter.ued_status, Some(DerivedStatus::Pass));
    }

    #[test]
    fn unknown_stage_is_rejected() {
        let params = ProjectListParams {
            stage: Some("review".to_string()),
            ..Default::default()
        };
        assert_matches!(params.into_filter(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn malformed_date_is_rejected() {
        let params = ProjectListParams {
            provide_date_start: Some("08/01/2025".to_string()),
            ..Default::default()
        };
        assert!(params.into_filter().is_err());
    }
}
