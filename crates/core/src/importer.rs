//! Pure planning logic for the spreadsheet bulk importer.
//!
//! This module has no database or I/O dependencies. It turns one tabular
//! row (keyed by the spreadsheet's column headers) into an [`ImportPlan`]:
//! the project fields, the initial workflow state, and the zero, one, or two
//! review records the row implies.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CoreError;
use crate::project::{non_blank, parse_selling_points, validate_price};
use crate::types::Date;
use crate::workflow::{CompletionStatus, ReviewStatus, ReviewType, Stage};

// ── Constants ────────────────────────────────────────────────────────

/// Reviewer recorded for an annotation result with no reviewer column.
pub const UNKNOWN_REVIEWER: &str = "unknown";

/// Reviewer recorded for imported UED results; the sheet has no UED reviewer column.
pub const IMPORTED_UED_REVIEWER: &str = "UED reviewer";

/// Date layouts seen in exported sheets.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];

// ── Input row ────────────────────────────────────────────────────────

/// One spreadsheet row. Accepts both the English field names and the
/// original sheet's column headers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImportRow {
    #[serde(default, alias = "视频提供日期", deserialize_with = "lenient_string")]
    pub provide_date: Option<String>,
    #[serde(default, alias = "视频选品日期", deserialize_with = "lenient_string")]
    pub selection_date: Option<String>,
    #[serde(default, alias = "品牌名称", deserialize_with = "lenient_string")]
    pub brand_name: Option<String>,
    #[serde(default, alias = "一级品类", deserialize_with = "lenient_string")]
    pub category_level1: Option<String>,
    #[serde(default, alias = "二级品类", deserialize_with = "lenient_string")]
    pub category_level2: Option<String>,
    #[serde(default, alias = "三级品类", deserialize_with = "lenient_string")]
    pub category_level3: Option<String>,
    #[serde(default, alias = "视频链接", deserialize_with = "lenient_string")]
    pub video_url: Option<String>,
    #[serde(default, alias = "商品ID", deserialize_with = "lenient_string")]
    pub product_id: Option<String>,
    #[serde(default, alias = "商品链接", deserialize_with = "lenient_string")]
    pub product_url: Option<String>,
    #[serde(default, alias = "素材命名（只要VIP字段）", deserialize_with = "lenient_string")]
    pub material_name_vip: Option<String>,
    #[serde(default, alias = "素材命名（完整字段）", deserialize_with = "lenient_string")]
    pub material_name_full: Option<String>,
    #[serde(default, alias = "素材售价", deserialize_with = "lenient_string")]
    pub material_price: Option<String>,
    #[serde(default, alias = "素材卖点", deserialize_with = "lenient_string")]
    pub selling_points: Option<String>,
    #[serde(default, alias = "标注验收", deserialize_with = "lenient_string")]
    pub annotation_result: Option<String>,
    #[serde(default, alias = "ued验收", deserialize_with = "lenient_string")]
    pub ued_result: Option<String>,
    #[serde(default, alias = "加艺术字人员", deserialize_with = "lenient_string")]
    pub artwork_person: Option<String>,
    #[serde(default, alias = "完成情况", deserialize_with = "lenient_string")]
    pub completion_status: Option<String>,
    #[serde(default, alias = "验收人员", deserialize_with = "lenient_string")]
    pub reviewer: Option<String>,
    #[serde(default, alias = "问题描述", deserialize_with = "lenient_string")]
    pub annotation_problem: Option<String>,
    #[serde(default, alias = "问题描述.1", deserialize_with = "lenient_string")]
    pub ued_problem: Option<String>,
}

/// Accept strings, numbers, booleans, or null for a text cell.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => non_blank(Some(&s)),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::Bool(b)) => Some(b.to_string()),
        Some(other) => Some(other.to_string()),
    })
}

// ── Plan ─────────────────────────────────────────────────────────────

/// Project fields produced from a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedProject {
    pub provide_date: Option<Date>,
    pub selection_date: Option<Date>,
    pub brand_name: Option<String>,
    pub category_level1: Option<String>,
    pub category_level2: Option<String>,
    pub category_level3: Option<String>,
    pub video_url: Option<String>,
    pub product_id: Option<String>,
    pub product_url: Option<String>,
    pub material_name_vip: Option<String>,
    pub material_name_full: Option<String>,
    pub material_price: i64,
    pub selling_points: Vec<String>,
}

/// A review record produced from a row's result columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedReview {
    pub review_type: ReviewType,
    pub reviewer_name: String,
    pub review_status: ReviewStatus,
    pub problem_description: Option<String>,
}

/// Everything the importer writes for one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportPlan {
    pub project: PlannedProject,
    pub stage: Stage,
    pub annotation_reviewer: Option<String>,
    pub artwork_person: Option<String>,
    pub completion_status: CompletionStatus,
    pub reviews: Vec<PlannedReview>,
}

/// Initial stage for an imported row.
///
/// Conditions are applied in pipeline order and later ones override earlier
/// ones unconditionally, so a row marked uploaded is `completed` whatever
/// else it contains.
pub fn initial_stage(
    has_annotation_result: bool,
    has_ued_result: bool,
    has_artwork_person: bool,
    completion: CompletionStatus,
) -> Stage {
    let mut stage = Stage::Production;
    if has_annotation_result {
        stage = Stage::AnnotationReview;
    }
    if has_ued_result {
        stage = Stage::UedReview;
    }
    if has_artwork_person {
        stage = Stage::Artwork;
    }
    if completion == CompletionStatus::Uploaded {
        stage = Stage::Completed;
    }
    stage
}

/// Parse a date cell. Datetime cells keep their date part.
pub fn parse_date(field: &str, raw: Option<&str>) -> Result<Option<Date>, CoreError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    let date_part = raw.split([' ', 'T']).next().unwrap_or(raw);

    DATE_FORMATS
        .iter()
        .find_map(|fmt| Date::parse_from_str(date_part, fmt).ok())
        .map(Some)
        .ok_or_else(|| CoreError::Validation(format!("Invalid {field} '{raw}'")))
}

/// Parse a price cell. Blank means 0; spreadsheets often export `199.0`.
pub fn parse_price(raw: Option<&str>) -> Result<i64, CoreError> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(0);
    };
    let price = match raw.parse::<i64>() {
        Ok(value) => value,
        Err(_) => {
            let value = raw
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && v.fract() == 0.0)
                .ok_or_else(|| CoreError::Validation(format!("Invalid material_price '{raw}'")))?;
            value as i64
        }
    };
    validate_price(price)?;
    Ok(price)
}

/// Turn one row into an import plan, validating every cell first.
pub fn plan_row(row: &ImportRow) -> Result<ImportPlan, CoreError> {
    let annotation_status = row
        .annotation_result
        .as_deref()
        .map(ReviewStatus::parse)
        .transpose()?;
    let ued_status = row
        .ued_result
        .as_deref()
        .map(ReviewStatus::parse)
        .transpose()?;
    let completion_status = row
        .completion_status
        .as_deref()
        .map(CompletionStatus::parse)
        .transpose()?
        .unwrap_or_default();

    let project = PlannedProject {
        provide_date: parse_date("provide_date", row.provide_date.as_deref())?,
        selection_date: parse_date("selection_date", row.selection_date.as_deref())?,
        brand_name: row.brand_name.clone(),
        category_level1: row.category_level1.clone(),
        category_level2: row.category_level2.clone(),
        category_level3: row.category_level3.clone(),
        video_url: row.video_url.clone(),
        product_id: row.product_id.clone(),
        product_url: row.product_url.clone(),
        material_name_vip: row.material_name_vip.clone(),
        material_name_full: row.material_name_full.clone(),
        material_price: parse_price(row.material_price.as_deref())?,
        selling_points: parse_selling_points(row.selling_points.as_deref()),
    };

    let stage = initial_stage(
        annotation_status.is_some(),
        ued_status.is_some(),
        row.artwork_person.is_some(),
        completion_status,
    );

    let mut reviews = Vec::with_capacity(2);
    if let Some(status) = annotation_status {
        reviews.push(PlannedReview {
            review_type: ReviewType::Annotation,
            reviewer_name: row
                .reviewer
                .clone()
                .unwrap_or_else(|| UNKNOWN_REVIEWER.to_string()),
            review_status: status,
            problem_description: row.annotation_problem.clone(),
        });
    }
    if let Some(status) = ued_status {
        reviews.push(PlannedReview {
            review_type: ReviewType::Ued,
            reviewer_name: IMPORTED_UED_REVIEWER.to_string(),
            review_status: status,
            problem_description: row.ued_problem.clone(),
        });
    }

    Ok(ImportPlan {
        project,
        stage,
        annotation_reviewer: row.reviewer.clone(),
        artwork_person: row.artwork_person.clone(),
        completion_status,
        reviews,
    })
}

/// Plan every row, failing on the first invalid one with its 1-based row number.
pub fn plan_rows(rows: &[ImportRow]) -> Result<Vec<ImportPlan>, CoreError> {
    rows.iter()
        .enumerate()
        .map(|(i, row)| {
            plan_row(row).map_err(|e| match e {
                CoreError::Validation(msg) => CoreError::Validation(format!("Row {}: {msg}", i + 1)),
                other => other,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn row(value: serde_json::Value) -> ImportRow {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn precedence_later_conditions_override() {
        let not = CompletionStatus::NotUploaded;
        assert_eq!(initial_stage(false, false, false, not), Stage::Production);
        assert_eq!(initial_stage(true, false, false, not), Stage::AnnotationReview);
        assert_eq!(initial_stage(true, true, false, not), Stage::UedReview);
        assert_eq!(initial_stage(false, false, true, not), Stage::Artwork);
        assert_eq!(
            initial_stage(true, false, false, CompletionStatus::Uploaded),
            Stage::Completed
        );
    }

    #[test]
    fn annotation_only_row_lands_in_annotation_review() {
        let plan = plan_row(&row(json!({
            "品牌名称": "Acme",
            "标注验收": "可用",
            "验收人员": "李四",
            "完成情况": "未上传",
        })))
        .unwrap();

        assert_eq!(plan.stage, Stage::AnnotationReview);
        assert_eq!(plan.completion_status, CompletionStatus::NotUploaded);
        assert_eq!(plan.reviews.len(), 1);
        assert_eq!(plan.reviews[0].review_type, ReviewType::Annotation);
        assert_eq!(plan.reviews[0].reviewer_name, "李四");
        assert_eq!(plan.reviews[0].review_status, ReviewStatus::Pass);
        assert_eq!(plan.annotation_reviewer.as_deref(), Some("李四"));
    }

    #[test]
    fn both_results_create_two_reviews() {
        let plan = plan_row(&row(json!({
            "annotation_result": "fail",
            "annotation_problem": "Blurry frame",
            "ued_result": "pass",
            "ued_problem": "",
        })))
        .unwrap();

        assert_eq!(plan.stage, Stage::UedReview);
        assert_eq!(plan.reviews.len(), 2);
        assert_eq!(plan.reviews[0].reviewer_name, UNKNOWN_REVIEWER);
        assert_eq!(
            plan.reviews[0].problem_description.as_deref(),
            Some("Blurry frame")
        );
        assert_eq!(plan.reviews[1].reviewer_name, IMPORTED_UED_REVIEWER);
        assert_eq!(plan.reviews[1].problem_description, None);
    }

    #[test]
    fn numeric_cells_are_accepted() {
        let plan = plan_row(&row(json!({
            "商品ID": 123456789,
            "素材售价": 199.0,
            "视频提供日期": "2025-08-01 00:00:00",
            "视频选品日期": "2025/08/03",
            "素材卖点": "[\"轻薄\", \"防水\"]",
        })))
        .unwrap();

        assert_eq!(plan.project.product_id.as_deref(), Some("123456789"));
        assert_eq!(plan.project.material_price, 199);
        assert_eq!(
            plan.project.provide_date,
            Date::from_ymd_opt(2025, 8, 1)
        );
        assert_eq!(
            plan.project.selection_date,
            Date::from_ymd_opt(2025, 8, 3)
        );
        assert_eq!(plan.project.selling_points, vec!["轻薄", "防水"]);
    }

    #[test]
    fn blank_cells_are_absent() {
        let plan = plan_row(&row(json!({
            "标注验收": "  ",
            "加艺术字人员": null,
        })))
        .unwrap();
        assert_eq!(plan.stage, Stage::Production);
        assert!(plan.reviews.is_empty());
        assert_eq!(plan.project.material_price, 0);
    }

    #[test]
    fn invalid_cells_are_rejected_with_row_number() {
        let rows = vec![
            row(json!({ "标注验收": "可用" })),
            row(json!({ "ued验收": "maybe" })),
        ];
        let err = plan_rows(&rows).unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.starts_with("Row 2:"));

        assert!(plan_row(&row(json!({ "素材售价": -5 }))).is_err());
        assert!(plan_row(&row(json!({ "素材售价": "12.5" }))).is_err());
        assert!(plan_row(&row(json!({ "视频提供日期": "yesterday" }))).is_err());
        assert!(plan_row(&row(json!({ "完成情况": "half" }))).is_err());
    }
}
