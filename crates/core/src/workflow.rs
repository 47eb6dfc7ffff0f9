//! Pipeline stages, review vocabularies, and the stage-transition rule.
//!
//! Review and completion labels were free-form strings in the legacy
//! spreadsheet; they are closed enumerations here. Legacy labels are
//! accepted by [`parse`](Stage::parse) at the boundary and never persisted.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Defines a closed label enumeration with a canonical string per variant
/// plus optional legacy aliases accepted when parsing.
macro_rules! define_label_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($label:literal) {
            $( $(#[$vmeta:meta])* $variant:ident = $canonical:literal $(| $alias:literal)* ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The canonical label stored in the database.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $canonical ),+
                }
            }

            /// Parse a canonical label or a legacy alias.
            pub fn parse(value: &str) -> Result<Self, CoreError> {
                let trimmed = value.trim();
                $(
                    if trimmed.eq_ignore_ascii_case($canonical) $(|| trimmed == $alias)* {
                        return Ok($name::$variant);
                    }
                )+
                Err(CoreError::Validation(format!(
                    "Invalid {} '{value}'. Must be one of: {}",
                    $label,
                    Self::ALL
                        .iter()
                        .map(|v| v.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                )))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = CoreError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(&value)
            }
        }
    };
}

define_label_enum! {
    /// Position of a project in the production pipeline.
    Stage ("stage") {
        Production = "production",
        AnnotationReview = "annotation_review",
        UedReview = "ued_review",
        Artwork = "artwork",
        Completed = "completed",
    }
}

define_label_enum! {
    /// Which checkpoint a review belongs to.
    ReviewType ("review type") {
        Annotation = "annotation",
        Ued = "ued",
    }
}

define_label_enum! {
    /// Outcome of a single review.
    ReviewStatus ("review status") {
        Pass = "pass" | "可用" | "approved",
        Fail = "fail" | "不可用" | "rejected",
    }
}

define_label_enum! {
    /// Whether the finished asset has been uploaded to the storefront.
    CompletionStatus ("completion status") {
        Uploaded = "uploaded" | "已上传",
        NotUploaded = "not_uploaded" | "未上传",
    }
}

define_label_enum! {
    /// Review outcome computed from the latest record of one review type.
    DerivedStatus ("derived status") {
        Pass = "pass" | "可用" | "approved",
        Fail = "fail" | "不可用" | "rejected",
        NotReviewed = "not_reviewed" | "未审核",
    }
}

impl Default for CompletionStatus {
    fn default() -> Self {
        CompletionStatus::NotUploaded
    }
}

impl Default for Stage {
    fn default() -> Self {
        INITIAL_STAGE
    }
}

impl From<ReviewStatus> for DerivedStatus {
    fn from(status: ReviewStatus) -> Self {
        match status {
            ReviewStatus::Pass => DerivedStatus::Pass,
            ReviewStatus::Fail => DerivedStatus::Fail,
        }
    }
}

impl From<Option<ReviewStatus>> for DerivedStatus {
    fn from(status: Option<ReviewStatus>) -> Self {
        status.map_or(DerivedStatus::NotReviewed, DerivedStatus::from)
    }
}

impl DerivedStatus {
    /// The review status this derived value stands for, if any review exists.
    pub fn review_status(self) -> Option<ReviewStatus> {
        match self {
            DerivedStatus::Pass => Some(ReviewStatus::Pass),
            DerivedStatus::Fail => Some(ReviewStatus::Fail),
            DerivedStatus::NotReviewed => None,
        }
    }
}

/* --------------------------------------------------------------------------
Transition rule
-------------------------------------------------------------------------- */

/// Stage an uploaded artwork video is queued into.
pub const STAGE_AFTER_ARTWORK_UPLOAD: Stage = Stage::UedReview;

/// Stage a newly created project starts in.
pub const INITIAL_STAGE: Stage = Stage::Production;

impl ReviewType {
    /// Stage a project moves to once a review of this type is recorded.
    ///
    /// The outcome of the review does not matter: the stage machine tracks
    /// "reviewed", not "approved".
    pub fn stage_after_review(self) -> Stage {
        match self {
            ReviewType::Annotation => Stage::UedReview,
            ReviewType::Ued => Stage::Artwork,
        }
    }
}

/// Resolve the stage and completion status produced by an administrative
/// workflow update.
///
/// - An explicit stage wins, except that `completed` requires the resulting
///   completion status to be `uploaded`.
/// - Marking a project `uploaded` without naming a stage completes it.
/// - Un-marking a completed project requires naming the stage it returns to.
pub fn resolve_workflow_update(
    current_stage: Stage,
    current_completion: CompletionStatus,
    requested_stage: Option<Stage>,
    requested_completion: Option<CompletionStatus>,
) -> Result<(Stage, CompletionStatus), CoreError> {
    let completion = requested_completion.unwrap_or(current_completion);

    let stage = match requested_stage {
        Some(Stage::Completed) if completion != CompletionStatus::Uploaded => {
            return Err(CoreError::Validation(
                "Stage 'completed' requires completion status 'uploaded'".to_string(),
            ));
        }
        Some(stage) => stage,
        None if requested_completion == Some(CompletionStatus::Uploaded) => Stage::Completed,
        None if current_stage == Stage::Completed && completion != CompletionStatus::Uploaded => {
            return Err(CoreError::Validation(
                "Reopening a completed project requires an explicit current_stage".to_string(),
            ));
        }
        None => current_stage,
    };

    Ok((stage, completion))
}
