use chrono::Utc;
use vidreview_core::assets::{
    artwork_file_name, decode_screenshot, screenshot_file_name, AssetKind,
};
use vidreview_core::error::CoreError;
use vidreview_core::workflow::ReviewType;
use vidreview_db::models::project::ArtworkAttachment;
use vidreview_db::models::screenshot::{SaveScreenshot, Screenshot};
use vidreview_db::repositories::ScreenshotRepo;

use super::WorkflowEngine;
use crate::error::AppResult;

impl WorkflowEngine {
    /// Store an uploaded artwork video and attach it to the project.
    ///
    /// Only video extensions are accepted. If attaching fails after the blob
    /// was written, the blob is removed again.
    pub async fn upload_artwork_video(
        &self,
        project_id: &str,
        original_name: &str,
        bytes: &[u8],
    ) -> AppResult<ArtworkAttachment> {
        let file_name = artwork_file_name(original_name, Utc::now())?;
        if bytes.is_empty() {
            return Err(CoreError::Validation("Uploaded video is empty".to_string()).into());
        }
        self.ensure_project_exists(project_id).await?;

        let video_url = self
            .assets
            .put(AssetKind::ArtworkVideo, &file_name, bytes)
            .await?;

        match self.attach_artwork_video(project_id, &video_url).await {
            Ok(attachment) => Ok(attachment),
            Err(err) => {
                self.discard_asset(&video_url).await;
                Err(err)
            }
        }
    }

    /// Decode a screenshot payload, store it, and record it for a review type.
    pub async fn save_screenshot(
        &self,
        project_id: &str,
        input: SaveScreenshot,
    ) -> AppResult<Screenshot> {
        let review_type = ReviewType::parse(&input.review_type)?;
        let (bytes, format) = decode_screenshot(&input.image_data)?;
        self.ensure_project_exists(project_id).await?;

        let now = Utc::now();
        let file_name = screenshot_file_name(project_id, review_type, format, now);
        let path = self
            .assets
            .put(AssetKind::Screenshot, &file_name, &bytes)
            .await?;

        let screenshot =
            match ScreenshotRepo::create(&self.pool, project_id, review_type, &path, now).await {
                Ok(Some(screenshot)) => screenshot,
                Ok(None) => {
                    self.discard_asset(&path).await;
                    return Err(CoreError::not_found("Project", project_id).into());
                }
                Err(err) => {
                    self.discard_asset(&path).await;
                    return Err(err.into());
                }
            };

        tracing::info!(
            project_id,
            review_type = %review_type,
            path = %screenshot.screenshot_path,
            size = bytes.len(),
            "Screenshot saved"
        );

        Ok(screenshot)
    }
}
