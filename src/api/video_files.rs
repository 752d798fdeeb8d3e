use std::path::Path;

use reqwest::Method;
use serde_json::json;

use crate::client::Client;
use crate::errors::{Result, VideoJungleError};
use crate::models::{CreateVideoFileResponse, VideoFile};
use crate::poll::{wait_until_ready, PollOptions};
use crate::status::{JobHandle, ResourceKind};
use crate::upload::file_name_of;

impl Client {
    pub async fn list_video_files(&self) -> Result<Vec<VideoFile>> {
        self.request(Method::GET, "/video-file", None).await
    }

    pub async fn get_video_file(&self, video_id: &str) -> Result<VideoFile> {
        self.request(Method::GET, &format!("/video-file/{video_id}"), None)
            .await
    }

    /// Have the server fetch a video from a URL. Download and analysis run
    /// server-side; follow them with
    /// [`wait_for_analysis`](Self::wait_for_analysis) or
    /// [`subscribe_video_status`](Self::subscribe_video_status).
    pub async fn create_video_file_from_url(&self, name: &str, url: &str) -> Result<JobHandle> {
        let body = json!({
            "name": name,
            "filename": url,
            "upload_method": "url",
        });
        let resp: CreateVideoFileResponse =
            self.request(Method::POST, "/video-file", Some(body)).await?;

        let (video_id, _) = resp.into_parts();
        tracing::info!(video_id = %video_id, url, "video file created from URL");
        Ok(JobHandle::new(video_id, ResourceKind::VideoFile))
    }

    /// Upload a local video straight to storage.
    ///
    /// This performs two HTTP calls:
    /// 1. `POST /video-file` with `upload_method = "direct"` to create the
    ///    record and obtain a presigned upload form.
    /// 2. A form `POST` of the file to that presigned URL.
    ///
    /// With `run_analysis` false, start analysis afterwards with
    /// [`start_analysis`](Self::start_analysis).
    pub async fn upload_video_file(
        &self,
        name: &str,
        path: impl AsRef<Path>,
        run_analysis: bool,
    ) -> Result<JobHandle> {
        let path = path.as_ref();
        let body = json!({
            "name": name,
            "filename": file_name_of(path),
            "upload_method": "direct",
            "run_analysis": run_analysis,
        });
        let resp: CreateVideoFileResponse =
            self.request(Method::POST, "/video-file", Some(body)).await?;

        let (video_id, form) = resp.into_parts();
        let form = form.ok_or_else(|| VideoJungleError::MissingUploadForm {
            kind: ResourceKind::VideoFile,
            id: video_id.clone(),
        })?;

        self.upload_presigned(&form, path).await?;
        Ok(JobHandle::new(video_id, ResourceKind::VideoFile))
    }

    /// Start analysis of an uploaded video.
    pub async fn start_analysis(&self, video_id: &str) -> Result<()> {
        let _: serde_json::Value = self
            .request(Method::POST, &format!("/video-file/{video_id}/analysis"), None)
            .await?;
        tracing::info!(video_id, "analysis started");
        Ok(())
    }

    /// Poll a video file until its analysis status reads "analyzed".
    pub async fn wait_for_analysis(
        &self,
        video_id: &str,
        opts: Option<PollOptions>,
    ) -> Result<VideoFile> {
        let opts = opts.unwrap_or_else(|| PollOptions::for_kind(ResourceKind::VideoFile));
        wait_until_ready(video_id, &opts, || self.get_video_file(video_id)).await
    }
}
