use std::path::{Path, PathBuf};

use reqwest::Method;

use crate::client::Client;
use crate::download::DownloadTarget;
use crate::edit::{EditBuilder, EditSpec};
use crate::errors::Result;
use crate::models::{AssetJobResponse, CreateEditResponse, Edit, EditSubmission};
use crate::poll::{wait_until_ready, PollOptions};
use crate::status::{JobHandle, ResourceKind, Trackable};

impl Client {
    pub async fn list_edits(&self, project_id: &str) -> Result<Vec<Edit>> {
        self.request(Method::GET, &format!("/projects/{project_id}/edits"), None)
            .await
    }

    pub async fn get_edit(&self, project_id: &str, edit_id: &str) -> Result<Edit> {
        self.request(
            Method::GET,
            &format!("/projects/{project_id}/edits/{edit_id}"),
            None,
        )
        .await
    }

    /// Submit a validated edit.
    ///
    /// Unless the edit sets `skip_rendering`, the server starts rendering
    /// right away and the submission names the asset the render goes to.
    pub async fn create_edit(&self, project_id: &str, spec: &EditSpec) -> Result<EditSubmission> {
        let body = serde_json::to_value(spec)?;
        let resp: CreateEditResponse = self
            .request(Method::POST, &format!("/projects/{project_id}/edits"), Some(body))
            .await?;

        let submission = EditSubmission::from(resp);
        tracing::info!(
            project_id,
            edit_id = submission.edit.id(),
            clips = spec.clips.len(),
            "edit created",
        );
        Ok(submission)
    }

    /// Validate clip descriptors and submit the resulting edit.
    ///
    /// Validation runs to completion before any request is sent, so an
    /// invalid clip anywhere in the list costs no network traffic.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use videojungle::{ClipDescriptor, EditBuilder};
    ///
    /// # async fn example(client: videojungle::Client, video_id: &str) -> videojungle::Result<()> {
    /// let edit = EditBuilder::new("program generated edit")
    ///     .description("two clip edit")
    ///     .skip_rendering(true)
    ///     .clip(ClipDescriptor::new(video_id, "00:00:10.000", "00:00:15.000"))
    ///     .clip(ClipDescriptor::new(video_id, "00:00:20.000", "00:00:25.000"));
    ///
    /// let submission = client.create_edit_from_clips("project-id", edit).await?;
    /// println!("{}", client.edit_url("project-id", submission.edit.id()));
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create_edit_from_clips(
        &self,
        project_id: &str,
        edit: EditBuilder,
    ) -> Result<EditSubmission> {
        let spec = edit.build()?;
        self.create_edit(project_id, &spec).await
    }

    /// Replace an existing edit's clips and settings.
    pub async fn update_edit(&self, project_id: &str, edit_id: &str, spec: &EditSpec) -> Result<Edit> {
        let body = serde_json::to_value(spec)?;
        self.request(
            Method::PUT,
            &format!("/projects/{project_id}/edits/{edit_id}"),
            Some(body),
        )
        .await
    }

    /// Start rendering an edit. The handle names the asset the render is
    /// written to.
    pub async fn render_edit(&self, project_id: &str, edit_id: &str) -> Result<JobHandle> {
        let resp: AssetJobResponse = self
            .request(
                Method::POST,
                &format!("/projects/{project_id}/edits/{edit_id}/render"),
                None,
            )
            .await?;

        tracing::info!(project_id, edit_id, asset_id = %resp.asset_id, "render started");
        Ok(JobHandle::new(resp.asset_id, ResourceKind::Asset))
    }

    /// Poll an edit until it exposes a download URL.
    pub async fn wait_for_edit(
        &self,
        project_id: &str,
        edit_id: &str,
        opts: Option<PollOptions>,
    ) -> Result<Edit> {
        let opts = opts.unwrap_or_else(|| PollOptions::for_kind(ResourceKind::Edit));
        wait_until_ready(edit_id, &opts, || self.get_edit(project_id, edit_id)).await
    }

    /// Save the rendered video of an edit to `path`.
    ///
    /// An edit that already has a download URL is fetched directly. Otherwise
    /// a render is started, its asset is polled until uploaded, and that file
    /// is downloaded. At most one render request is issued per call, and none
    /// for an edit that is already rendered.
    pub async fn download_edit_render(
        &self,
        project_id: &str,
        edit_id: &str,
        path: impl AsRef<Path>,
        opts: Option<PollOptions>,
    ) -> Result<PathBuf> {
        let edit = self.get_edit(project_id, edit_id).await?;

        if edit.readiness().is_ready() {
            tracing::debug!(edit_id, "edit already rendered");
            let target = DownloadTarget::for_resource(&edit, path)?;
            return self.download(target).await;
        }

        let job = self.render_edit(project_id, edit_id).await?;
        self.download_asset(job.id(), path, opts).await
    }
}
