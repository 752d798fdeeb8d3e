use std::collections::BTreeMap;
use std::path::Path;

use reqwest::Method;
use serde_json::json;

use crate::client::Client;
use crate::errors::{Result, VideoJungleError};
use crate::models::{AssetJobResponse, CreateAssetResponse, NewProject, Project};
use crate::status::{JobHandle, ResourceKind};
use crate::upload::file_name_of;

impl Client {
    pub async fn list_projects(&self) -> Result<Vec<Project>> {
        self.request(Method::GET, "/projects", None).await
    }

    pub async fn get_project(&self, project_id: &str) -> Result<Project> {
        self.request(Method::GET, &format!("/projects/{project_id}"), None)
            .await
    }

    /// Create a project. Pass a `prompt_id` to attach a prompt and a
    /// `generation_method` to choose the script the project is set up with.
    pub async fn create_project(&self, project: &NewProject) -> Result<Project> {
        let body = serde_json::to_value(project)?;
        self.request(Method::POST, "/projects", Some(body)).await
    }

    pub async fn delete_project(&self, project_id: &str) -> Result<()> {
        self.request(Method::DELETE, &format!("/projects/{project_id}"), None)
            .await
    }

    /// Run a project script with values for the prompt's parameters.
    ///
    /// Generation is asynchronous: the returned handle names the asset that
    /// will hold the result. Wait on it with
    /// [`wait_for_asset`](Self::wait_for_asset) or fetch it directly with
    /// [`download_asset`](Self::download_asset).
    pub async fn generate(
        &self,
        project_id: &str,
        script_id: &str,
        parameters: &BTreeMap<String, String>,
    ) -> Result<JobHandle> {
        let body = json!({ "parameters": parameters });
        let resp: AssetJobResponse = self
            .request(
                Method::POST,
                &format!("/projects/{project_id}/{script_id}/generate"),
                Some(body),
            )
            .await?;

        tracing::info!(project_id, script_id, asset_id = %resp.asset_id, "generation started");
        Ok(JobHandle::new(resp.asset_id, ResourceKind::Asset))
    }

    /// Upload a local file as a project asset.
    ///
    /// This performs two HTTP calls:
    /// 1. `POST /projects/{id}/asset` to register the asset and obtain a
    ///    presigned upload form.
    /// 2. A form `POST` of the file to that presigned URL.
    ///
    /// The asset reports `uploaded == false` until storage confirms the file;
    /// use [`wait_for_asset`](Self::wait_for_asset) to wait for that.
    pub async fn upload_project_asset(
        &self,
        project_id: &str,
        name: &str,
        description: &str,
        path: impl AsRef<Path>,
    ) -> Result<JobHandle> {
        let path = path.as_ref();
        let body = json!({
            "name": name,
            "description": description,
            "filename": file_name_of(path),
        });

        let resp: CreateAssetResponse = self
            .request(Method::POST, &format!("/projects/{project_id}/asset"), Some(body))
            .await?;

        let (asset_id, form) = resp.into_parts();
        let form = form.ok_or_else(|| VideoJungleError::MissingUploadForm {
            kind: ResourceKind::Asset,
            id: asset_id.clone(),
        })?;

        self.upload_presigned(&form, path).await?;
        Ok(JobHandle::new(asset_id, ResourceKind::Asset))
    }
}
