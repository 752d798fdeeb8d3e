use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::status::{JobHandle, ResourceKind};

/// A project groups prompts, scripts, generated assets and edits.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub data: Option<String>,
    /// ISO 8601.
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub owner_id: String,
    #[serde(default)]
    pub asset_count: u64,
    #[serde(default)]
    pub assets: Vec<Asset>,
    #[serde(default)]
    pub prompts: Vec<Prompt>,
    #[serde(default)]
    pub scripts: Vec<Script>,
}

/// A file stored in a project: generated media or an upload.
///
/// `uploaded` stays `false` until the file is fully stored server-side.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Asset {
    pub id: String,
    #[serde(default)]
    pub keyname: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub asset_path: Option<String>,
    /// e.g. "video", "audio", "image".
    #[serde(default)]
    pub asset_type: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub uploaded: bool,
    #[serde(default)]
    pub create_parameters: Option<CreateParameters>,
}

impl Asset {
    /// Length of the generated media, when the server recorded it.
    pub fn duration_seconds(&self) -> Option<f64> {
        self.create_parameters
            .as_ref()?
            .metadata
            .as_ref()?
            .duration_seconds
    }
}

/// Parameters the asset was generated with.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CreateParameters {
    #[serde(default)]
    pub metadata: Option<AssetMetadata>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AssetMetadata {
    #[serde(default)]
    pub duration_seconds: Option<f64>,
}

/// An uploaded or URL-ingested source video.
///
/// `status` moves through "uploaded", "queued" and "processing" to "analyzed".
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VideoFile {
    pub id: String,
    pub name: String,
    pub filename: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    /// Seconds.
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub fps: Option<f64>,
    #[serde(default)]
    pub owner_id: String,
    /// Bytes.
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub recorded_at: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub download_url: Option<String>,
    /// Analysis segments; their shape depends on the analysis model.
    #[serde(default)]
    pub analysis: Vec<serde_json::Value>,
}

/// A generation prompt. While the server is still writing it, `value` holds
/// the `"generating..."` placeholder.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Prompt {
    pub id: String,
    /// Prompt text. Prompts embedded in a project may omit it.
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub persona: String,
    #[serde(default)]
    pub created_at: String,
    /// Variable names the prompt expects at generation time.
    #[serde(default)]
    pub parameters: Vec<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub task: Option<String>,
}

/// A generation method bound to a project.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Script {
    pub id: String,
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub created_at: String,
    /// Script-specific configuration, passed through untouched.
    #[serde(default)]
    pub value: serde_json::Value,
    #[serde(default)]
    pub inputs: Vec<ScriptInput>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScriptInput {
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// One entry from the catalogue of generation methods, e.g. "prompt-to-video".
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScriptOption {
    pub key: String,
    #[serde(default)]
    pub description: String,
}

/// A video edit. `download_url` is set once the edit has been rendered.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Edit {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub asset_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Returned by `create_edit` / `create_edit_from_clips`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSubmission {
    pub edit: JobHandle,
    /// The asset the render will be written to, when rendering was requested.
    pub asset: Option<JobHandle>,
}

/// Fields for `create_project`.
#[derive(Debug, Clone, Serialize)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_id: Option<String>,
    /// Script key, e.g. "prompt-to-speech".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_method: Option<String>,
}

impl NewProject {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            prompt_id: None,
            generation_method: None,
        }
    }

    pub fn prompt_id(mut self, id: impl Into<String>) -> Self {
        self.prompt_id = Some(id.into());
        self
    }

    pub fn generation_method(mut self, key: impl Into<String>) -> Self {
        self.generation_method = Some(key.into());
        self
    }
}

/// Fields for `create_prompt`, for writing a prompt by hand instead of
/// having the server generate one.
#[derive(Debug, Clone, Serialize)]
pub struct NewPrompt {
    /// Template text; parameters are referenced as `${NAME}`.
    pub prompt: String,
    pub parameters: Vec<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persona: Option<String>,
}

// ---------------------------------------------------------------------------
// Internal deserialization helpers (not part of the public API surface)
// ---------------------------------------------------------------------------

/// Presigned form upload: POST `fields` plus the file to `url`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PresignedPost {
    pub url: String,
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

#[derive(Deserialize)]
pub(crate) struct CreatedResource {
    pub id: String,
    #[serde(default)]
    pub upload_url: Option<PresignedPost>,
}

/// POST /video-file response. The presigned form can sit at the top level or
/// inside `video`.
#[derive(Deserialize)]
pub(crate) struct CreateVideoFileResponse {
    pub video: CreatedResource,
    #[serde(default)]
    pub upload_url: Option<PresignedPost>,
}

impl CreateVideoFileResponse {
    pub fn into_parts(self) -> (String, Option<PresignedPost>) {
        let upload = self.upload_url.or(self.video.upload_url);
        (self.video.id, upload)
    }
}

/// POST /projects/{id}/asset response.
#[derive(Deserialize)]
pub(crate) struct CreateAssetResponse {
    pub asset: CreatedResource,
    #[serde(default)]
    pub upload_url: Option<PresignedPost>,
}

impl CreateAssetResponse {
    pub fn into_parts(self) -> (String, Option<PresignedPost>) {
        let upload = self.upload_url.or(self.asset.upload_url);
        (self.asset.id, upload)
    }
}

/// POST /projects/{id}/{script_id}/generate and edit render responses.
#[derive(Deserialize)]
pub(crate) struct AssetJobResponse {
    pub asset_id: String,
}

/// POST /projects/{id}/edits response.
#[derive(Deserialize)]
pub(crate) struct CreateEditResponse {
    pub edit_id: String,
    #[serde(default)]
    pub asset_id: Option<String>,
}

impl From<CreateEditResponse> for EditSubmission {
    fn from(resp: CreateEditResponse) -> Self {
        EditSubmission {
            edit: JobHandle::new(resp.edit_id, ResourceKind::Edit),
            asset: resp
                .asset_id
                .filter(|id| !id.is_empty())
                .map(|id| JobHandle::new(id, ResourceKind::Asset)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn project_accepts_prompt_summaries_without_text() {
        let project: Project = serde_json::from_value(json!({
            "id": "proj-1",
            "name": "Horoscopes",
            "prompts": [{"id": "p1", "parameters": ["zodiac sign", "lucky number"]}],
        }))
        .unwrap();
        assert_eq!(project.prompts[0].parameters, vec!["zodiac sign", "lucky number"]);
        assert!(project.prompts[0].value.is_empty());
    }

    #[test]
    fn asset_duration_reads_nested_metadata() {
        let asset: Asset = serde_json::from_value(json!({
            "id": "a1",
            "create_parameters": {"metadata": {"duration_seconds": 31.5}},
        }))
        .unwrap();
        assert_eq!(asset.duration_seconds(), Some(31.5));

        let bare: Asset = serde_json::from_value(json!({"id": "a2"})).unwrap();
        assert_eq!(bare.duration_seconds(), None);
        assert!(!bare.uploaded);
    }

    #[test]
    fn video_upload_form_found_at_either_level() {
        let top: CreateVideoFileResponse = serde_json::from_value(json!({
            "video": {"id": "v1"},
            "upload_url": {"url": "https://s3.example.com", "fields": {"key": "k"}},
        }))
        .unwrap();
        let (id, form) = top.into_parts();
        assert_eq!(id, "v1");
        assert_eq!(form.unwrap().fields["key"], "k");

        let nested: CreateVideoFileResponse = serde_json::from_value(json!({
            "video": {"id": "v2", "upload_url": {"url": "https://s3.example.com"}},
        }))
        .unwrap();
        let (id, form) = nested.into_parts();
        assert_eq!(id, "v2");
        assert!(form.unwrap().fields.is_empty());
    }

    #[test]
    fn edit_submission_ignores_blank_asset_id() {
        let resp = CreateEditResponse {
            edit_id: "e1".into(),
            asset_id: Some(String::new()),
        };
        let submission = EditSubmission::from(resp);
        assert_eq!(submission.edit.kind(), ResourceKind::Edit);
        assert!(submission.asset.is_none());
    }

    #[test]
    fn new_project_omits_unset_fields() {
        let body = serde_json::to_value(NewProject::new("First", "demo")).unwrap();
        assert_eq!(body, json!({"name": "First", "description": "demo"}));
    }
}
