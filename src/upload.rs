use std::path::Path;

use reqwest::multipart::{Form, Part};

use crate::client::Client;
use crate::errors::{Result, VideoJungleError};
use crate::models::PresignedPost;

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Guess a media type from the file extension.
pub(crate) fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("mp4" | "m4v") => "video/mp4",
        Some("mov") => "video/quicktime",
        Some("webm") => "video/webm",
        Some("mkv") => "video/x-matroska",
        Some("mp3") => "audio/mpeg",
        Some("wav") => "audio/wav",
        Some("m4a") => "audio/mp4",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        _ => FALLBACK_CONTENT_TYPE,
    }
}

pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload.bin".to_string())
}

impl Client {
    /// Send a local file through a presigned form upload.
    ///
    /// Storage services reject the form unless every signed field precedes
    /// the file part.
    pub(crate) async fn upload_presigned(&self, form: &PresignedPost, path: &Path) -> Result<()> {
        let file_name = file_name_of(path);
        let bytes = tokio::fs::read(path).await?;
        let size = bytes.len();

        let content_type = form
            .fields
            .get("Content-Type")
            .map(String::as_str)
            .unwrap_or_else(|| content_type_for(path));

        let file_part = Part::bytes(bytes)
            .file_name(file_name.clone())
            .mime_str(content_type)?;

        let multipart = form
            .fields
            .iter()
            .fold(Form::new(), |f, (k, v)| f.text(k.clone(), v.clone()))
            .part("file", file_part);

        let resp = self
            .stream_http()
            .post(&form.url)
            .multipart(multipart)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status_code = resp.status().as_u16();
            let text = resp.text().await.unwrap_or_default();
            let snippet: String = text.chars().take(300).collect();
            return Err(VideoJungleError::Upload {
                status_code,
                message: snippet.replace('\n', " "),
            });
        }

        tracing::info!(file = %file_name, bytes = size, "uploaded file");
        Ok(())
    }
}
