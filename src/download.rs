use std::path::{Path, PathBuf};

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::client::Client;
use crate::errors::{Result, VideoJungleError};
use crate::status::Trackable;

/// A finished artifact and where to put it.
///
/// Consumed by [`Client::download`]; the local file is created (or
/// truncated) and filled chunk by chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    remote_url: String,
    local_path: PathBuf,
}

impl DownloadTarget {
    pub fn new(remote_url: impl Into<String>, local_path: impl AsRef<Path>) -> Self {
        Self {
            remote_url: remote_url.into(),
            local_path: local_path.as_ref().to_path_buf(),
        }
    }

    /// Target the artifact of a ready resource.
    ///
    /// Returns [`VideoJungleError::MissingArtifact`] if the resource exposes no
    /// download URL.
    pub fn for_resource<T: Trackable>(resource: &T, local_path: impl AsRef<Path>) -> Result<Self> {
        let url = resource
            .download_url()
            .ok_or_else(|| VideoJungleError::MissingArtifact {
                kind: T::KIND,
                id: resource.resource_id().to_string(),
            })?;
        Ok(Self::new(url, local_path))
    }

    pub fn remote_url(&self) -> &str {
        &self.remote_url
    }

    pub fn local_path(&self) -> &Path {
        &self.local_path
    }
}

impl Client {
    /// Stream an artifact to disk and return the written path.
    ///
    /// The artifact URL is fetched with a plain GET (no API credentials). If
    /// reading the body or writing the file fails mid-transfer, the partial
    /// file is removed.
    ///
    /// # Errors
    ///
    /// - [`VideoJungleError::Download`] with the response body on a non-2xx status.
    /// - [`VideoJungleError::Io`] if the local file cannot be written.
    pub async fn download(&self, target: DownloadTarget) -> Result<PathBuf> {
        let DownloadTarget {
            remote_url,
            local_path,
        } = target;

        let mut resp = self.stream_http().get(&remote_url).send().await?;

        if !resp.status().is_success() {
            let status_code = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(VideoJungleError::Download { status_code, body });
        }

        let file = tokio::fs::File::create(&local_path).await?;
        let total_bytes = write_body(&mut resp, file, &local_path).await?;

        tracing::info!(
            path = %local_path.display(),
            bytes = total_bytes,
            "downloaded artifact",
        );

        Ok(local_path)
    }
}

/// Copy the response body into `out`. On any read or write error `out` is
/// dropped and `path` removed.
async fn write_body<W>(resp: &mut reqwest::Response, mut out: W, path: &Path) -> Result<u64>
where
    W: AsyncWrite + Unpin,
{
    let copied = async {
        let mut total: u64 = 0;
        while let Some(chunk) = resp.chunk().await? {
            out.write_all(&chunk).await?;
            total += chunk.len() as u64;
        }
        out.flush().await?;
        Ok::<_, VideoJungleError>(total)
    }
    .await;

    if copied.is_err() {
        drop(out);
        let _ = tokio::fs::remove_file(path).await;
    }
    copied
}
