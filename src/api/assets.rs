use std::path::{Path, PathBuf};

use reqwest::Method;

use crate::client::Client;
use crate::download::DownloadTarget;
use crate::errors::Result;
use crate::models::Asset;
use crate::poll::{wait_until_ready, PollOptions};
use crate::status::ResourceKind;

impl Client {
    pub async fn get_asset(&self, asset_id: &str) -> Result<Asset> {
        self.request(Method::GET, &format!("/assets/{asset_id}"), None)
            .await
    }

    /// Poll an asset until the server reports it as uploaded.
    pub async fn wait_for_asset(&self, asset_id: &str, opts: Option<PollOptions>) -> Result<Asset> {
        let opts = opts.unwrap_or_else(|| PollOptions::for_kind(ResourceKind::Asset));
        wait_until_ready(asset_id, &opts, || self.get_asset(asset_id)).await
    }

    /// Wait for an asset to finish generating or uploading, then stream its
    /// file to `path`.
    ///
    /// # Errors
    ///
    /// - [`Timeout`](crate::VideoJungleError::Timeout) /
    ///   [`JobFailed`](crate::VideoJungleError::JobFailed) from the wait.
    /// - [`MissingArtifact`](crate::VideoJungleError::MissingArtifact) if the
    ///   ready asset has no download URL.
    /// - [`Download`](crate::VideoJungleError::Download) if fetching the bytes fails.
    pub async fn download_asset(
        &self,
        asset_id: &str,
        path: impl AsRef<Path>,
        opts: Option<PollOptions>,
    ) -> Result<PathBuf> {
        let asset = self.wait_for_asset(asset_id, opts).await?;
        let target = DownloadTarget::for_resource(&asset, path)?;
        self.download(target).await
    }
}
