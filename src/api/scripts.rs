use reqwest::Method;

use crate::client::Client;
use crate::errors::Result;
use crate::models::ScriptOption;

impl Client {
    /// List the generation methods available to the account, e.g.
    /// "prompt-to-video" or "prompt-to-speech".
    pub async fn list_script_options(&self) -> Result<Vec<ScriptOption>> {
        self.request(Method::GET, "/scripts/options", None).await
    }
}
