use reqwest::Method;
use serde_json::json;

use crate::client::Client;
use crate::errors::Result;
use crate::models::{NewPrompt, Prompt};
use crate::poll::{wait_until_ready, PollOptions};
use crate::status::{ResourceKind, Trackable};

impl Client {
    pub async fn list_prompts(&self) -> Result<Vec<Prompt>> {
        self.request(Method::GET, "/prompts", None).await
    }

    pub async fn get_prompt(&self, prompt_id: &str) -> Result<Prompt> {
        self.request(Method::GET, &format!("/prompts/{prompt_id}"), None)
            .await
    }

    /// Store a hand-written prompt.
    pub async fn create_prompt(&self, prompt: &NewPrompt) -> Result<Prompt> {
        let body = serde_json::to_value(prompt)?;
        self.request(Method::POST, "/prompts", Some(body)).await
    }

    /// Ask the server to write a prompt for `task` and return immediately.
    ///
    /// The returned prompt usually still holds the `"generating..."`
    /// placeholder; see [`generate_prompt`](Self::generate_prompt) for the
    /// waiting variant.
    pub async fn submit_prompt_generation(
        &self,
        task: &str,
        parameters: &[String],
    ) -> Result<Prompt> {
        let body = json!({
            "task": task,
            "parameters": parameters,
        });
        self.request(Method::POST, "/prompts/generate", Some(body))
            .await
    }

    /// Have the server write a prompt for `task` and wait until its text is
    /// available.
    ///
    /// `parameters` names the variables the prompt should leave open for
    /// generation time, e.g. `["zodiac sign", "lucky number"]`.
    pub async fn generate_prompt(
        &self,
        task: &str,
        parameters: &[String],
        opts: Option<PollOptions>,
    ) -> Result<Prompt> {
        let prompt = self.submit_prompt_generation(task, parameters).await?;
        if prompt.readiness().is_ready() {
            return Ok(prompt);
        }
        self.wait_for_prompt(&prompt.id, opts).await
    }

    /// Poll a prompt until its value is no longer the generation placeholder.
    pub async fn wait_for_prompt(&self, prompt_id: &str, opts: Option<PollOptions>) -> Result<Prompt> {
        let opts = opts.unwrap_or_else(|| PollOptions::for_kind(ResourceKind::Prompt));
        wait_until_ready(prompt_id, &opts, || self.get_prompt(prompt_id)).await
    }
}
