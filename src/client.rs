use std::time::Duration;

use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::Method;
use serde::de::DeserializeOwned;

use crate::errors::{Result, VideoJungleError};

const DEFAULT_BASE_URL: &str = "https://api.video-jungle.com";
const DEFAULT_APP_URL: &str = "https://app.video-jungle.com";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Builder for constructing a [`Client`] with custom configuration.
///
/// # Example
///
/// ```no_run
/// use videojungle::ClientBuilder;
/// use std::time::Duration;
///
/// # fn example() -> videojungle::Result<()> {
/// let client = ClientBuilder::new()
///     .api_key("vj_abc123")
///     .base_url("https://staging.video-jungle.com")
///     .timeout(Duration::from_secs(120))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    api_key: Option<String>,
    base_url: Option<String>,
    app_url: String,
    timeout: Duration,
}

impl ClientBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            api_key: None,
            base_url: None,
            app_url: DEFAULT_APP_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the API key for authentication.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Override the API base URL (defaults to `VJ_API_URL`, then
    /// `https://api.video-jungle.com`).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Override the web app URL used by [`Client::edit_url`].
    pub fn app_url(mut self, url: impl Into<String>) -> Self {
        self.app_url = url.into();
        self
    }

    /// Set the HTTP request timeout (defaults to 60 seconds).
    ///
    /// Status subscriptions and artifact transfers are not subject to it.
    pub fn timeout(mut self, d: Duration) -> Self {
        self.timeout = d;
        self
    }

    /// Build the [`Client`].
    ///
    /// If no API key was set via [`api_key`](Self::api_key), the builder will
    /// attempt to read the `VJ_API_KEY` environment variable.
    ///
    /// Returns [`VideoJungleError::Authentication`] if no usable key is available.
    pub fn build(self) -> Result<Client> {
        let api_key = self
            .api_key
            .or_else(|| std::env::var("VJ_API_KEY").ok())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| VideoJungleError::Authentication {
                message: "API key is required. Pass it to ClientBuilder::api_key() \
                          or set the VJ_API_KEY environment variable."
                    .into(),
            })?;

        let auth_header = bearer(&api_key)?;

        let base_url = self
            .base_url
            .or_else(|| std::env::var("VJ_API_URL").ok())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let http = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(VideoJungleError::Http)?;

        let stream_http = reqwest::Client::builder()
            .build()
            .map_err(VideoJungleError::Http)?;

        Ok(Client {
            base_url: base_url.trim_end_matches('/').to_string(),
            app_url: self.app_url.trim_end_matches('/').to_string(),
            api_key,
            auth_header,
            http,
            stream_http,
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn bearer(api_key: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|_| {
        VideoJungleError::Authentication {
            message: "API key contains characters not allowed in an HTTP header".into(),
        }
    })
}

/// The Video Jungle API client.
///
/// Every operation is a method on an explicit client instance; there is no
/// process-wide default client.
///
/// # Example
///
/// ```no_run
/// use videojungle::Client;
///
/// # async fn example() -> videojungle::Result<()> {
/// let client = Client::new("vj_abc123")?;
///
/// let prompt = client
///     .generate_prompt("a horoscope reader", &["zodiac sign".into()], None)
///     .await?;
/// println!("{}", prompt.value);
/// # Ok(())
/// # }
/// ```
pub struct Client {
    base_url: String,
    app_url: String,
    api_key: String,
    auth_header: HeaderValue,
    http: reqwest::Client,
    stream_http: reqwest::Client,
}

impl Client {
    /// Create a new client with the given API key and default settings.
    ///
    /// For customization, use [`ClientBuilder`] instead.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        ClientBuilder::new().api_key(api_key).build()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Link to an edit in the Video Jungle web editor.
    pub fn edit_url(&self, project_id: &str, edit_id: &str) -> String {
        format!("{}/projects/{project_id}/edits/{edit_id}", self.app_url)
    }

    // -----------------------------------------------------------------------
    // Crate-internal transport
    // -----------------------------------------------------------------------

    pub(crate) fn stream_http(&self) -> &reqwest::Client {
        &self.stream_http
    }

    pub(crate) fn api_key(&self) -> &str {
        &self.api_key
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Execute an authenticated API request and decode the JSON response.
    ///
    /// Non-2xx responses are mapped by [`error_from_response`] and returned
    /// immediately; nothing is retried. An empty success body decodes as JSON
    /// `null`, so `T = ()` works for endpoints without a payload.
    pub(crate) async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> Result<T> {
        let url = self.url(path);
        tracing::debug!(%method, path, "sending API request");

        let mut req = self
            .http
            .request(method, &url)
            .header(AUTHORIZATION, self.auth_header.clone());

        if let Some(ref b) = body {
            req = req.json(b);
        }

        let response = req.send().await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let text = response.text().await?;
        let payload = if text.trim().is_empty() { "null" } else { &text };
        serde_json::from_str(payload).map_err(|source| VideoJungleError::Decode {
            source,
            body: text.clone(),
        })
    }
}

/// Map a non-success response to a typed error.
///
/// Server-side validation failures (HTTP 422) are logged with their detail
/// before being returned.
pub(crate) async fn error_from_response(response: reqwest::Response) -> VideoJungleError {
    let status_code = response.status().as_u16();
    let url = response.url().path().to_string();
    let response_text = response.text().await.unwrap_or_default();

    let parsed_body: Option<serde_json::Value> = serde_json::from_str(&response_text).ok();

    let message = parsed_body
        .as_ref()
        .and_then(|b| b.get("detail").or_else(|| b.get("error")))
        .map(|d| match d.as_str() {
            Some(s) => s.to_string(),
            None => d.to_string(),
        })
        .unwrap_or_else(|| response_text.clone());

    match status_code {
        401 => VideoJungleError::Authentication { message },
        403 => VideoJungleError::PermissionDenied { message },
        404 => VideoJungleError::NotFound { message },
        422 => {
            tracing::warn!(path = %url, detail = %message, "request failed validation");
            VideoJungleError::Validation {
                message,
                body: parsed_body,
            }
        }
        _ => VideoJungleError::Api {
            status_code,
            message,
            body: parsed_body,
        },
    }
}
