//! Waiting for server-side jobs to finish.
//!
//! Prompt generation, asset uploads, video analysis and edit renders all
//! complete asynchronously on the server. [`wait_until_ready`] is the one loop
//! that watches any of them: it re-fetches the resource, classifies it through
//! its [`Trackable`] impl, and sleeps a fixed interval between checks until the
//! resource is ready, reports a configured failure marker, or runs out of time.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;

use crate::errors::{Result, VideoJungleError};
use crate::status::{classify, ResourceKind, ResourceStatus, Trackable};

const PROMPT_INTERVAL: Duration = Duration::from_millis(200);
const DEFAULT_INTERVAL: Duration = Duration::from_millis(500);
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Snapshot handed to [`PollOptions::on_progress`] after each pending check.
#[derive(Debug)]
pub struct PollProgress<'a> {
    pub kind: ResourceKind,
    pub resource_id: &'a str,
    /// 1-based number of the check that just came back pending.
    pub attempt: u32,
    pub elapsed: Duration,
    /// Raw server status, for kinds that report one.
    pub status: Option<&'a str>,
}

/// Polling config for the `wait_for_*` and download methods.
pub struct PollOptions {
    /// Default: 200ms for prompts, 500ms otherwise.
    pub interval: Duration,
    /// Give up after this long. `None` waits forever. Default: 30min.
    pub timeout: Option<Duration>,
    /// Give up after this many checks. Default: unlimited.
    pub max_attempts: Option<u32>,
    /// Raw status values that mean the job failed. Default: none.
    pub failure_markers: Vec<String>,
    /// Called after every check that found the resource still pending.
    #[allow(clippy::type_complexity)]
    pub on_progress: Option<Box<dyn Fn(&PollProgress<'_>) + Send + Sync>>,
}

impl PollOptions {
    /// Defaults tuned for the given resource kind.
    pub fn for_kind(kind: ResourceKind) -> Self {
        let interval = match kind {
            ResourceKind::Prompt => PROMPT_INTERVAL,
            _ => DEFAULT_INTERVAL,
        };
        Self {
            interval,
            timeout: Some(DEFAULT_TIMEOUT),
            max_attempts: None,
            failure_markers: Vec::new(),
            on_progress: None,
        }
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    /// Treat a pending resource whose raw status equals `marker` as failed.
    pub fn failure_marker(mut self, marker: impl Into<String>) -> Self {
        self.failure_markers.push(marker.into());
        self
    }

    pub fn on_progress(mut self, f: impl Fn(&PollProgress<'_>) + Send + Sync + 'static) -> Self {
        self.on_progress = Some(Box::new(f));
        self
    }
}

impl Default for PollOptions {
    fn default() -> Self {
        Self::for_kind(ResourceKind::Asset)
    }
}

/// Re-fetch a resource until it is ready.
///
/// `fetch` must be a read-only lookup of `resource_id`. Checks are strictly
/// sequential. The first fetch happens immediately, so an already-ready
/// resource costs exactly one request.
///
/// # Errors
///
/// - Any error returned by `fetch`, unchanged.
/// - [`VideoJungleError::JobFailed`] if the raw status matches one of
///   [`PollOptions::failure_markers`].
/// - [`VideoJungleError::Timeout`] once `max_attempts` or `timeout` is reached.
pub async fn wait_until_ready<T, F, Fut>(
    resource_id: &str,
    opts: &PollOptions,
    mut fetch: F,
) -> Result<T>
where
    T: Trackable,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let started = Instant::now();
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;
        let resource = fetch().await?;

        match classify(&resource, &opts.failure_markers) {
            ResourceStatus::Ready => {
                tracing::info!(kind = %T::KIND, id = resource_id, attempt, "job complete");
                return Ok(resource);
            }
            ResourceStatus::Failed(status) => {
                tracing::warn!(kind = %T::KIND, id = resource_id, %status, "job failed");
                return Err(VideoJungleError::JobFailed {
                    kind: T::KIND,
                    id: resource_id.to_string(),
                    status,
                });
            }
            ResourceStatus::Pending => {}
        }

        let elapsed = started.elapsed();
        tracing::debug!(
            kind = %T::KIND,
            id = resource_id,
            attempt,
            status = resource.status_marker().unwrap_or("-"),
            "still pending",
        );

        if let Some(ref cb) = opts.on_progress {
            cb(&PollProgress {
                kind: T::KIND,
                resource_id,
                attempt,
                elapsed,
                status: resource.status_marker(),
            });
        }

        let out_of_attempts = opts.max_attempts.is_some_and(|max| attempt >= max);
        let out_of_time = opts.timeout.is_some_and(|limit| elapsed >= limit);
        if out_of_attempts || out_of_time {
            return Err(VideoJungleError::Timeout {
                kind: T::KIND,
                id: resource_id.to_string(),
                attempts: attempt,
                waited: elapsed,
            });
        }

        tokio::time::sleep(opts.interval).await;
    }
}
