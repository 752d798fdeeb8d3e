//! # Video Jungle client for Rust
//!
//! Async client for the [Video Jungle](https://www.video-jungle.com) video
//! generation and editing API. Create projects and prompts, generate media,
//! upload and analyze clips, assemble edits, and wait for the server to finish
//! each job before fetching the result.
//!
//! ## Quick start
//!
//! ```no_run
//! use std::collections::BTreeMap;
//! use videojungle::{Client, NewProject};
//!
//! #[tokio::main]
//! async fn main() -> videojungle::Result<()> {
//!     let client = Client::new("vj_your_api_key")?;
//!
//!     // The server writes the prompt asynchronously; this waits for the text.
//!     let prompt = client
//!         .generate_prompt(
//!             "a horoscope reader who leaves people excited about their future",
//!             &["zodiac sign".into(), "lucky number".into()],
//!             None,
//!         )
//!         .await?;
//!     println!("{}", prompt.value);
//!
//!     let project = client
//!         .create_project(&NewProject::new("Horoscopes", "daily readings").prompt_id(&prompt.id))
//!         .await?;
//!
//!     let parameters = BTreeMap::from([
//!         ("zodiac sign".to_string(), "Aries".to_string()),
//!         ("lucky number".to_string(), "7".to_string()),
//!     ]);
//!     let job = client
//!         .generate(&project.id, &project.scripts[0].id, &parameters)
//!         .await?;
//!
//!     // Waits until the generated asset is uploaded, then streams it to disk.
//!     client.download_asset(job.id(), "horoscope.mp4", None).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Waiting on jobs
//!
//! Every `wait_for_*` method and every download accepts an optional
//! [`PollOptions`] to tune the check interval, bound the wait, or declare
//! which raw status values mean the job failed.
//!
//! ```no_run
//! use std::time::Duration;
//! use videojungle::{PollOptions, ResourceKind};
//!
//! # async fn example(client: videojungle::Client) -> videojungle::Result<()> {
//! let opts = PollOptions::for_kind(ResourceKind::VideoFile)
//!     .timeout(Some(Duration::from_secs(600)))
//!     .failure_marker("error")
//!     .on_progress(|p| println!("{} {}: {:?}", p.kind, p.resource_id, p.status));
//!
//! let video = client.wait_for_analysis("video-id", Some(opts)).await?;
//! println!("{} analysis segments", video.analysis.len());
//! # Ok(())
//! # }
//! ```

mod api;
mod client;
mod download;
mod edit;
mod errors;
mod models;
mod poll;
mod status;
mod stream;
mod upload;

pub use client::{Client, ClientBuilder};
pub use download::DownloadTarget;
pub use edit::{
    AudioLevel, AudioOverlayDescriptor, AudioOverlayRef, ClipDescriptor, ClipKind, ClipRef,
    EditBuilder, EditSpec,
};
pub use errors::{Result, VideoJungleError};
pub use models::{
    Asset, AssetMetadata, CreateParameters, Edit, EditSubmission, NewProject, NewPrompt, Project,
    Prompt, Script, ScriptInput, ScriptOption, VideoFile,
};
pub use poll::{wait_until_ready, PollOptions, PollProgress};
pub use status::{JobHandle, ResourceKind, ResourceStatus, Trackable, PROMPT_GENERATING, VIDEO_ANALYZED};
pub use stream::{parse_event_line, StatusEvent, StatusStream};
pub use tokio_util::sync::CancellationToken;
