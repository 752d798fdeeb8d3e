use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::{Asset, Edit, Prompt, VideoFile};

/// Placeholder text the server stores in a prompt while it is still being written.
pub const PROMPT_GENERATING: &str = "generating...";

/// Video file analysis status that marks a finished analysis.
pub const VIDEO_ANALYZED: &str = "analyzed";

/// The kinds of resource whose server-side work can be waited on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Prompt,
    Asset,
    VideoFile,
    Edit,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::Prompt => "prompt",
            ResourceKind::Asset => "asset",
            ResourceKind::VideoFile => "video file",
            ResourceKind::Edit => "edit",
        };
        f.write_str(name)
    }
}

/// Observed state of a server-side job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceStatus {
    Pending,
    Ready,
    /// The raw status matched one of the caller's failure markers.
    Failed(String),
}

impl ResourceStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, ResourceStatus::Ready)
    }
}

/// Identifies a resource whose processing was started by a create, upload,
/// generate or render call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobHandle {
    resource_id: String,
    kind: ResourceKind,
}

impl JobHandle {
    pub fn new(resource_id: impl Into<String>, kind: ResourceKind) -> Self {
        Self {
            resource_id: resource_id.into(),
            kind,
        }
    }

    pub fn id(&self) -> &str {
        &self.resource_id
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.resource_id)
    }
}

/// A resource the poller can watch.
///
/// Each implementation maps the resource's own pending/ready sentinel onto
/// [`ResourceStatus`]. `readiness` only ever returns `Pending` or `Ready`;
/// `Failed` is decided by the poller from [`status_marker`](Self::status_marker)
/// and the caller's configured failure markers.
pub trait Trackable {
    const KIND: ResourceKind;

    fn resource_id(&self) -> &str;

    fn readiness(&self) -> ResourceStatus;

    /// The raw status string reported by the server, if this kind has one.
    fn status_marker(&self) -> Option<&str> {
        None
    }

    /// URL of the finished artifact, if the resource exposes one.
    fn download_url(&self) -> Option<&str> {
        None
    }
}

/// Classify a fetched resource, promoting a pending resource to `Failed`
/// when its raw status is one of `failure_markers`.
pub(crate) fn classify<T: Trackable>(resource: &T, failure_markers: &[String]) -> ResourceStatus {
    match resource.readiness() {
        ResourceStatus::Ready => ResourceStatus::Ready,
        _ => match resource.status_marker() {
            Some(marker) if failure_markers.iter().any(|m| m == marker) => {
                ResourceStatus::Failed(marker.to_string())
            }
            _ => ResourceStatus::Pending,
        },
    }
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}

impl Trackable for Prompt {
    const KIND: ResourceKind = ResourceKind::Prompt;

    fn resource_id(&self) -> &str {
        &self.id
    }

    fn readiness(&self) -> ResourceStatus {
        if self.value == PROMPT_GENERATING {
            ResourceStatus::Pending
        } else {
            ResourceStatus::Ready
        }
    }
}

impl Trackable for Asset {
    const KIND: ResourceKind = ResourceKind::Asset;

    fn resource_id(&self) -> &str {
        &self.id
    }

    fn readiness(&self) -> ResourceStatus {
        if self.uploaded {
            ResourceStatus::Ready
        } else {
            ResourceStatus::Pending
        }
    }

    fn status_marker(&self) -> Option<&str> {
        self.status.as_deref()
    }

    fn download_url(&self) -> Option<&str> {
        non_empty(self.download_url.as_ref())
    }
}

impl Trackable for VideoFile {
    const KIND: ResourceKind = ResourceKind::VideoFile;

    fn resource_id(&self) -> &str {
        &self.id
    }

    // "uploaded", "processing", "queued" and a missing status all mean pending.
    fn readiness(&self) -> ResourceStatus {
        if self.status.as_deref() == Some(VIDEO_ANALYZED) {
            ResourceStatus::Ready
        } else {
            ResourceStatus::Pending
        }
    }

    fn status_marker(&self) -> Option<&str> {
        self.status.as_deref()
    }

    fn download_url(&self) -> Option<&str> {
        non_empty(self.download_url.as_ref())
    }
}

impl Trackable for Edit {
    const KIND: ResourceKind = ResourceKind::Edit;

    fn resource_id(&self) -> &str {
        &self.id
    }

    fn readiness(&self) -> ResourceStatus {
        if non_empty(self.download_url.as_ref()).is_some() {
            ResourceStatus::Ready
        } else {
            ResourceStatus::Pending
        }
    }

    fn status_marker(&self) -> Option<&str> {
        self.status.as_deref()
    }

    fn download_url(&self) -> Option<&str> {
        non_empty(self.download_url.as_ref())
    }
}
