//! Declarative edit specifications.
//!
//! An edit is an ordered list of clips cut from source videos plus optional
//! audio overlays. [`EditBuilder`] turns loose [`ClipDescriptor`]s into a
//! checked [`EditSpec`]; nothing reaches the network until every clip has an
//! id, a start and an end, and every id parses as a UUID.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{Result, VideoJungleError};

const EDIT_VERSION: &str = "1";
const DEFAULT_FORMAT: &str = "mp4";
const DEFAULT_WIDTH: u32 = 1920;
const DEFAULT_HEIGHT: u32 = 1080;
const DEFAULT_FPS: f64 = 30.0;
const DEFAULT_FILENAME: &str = "output.mp4";

/// Where a clip's source id points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipKind {
    /// An uploaded or URL-ingested video file.
    #[default]
    VideoFile,
    /// An asset that belongs to the edit's project.
    User,
}

/// Volume over a sub-interval of a clip. Times are relative to the clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioLevel {
    /// 0.0 mutes, 1.0 is the source volume.
    pub audio_level: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

impl AudioLevel {
    /// A constant level for the whole clip.
    pub fn constant(level: f64) -> Self {
        Self {
            audio_level: level,
            start_time: None,
            end_time: None,
        }
    }
}

/// A clip as callers usually describe it: an id plus in/out points.
///
/// Every field is optional so that descriptors can come straight from JSON;
/// [`EditBuilder::build`] rejects the incomplete ones.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClipDescriptor {
    #[serde(default, alias = "id")]
    pub video_id: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<ClipKind>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub audio_levels: Vec<AudioLevel>,
}

impl ClipDescriptor {
    pub fn new(
        video_id: impl Into<String>,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        Self {
            video_id: Some(video_id.into()),
            kind: None,
            start_time: Some(start_time.into()),
            end_time: Some(end_time.into()),
            audio_levels: Vec::new(),
        }
    }

    pub fn kind(mut self, kind: ClipKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn audio_level(mut self, level: AudioLevel) -> Self {
        self.audio_levels.push(level);
        self
    }
}

/// An audio track laid over the whole edit, e.g. a voiceover.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AudioOverlayDescriptor {
    #[serde(default, alias = "id")]
    pub audio_id: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<ClipKind>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub audio_levels: Vec<AudioLevel>,
}

impl AudioOverlayDescriptor {
    pub fn new(
        audio_id: impl Into<String>,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        Self {
            audio_id: Some(audio_id.into()),
            kind: None,
            start_time: Some(start_time.into()),
            end_time: Some(end_time.into()),
            audio_levels: Vec::new(),
        }
    }

    pub fn kind(mut self, kind: ClipKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn audio_level(mut self, level: AudioLevel) -> Self {
        self.audio_levels.push(level);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipRef {
    pub video_id: Uuid,
    #[serde(rename = "type")]
    pub kind: ClipKind,
    pub video_start_time: String,
    pub video_end_time: String,
    pub audio_levels: Vec<AudioLevel>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioOverlayRef {
    pub audio_id: Uuid,
    #[serde(rename = "type")]
    pub kind: ClipKind,
    pub audio_start_time: String,
    pub audio_end_time: String,
    pub audio_levels: Vec<AudioLevel>,
}

/// A validated edit, ready to submit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditSpec {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "video_edit_version")]
    pub version: String,
    #[serde(rename = "video_output_format")]
    pub output_format: String,
    /// "WxH".
    #[serde(rename = "video_output_resolution")]
    pub resolution: String,
    #[serde(rename = "video_output_fps")]
    pub fps: f64,
    #[serde(rename = "video_output_filename")]
    pub filename: String,
    #[serde(rename = "video_series_sequential")]
    pub clips: Vec<ClipRef>,
    #[serde(rename = "audio_overlay")]
    pub audio_overlays: Vec<AudioOverlayRef>,
    /// Create the edit without starting a render.
    pub skip_rendering: bool,
    pub subtitles: bool,
}

/// Assembles an [`EditSpec`] from clip descriptors.
///
/// # Example
///
/// ```
/// use videojungle::{ClipDescriptor, EditBuilder};
///
/// let id = "0b6f5f3e-6a3c-4d3e-9a57-3f4c2b1d9e10";
/// let spec = EditBuilder::new("two cuts")
///     .clip(ClipDescriptor::new(id, "00:00:10.000", "00:00:15.000"))
///     .clip(ClipDescriptor::new(id, "00:00:20.000", "00:00:25.000"))
///     .skip_rendering(true)
///     .build()
///     .unwrap();
/// assert_eq!(spec.clips.len(), 2);
/// assert_eq!(spec.resolution, "1920x1080");
/// ```
#[derive(Debug, Clone)]
pub struct EditBuilder {
    name: String,
    description: Option<String>,
    output_format: String,
    width: u32,
    height: u32,
    fps: f64,
    filename: String,
    clips: Vec<ClipDescriptor>,
    audio_overlays: Vec<AudioOverlayDescriptor>,
    skip_rendering: bool,
    subtitles: bool,
}

impl EditBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            output_format: DEFAULT_FORMAT.to_string(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            fps: DEFAULT_FPS,
            filename: DEFAULT_FILENAME.to_string(),
            clips: Vec::new(),
            audio_overlays: Vec::new(),
            skip_rendering: false,
            subtitles: true,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn output_format(mut self, format: impl Into<String>) -> Self {
        self.output_format = format.into();
        self
    }

    pub fn resolution(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn fps(mut self, fps: f64) -> Self {
        self.fps = fps;
        self
    }

    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }

    pub fn clip(mut self, clip: ClipDescriptor) -> Self {
        self.clips.push(clip);
        self
    }

    pub fn clips(mut self, clips: impl IntoIterator<Item = ClipDescriptor>) -> Self {
        self.clips.extend(clips);
        self
    }

    pub fn audio_overlay(mut self, overlay: AudioOverlayDescriptor) -> Self {
        self.audio_overlays.push(overlay);
        self
    }

    pub fn skip_rendering(mut self, skip: bool) -> Self {
        self.skip_rendering = skip;
        self
    }

    /// Burn generated subtitles into the render (on by default).
    pub fn subtitles(mut self, enabled: bool) -> Self {
        self.subtitles = enabled;
        self
    }

    /// Validate every clip and overlay and produce the spec.
    ///
    /// # Errors
    ///
    /// [`VideoJungleError::InvalidEdit`] naming the offending entry when any
    /// clip or overlay lacks an id, start or end time, has an id that is not a
    /// UUID, or has a time that is not `HH:MM:SS[.fff]`.
    pub fn build(self) -> Result<EditSpec> {
        if self.width == 0 || self.height == 0 {
            return Err(invalid(format!(
                "resolution {}x{} must be non-zero",
                self.width, self.height
            )));
        }
        if !(self.fps.is_finite() && self.fps > 0.0) {
            return Err(invalid(format!("fps {} must be positive", self.fps)));
        }

        let clips = self
            .clips
            .into_iter()
            .enumerate()
            .map(|(i, clip)| clip_ref(i, clip))
            .collect::<Result<Vec<_>>>()?;

        let audio_overlays = self
            .audio_overlays
            .into_iter()
            .enumerate()
            .map(|(i, overlay)| overlay_ref(i, overlay))
            .collect::<Result<Vec<_>>>()?;

        Ok(EditSpec {
            name: self.name,
            description: self.description,
            version: EDIT_VERSION.to_string(),
            output_format: self.output_format,
            resolution: format!("{}x{}", self.width, self.height),
            fps: self.fps,
            filename: self.filename,
            clips,
            audio_overlays,
            skip_rendering: self.skip_rendering,
            subtitles: self.subtitles,
        })
    }
}

fn invalid(message: String) -> VideoJungleError {
    VideoJungleError::InvalidEdit { message }
}

fn clip_ref(index: usize, clip: ClipDescriptor) -> Result<ClipRef> {
    let at = format!("clips[{index}]");
    let video_id = parse_id(&at, "video_id", clip.video_id)?;
    let video_start_time = parse_time(&at, "start_time", clip.start_time)?;
    let video_end_time = parse_time(&at, "end_time", clip.end_time)?;
    check_levels(&at, &clip.audio_levels)?;

    Ok(ClipRef {
        video_id,
        kind: clip.kind.unwrap_or_default(),
        video_start_time,
        video_end_time,
        audio_levels: clip.audio_levels,
    })
}

fn overlay_ref(index: usize, overlay: AudioOverlayDescriptor) -> Result<AudioOverlayRef> {
    let at = format!("audio_overlay[{index}]");
    let audio_id = parse_id(&at, "audio_id", overlay.audio_id)?;
    let audio_start_time = parse_time(&at, "start_time", overlay.start_time)?;
    let audio_end_time = parse_time(&at, "end_time", overlay.end_time)?;
    check_levels(&at, &overlay.audio_levels)?;

    Ok(AudioOverlayRef {
        audio_id,
        kind: overlay.kind.unwrap_or(ClipKind::User),
        audio_start_time,
        audio_end_time,
        audio_levels: overlay.audio_levels,
    })
}

fn require(at: &str, field: &str, value: Option<String>) -> Result<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| invalid(format!("{at}: missing {field}")))
}

fn parse_id(at: &str, field: &str, value: Option<String>) -> Result<Uuid> {
    let raw = require(at, field, value)?;
    Uuid::parse_str(&raw)
        .map_err(|_| invalid(format!("{at}: {field} {raw:?} is not a valid UUID")))
}

fn parse_time(at: &str, field: &str, value: Option<String>) -> Result<String> {
    let raw = require(at, field, value)?;
    check_time(at, field, &raw)?;
    Ok(raw)
}

fn check_time(at: &str, field: &str, raw: &str) -> Result<()> {
    NaiveTime::parse_from_str(raw, "%H:%M:%S%.f")
        .map(|_| ())
        .map_err(|_| invalid(format!("{at}: {field} {raw:?} is not HH:MM:SS[.fff]")))
}

fn check_levels(at: &str, levels: &[AudioLevel]) -> Result<()> {
    for (i, level) in levels.iter().enumerate() {
        let at = format!("{at}.audio_levels[{i}]");
        if !(level.audio_level.is_finite() && level.audio_level >= 0.0) {
            return Err(invalid(format!(
                "{at}: audio_level {} must be a non-negative number",
                level.audio_level
            )));
        }
        for (field, time) in [("start_time", &level.start_time), ("end_time", &level.end_time)] {
            if let Some(raw) = time {
                check_time(&at, field, raw)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ID: &str = "0b6f5f3e-6a3c-4d3e-9a57-3f4c2b1d9e10";
    const AUDIO_ID: &str = "5d2f0c7a-1b8e-4f6a-8c3d-2e9b7a4f1c06";

    fn message(err: VideoJungleError) -> String {
        match err {
            VideoJungleError::InvalidEdit { message } => message,
            other => panic!("expected InvalidEdit, got {other:?}"),
        }
    }

    #[test]
    fn two_clips_keep_order_and_defaults() {
        let spec = EditBuilder::new("program generated edit")
            .clips(vec![
                ClipDescriptor::new(ID, "00:00:10.000", "00:00:15.000"),
                ClipDescriptor::new(ID, "00:00:10.000", "00:00:15.000"),
            ])
            .build()
            .unwrap();

        assert_eq!(spec.clips.len(), 2);
        for clip in &spec.clips {
            assert_eq!(clip.video_id, Uuid::parse_str(ID).unwrap());
            assert_eq!(clip.kind, ClipKind::VideoFile);
            assert_eq!(clip.video_start_time, "00:00:10.000");
            assert_eq!(clip.video_end_time, "00:00:15.000");
            assert!(clip.audio_levels.is_empty());
        }
        assert_eq!(spec.resolution, "1920x1080");
        assert_eq!(spec.fps, 30.0);
        assert_eq!(spec.output_format, "mp4");
        assert!(spec.subtitles);
        assert!(!spec.skip_rendering);
    }

    #[test]
    fn missing_end_time_is_rejected() {
        let clip: ClipDescriptor = serde_json::from_value(json!({
            "video_id": ID,
            "start_time": "00:00:10.000",
        }))
        .unwrap();

        let err = EditBuilder::new("e").clip(clip).build().unwrap_err();
        assert_eq!(message(err), "clips[0]: missing end_time");
    }

    #[test]
    fn invalid_clip_rejected_at_any_position() {
        for bad in 0..3 {
            let clips = (0..3).map(|i| {
                if i == bad {
                    ClipDescriptor::new("not-a-uuid", "00:00:01", "00:00:02")
                } else {
                    ClipDescriptor::new(ID, "00:00:01", "00:00:02")
                }
            });
            let err = EditBuilder::new("e").clips(clips).build().unwrap_err();
            let msg = message(err);
            assert!(msg.contains(&format!("clips[{bad}]")), "{msg}");
            assert!(msg.contains("\"not-a-uuid\""), "{msg}");
        }
    }

    #[test]
    fn blank_id_counts_as_missing() {
        let err = EditBuilder::new("e")
            .clip(ClipDescriptor::new("  ", "00:00:01", "00:00:02"))
            .build()
            .unwrap_err();
        assert_eq!(message(err), "clips[0]: missing video_id");
    }

    #[test]
    fn malformed_time_names_the_value() {
        let err = EditBuilder::new("e")
            .clip(ClipDescriptor::new(ID, "ten seconds", "00:00:02"))
            .build()
            .unwrap_err();
        assert!(message(err).contains("\"ten seconds\""));
    }

    #[test]
    fn overlay_defaults_to_project_asset() {
        let spec = EditBuilder::new("voiceover")
            .clip(ClipDescriptor::new(ID, "00:00:00", "00:00:30").audio_level(AudioLevel::constant(0.0)))
            .audio_overlay(AudioOverlayDescriptor::new(AUDIO_ID, "00:00:00", "00:00:30"))
            .build()
            .unwrap();

        assert_eq!(spec.audio_overlays[0].kind, ClipKind::User);
        assert_eq!(spec.clips[0].audio_levels, vec![AudioLevel::constant(0.0)]);
    }

    #[test]
    fn overlay_without_times_is_rejected() {
        let overlay = AudioOverlayDescriptor {
            audio_id: Some(AUDIO_ID.into()),
            ..Default::default()
        };
        let err = EditBuilder::new("e").audio_overlay(overlay).build().unwrap_err();
        assert_eq!(message(err), "audio_overlay[0]: missing start_time");
    }

    #[test]
    fn spec_serializes_to_wire_shape() {
        let spec = EditBuilder::new("cut")
            .resolution(1080, 1920)
            .fps(24.0)
            .skip_rendering(true)
            .clip(ClipDescriptor::new(ID, "00:00:10.000", "00:00:15.000").kind(ClipKind::User))
            .build()
            .unwrap();

        let body = serde_json::to_value(&spec).unwrap();
        assert_eq!(body["video_edit_version"], "1");
        assert_eq!(body["video_output_resolution"], "1080x1920");
        assert_eq!(body["video_output_fps"], 24.0);
        assert_eq!(body["video_output_filename"], "output.mp4");
        assert_eq!(body["skip_rendering"], true);
        assert_eq!(
            body["video_series_sequential"][0],
            json!({
                "video_id": ID,
                "type": "user",
                "video_start_time": "00:00:10.000",
                "video_end_time": "00:00:15.000",
                "audio_levels": [],
            })
        );
        assert_eq!(body["audio_overlay"], json!([]));
        assert!(body.get("description").is_none());
    }

    #[test]
    fn descriptor_accepts_id_alias_from_json() {
        let clip: ClipDescriptor = serde_json::from_value(json!({
            "id": ID,
            "type": "videofile",
            "start_time": "00:00:01",
            "end_time": "00:00:02",
        }))
        .unwrap();
        assert_eq!(clip.video_id.as_deref(), Some(ID));
        assert_eq!(clip.kind, Some(ClipKind::VideoFile));
    }
}
