#![allow(dead_code)]

use std::time::Duration;

use serde_json::{json, Value};
use videojungle::{Client, ClientBuilder, PollOptions};
use wiremock::MockServer;

pub const API_KEY: &str = "test-key";
pub const VIDEO_ID: &str = "0b6f5f3e-6a3c-4d3e-9a57-3f4c2b1d9e10";
pub const AUDIO_ID: &str = "5d2f0c7a-1b8e-4f6a-8c3d-2e9b7a4f1c06";

pub fn client_for(server: &MockServer) -> Client {
    ClientBuilder::new()
        .api_key(API_KEY)
        .base_url(server.uri())
        .build()
        .unwrap()
}

/// Poll fast so tests don't sit in sleeps.
pub fn fast_poll() -> PollOptions {
    PollOptions::default()
        .interval(Duration::from_millis(5))
        .timeout(Some(Duration::from_secs(5)))
}

pub fn asset_json(id: &str, uploaded: bool, download_url: Option<String>) -> Value {
    json!({
        "id": id,
        "keyname": format!("{id}.mp4"),
        "asset_type": "video",
        "created_at": "2025-04-24T10:00:00Z",
        "status": if uploaded { "uploaded" } else { "processing" },
        "uploaded": uploaded,
        "download_url": download_url,
    })
}
