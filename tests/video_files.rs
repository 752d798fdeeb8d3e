mod common;

use serde_json::{json, Value};
use videojungle::{PollOptions, ResourceKind, VideoJungleError};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{client_for, fast_poll};

fn video_json(status: Option<&str>) -> Value {
    json!({
        "id": "v1",
        "name": "My Upload",
        "filename": "skate.mp4",
        "duration": 42.0,
        "fps": 29.97,
        "status": status,
        "analysis": [],
    })
}

#[tokio::test]
async fn direct_upload_then_analysis() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/video-file"))
        .and(body_json(json!({
            "name": "My Upload",
            "filename": "skate.mp4",
            "upload_method": "direct",
            "run_analysis": false,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "video": {
                "id": "v1",
                "upload_url": {
                    "url": format!("{}/bucket", server.uri()),
                    "fields": {"key": "videos/v1.mp4", "Content-Type": "video/mp4"},
                },
            },
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/bucket"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/video-file/v1/analysis"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "queued"})))
        .expect(1)
        .mount(&server)
        .await;

    for status in [None, Some("uploaded"), Some("queued"), Some("processing")] {
        Mock::given(method("GET"))
            .and(path("/video-file/v1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(video_json(status)))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path("/video-file/v1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(video_json(Some("analyzed"))))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("skate.mp4");
    tokio::fs::write(&file, vec![0u8; 4096]).await.unwrap();

    let client = client_for(&server);
    let job = client.upload_video_file("My Upload", &file, false).await.unwrap();
    assert_eq!(job.kind(), ResourceKind::VideoFile);

    client.start_analysis(job.id()).await.unwrap();
    let video = client.wait_for_analysis(job.id(), Some(fast_poll())).await.unwrap();
    assert_eq!(video.status.as_deref(), Some("analyzed"));
}

#[tokio::test]
async fn upload_rejected_by_storage() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/video-file"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "video": {"id": "v2"},
            "upload_url": {"url": format!("{}/bucket", server.uri()), "fields": {}},
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/bucket"))
        .respond_with(
            ResponseTemplate::new(403).set_body_string("<Error>\n<Code>AccessDenied</Code>\n</Error>"),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("clip.mov");
    tokio::fs::write(&file, b"bytes").await.unwrap();

    let err = client_for(&server)
        .upload_video_file("clip", &file, true)
        .await
        .unwrap_err();

    match err {
        VideoJungleError::Upload { status_code, message } => {
            assert_eq!(status_code, 403);
            assert!(!message.contains('\n'));
            assert!(message.contains("AccessDenied"));
        }
        other => panic!("expected Upload, got {other:?}"),
    }
}

#[tokio::test]
async fn url_ingest_returns_video_handle() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/video-file"))
        .and(body_json(json!({
            "name": "Skate Submarine",
            "filename": "https://www.youtube.com/watch?v=aAREp5P3mE4",
            "upload_method": "url",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"video": {"id": "v3"}})))
        .expect(1)
        .mount(&server)
        .await;

    let job = client_for(&server)
        .create_video_file_from_url("Skate Submarine", "https://www.youtube.com/watch?v=aAREp5P3mE4")
        .await
        .unwrap();
    assert_eq!(job.id(), "v3");
}

#[tokio::test]
async fn analysis_failure_marker_is_configurable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/video-file/v4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "v4",
            "name": "broken",
            "filename": "broken.mp4",
            "status": "analysis_failed",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let opts = PollOptions::for_kind(ResourceKind::VideoFile).failure_marker("analysis_failed");
    let err = client_for(&server)
        .wait_for_analysis("v4", Some(opts))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        VideoJungleError::JobFailed { kind: ResourceKind::VideoFile, ref status, .. } if status == "analysis_failed"
    ));
}
