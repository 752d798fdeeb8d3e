mod common;

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use serde_json::json;
use videojungle::{DownloadTarget, VideoJungleError};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{asset_json, client_for, fast_poll};

#[tokio::test]
async fn generated_asset_is_downloaded_once_uploaded() {
    let server = MockServer::start().await;
    let payload = vec![7u8; 64 * 1024];
    let download_url = format!("{}/files/a1.mp4", server.uri());

    Mock::given(method("POST"))
        .and(path("/projects/proj-1/script-1/generate"))
        .and(body_json(json!({
            "parameters": {"lucky number": "7", "zodiac sign": "Aries"},
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"asset_id": "a1"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/assets/a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(asset_json("a1", false, None)))
        .up_to_n_times(3)
        .expect(3)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/assets/a1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(asset_json("a1", true, Some(download_url))),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/files/a1.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(payload.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let parameters = BTreeMap::from([
        ("zodiac sign".to_string(), "Aries".to_string()),
        ("lucky number".to_string(), "7".to_string()),
    ]);
    let job = client
        .generate("proj-1", "script-1", &parameters)
        .await
        .unwrap();

    let pending_checks = Arc::new(AtomicU32::new(0));
    let seen = Arc::clone(&pending_checks);
    let opts = fast_poll().on_progress(move |_| {
        seen.fetch_add(1, Ordering::SeqCst);
    });

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("generated_horoscope.mp4");
    let written = client.download_asset(job.id(), &out, Some(opts)).await.unwrap();

    assert_eq!(written, out);
    assert_eq!(pending_checks.load(Ordering::SeqCst), 3);
    let meta = tokio::fs::metadata(&out).await.unwrap();
    assert_eq!(meta.len(), payload.len() as u64);
}

#[tokio::test]
async fn download_overwrites_existing_file() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/files/short.mp3"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"abc".to_vec()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("voice.mp3");
    tokio::fs::write(&out, vec![0u8; 1024]).await.unwrap();

    let client = client_for(&server);
    let target = DownloadTarget::new(format!("{}/files/short.mp3", server.uri()), &out);
    client.download(target).await.unwrap();

    assert_eq!(tokio::fs::read(&out).await.unwrap(), b"abc");
}

#[tokio::test]
async fn failed_download_reports_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/files/missing.mp4"))
        .respond_with(ResponseTemplate::new(403).set_body_string("AccessDenied"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let client = client_for(&server);
    let target = DownloadTarget::new(
        format!("{}/files/missing.mp4", server.uri()),
        dir.path().join("out.mp4"),
    );

    match client.download(target).await.unwrap_err() {
        VideoJungleError::Download { status_code, body } => {
            assert_eq!(status_code, 403);
            assert_eq!(body, "AccessDenied");
        }
        other => panic!("expected Download, got {other:?}"),
    }
    assert!(!dir.path().join("out.mp4").exists());
}

#[tokio::test]
async fn ready_asset_without_url_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/assets/a2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(asset_json("a2", true, None)))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let client = client_for(&server);
    let err = client
        .download_asset("a2", dir.path().join("out.mp4"), Some(fast_poll()))
        .await
        .unwrap_err();

    assert!(matches!(err, VideoJungleError::MissingArtifact { ref id, .. } if id == "a2"));
}

#[tokio::test]
async fn stuck_asset_times_out_instead_of_looping() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/assets/a3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(asset_json("a3", false, None)))
        .expect(4)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .wait_for_asset("a3", Some(fast_poll().max_attempts(4)))
        .await
        .unwrap_err();

    assert!(matches!(err, VideoJungleError::Timeout { attempts: 4, .. }));
}

#[tokio::test]
async fn project_asset_upload_goes_through_presigned_form() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/projects/proj-1/asset"))
        .and(body_json(json!({
            "name": "Skate clip",
            "description": "downloaded clip",
            "filename": "skate.mp4",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "asset": {"id": "a4"},
            "upload_url": {
                "url": format!("{}/bucket", server.uri()),
                "fields": {"key": "uploads/a4.mp4", "policy": "p"},
            },
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/bucket"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("skate.mp4");
    tokio::fs::write(&file, b"fake video bytes").await.unwrap();

    let client = client_for(&server);
    let job = client
        .upload_project_asset("proj-1", "Skate clip", "downloaded clip", &file)
        .await
        .unwrap();
    assert_eq!(job.id(), "a4");

    let requests = server.received_requests().await.unwrap();
    let upload = requests.iter().find(|r| r.url.path() == "/bucket").unwrap();
    let body = String::from_utf8_lossy(&upload.body);
    let key_at = body.find("uploads/a4.mp4").unwrap();
    let file_at = body.find("fake video bytes").unwrap();
    assert!(key_at < file_at, "signed fields must precede the file");
}
