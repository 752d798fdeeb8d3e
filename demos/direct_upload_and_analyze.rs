//! Upload a file straight to storage, start analysis, and follow its status.
//!
//! Run with:
//!   VJ_API_KEY=... cargo run --example direct_upload_and_analyze -- video.mp4 [--subscribe]
//!
//! With `--subscribe`, status events are printed until the server closes the
//! stream or Ctrl-C is pressed. Without it, the analysis is polled.

use std::path::Path;

use tracing_subscriber::EnvFilter;
use videojungle::{CancellationToken, ClientBuilder, StatusEvent};

#[tokio::main]
async fn main() -> videojungle::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("videojungle=info")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let subscribe = args.iter().any(|a| a == "--subscribe");
    let Some(file) = args.iter().find(|a| !a.starts_with("--")) else {
        eprintln!("usage: direct_upload_and_analyze <file> [--subscribe]");
        std::process::exit(2);
    };
    let name = Path::new(file)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.clone());

    let client = ClientBuilder::new().build()?;

    println!("Uploading '{file}' ...");
    let video = client.upload_video_file(&name, file, false).await?;
    println!("Upload complete.");

    client.start_analysis(video.id()).await?;
    println!("Analysis started for video id: {}", video.id());

    if !subscribe {
        let analyzed = client.wait_for_analysis(video.id(), None).await?;
        println!("Analysis finished: {} segments", analyzed.analysis.len());
        return Ok(());
    }

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let mut stream = client.subscribe_video_status(video.id(), cancel.clone()).await?;
    println!("Subscribed to status updates (Ctrl-C to exit) ...");

    while let Some(event) = stream.next_event().await {
        match event? {
            StatusEvent::Data(value) => println!("SSE data: {value}"),
            StatusEvent::RawData(text) => println!("SSE data: {text}"),
            StatusEvent::Field(line) => println!("{line}"),
        }
    }

    if cancel.is_cancelled() {
        println!("\nSSE subscription stopped by user.");
    }
    Ok(())
}
