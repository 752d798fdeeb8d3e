//! Upload a clip, cut it into an edit, and download the render.
//!
//! Run with:
//!   VJ_API_KEY=... cargo run --example generate_edit -- /path/to/video.mp4

use tracing_subscriber::EnvFilter;
use videojungle::{ClientBuilder, ClipDescriptor, EditBuilder, NewProject};

#[tokio::main]
async fn main() -> videojungle::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("videojungle=info")),
        )
        .init();

    let Some(file) = std::env::args().nth(1) else {
        eprintln!("usage: generate_edit <video file>");
        std::process::exit(2);
    };

    let client = ClientBuilder::new().build()?;

    let project = client
        .create_project(&NewProject::new("My Project", "This is a test project"))
        .await?;

    let video = client.upload_video_file("Kirk Upload", &file, true).await?;

    // Don't render yet; download_edit_render starts the render when needed.
    let edit = EditBuilder::new("program generated edit")
        .description("two clip edit")
        .skip_rendering(true)
        .clip(ClipDescriptor::new(video.id(), "00:00:10.000", "00:00:15.000"))
        .clip(ClipDescriptor::new(video.id(), "00:00:10.000", "00:00:15.000"));

    let submission = client.create_edit_from_clips(&project.id, edit).await?;
    println!("Open in browser: {}", client.edit_url(&project.id, submission.edit.id()));

    let path = client
        .download_edit_render(&project.id, submission.edit.id(), "out.mp4", None)
        .await?;
    println!("Rendered edit saved to {}", path.display());

    Ok(())
}
