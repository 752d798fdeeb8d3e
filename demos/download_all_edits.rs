//! Download every rendered edit of a project as numbered episodes.
//!
//! Run with:
//!   VJ_API_KEY=... cargo run --example download_all_edits -- <project-id> [output-dir]

use std::path::PathBuf;

use tracing_subscriber::EnvFilter;
use videojungle::ClientBuilder;

#[tokio::main]
async fn main() -> videojungle::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("videojungle=info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let Some(project_id) = args.next() else {
        eprintln!("usage: download_all_edits <project-id> [output-dir]");
        std::process::exit(2);
    };
    let output_dir = PathBuf::from(args.next().unwrap_or_else(|| "./downloaded_edits".into()));
    tokio::fs::create_dir_all(&output_dir).await?;

    let client = ClientBuilder::new().build()?;

    let mut edits = client.list_edits(&project_id).await?;
    if edits.is_empty() {
        println!("No edits found in this project.");
        return Ok(());
    }
    edits.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    println!("Found {} edit(s) in the project.", edits.len());

    let total = edits.len();
    for (i, edit) in edits.iter().enumerate() {
        let out = output_dir.join(format!("episode-{:02}.mp4", i + 1));
        println!("\n[{}/{}] Downloading: {} ({})", i + 1, total, edit.name, edit.id);

        // One failed edit shouldn't stop the rest.
        match client.download_edit_render(&project_id, &edit.id, &out, None).await {
            Ok(path) => println!("  saved to {}", path.display()),
            Err(e) => println!("  error downloading edit {}: {e}", edit.id),
        }
    }

    println!("\nDownload complete. All edits saved to: {}", output_dir.display());
    Ok(())
}
