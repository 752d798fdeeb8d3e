//! Generate a prompt, set up a project around it, and render a video.
//!
//! Run with:
//!   VJ_API_KEY=... cargo run --example generate_horoscope

use std::collections::BTreeMap;

use tracing_subscriber::EnvFilter;
use videojungle::{ClientBuilder, NewProject, PollOptions, ResourceKind};

#[tokio::main]
async fn main() -> videojungle::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("videojungle=info")),
        )
        .init();

    let client = ClientBuilder::new().build()?;

    // -----------------------------------------------------------------------
    // 1. Have the server write a prompt (waits for the text)
    // -----------------------------------------------------------------------
    let prompt = client
        .generate_prompt(
            "a horoscope reader who wants to leave the person excited about their future",
            &["zodiac sign".into(), "lucky number".into(), "date".into()],
            None,
        )
        .await?;
    println!("Prompt: {}", prompt.value);

    // -----------------------------------------------------------------------
    // 2. See which generation methods are available
    // -----------------------------------------------------------------------
    for script in client.list_script_options().await? {
        println!("  {}: {}", script.key, script.description);
    }

    // -----------------------------------------------------------------------
    // 3. Create a project bound to the prompt and generate a video
    // -----------------------------------------------------------------------
    let project = client
        .create_project(
            &NewProject::new("First Project", "My first project")
                .prompt_id(&prompt.id)
                .generation_method("prompt-to-video"),
        )
        .await?;

    let Some(script) = project.scripts.first() else {
        eprintln!("project {} has no scripts", project.id);
        return Ok(());
    };

    let parameters = BTreeMap::from([
        ("zodiac sign".to_string(), "Aries".to_string()),
        ("lucky number".to_string(), "7".to_string()),
        ("date".to_string(), "2025-04-24".to_string()),
    ]);
    let job = client.generate(&project.id, &script.id, &parameters).await?;
    println!("Generating video with asset id: {}", job.id());

    // -----------------------------------------------------------------------
    // 4. Wait for the render and save it
    // -----------------------------------------------------------------------
    let opts = PollOptions::for_kind(ResourceKind::Asset).on_progress(|p| {
        println!("  still generating ({:.0}s)", p.elapsed.as_secs_f64());
    });
    let path = client
        .download_asset(job.id(), "generated_horoscope.mp4", Some(opts))
        .await?;
    println!("Video generated and saved to: {}", path.display());

    Ok(())
}
