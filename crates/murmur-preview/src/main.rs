use std::io::Read;

use anyhow::Context;
use tracing::info;

use murmur_view::ViewConfig;

mod fixture;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging (stdout carries the descriptor)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "murmur=debug,murmur_view=debug".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // Config
    let config = ViewConfig::from_env()?;
    info!(
        reply_type = ?config.reply.reply_type,
        select = ?config.reply.thread_reply_select_type,
        reactions = config.is_reaction_enabled,
        "view config loaded"
    );

    // Fixture: path argument, or stdin
    let raw = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("reading fixture {}", path))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading fixture from stdin")?;
            buf
        }
    };
    let fixture: fixture::Fixture = serde_json::from_str(&raw).context("decoding fixture")?;

    let output = fixture::preview(&fixture, &config).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
