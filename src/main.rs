use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use voxnotes::{
    create_router, AppSettings, AppState, Config, MemoryStore, OpenAiClient, UploadConfig,
};

#[derive(Parser)]
#[command(name = "voxnotes", about = "Chunked voice-note transcription service")]
struct Args {
    /// Path to the configuration file, without extension
    #[arg(short, long, default_value = "config/voxnotes")]
    config: String,

    /// Override the configured HTTP port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let cfg = Config::load(&args.config)?;
    let port = args.port.unwrap_or(cfg.service.http.port);

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));

    let store = Arc::new(MemoryStore::new());
    let client = Arc::new(OpenAiClient::from_env(cfg.inference.clone())?);

    let settings = AppSettings {
        max_input_bytes: cfg.limits.max_input_bytes,
        poll_interval: Duration::from_millis(cfg.live.poll_interval_ms),
        upload: UploadConfig {
            target_sample_rate: cfg.audio.sample_rate,
            window_secs: cfg.audio.window_secs,
        },
    };
    let state = AppState::new(store, client.clone(), client, settings);
    let app = create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, port);
    info!("HTTP server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
