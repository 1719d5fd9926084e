//! REST API server example
//!
//! Runs media-dl with the REST API enabled. Pass a TOML config path as the
//! first argument, or run without one to use the defaults.
//!
//! After starting, you can:
//! - View Swagger UI at http://localhost:3000/swagger-ui
//! - Submit a URL via POST http://localhost:3000/download
//! - Poll jobs via GET http://localhost:3000/status
//! - Open the status page at http://localhost:3000/statusPage
//! - Stream events via GET http://localhost:3000/events

use media_dl::{Config, MediaDownloader, run_with_shutdown};
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("media_dl=info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(Path::new(&path))?,
        None => Config::default(),
    };
    let address = config.server.api.bind_address;

    let downloader = Arc::new(MediaDownloader::new(config).await?);
    let _processor = downloader.start_queue_processor();
    let _api = downloader.spawn_api_server();

    println!("Starting media-dl REST API server");
    println!("  Swagger UI:    http://{address}/swagger-ui");
    println!("  Status page:   http://{address}/statusPage");
    println!("  Events stream: http://{address}/events");
    println!();
    println!("Example commands:");
    println!("  curl -X POST http://{address}/download \\");
    println!("    -H 'Content-Type: application/json' \\");
    println!("    -d '{{\"url\": \"https://www.youtube.com/watch?v=dQw4w9WgXcQ\", \"resolution\": \"hd\"}}'");
    println!("  curl http://{address}/status");
    println!();
    println!("Press Ctrl+C to stop");

    run_with_shutdown((*downloader).clone()).await?;
    Ok(())
}
