//! Todo API server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server (request id, trace, timeout, audit)
//!                         │
//!                         ▼
//!                     todo::handlers ──▶ todo::store ──▶ SQLite
//!                         │
//!     Client Response     ▼
//!     ◀────────────── JSON envelope { error, result }
//!
//!     Cross-cutting: config, logging, labels, observability, lifecycle
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use todo_api::config::load_config;
use todo_api::lifecycle::{self, Shutdown};
use todo_api::logging::{create_logger, LoggerLayer, Message};
use todo_api::observability::metrics;
use todo_api::log;

#[derive(Parser)]
#[command(name = "todo-api")]
#[command(about = "Todo CRUD HTTP service", long_about = None)]
struct Args {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;
    let root = create_logger(&config.logging)?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "todo_api=debug,tower_http=debug".into()),
        )
        .with(LoggerLayer::new(&root))
        .init();

    let logger = root.scoped(file!());
    logger.info(format!("todo-api v{} starting", env!("CARGO_PKG_VERSION")));

    if config.metrics.enabled {
        match config.metrics.address.parse() {
            Ok(addr) => match metrics::init_metrics(addr) {
                Ok(()) => log!(logger, "Metrics exporter listening on {}", addr),
                Err(e) => logger.error(Message::from_error(&e).context("Failed to start metrics exporter:")),
            },
            Err(_) => logger.error(format!(
                "Failed to parse metrics address {}",
                config.metrics.address
            )),
        }
    }

    let app = lifecycle::build(&config, &logger).await?;
    logger.info(format!("Listening on port {}", app.local_addr()?.port()));

    let shutdown = Shutdown::new();
    app.run(shutdown.subscribe()).await?;

    logger.info("Shutdown complete");
    Ok(())
}
