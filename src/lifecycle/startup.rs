//! Startup orchestration.
//!
//! # Responsibilities
//! - Open the store, check the connection and create the schema
//! - Load labels from the label service
//! - Bind the listener and assemble the HTTP server
//!
//! # Design Decisions
//! - A failed connection check is logged, not fatal; the schema step that
//!   follows reports the real error if the database is unusable
//! - The listener binds last, so traffic only arrives once everything is ready

use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::config::AppConfig;
use crate::http::{AppState, HttpServer};
use crate::labels::{LabelClient, LabelError};
use crate::log;
use crate::logging::{Logger, Message};
use crate::todo::{StoreError, TodoStore};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Labels(#[from] LabelError),

    #[error("failed to bind listener: {0}")]
    Bind(#[from] std::io::Error),
}

/// A fully initialized service, bound but not yet serving.
pub struct Application {
    listener: TcpListener,
    server: HttpServer,
}

impl Application {
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub async fn run(self, shutdown: broadcast::Receiver<()>) -> std::io::Result<()> {
        self.server.run(self.listener, shutdown).await
    }
}

pub async fn build(config: &AppConfig, logger: &Logger) -> Result<Application, StartupError> {
    let logger = logger.scoped(file!());

    let store = TodoStore::connect(&config.database).await?;
    match store.authenticate().await {
        Ok(()) => log!(logger, "Database connection has been established successfully."),
        Err(e) => logger.error(Message::from_error(&e).context("Unable to connect to the database:")),
    }

    store.sync(config.database.reset_on_start).await?;
    if config.database.reset_on_start {
        log!(logger, "All models were synchronized successfully. Database is empty.");
    } else {
        log!(logger, "All models were synchronized successfully.");
    }

    let labels = match &config.labels.endpoint {
        Some(endpoint) => LabelClient::new(&config.labels, endpoint, &logger)?.load_labels().await,
        None => Vec::new(),
    };
    log!(logger, "Loaded {} labels", labels.len());

    let listener = TcpListener::bind(&config.http.bind_address).await?;
    let state = AppState::new(store, &logger, labels);
    let server = HttpServer::new(&config.http, state);

    Ok(Application { listener, server })
}
