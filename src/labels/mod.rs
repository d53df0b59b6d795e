//! Remote label service client.
//!
//! # Responsibilities
//! - Fetch the label list from a configured endpoint
//! - Retry a fixed number of times with a delay between attempts
//! - Fall back to a placeholder label when every attempt fails
//!
//! # Design Decisions
//! - Fetch failures are logged and counted, never propagated out of
//!   [`LabelClient::load_labels`]

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::config::LabelsConfig;
use crate::log;
use crate::logging::{Logger, Message};
use crate::observability::metrics;
use crate::resilience::retry;

/// Label stored on todos when no label list is configured.
pub const DEFAULT_LABEL: &str = "unlabeled";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub id: String,
    pub name: String,
}

impl Label {
    /// Placeholder returned once all fetch attempts failed.
    pub fn fallback() -> Self {
        Self {
            id: "X".to_string(),
            name: "Label service down".to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum LabelError {
    #[error("invalid label endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("label request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

pub struct LabelClient {
    http: reqwest::Client,
    endpoint: Url,
    retries: u32,
    retry_delay_ms: u64,
    logger: Logger,
}

impl LabelClient {
    pub fn new(config: &LabelsConfig, endpoint: &str, logger: &Logger) -> Result<Self, LabelError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            endpoint: Url::parse(endpoint)?,
            retries: config.retries,
            retry_delay_ms: config.retry_delay_ms,
            logger: logger.scoped(file!()),
        })
    }

    /// One request to the endpoint. Non-2xx statuses count as failures.
    pub async fn fetch_labels(&self) -> Result<Vec<Label>, LabelError> {
        let result = async {
            self.http
                .get(self.endpoint.clone())
                .send()
                .await?
                .error_for_status()?
                .json::<Vec<Label>>()
                .await
        }
        .await;

        result.map_err(|err| {
            metrics::record_label_fetch_failure();
            self.logger
                .error(Message::from_error(&err).context("Error fetching labels:"));
            LabelError::Transport(err)
        })
    }

    /// Fetch with retries; never fails.
    pub async fn load_labels(&self) -> Vec<Label> {
        for attempt in 1..=self.retries {
            match self.fetch_labels().await {
                Ok(labels) => return labels,
                Err(_) if attempt < self.retries => {
                    log!(self.logger, "Loading labels (attempt {attempt})...");
                    tokio::time::sleep(retry::retry_delay(self.retry_delay_ms)).await;
                }
                Err(_) => {}
            }
        }
        log!(self.logger, "All retry attempts failed.");
        vec![Label::fallback()]
    }
}
