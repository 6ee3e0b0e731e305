//! HTTP submission of a report to the document service.

use std::time::Duration;

use log::{error, info, warn};
use reqwest::blocking::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::document::ReportDocument;

/// Default endpoint of the local document service.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:3000/documentos";

/// Errors that can occur while submitting a report.
#[derive(Error, Debug)]
pub enum SubmitError {
    /// The request never completed (connection refused, DNS failure, reset...).
    #[error("could not reach {endpoint}: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-success status.
    #[error("server rejected the document ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The HTTP client could not be initialised (TLS backend, system proxy settings).
    #[error("failed to initialise HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Something that can deliver a plain [`ReportDocument`] to the service.
pub trait Submitter {
    /// Submits `document`; `Ok` means the service acknowledged it.
    fn submit(&self, document: &ReportDocument) -> Result<(), SubmitError>;
}

/// Blocking JSON client for the document service.
///
/// Requests are sent once: no timeout is applied and failures are not retried.
#[derive(Debug, Clone)]
pub struct SubmissionClient {
    endpoint: String,
    client: Client,
}

impl SubmissionClient {
    /// Creates a client posting to `endpoint`.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, SubmitError> {
        let client = Client::builder()
            .timeout(None::<Duration>)
            .build()
            .map_err(SubmitError::Client)?;
        Ok(Self::with_client(endpoint, client))
    }

    /// Creates a client reusing an existing `reqwest` client.
    pub fn with_client(endpoint: impl Into<String>, client: Client) -> Self {
        Self {
            endpoint: endpoint.into(),
            client,
        }
    }

    /// Endpoint receiving the documents.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn transport(&self, source: reqwest::Error) -> SubmitError {
        SubmitError::Transport {
            endpoint: self.endpoint.clone(),
            source,
        }
    }
}

impl Submitter for SubmissionClient {
    fn submit(&self, document: &ReportDocument) -> Result<(), SubmitError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(document)
            .send()
            .map_err(|err| {
                error!("Submission to {} failed: {}", self.endpoint, err);
                self.transport(err)
            })?;

        let status = response.status();
        if status.is_success() {
            info!("Document '{}' accepted ({})", document.title, status);
            return Ok(());
        }

        let message = response
            .json::<ErrorBody>()
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .map(str::to_owned)
                    .unwrap_or_else(|| format!("HTTP {}", status.as_u16()))
            });

        warn!("Document '{}' rejected ({}): {}", document.title, status, message);
        Err(SubmitError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}
