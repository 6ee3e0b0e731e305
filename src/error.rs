//! Error types shared across the composer.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::builder::PdfBuildError;
use crate::clipboard::ClipboardError;
use crate::config::ConfigError;
use crate::submit::SubmitError;

/// Errors surfaced by the composer operations.
#[derive(Error, Debug)]
pub enum ComposerError {
    /// A PDF was requested for a document without a title.
    #[error("report title is required before generating a PDF")]
    MissingTitle,

    /// The document could not be encoded as JSON.
    #[error("failed to encode document as JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Rendering the PDF failed.
    #[error(transparent)]
    Pdf(#[from] PdfBuildError),

    /// Writing an artifact to disk failed.
    #[error("failed to write {path}: {source}")]
    Write {
        /// Destination that could not be written.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The submission did not complete successfully.
    #[error(transparent)]
    Submit(#[from] SubmitError),

    /// Copying to the clipboard failed.
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),

    /// The configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result alias for composer operations.
pub type Result<T> = std::result::Result<T, ComposerError>;
