//! Copying the JSON preview to a clipboard.
//!
//! The system clipboard is only available with the `system-clipboard` feature;
//! without it [`SystemClipboard`] reports [`ClipboardError::Unsupported`] so the
//! copy action fails the same way it would on a host without a clipboard.

use std::time::{Duration, Instant};

use thiserror::Error;

/// Label of the copy control while idle.
pub const COPY_LABEL: &str = "Copiar JSON";
/// Label shown after a successful copy.
pub const COPIED_LABEL: &str = "Copiado!";
/// How long the acknowledgment label stays visible by default.
pub const DEFAULT_FEEDBACK: Duration = Duration::from_secs(2);

/// Errors reported by clipboard sinks.
#[derive(Error, Debug)]
pub enum ClipboardError {
    /// No clipboard backend is compiled in.
    #[error("clipboard access is not supported in this build (enable the `system-clipboard` feature)")]
    Unsupported,
    /// The backend refused the request.
    #[error("clipboard error: {0}")]
    Backend(String),
}

/// Destination for copied text.
pub trait ClipboardSink {
    /// Replaces the clipboard contents with `text`.
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Clipboard kept in memory, used by tests and headless sessions.
#[derive(Clone, Debug, Default)]
pub struct MemoryClipboard {
    contents: Option<String>,
}

impl MemoryClipboard {
    /// Creates an empty clipboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Last copied text.
    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl ClipboardSink for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.contents = Some(text.to_owned());
        Ok(())
    }
}

/// The desktop clipboard.
#[cfg(feature = "system-clipboard")]
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

#[cfg(feature = "system-clipboard")]
impl SystemClipboard {
    /// Creates a handle; the backend is opened on first use.
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(feature = "system-clipboard")]
impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        if self.inner.is_none() {
            let clipboard =
                arboard::Clipboard::new().map_err(|err| ClipboardError::Backend(err.to_string()))?;
            self.inner = Some(clipboard);
        }

        match self.inner.as_mut() {
            Some(clipboard) => clipboard
                .set_text(text.to_owned())
                .map_err(|err| ClipboardError::Backend(err.to_string())),
            None => Err(ClipboardError::Unsupported),
        }
    }
}

/// Stub used when the `system-clipboard` feature is disabled.
#[cfg(not(feature = "system-clipboard"))]
#[derive(Debug, Default)]
pub struct SystemClipboard;

#[cfg(not(feature = "system-clipboard"))]
impl SystemClipboard {
    /// Creates the stub.
    pub fn new() -> Self {
        Self
    }
}

#[cfg(not(feature = "system-clipboard"))]
impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Unsupported)
    }
}

/// Label state of the copy control.
///
/// After [`CopyButton::acknowledge`] the label reads [`COPIED_LABEL`] until the
/// feedback duration has elapsed, then falls back to [`COPY_LABEL`].
#[derive(Clone, Debug)]
pub struct CopyButton {
    feedback: Duration,
    acknowledged_at: Option<Instant>,
}

impl Default for CopyButton {
    fn default() -> Self {
        Self::new(DEFAULT_FEEDBACK)
    }
}

impl CopyButton {
    /// Creates an idle control whose acknowledgment lasts `feedback`.
    pub fn new(feedback: Duration) -> Self {
        Self {
            feedback,
            acknowledged_at: None,
        }
    }

    /// Records a successful copy at `now`.
    pub fn acknowledge(&mut self, now: Instant) {
        self.acknowledged_at = Some(now);
    }

    /// Label to display at `now`.
    pub fn label_at(&self, now: Instant) -> &'static str {
        match self.acknowledged_at {
            Some(at) if now.saturating_duration_since(at) < self.feedback => COPIED_LABEL,
            _ => COPY_LABEL,
        }
    }
}
