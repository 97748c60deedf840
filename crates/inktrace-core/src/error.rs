//! Error types for InkTrace

use std::fmt;

use thiserror::Error;

/// Detail text reported when the remote file changed between lookup and write
pub const VERSION_CONFLICT: &str = "version conflict, retry";

/// The terminal failure of one submission attempt
///
/// Every lower-level failure is folded into one of these three before it
/// reaches the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    /// Owner, repository or access token is empty; nothing was sent
    #[error("GitHub destination is not configured (owner, repo and token are required)")]
    MissingConfiguration,

    /// The SVG could not be written locally
    #[error("Save failed: {0}")]
    SaveFailed(String),

    /// Network, HTTP status or version-conflict failure
    #[error("Upload failed: {0}")]
    UploadFailed(String),
}

impl SubmissionError {
    /// The reason text without the category prefix
    pub fn detail(&self) -> String {
        match self {
            SubmissionError::MissingConfiguration => self.to_string(),
            SubmissionError::SaveFailed(reason) | SubmissionError::UploadFailed(reason) => {
                reason.clone()
            }
        }
    }

    /// Whether the remote rejected the write because the file changed underneath it
    pub fn is_conflict(&self) -> bool {
        matches!(self, SubmissionError::UploadFailed(reason) if reason == VERSION_CONFLICT)
    }
}

/// Stroke construction errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StrokeError {
    #[error("A stroke needs at least one sample")]
    Empty,
}

/// What is wrong with a rejected sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleDefect {
    NonFinitePosition,
    NonFiniteWidth,
    NegativeWidth,
    /// Finite but far outside the drawing area
    PositionOutOfRange,
    WidthTooLarge,
}

impl fmt::Display for SampleDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SampleDefect::NonFinitePosition => "position is not finite",
            SampleDefect::NonFiniteWidth => "width is not finite",
            SampleDefect::NegativeWidth => "width is negative",
            SampleDefect::PositionOutOfRange => "position is far outside the canvas",
            SampleDefect::WidthTooLarge => "width is larger than the canvas",
        };
        f.write_str(text)
    }
}

/// Vectorizer errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VectorizeError {
    #[error("Invalid sample {sample} in stroke {stroke}: {defect}")]
    InvalidSample {
        stroke: usize,
        sample: usize,
        defect: SampleDefect,
    },

    #[error("Resample step must be finite and at least 0.01, got {0}")]
    InvalidStep(f64),

    #[error("Stroke {stroke} would resample to {count} points (limit {limit})")]
    TooManySamples {
        stroke: usize,
        count: usize,
        limit: usize,
    },
}

/// The request never produced an HTTP response
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Transport error: {0}")]
pub struct TransportError(pub String);

/// Remote content store errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Could not decode response: {0}")]
    Decode(String),

    #[error("Invalid remote path: {0}")]
    InvalidPath(String),
}

impl StoreError {
    /// HTTP status when the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            StoreError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
