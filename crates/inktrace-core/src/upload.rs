//! Upload task bookkeeping shown to the user

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Opaque identifier of one submission attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UploadTaskId(u64);

impl UploadTaskId {
    /// Allocate a process-unique id
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for UploadTaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadState {
    Pending,
    Succeeded,
    Failed,
}

impl UploadState {
    pub fn is_finished(self) -> bool {
        !matches!(self, UploadState::Pending)
    }
}

/// One in-flight or finished submission, as a read-only projection for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTask {
    pub id: UploadTaskId,
    /// Index of the prompt item being submitted
    pub source_index: usize,
    pub label: String,
    pub state: UploadState,
    /// Diagnostic text, set on failure
    pub detail: Option<String>,
}

impl UploadTask {
    pub fn pending(id: UploadTaskId, source_index: usize, label: impl Into<String>) -> Self {
        Self {
            id,
            source_index,
            label: label.into(),
            state: UploadState::Pending,
            detail: None,
        }
    }
}
