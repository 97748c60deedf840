//! Background submissions reported through a channel.
//!
//! Each submission runs on its own named thread, with a bounded number running
//! at once. The owning thread (the UI loop, or the CLI's main thread) receives
//! one `Started` and exactly one `Finished` event per submission and applies
//! them to its state.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{mpsc, Arc};
use std::time::Duration;

use inktrace_core::{ContentStore, SubmissionError, UploadTaskId, VectorDocument};
use log::{debug, error};

use crate::pipeline::{SubmissionReceipt, Submitter};

pub type SubmissionResult = Result<SubmissionReceipt, SubmissionError>;

/// Lifecycle notifications of one submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadEvent {
    /// Sent before the worker starts
    Started {
        id: UploadTaskId,
        index: usize,
        label: String,
    },
    /// Sent once when the attempt settles
    Finished {
        id: UploadTaskId,
        index: usize,
        label: String,
        result: SubmissionResult,
    },
}

impl UploadEvent {
    pub fn id(&self) -> UploadTaskId {
        match self {
            UploadEvent::Started { id, .. } | UploadEvent::Finished { id, .. } => *id,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            UploadEvent::Started { index, .. } | UploadEvent::Finished { index, .. } => *index,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, UploadEvent::Finished { .. })
    }
}

/// Workers started by default before further submissions wait their turn.
///
/// Every PUT is a commit on the same branch; a few at a time keeps conflicts
/// and secondary rate limits rare.
pub const DEFAULT_MAX_WORKERS: usize = 4;

/// A submission accepted but not yet handed to a worker
struct Pending {
    id: UploadTaskId,
    index: usize,
    label: String,
    document: VectorDocument,
}

/// Runs submissions off the calling thread
///
/// Held by one owning thread, which submits work and polls events. At most
/// `max_workers` submissions run at once; the rest start as earlier ones
/// finish, in submission order.
pub struct SubmissionQueue<S> {
    submitter: Arc<Submitter<S>>,
    event_tx: mpsc::Sender<UploadEvent>,
    event_rx: mpsc::Receiver<UploadEvent>,
    max_workers: usize,
    /// Submissions whose `Finished` event has not been received yet
    in_flight: Cell<usize>,
    /// Workers started whose `Finished` event has not been received yet
    running: Cell<usize>,
    backlog: RefCell<VecDeque<Pending>>,
}

impl<S: ContentStore + 'static> SubmissionQueue<S> {
    pub fn new(submitter: Submitter<S>) -> Self {
        Self::shared(Arc::new(submitter))
    }

    pub fn shared(submitter: Arc<Submitter<S>>) -> Self {
        let (event_tx, event_rx) = mpsc::channel();
        Self {
            submitter,
            event_tx,
            event_rx,
            max_workers: DEFAULT_MAX_WORKERS,
            in_flight: Cell::new(0),
            running: Cell::new(0),
            backlog: RefCell::new(VecDeque::new()),
        }
    }

    /// Limit concurrent workers (at least one)
    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers.max(1);
        self
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    pub fn submitter(&self) -> &Arc<Submitter<S>> {
        &self.submitter
    }

    /// Submissions not yet finished, as seen by the events received so far
    pub fn in_flight(&self) -> usize {
        self.in_flight.get()
    }

    /// Submissions currently on a worker thread
    pub fn running(&self) -> usize {
        self.running.get()
    }

    /// Submissions waiting for a free worker
    pub fn backlog(&self) -> usize {
        self.backlog.borrow().len()
    }

    /// Accept a submission for item `index` and return at once.
    ///
    /// `Started` is sent immediately; the upload itself begins as soon as a
    /// worker is free.
    pub fn submit(&self, index: usize, label: impl Into<String>, document: VectorDocument) -> UploadTaskId {
        let id = UploadTaskId::next();
        let label = label.into();

        self.emit(UploadEvent::Started {
            id,
            index,
            label: label.clone(),
        });
        self.in_flight.set(self.in_flight.get() + 1);
        self.backlog.borrow_mut().push_back(Pending {
            id,
            index,
            label,
            document,
        });
        self.start_ready();

        id
    }

    /// Hand backlog entries to workers while slots are free
    fn start_ready(&self) {
        while self.running.get() < self.max_workers {
            let Some(pending) = self.backlog.borrow_mut().pop_front() else {
                break;
            };
            self.running.set(self.running.get() + 1);
            self.spawn(pending);
        }
    }

    fn spawn(&self, pending: Pending) {
        let Pending {
            id,
            index,
            label,
            document,
        } = pending;

        let submitter = Arc::clone(&self.submitter);
        let event_tx = self.event_tx.clone();
        let worker_label = label.clone();
        let spawned = std::thread::Builder::new()
            .name(format!("inktrace-upload-{}", id.get()))
            .spawn(move || {
                let result = catch_unwind(AssertUnwindSafe(|| {
                    submitter.submit(&document, &worker_label)
                }))
                .unwrap_or_else(|payload| {
                    let reason = panic_message(payload.as_ref());
                    error!("Upload worker {} panicked: {}", id, reason);
                    Err(SubmissionError::UploadFailed(format!("internal error: {reason}")))
                });

                let finished = UploadEvent::Finished {
                    id,
                    index,
                    label: worker_label,
                    result,
                };
                if event_tx.send(finished).is_err() {
                    debug!("Upload {} finished after the queue was dropped", id);
                }
            });

        if let Err(e) = spawned {
            error!("Could not start upload worker: {}", e);
            self.emit(UploadEvent::Finished {
                id,
                index,
                label,
                result: Err(SubmissionError::UploadFailed(format!(
                    "failed to start upload worker: {e}"
                ))),
            });
        }
    }

    /// All events that have arrived, without blocking
    pub fn poll_events(&self) -> Vec<UploadEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.event_rx.try_recv() {
            self.track(&event);
            events.push(event);
        }
        events
    }

    /// Next event, blocking while submissions are still running.
    ///
    /// Returns `None` once nothing is queued and nothing is in flight.
    pub fn next_event(&self) -> Option<UploadEvent> {
        let event = match self.event_rx.try_recv() {
            Ok(event) => event,
            Err(_) if self.in_flight.get() == 0 => return None,
            Err(_) => self.event_rx.recv().ok()?,
        };
        self.track(&event);
        Some(event)
    }

    /// Like [`next_event`](Self::next_event) but gives up after `timeout`
    pub fn next_event_timeout(&self, timeout: Duration) -> Option<UploadEvent> {
        let event = self.event_rx.recv_timeout(timeout).ok()?;
        self.track(&event);
        Some(event)
    }

    fn emit(&self, event: UploadEvent) {
        // The receiver lives in `self`, so this cannot fail
        let _ = self.event_tx.send(event);
    }

    fn track(&self, event: &UploadEvent) {
        if event.is_finished() {
            self.in_flight.set(self.in_flight.get().saturating_sub(1));
            self.running.set(self.running.get().saturating_sub(1));
            self.start_ready();
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");
        let payload: Box<dyn Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(payload.as_ref()), "unknown panic");
    }
}
