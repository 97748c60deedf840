//! Per-item completion and upload status, owned by the caller's thread.
//!
//! [`ProgressStore`] is the single place that knows which prompt is current,
//! which items are done and which uploads are running. It changes only
//! through [`ProgressStore::apply`] and the reconcile helpers.

use std::collections::BTreeSet;

use inktrace_core::{UploadState, UploadTask, UploadTaskId};
use log::debug;

use crate::naming::{expected_stems, NamingPolicy};
use crate::worker::UploadEvent;

/// Undo instruction emitted when an optimistic step turns out wrong
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compensation {
    /// Go back to the item whose upload failed
    Rollback { index: usize },
}

#[derive(Debug, Clone)]
pub struct ProgressStore {
    labels: Vec<String>,
    expected: Vec<String>,
    policy: NamingPolicy,
    cursor: usize,
    tasks: Vec<UploadTask>,
    completed: Vec<bool>,
}

impl ProgressStore {
    pub fn new(labels: Vec<String>, policy: NamingPolicy) -> Self {
        let expected = expected_stems(&labels, policy);
        let completed = vec![false; labels.len()];
        Self {
            labels,
            expected,
            policy,
            cursor: 0,
            tasks: Vec::new(),
            completed,
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn policy(&self) -> NamingPolicy {
        self.policy
    }

    /// Index of the item currently shown
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_cursor(&mut self, index: usize) {
        if index < self.labels.len() {
            self.cursor = index;
        }
    }

    pub fn current_label(&self) -> Option<&str> {
        self.labels.get(self.cursor).map(String::as_str)
    }

    /// Remote stem that marks item `index` as done
    pub fn expected_stem(&self, index: usize) -> Option<&str> {
        self.expected.get(index).map(String::as_str)
    }

    /// Record a new pending upload and move on to the next item
    pub fn begin(&mut self, index: usize, label: impl Into<String>, id: UploadTaskId) {
        if self.task(id).is_some() {
            return;
        }
        self.tasks.push(UploadTask::pending(id, index, label));
        if !self.labels.is_empty() {
            self.cursor = (index + 1) % self.labels.len();
        }
    }

    /// Fold one pipeline event into the state.
    ///
    /// A failed upload restores the cursor to the failed item and returns the
    /// matching [`Compensation`].
    pub fn apply(&mut self, event: &UploadEvent) -> Option<Compensation> {
        match event {
            UploadEvent::Started { id, index, label } => {
                self.begin(*index, label.clone(), *id);
                None
            }
            UploadEvent::Finished {
                id, index, result, ..
            } => match result {
                Ok(receipt) => {
                    self.settle(*id, UploadState::Succeeded, None);
                    self.mark_uploaded(receipt.remote_stem());
                    None
                }
                Err(err) => {
                    self.settle(*id, UploadState::Failed, Some(err.to_string()));
                    if *index < self.labels.len() {
                        self.cursor = *index;
                    }
                    Some(Compensation::Rollback { index: *index })
                }
            },
        }
    }

    fn settle(&mut self, id: UploadTaskId, state: UploadState, detail: Option<String>) {
        match self.tasks.iter_mut().find(|task| task.id == id) {
            Some(task) if !task.state.is_finished() => {
                task.state = state;
                task.detail = detail;
            }
            Some(_) => debug!("Ignoring repeated completion of upload {}", id),
            None => debug!("Ignoring completion of unknown upload {}", id),
        }
    }

    /// Mark the first item expecting `stem`. Returns its index.
    pub fn mark_uploaded(&mut self, stem: &str) -> Option<usize> {
        let index = self.expected.iter().position(|expected| expected == stem)?;
        self.completed[index] = true;
        Some(index)
    }

    /// Mark every item whose expected stem is present remotely.
    ///
    /// Returns how many items are marked after the update.
    pub fn reconcile(&mut self, remote_stems: &BTreeSet<String>) -> usize {
        for (done, expected) in self.completed.iter_mut().zip(&self.expected) {
            if remote_stems.contains(expected) {
                *done = true;
            }
        }
        self.completed_count()
    }

    pub fn is_completed(&self, index: usize) -> bool {
        self.completed.get(index).copied().unwrap_or(false)
    }

    pub fn completed_count(&self) -> usize {
        self.completed.iter().filter(|done| **done).count()
    }

    /// Indices of items not yet done, in order
    pub fn missing(&self) -> Vec<usize> {
        (0..self.labels.len())
            .filter(|&i| !self.is_completed(i))
            .collect()
    }

    pub fn tasks(&self) -> &[UploadTask] {
        &self.tasks
    }

    pub fn task(&self, id: UploadTaskId) -> Option<&UploadTask> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn pending_count(&self) -> usize {
        self.tasks
            .iter()
            .filter(|task| !task.state.is_finished())
            .count()
    }

    /// Forget finished tasks, keeping the ones still running
    pub fn clear_finished(&mut self) {
        self.tasks.retain(|task| !task.state.is_finished());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::SubmissionReceipt;
    use inktrace_core::{RemotePath, SubmissionError};
    use std::path::PathBuf;

    fn store() -> ProgressStore {
        ProgressStore::new(
            vec!["永".into(), "字".into(), "永".into()],
            NamingPolicy::CodePoint,
        )
    }

    fn finished_ok(id: UploadTaskId, index: usize, remote: &str) -> UploadEvent {
        UploadEvent::Finished {
            id,
            index,
            label: "永".into(),
            result: Ok(SubmissionReceipt {
                local_path: PathBuf::from("U+6C38.svg"),
                remote_path: RemotePath::join("handwriting", remote),
            }),
        }
    }

    #[test]
    fn test_started_advances_and_wraps() {
        let mut progress = store();
        let id = UploadTaskId::next();
        progress.apply(&UploadEvent::Started {
            id,
            index: 2,
            label: "永".into(),
        });
        assert_eq!(progress.cursor(), 0);
        assert_eq!(progress.pending_count(), 1);
    }

    #[test]
    fn test_success_marks_matching_item() {
        let mut progress = store();
        let id = UploadTaskId::next();
        progress.begin(0, "永", id);
        assert_eq!(progress.apply(&finished_ok(id, 0, "U+6C38.svg")), None);
        assert!(progress.is_completed(0));
        assert_eq!(progress.task(id).map(|t| t.state), Some(UploadState::Succeeded));

        // A suffixed upload lands on the second occurrence
        let second = UploadTaskId::next();
        progress.begin(2, "永", second);
        progress.apply(&finished_ok(second, 2, "U+6C38-1.svg"));
        assert!(progress.is_completed(2));
        assert_eq!(progress.completed_count(), 2);
        assert_eq!(progress.missing(), vec![1]);
    }

    #[test]
    fn test_failure_rolls_back_cursor() {
        let mut progress = store();
        let id = UploadTaskId::next();
        progress.begin(1, "字", id);
        assert_eq!(progress.cursor(), 2);

        let compensation = progress.apply(&UploadEvent::Finished {
            id,
            index: 1,
            label: "字".into(),
            result: Err(SubmissionError::UploadFailed("HTTP 500: boom".into())),
        });
        assert_eq!(compensation, Some(Compensation::Rollback { index: 1 }));
        assert_eq!(progress.cursor(), 1);

        let task = progress.task(id).expect("task recorded");
        assert_eq!(task.state, UploadState::Failed);
        assert_eq!(task.detail.as_deref(), Some("Upload failed: HTTP 500: boom"));
        assert!(!progress.is_completed(1));
    }

    #[test]
    fn test_repeated_finish_is_ignored() {
        let mut progress = store();
        let id = UploadTaskId::next();
        progress.begin(0, "永", id);
        progress.apply(&finished_ok(id, 0, "U+6C38.svg"));
        progress.apply(&UploadEvent::Finished {
            id,
            index: 0,
            label: "永".into(),
            result: Err(SubmissionError::MissingConfiguration),
        });
        assert_eq!(progress.task(id).map(|t| t.state), Some(UploadState::Succeeded));
    }

    #[test]
    fn test_reconcile_with_listing() {
        let mut progress = store();
        let remote: BTreeSet<String> = ["U+5B57", "U+6C38-1", "unrelated"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(progress.reconcile(&remote), 2);
        assert!(!progress.is_completed(0));
        assert!(progress.is_completed(1));
        assert!(progress.is_completed(2));
    }

    #[test]
    fn test_clear_finished_keeps_pending() {
        let mut progress = store();
        let done = UploadTaskId::next();
        let running = UploadTaskId::next();
        progress.begin(0, "永", done);
        progress.begin(1, "字", running);
        progress.apply(&finished_ok(done, 0, "U+6C38.svg"));
        progress.clear_finished();
        assert_eq!(progress.tasks().len(), 1);
        assert_eq!(progress.tasks()[0].id, running);
    }

    #[test]
    fn test_empty_store_is_inert() {
        let mut progress = ProgressStore::new(Vec::new(), NamingPolicy::CodePoint);
        progress.begin(0, "x", UploadTaskId::next());
        assert_eq!(progress.cursor(), 0);
        assert_eq!(progress.mark_uploaded("U+0078"), None);
    }
}
