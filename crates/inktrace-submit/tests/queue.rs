//! Background submissions and the progress projection

mod common;

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use common::{builder, destination, sample_document, store, FakeGitHub};
use inktrace_core::{
    traits::{PutRequest, RemoteEntry},
    ContentStore, RemoteConfig, RemotePath, StoreError, SubmissionError, UploadState,
};
use inktrace_submit::{
    list_svg_stems, Compensation, NamingPolicy, ProgressStore, SubmissionQueue, Submitter,
    UploadEvent,
};

fn labels() -> Vec<String> {
    ["永", "字", "永"].iter().map(|s| s.to_string()).collect()
}

/// Drain the queue, applying every event; returns the compensations issued
fn drain<S: ContentStore + 'static>(
    queue: &SubmissionQueue<S>,
    progress: &mut ProgressStore,
) -> (Vec<UploadEvent>, Vec<Compensation>) {
    let mut events = Vec::new();
    let mut compensations = Vec::new();
    while let Some(event) = queue.next_event() {
        compensations.extend(progress.apply(&event));
        events.push(event);
    }
    (events, compensations)
}

#[test]
fn test_started_then_finished_once() {
    let fake = FakeGitHub::new();
    let dir = tempfile::tempdir().expect("tempdir");
    let queue = SubmissionQueue::new(builder(&fake, dir.path()).build());
    let mut progress = ProgressStore::new(labels(), NamingPolicy::CodePoint);

    let id = queue.submit(0, "永", sample_document());

    // Started is queued before the worker runs
    let first = queue.next_event().expect("started event");
    assert_eq!(
        first,
        UploadEvent::Started {
            id,
            index: 0,
            label: "永".into()
        }
    );
    progress.apply(&first);
    assert_eq!(progress.cursor(), 1);

    let (rest, compensations) = drain(&queue, &mut progress);
    assert_eq!(rest.len(), 1);
    assert!(rest[0].is_finished());
    assert_eq!(rest[0].id(), id);
    assert!(compensations.is_empty());

    assert!(progress.is_completed(0));
    assert_eq!(progress.task(id).map(|t| t.state), Some(UploadState::Succeeded));
    assert_eq!(queue.in_flight(), 0);
}

#[test]
fn test_many_submissions_all_settle() {
    let fake = FakeGitHub::new();
    let dir = tempfile::tempdir().expect("tempdir");
    let queue = SubmissionQueue::new(
        builder(&fake, dir.path())
            .serialize_same_label(true)
            .build(),
    );
    let mut progress = ProgressStore::new(labels(), NamingPolicy::CodePoint);

    for (index, label) in labels().iter().enumerate() {
        queue.submit(index, label.as_str(), sample_document());
    }
    let (events, compensations) = drain(&queue, &mut progress);

    assert_eq!(events.iter().filter(|e| e.is_finished()).count(), 3);
    assert!(compensations.is_empty());
    assert_eq!(progress.completed_count(), 3);
    assert_eq!(progress.pending_count(), 0);
}

#[test]
fn test_failure_rolls_back() {
    let fake = FakeGitHub::new();
    fake.fail_puts_with(409, "{}");
    let dir = tempfile::tempdir().expect("tempdir");
    let queue = SubmissionQueue::new(builder(&fake, dir.path()).build());
    let mut progress = ProgressStore::new(labels(), NamingPolicy::CodePoint);

    progress.set_cursor(1);
    let id = queue.submit(1, "字", sample_document());
    let (_, compensations) = drain(&queue, &mut progress);

    assert_eq!(compensations, vec![Compensation::Rollback { index: 1 }]);
    assert_eq!(progress.cursor(), 1);
    let task = progress.task(id).expect("tracked");
    assert_eq!(task.state, UploadState::Failed);
    assert_eq!(task.detail.as_deref(), Some("Upload failed: version conflict, retry"));
}

/// A slow store that records the most calls it saw running at once
#[derive(Default)]
struct Concurrency {
    active: AtomicUsize,
    peak: AtomicUsize,
}

impl Concurrency {
    fn enter(&self) {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(10));
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

impl ContentStore for Concurrency {
    fn name(&self) -> &'static str {
        "concurrency"
    }

    fn fetch_sha(
        &self,
        _destination: &RemoteConfig,
        _path: &RemotePath,
    ) -> Result<Option<String>, StoreError> {
        self.enter();
        Ok(None)
    }

    fn put_file(
        &self,
        _destination: &RemoteConfig,
        _path: &RemotePath,
        _request: &PutRequest,
    ) -> Result<(), StoreError> {
        self.enter();
        Ok(())
    }

    fn list_folder(
        &self,
        _destination: &RemoteConfig,
        _folder: &str,
    ) -> Result<Vec<RemoteEntry>, StoreError> {
        Ok(Vec::new())
    }
}

#[test]
fn test_worker_limit_holds() {
    let store = Arc::new(Concurrency::default());
    let dir = tempfile::tempdir().expect("tempdir");
    let submitter = Submitter::builder(Arc::clone(&store))
        .destination(destination())
        .output_dir(dir.path())
        .build();
    let queue = SubmissionQueue::new(submitter).with_max_workers(2);

    let labels: Vec<String> = ["a", "b", "c", "d", "e", "f", "g", "h"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let mut progress = ProgressStore::new(labels.clone(), NamingPolicy::CodePoint);
    for (index, label) in labels.iter().enumerate() {
        queue.submit(index, label.as_str(), sample_document());
    }
    assert_eq!(queue.running(), 2);
    assert_eq!(queue.backlog(), 6);
    assert_eq!(queue.in_flight(), 8);

    let (events, compensations) = drain(&queue, &mut progress);
    assert_eq!(events.iter().filter(|e| !e.is_finished()).count(), 8);
    assert_eq!(events.iter().filter(|e| e.is_finished()).count(), 8);
    assert!(compensations.is_empty());
    assert!(store.peak.load(Ordering::SeqCst) <= 2);
    assert_eq!(progress.completed_count(), 8);
    assert_eq!((queue.running(), queue.backlog()), (0, 0));
}

#[test]
fn test_zero_worker_limit_still_runs() {
    let fake = FakeGitHub::new();
    let dir = tempfile::tempdir().expect("tempdir");
    let queue = SubmissionQueue::new(builder(&fake, dir.path()).build()).with_max_workers(0);
    assert_eq!(queue.max_workers(), 1);

    let mut progress = ProgressStore::new(labels(), NamingPolicy::CodePoint);
    queue.submit(0, "永", sample_document());
    queue.submit(1, "字", sample_document());
    let (events, _) = drain(&queue, &mut progress);
    assert_eq!(events.iter().filter(|e| e.is_finished()).count(), 2);
    assert_eq!(progress.completed_count(), 2);
}

/// A store whose every call panics
struct Exploding;

impl ContentStore for Exploding {
    fn name(&self) -> &'static str {
        "exploding"
    }

    fn fetch_sha(
        &self,
        _destination: &RemoteConfig,
        _path: &RemotePath,
    ) -> Result<Option<String>, StoreError> {
        panic!("lookup exploded")
    }

    fn put_file(
        &self,
        _destination: &RemoteConfig,
        _path: &RemotePath,
        _request: &PutRequest,
    ) -> Result<(), StoreError> {
        panic!("put exploded")
    }

    fn list_folder(
        &self,
        _destination: &RemoteConfig,
        _folder: &str,
    ) -> Result<Vec<RemoteEntry>, StoreError> {
        panic!("list exploded")
    }
}

#[test]
fn test_worker_panic_still_finishes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let submitter = Submitter::builder(Exploding)
        .destination(destination())
        .output_dir(dir.path())
        .build();
    let queue = SubmissionQueue::new(submitter);
    let mut progress = ProgressStore::new(labels(), NamingPolicy::CodePoint);

    queue.submit(0, "永", sample_document());
    let (events, compensations) = drain(&queue, &mut progress);

    let finished: Vec<&UploadEvent> = events.iter().filter(|e| e.is_finished()).collect();
    assert_eq!(finished.len(), 1);
    match finished[0] {
        UploadEvent::Finished {
            result: Err(SubmissionError::UploadFailed(detail)),
            ..
        } => assert_eq!(detail, "internal error: lookup exploded"),
        other => panic!("unexpected event {other:?}"),
    }
    assert_eq!(compensations, vec![Compensation::Rollback { index: 0 }]);
}

#[test]
fn test_listing_reconciles_progress() {
    let fake = FakeGitHub::new();
    fake.insert("handwriting/U+6C38.svg");
    fake.insert("handwriting/U+6C38-1.svg");
    fake.insert("handwriting/notes.txt");
    fake.insert("elsewhere/U+5B57.svg");

    let stems = list_svg_stems(&store(&fake), &destination()).expect("listing");
    let expected: BTreeSet<String> = ["U+6C38", "U+6C38-1"].iter().map(|s| s.to_string()).collect();
    assert_eq!(stems, expected);

    let mut progress = ProgressStore::new(labels(), NamingPolicy::CodePoint);
    assert_eq!(progress.reconcile(&stems), 2);
    assert_eq!(progress.missing(), vec![1]);
}

#[test]
fn test_listing_failure_is_error() {
    let fake = FakeGitHub::new();
    let err = list_svg_stems(&store(&fake), &destination()).expect_err("empty folder is 404");
    assert_eq!(err.status(), Some(404));
}
