//! Save → check configuration → dedup → upload.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use inktrace_core::{
    error::VERSION_CONFLICT, traits::PutRequest, ContentStore, RemoteConfig, RemotePath,
    StoreError, SubmissionError, VectorDocument,
};
use inktrace_export_svg::SvgWriter;
use log::{debug, info, warn};
use parking_lot::Mutex;

use crate::dedup::resolve_unique_path;
use crate::naming::NamingPolicy;

/// Where a successful submission ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    /// The SVG written on this machine
    pub local_path: PathBuf,
    /// The path the file was uploaded to, after dedup
    pub remote_path: RemotePath,
}

impl SubmissionReceipt {
    /// Remote file name without `.svg`, the key used for completion tracking
    pub fn remote_stem(&self) -> &str {
        self.remote_path.stem()
    }
}

/// Runs one submission from vector document to remote file
///
/// ```ignore
/// let submitter = Submitter::builder(store)
///     .destination(RemoteConfig::new("me", "samples", token).with_path_prefix("handwriting"))
///     .output_dir(data_dir)
///     .build();
///
/// let receipt = submitter.submit(&document, "永")?;
/// assert_eq!(receipt.remote_path.as_str(), "handwriting/U+6C38.svg");
/// ```
pub struct Submitter<S> {
    store: S,
    destination: RemoteConfig,
    output_dir: PathBuf,
    naming: NamingPolicy,
    writer: SvgWriter,
    label_locks: Option<LabelLocks>,
}

impl<S: ContentStore> Submitter<S> {
    pub fn builder(store: S) -> SubmitterBuilder<S> {
        SubmitterBuilder::new(store)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn destination(&self) -> &RemoteConfig {
        &self.destination
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn naming(&self) -> NamingPolicy {
        self.naming
    }

    /// Submit `document` under `label`, blocking until the upload settles.
    ///
    /// Every attempt ends in exactly one of: a receipt, `SaveFailed`,
    /// `MissingConfiguration` or `UploadFailed`. Nothing is retried.
    pub fn submit(
        &self,
        document: &VectorDocument,
        label: &str,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        let file_name = self.naming.file_name(label);
        let local_path = self.save_local(document, &file_name)?;

        if !self.destination.is_complete() {
            warn!("Skipping upload of {}: destination not configured", file_name);
            return Err(SubmissionError::MissingConfiguration);
        }

        let base = RemotePath::join(self.destination.folder(), &file_name);
        let lease = self.label_locks.as_ref().map(|locks| locks.lease(&self.destination, &base));
        let _guard = lease.as_ref().map(|lease| lease.slot.lock());

        let remote_path = resolve_unique_path(&self.store, &self.destination, &base);
        self.upload(&local_path, &file_name, &remote_path)?;

        info!("Uploaded {} to {}", label, remote_path);
        Ok(SubmissionReceipt {
            local_path,
            remote_path,
        })
    }

    fn save_local(&self, document: &VectorDocument, file_name: &str) -> Result<PathBuf, SubmissionError> {
        let path = self.output_dir.join(file_name);
        fs::create_dir_all(&self.output_dir)
            .and_then(|()| fs::write(&path, self.writer.write(document)))
            .map_err(|e| {
                warn!("Could not write {}: {}", path.display(), e);
                SubmissionError::SaveFailed(e.to_string())
            })?;
        debug!("Saved {}", path.display());
        Ok(path)
    }

    fn upload(
        &self,
        local_path: &Path,
        file_name: &str,
        remote_path: &RemotePath,
    ) -> Result<(), SubmissionError> {
        // Look up again: the version token is read right before the write
        let sha = match self.store.fetch_sha(&self.destination, remote_path) {
            Ok(sha) => sha,
            Err(err) => {
                warn!("Version lookup of {} failed, creating instead: {}", remote_path, err);
                None
            }
        };

        let bytes = fs::read(local_path).map_err(|e| {
            SubmissionError::UploadFailed(format!("failed to read {}: {}", local_path.display(), e))
        })?;

        let request = PutRequest {
            message: format!("Add {file_name}"),
            content: BASE64.encode(bytes),
            branch: self.destination.effective_branch().to_string(),
            sha,
        };

        self.store
            .put_file(&self.destination, remote_path, &request)
            .map_err(|err| {
                warn!("Upload of {} failed: {}", remote_path, err);
                upload_error(err)
            })
    }
}

fn upload_error(err: StoreError) -> SubmissionError {
    let detail = match err {
        StoreError::Status { status: 409, .. } => VERSION_CONFLICT.to_string(),
        StoreError::Transport(transport) => transport.0,
        other => other.to_string(),
    };
    SubmissionError::UploadFailed(detail)
}

impl<S> std::fmt::Debug for Submitter<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Submitter")
            .field("destination", &self.destination)
            .field("output_dir", &self.output_dir)
            .field("naming", &self.naming)
            .field("serialize_same_label", &self.label_locks.is_some())
            .finish_non_exhaustive()
    }
}

/// Builds a [`Submitter`] one setting at a time
pub struct SubmitterBuilder<S> {
    store: S,
    destination: RemoteConfig,
    output_dir: Option<PathBuf>,
    naming: NamingPolicy,
    writer: SvgWriter,
    serialize_same_label: bool,
}

impl<S: ContentStore> SubmitterBuilder<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            destination: RemoteConfig::default(),
            output_dir: None,
            naming: NamingPolicy::default(),
            writer: SvgWriter::new(),
            serialize_same_label: false,
        }
    }

    /// Repository, branch, folder and token to upload to
    pub fn destination(mut self, destination: RemoteConfig) -> Self {
        self.destination = destination;
        self
    }

    /// Folder for the local copy (default: `<temp>/inktrace`)
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn naming(mut self, naming: NamingPolicy) -> Self {
        self.naming = naming;
        self
    }

    pub fn svg_writer(mut self, writer: SvgWriter) -> Self {
        self.writer = writer;
        self
    }

    /// Hold a per-name lock from dedup through upload (default: off)
    ///
    /// Without it, two concurrent submissions of the same label can both see
    /// the same free path and one of them ends in a version conflict.
    pub fn serialize_same_label(mut self, enabled: bool) -> Self {
        self.serialize_same_label = enabled;
        self
    }

    pub fn build(self) -> Submitter<S> {
        Submitter {
            store: self.store,
            destination: self.destination,
            output_dir: self
                .output_dir
                .unwrap_or_else(|| std::env::temp_dir().join("inktrace")),
            naming: self.naming,
            writer: self.writer,
            label_locks: self.serialize_same_label.then(LabelLocks::default),
        }
    }
}

/// owner, repo, branch, folder, base file name
type LockKey = (String, String, String, String, String);

/// One mutex per destination file name, alive while someone holds a lease
#[derive(Default)]
struct LabelLocks {
    slots: Mutex<HashMap<LockKey, Arc<Mutex<()>>>>,
}

impl LabelLocks {
    fn lease(&self, destination: &RemoteConfig, base: &RemotePath) -> SlotLease<'_> {
        let key = (
            destination.owner.trim().to_string(),
            destination.repo.trim().to_string(),
            destination.effective_branch().to_string(),
            base.folder().to_string(),
            base.file_name().to_string(),
        );
        let slot = self.slots.lock().entry(key.clone()).or_default().clone();
        SlotLease {
            locks: self,
            key,
            slot,
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.slots.lock().len()
    }
}

/// Shared handle on one slot; the last lease to go removes the slot
struct SlotLease<'a> {
    locks: &'a LabelLocks,
    key: LockKey,
    slot: Arc<Mutex<()>>,
}

impl Drop for SlotLease<'_> {
    fn drop(&mut self) {
        let mut slots = self.locks.slots.lock();
        // Only the map and this lease still refer to it
        if slots
            .get(&self.key)
            .is_some_and(|slot| Arc::strong_count(slot) == 2)
        {
            slots.remove(&self.key);
        }
    }
}
