//! Submission pipeline for InkTrace
//!
//! Takes a finished [`inktrace_core::VectorDocument`] and gets it into the
//! configured repository:
//!
//! 1. **Save** - Write `<output_dir>/<stem>.svg` locally
//! 2. **Gate** - Stop with `MissingConfiguration` when owner, repo or token is empty
//! 3. **Dedup** - Find the first free name among `stem.svg`, `stem-1.svg`, …
//! 4. **Upload** - Re-read the version token and create or replace the file
//!
//! [`Submitter`] runs these steps synchronously. [`SubmissionQueue`] runs
//! them on worker threads and reports [`UploadEvent`]s, which a
//! [`ProgressStore`] folds into per-item status.

pub mod dedup;
pub mod listing;
pub mod naming;
pub mod pipeline;
pub mod progress;
pub mod worker;

pub use dedup::{resolve_unique_path, MAX_DEDUP_ATTEMPTS};
pub use listing::list_svg_stems;
pub use naming::{expected_stems, split_occurrence, NamingPolicy, FALLBACK_STEM};
pub use pipeline::{SubmissionReceipt, Submitter, SubmitterBuilder};
pub use progress::{Compensation, ProgressStore};
pub use worker::{SubmissionQueue, SubmissionResult, UploadEvent, DEFAULT_MAX_WORKERS};
