//! InkTrace Core: from pen samples to a file in someone else's repository
//!
//! A handwriting sample travels through two components:
//!
//! 1. **Vectorizing** - Ordered pen samples become SVG shapes on a 300×300 canvas
//! 2. **Submission** - The SVG is written locally, given a collision-free remote
//!    path and uploaded through a versioned create-or-update
//!
//! This crate holds the vocabulary both halves share: the stroke model, the
//! finished [`VectorDocument`], remote paths and destinations, upload task
//! bookkeeping, the error taxonomy, and the two seams ([`ContentStore`] and
//! [`Transport`]) that keep the pipeline independent of any particular HTTP
//! stack.
//!
//! ```rust
//! use inktrace_core::{Stroke, StrokeSample};
//!
//! let stroke = Stroke::new(vec![
//!     StrokeSample::new(10.0, 10.0, 4.0),
//!     StrokeSample::new(20.0, 12.0, 6.0),
//! ])?;
//! assert_eq!(stroke.len(), 2);
//! # Ok::<(), inktrace_core::error::StrokeError>(())
//! ```

pub mod document;
pub mod error;
pub mod remote;
pub mod stroke;
pub mod traits;
pub mod upload;

pub use document::{Shape, VectorDocument, CANVAS_SIZE};
pub use error::{StoreError, SubmissionError, TransportError, VectorizeError};
pub use remote::{RemoteConfig, RemotePath, DEFAULT_BRANCH};
pub use stroke::{Stroke, StrokeSample};
pub use traits::{ContentStore, Transport};
pub use upload::{UploadState, UploadTask, UploadTaskId};
