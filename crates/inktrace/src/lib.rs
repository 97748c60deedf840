//! InkTrace - handwriting samples from pen strokes to a GitHub repository
//!
//! InkTrace has two halves:
//! 1. **Vectorizing** - pen samples become a 300×300 SVG
//! 2. **Submission** - the SVG is saved locally, given a free name in the
//!    destination folder and uploaded through the GitHub Contents API
//!
//! This crate re-exports the pieces and adds file-based configuration.
//!
//! # Example
//!
//! ```ignore
//! use inktrace::prelude::*;
//!
//! let config = Config::load()?;
//! let document = Vectorizer::new(config.vectorize_options()).vectorize(&strokes)?;
//! let submitter = inktrace::https_submitter(&config);
//! let receipt = submitter.submit(&document, "永")?;
//! println!("uploaded to {}", receipt.remote_path);
//! ```

pub mod config;

pub use inktrace_core as core;
pub use inktrace_core::{error, traits};
pub use inktrace_export_svg as export_svg;
pub use inktrace_github as github;
pub use inktrace_submit as submit;
pub use inktrace_vectorize as vectorize;

pub use config::{Config, ConfigError};

use inktrace_github::{GitHubStore, UreqTransport};
use inktrace_submit::Submitter;

/// The store used for real uploads
pub type HttpsStore = GitHubStore<UreqTransport>;

/// Contents API client configured from `config`
pub fn https_store(config: &Config) -> HttpsStore {
    inktrace_github::https_store(&config.remote.api_base, config.timeout())
}

/// A submitter that uploads over HTTPS with every setting taken from `config`
pub fn https_submitter(config: &Config) -> Submitter<HttpsStore> {
    Submitter::builder(https_store(config))
        .destination(config.remote_config())
        .output_dir(config.output_dir())
        .naming(config.export.naming)
        .serialize_same_label(config.export.serialize_same_label)
        .build()
}

/// Common imports for typical usage
pub mod prelude {
    pub use crate::config::{Config, ConfigError};
    pub use inktrace_core::{
        error::{StoreError, SubmissionError, VectorizeError},
        ContentStore, RemoteConfig, RemotePath, Shape, Stroke, StrokeSample, Transport,
        UploadState, UploadTask, VectorDocument,
    };
    pub use inktrace_export_svg::SvgWriter;
    pub use inktrace_submit::{
        Compensation, NamingPolicy, ProgressStore, SubmissionQueue, SubmissionReceipt, Submitter,
        UploadEvent,
    };
    pub use inktrace_vectorize::{VectorizeMode, VectorizeOptions, Vectorizer};
}
