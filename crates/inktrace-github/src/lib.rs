//! GitHub Contents API backend for InkTrace
//!
//! [`GitHubStore`] implements [`inktrace_core::ContentStore`] on top of any
//! [`inktrace_core::Transport`]. The default transport, [`UreqTransport`], is a
//! blocking HTTPS client; tests plug in an in-process fake instead.
//!
//! Requests made:
//!
//! | operation | request |
//! |---|---|
//! | lookup | `GET /repos/{owner}/{repo}/contents/{path}?ref={branch}` |
//! | write | `PUT /repos/{owner}/{repo}/contents/{path}` with a JSON body |
//! | list  | `GET /repos/{owner}/{repo}/contents[/{folder}]?ref={branch}` |

pub mod path;
pub mod store;
#[cfg(feature = "ureq-transport")]
pub mod transport;
pub mod wire;

pub use path::{encode_path, encode_query_value};
pub use store::{GitHubStore, DEFAULT_API_BASE, USER_AGENT};
#[cfg(feature = "ureq-transport")]
pub use transport::{UreqTransport, DEFAULT_TIMEOUT};

/// A store that talks to the real API over HTTPS
#[cfg(feature = "ureq-transport")]
pub fn https_store(api_base: &str, timeout: std::time::Duration) -> GitHubStore<UreqTransport> {
    GitHubStore::new(UreqTransport::with_timeout(timeout)).with_api_base(api_base)
}
