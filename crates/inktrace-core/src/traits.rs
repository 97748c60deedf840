//! The seams between the submission pipeline and the outside world
//!
//! - [`Transport`] - Moves one HTTP request and brings back the response
//! - [`ContentStore`] - Speaks the Contents API: lookup, write, list
//!
//! The pipeline only ever talks to a [`ContentStore`]. The GitHub store in
//! turn only ever talks to a [`Transport`], so tests can swap either layer.

use std::sync::Arc;

use crate::{
    error::{StoreError, TransportError},
    remote::{RemoteConfig, RemotePath},
};

/// HTTP verbs the Contents API needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Put,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Put => "PUT",
        }
    }
}

/// A fully built request, ready for the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// First header value with this name, compared case-insensitively
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Whatever the server answered, success or not
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Moves bytes to a server and back
///
/// A non-2xx status is still a response, not an error. Only failures that
/// leave no response behind (DNS, TLS, timeouts) become [`TransportError`].
pub trait Transport: Send + Sync {
    /// Used for debugging and logging
    fn name(&self) -> &'static str;

    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// The body of a create-or-update write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PutRequest {
    pub message: String,
    /// Base64-encoded file content
    pub content: String,
    pub branch: String,
    /// Version token of the file being replaced, `None` when creating
    pub sha: Option<String>,
}

/// Kind of a directory listing entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    Other,
}

/// One entry of a remote directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    pub name: String,
    pub path: String,
    pub kind: EntryKind,
}

/// A versioned remote file store with the Contents API's semantics
///
/// Every call carries the destination, so one store can serve several
/// repositories.
pub trait ContentStore: Send + Sync {
    /// Identify yourself in logs
    fn name(&self) -> &'static str;

    /// Version token of the file at `path`, or `None` when it does not exist
    fn fetch_sha(
        &self,
        destination: &RemoteConfig,
        path: &RemotePath,
    ) -> Result<Option<String>, StoreError>;

    /// Create (no `sha`) or replace (with `sha`) the file at `path`
    fn put_file(
        &self,
        destination: &RemoteConfig,
        path: &RemotePath,
        request: &PutRequest,
    ) -> Result<(), StoreError>;

    /// Entries of `folder`, or of the repository root when `folder` is empty
    fn list_folder(
        &self,
        destination: &RemoteConfig,
        folder: &str,
    ) -> Result<Vec<RemoteEntry>, StoreError>;
}

impl<S: ContentStore + ?Sized> ContentStore for Arc<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn fetch_sha(
        &self,
        destination: &RemoteConfig,
        path: &RemotePath,
    ) -> Result<Option<String>, StoreError> {
        (**self).fetch_sha(destination, path)
    }

    fn put_file(
        &self,
        destination: &RemoteConfig,
        path: &RemotePath,
        request: &PutRequest,
    ) -> Result<(), StoreError> {
        (**self).put_file(destination, path, request)
    }

    fn list_folder(
        &self,
        destination: &RemoteConfig,
        folder: &str,
    ) -> Result<Vec<RemoteEntry>, StoreError> {
        (**self).list_folder(destination, folder)
    }
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request)
    }
}
