//! [`ContentStore`] over the GitHub Contents API.

use inktrace_core::{
    traits::{HttpRequest, HttpResponse, Method, PutRequest, RemoteEntry},
    ContentStore, RemoteConfig, RemotePath, StoreError, Transport,
};
use log::debug;

use crate::path::{encode_path, encode_query_value};
use crate::wire::{parse_sha, Listing, PutBody};

/// Public GitHub API endpoint
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Sent with every request
pub const USER_AGENT: &str = concat!("inktrace/", env!("CARGO_PKG_VERSION"));

const ACCEPT: &str = "application/vnd.github+json";

/// Contents API client, generic over how requests reach the server
pub struct GitHubStore<T> {
    transport: T,
    api_base: String,
}

impl<T: Transport> GitHubStore<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Point at another API root, e.g. GitHub Enterprise
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// `{api}/repos/{owner}/{repo}/contents[/{encoded}]`
    pub fn contents_url(&self, destination: &RemoteConfig, encoded_path: &str) -> String {
        let base = format!(
            "{}/repos/{}/{}/contents",
            self.api_base,
            encode_path(destination.owner.trim()),
            encode_path(destination.repo.trim())
        );
        if encoded_path.is_empty() {
            base
        } else {
            format!("{base}/{encoded_path}")
        }
    }

    fn with_ref(url: String, destination: &RemoteConfig) -> String {
        format!(
            "{url}?ref={}",
            encode_query_value(destination.effective_branch())
        )
    }

    fn request(&self, method: Method, url: String, destination: &RemoteConfig) -> HttpRequest {
        let request = HttpRequest::new(method, url)
            .header("Accept", ACCEPT)
            .header("User-Agent", USER_AGENT);
        if destination.has_token() {
            request.header("Authorization", format!("token {}", destination.token().trim()))
        } else {
            request
        }
    }

    fn file_path(path: &RemotePath) -> Result<String, StoreError> {
        let encoded = encode_path(path.as_str());
        if encoded.is_empty() {
            return Err(StoreError::InvalidPath(path.to_string()));
        }
        Ok(encoded)
    }

    fn status_error(response: &HttpResponse) -> StoreError {
        StoreError::Status {
            status: response.status,
            body: response.text(),
        }
    }
}

impl<T: Transport> ContentStore for GitHubStore<T> {
    fn name(&self) -> &'static str {
        "github"
    }

    fn fetch_sha(
        &self,
        destination: &RemoteConfig,
        path: &RemotePath,
    ) -> Result<Option<String>, StoreError> {
        let encoded = Self::file_path(path)?;
        let url = Self::with_ref(self.contents_url(destination, &encoded), destination);
        let response = self
            .transport
            .send(&self.request(Method::Get, url, destination))?;

        match response.status {
            404 => {
                debug!("Lookup {}: absent", path);
                Ok(None)
            }
            status if response.is_success() => {
                let sha = parse_sha(&response.body);
                debug!(
                    "Lookup {}: HTTP {} ({})",
                    path,
                    status,
                    if sha.is_some() { "exists" } else { "no sha" }
                );
                Ok(sha)
            }
            _ => Err(Self::status_error(&response)),
        }
    }

    fn put_file(
        &self,
        destination: &RemoteConfig,
        path: &RemotePath,
        request: &PutRequest,
    ) -> Result<(), StoreError> {
        let encoded = Self::file_path(path)?;
        let url = self.contents_url(destination, &encoded);
        let body = serde_json::to_vec(&PutBody::from(request))
            .map_err(|e| StoreError::Decode(e.to_string()))?;

        let http = self
            .request(Method::Put, url, destination)
            .header("Content-Type", "application/json")
            .body(body);
        let response = self.transport.send(&http)?;
        debug!("PUT {}: HTTP {}", path, response.status);

        match response.status {
            200 | 201 => Ok(()),
            _ => Err(Self::status_error(&response)),
        }
    }

    fn list_folder(
        &self,
        destination: &RemoteConfig,
        folder: &str,
    ) -> Result<Vec<RemoteEntry>, StoreError> {
        let encoded = encode_path(folder.trim());
        let url = Self::with_ref(self.contents_url(destination, &encoded), destination);
        let response = self
            .transport
            .send(&self.request(Method::Get, url, destination))?;

        if response.status != 200 {
            return Err(Self::status_error(&response));
        }

        let listing: Listing = serde_json::from_slice(&response.body)
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        let entries: Vec<RemoteEntry> = listing
            .into_entries()
            .into_iter()
            .map(|entry| entry.into_remote_entry())
            .collect();
        debug!("Listed {} entries under '{}'", entries.len(), folder.trim());
        Ok(entries)
    }
}

impl<T> std::fmt::Debug for GitHubStore<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubStore")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}
