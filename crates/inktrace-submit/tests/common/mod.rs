//! Shared fixtures: an in-process GitHub and a sample document
#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use inktrace_core::{
    traits::{HttpRequest, HttpResponse, Method},
    RemoteConfig, Stroke, StrokeSample, Transport, TransportError, VectorDocument,
};
use inktrace_github::{encode_path, GitHubStore};
use inktrace_submit::{Submitter, SubmitterBuilder};
use inktrace_vectorize::Vectorizer;
use serde_json::{json, Value};

pub const OWNER: &str = "octo";
pub const REPO: &str = "samples";
pub const TOKEN: &str = "ghp_fake";
pub const FOLDER: &str = "handwriting";

const API: &str = "https://api.github.com";

#[derive(Debug, Clone)]
pub struct StoredFile {
    pub content: String,
    pub version: u32,
    pub message: String,
}

#[derive(Default)]
struct State {
    files: BTreeMap<String, StoredFile>,
    put_override: Option<(u16, String)>,
    offline: bool,
    requests: Vec<(Method, String, Option<String>)>,
}

/// Contents API double: keeps files by encoded path and answers
/// 404 / 200 / 201 / 409 the way GitHub does
#[derive(Default)]
pub struct FakeGitHub {
    state: Mutex<State>,
    calls: AtomicUsize,
}

impl FakeGitHub {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Requests received so far, of any kind
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn put_count(&self) -> usize {
        self.state()
            .requests
            .iter()
            .filter(|(method, _, _)| *method == Method::Put)
            .count()
    }

    /// Put a file in place without going through the API
    pub fn insert(&self, path: &str) {
        self.state().files.insert(
            encode_path(path),
            StoredFile {
                content: String::new(),
                version: 1,
                message: "seed".into(),
            },
        );
    }

    pub fn file(&self, path: &str) -> Option<StoredFile> {
        self.state().files.get(&encode_path(path)).cloned()
    }

    pub fn paths(&self) -> Vec<String> {
        self.state().files.keys().cloned().collect()
    }

    /// Answer every PUT with this status and body
    pub fn fail_puts_with(&self, status: u16, body: &str) {
        self.state().put_override = Some((status, body.to_string()));
    }

    /// Make every request fail before reaching the server
    pub fn go_offline(&self) {
        self.state().offline = true;
    }

    /// `sha` field of the last PUT body, if any PUT was made
    pub fn last_put_sha(&self) -> Option<Option<String>> {
        self.state()
            .requests
            .iter()
            .rev()
            .find(|(method, _, _)| *method == Method::Put)
            .map(|(_, _, sha)| sha.clone())
    }

    fn handle(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let prefix = format!("{API}/repos/{OWNER}/{REPO}/contents");
        let rest = request
            .url
            .strip_prefix(&prefix)
            .ok_or_else(|| TransportError(format!("unexpected url {}", request.url)))?;
        let path = rest
            .split('?')
            .next()
            .unwrap_or_default()
            .trim_start_matches('/')
            .to_string();

        let expected_auth = format!("token {TOKEN}");
        if request.header_value("Authorization") != Some(expected_auth.as_str()) {
            return Ok(HttpResponse::new(401, r#"{"message":"Bad credentials"}"#));
        }

        let mut state = self.state();
        if state.offline {
            return Err(TransportError("network is unreachable".into()));
        }

        match request.method {
            Method::Get => Ok(Self::get(&state, &path)),
            Method::Put => {
                let body: Value = serde_json::from_slice(request.body.as_deref().unwrap_or_default())
                    .map_err(|e| TransportError(e.to_string()))?;
                let sha = body["sha"].as_str().map(str::to_string);
                state
                    .requests
                    .push((Method::Put, path.clone(), sha.clone()));
                if let Some((status, text)) = state.put_override.clone() {
                    return Ok(HttpResponse::new(status, text));
                }
                Ok(Self::put(&mut state, path, &body, sha))
            }
        }
    }

    fn get(state: &State, path: &str) -> HttpResponse {
        if let Some(file) = state.files.get(path) {
            let name = path.rsplit('/').next().unwrap_or_default();
            let body = json!({
                "name": name,
                "path": path,
                "type": "file",
                "sha": format!("sha-{}", file.version),
            });
            return HttpResponse::new(200, body.to_string());
        }

        let folder = if path.is_empty() {
            String::new()
        } else {
            format!("{path}/")
        };
        let entries: Vec<Value> = state
            .files
            .keys()
            .filter_map(|key| key.strip_prefix(folder.as_str()))
            .filter(|name| !name.contains('/'))
            .map(|name| json!({"name": name, "path": format!("{folder}{name}"), "type": "file"}))
            .collect();

        if entries.is_empty() && !path.is_empty() {
            HttpResponse::new(404, r#"{"message":"Not Found"}"#)
        } else {
            HttpResponse::new(200, Value::Array(entries).to_string())
        }
    }

    fn put(state: &mut State, path: String, body: &Value, sha: Option<String>) -> HttpResponse {
        let content = body["content"].as_str().unwrap_or_default().to_string();
        let message = body["message"].as_str().unwrap_or_default().to_string();
        match (state.files.get(&path).map(|f| f.version), sha) {
            (None, None) => {
                state.files.insert(path, StoredFile { content, version: 1, message });
                HttpResponse::new(201, r#"{"content":{}}"#)
            }
            (Some(version), Some(sha)) if sha == format!("sha-{version}") => {
                state.files.insert(
                    path,
                    StoredFile {
                        content,
                        version: version + 1,
                        message,
                    },
                );
                HttpResponse::new(200, r#"{"content":{}}"#)
            }
            _ => HttpResponse::new(409, r#"{"message":"is at a different sha"}"#),
        }
    }
}

impl Transport for FakeGitHub {
    fn name(&self) -> &'static str {
        "fake-github"
    }

    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.handle(request)
    }
}

pub fn destination() -> RemoteConfig {
    RemoteConfig::new(OWNER, REPO, TOKEN).with_path_prefix(FOLDER)
}

pub fn store(fake: &Arc<FakeGitHub>) -> GitHubStore<Arc<FakeGitHub>> {
    GitHubStore::new(Arc::clone(fake))
}

pub fn builder(fake: &Arc<FakeGitHub>, output_dir: &std::path::Path) -> SubmitterBuilder<GitHubStore<Arc<FakeGitHub>>> {
    Submitter::builder(store(fake))
        .destination(destination())
        .output_dir(output_dir)
}

/// The three-sample stroke from the reference scenario
pub fn sample_document() -> VectorDocument {
    let stroke = Stroke::new(vec![
        StrokeSample::new(10.0, 10.0, 4.0),
        StrokeSample::new(20.0, 12.0, 6.0),
        StrokeSample::new(30.0, 11.0, 5.0),
    ])
    .expect("non-empty stroke");
    Vectorizer::default()
        .vectorize(&[stroke])
        .expect("valid stroke")
}
