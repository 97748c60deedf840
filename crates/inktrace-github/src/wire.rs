//! JSON shapes exchanged with the Contents API.

use inktrace_core::traits::{EntryKind, PutRequest, RemoteEntry};
use serde::{Deserialize, Serialize};

/// The subset of a contents entry InkTrace reads
#[derive(Debug, Clone, Deserialize)]
pub struct ContentEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub path: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub sha: Option<String>,
}

impl ContentEntry {
    pub fn into_remote_entry(self) -> RemoteEntry {
        let kind = match self.kind.as_str() {
            "file" => EntryKind::File,
            "dir" => EntryKind::Dir,
            _ => EntryKind::Other,
        };
        RemoteEntry {
            name: self.name,
            path: self.path,
            kind,
        }
    }
}

/// A listing answers with an array for folders and a single object for files
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Listing {
    Many(Vec<ContentEntry>),
    One(ContentEntry),
}

impl Listing {
    pub fn into_entries(self) -> Vec<ContentEntry> {
        match self {
            Listing::Many(entries) => entries,
            Listing::One(entry) => vec![entry],
        }
    }
}

/// Request body of a create-or-update write
#[derive(Debug, Serialize)]
pub struct PutBody<'a> {
    pub message: &'a str,
    pub content: &'a str,
    pub branch: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<&'a str>,
}

impl<'a> From<&'a PutRequest> for PutBody<'a> {
    fn from(request: &'a PutRequest) -> Self {
        Self {
            message: &request.message,
            content: &request.content,
            branch: &request.branch,
            sha: request.sha.as_deref(),
        }
    }
}

/// Version token from a lookup response body, if it has one
pub fn parse_sha(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ContentEntry>(body)
        .ok()
        .and_then(|entry| entry.sha)
        .filter(|sha| !sha.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sha() {
        assert_eq!(
            parse_sha(br#"{"name":"a.svg","type":"file","sha":"abc123"}"#),
            Some("abc123".to_string())
        );
        assert_eq!(parse_sha(br#"{"name":"a.svg"}"#), None);
        assert_eq!(parse_sha(br#"[{"sha":"x"}]"#), None);
        assert_eq!(parse_sha(b"not json"), None);
    }

    #[test]
    fn test_put_body_omits_missing_sha() {
        let request = PutRequest {
            message: "Add a.svg".into(),
            content: "PHN2Zz4=".into(),
            branch: "main".into(),
            sha: None,
        };
        let json = serde_json::to_value(PutBody::from(&request)).expect("serializable");
        assert_eq!(
            json,
            serde_json::json!({"message": "Add a.svg", "content": "PHN2Zz4=", "branch": "main"})
        );

        let update = PutRequest {
            sha: Some("abc".into()),
            ..request
        };
        let json = serde_json::to_value(PutBody::from(&update)).expect("serializable");
        assert_eq!(json["sha"], "abc");
    }

    #[test]
    fn test_listing_accepts_object_or_array() {
        let many: Listing =
            serde_json::from_str(r#"[{"name":"a.svg","path":"hw/a.svg","type":"file"},{"name":"d","type":"dir"}]"#)
                .expect("array");
        assert_eq!(many.into_entries().len(), 2);

        let one: Listing =
            serde_json::from_str(r#"{"name":"a.svg","path":"a.svg","type":"file","sha":"1"}"#)
                .expect("object");
        let entries = one.into_entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].clone().into_remote_entry().kind, EntryKind::File);
    }
}
