//! Where submissions go: destination settings and repository paths

use std::fmt;

/// Branch used when none is configured
pub const DEFAULT_BRANCH: &str = "main";

/// A GitHub destination: repository coordinates plus the access token
///
/// The token is a secret. `Debug` output redacts it and nothing in this
/// workspace logs it.
#[derive(Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    /// Folder inside the repository, empty for the repository root
    pub path_prefix: String,
    token: String,
}

impl RemoteConfig {
    /// Create a destination on the default branch at the repository root
    pub fn new(
        owner: impl Into<String>,
        repo: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            branch: DEFAULT_BRANCH.to_string(),
            path_prefix: String::new(),
            token: token.into(),
        }
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    pub fn with_path_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.path_prefix = prefix.into();
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn has_token(&self) -> bool {
        !self.token.trim().is_empty()
    }

    /// Owner, repository and token are all present
    pub fn is_complete(&self) -> bool {
        !self.owner.trim().is_empty() && !self.repo.trim().is_empty() && self.has_token()
    }

    /// The branch to read and write, falling back to [`DEFAULT_BRANCH`]
    pub fn effective_branch(&self) -> &str {
        let branch = self.branch.trim();
        if branch.is_empty() {
            DEFAULT_BRANCH
        } else {
            branch
        }
    }

    /// The configured folder without surrounding whitespace or slashes
    pub fn folder(&self) -> &str {
        self.path_prefix.trim().trim_matches('/')
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self::new("", "", "")
    }
}

impl fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("owner", &self.owner)
            .field("repo", &self.repo)
            .field("branch", &self.branch)
            .field("path_prefix", &self.path_prefix)
            .field("token", &if self.has_token() { "<redacted>" } else { "<empty>" })
            .finish()
    }
}

/// A slash-separated file path inside the repository
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RemotePath(String);

impl RemotePath {
    /// Place `file_name` inside `folder`; an empty folder means the repository root
    pub fn join(folder: &str, file_name: &str) -> Self {
        let folder = folder.trim().trim_matches('/');
        if folder.is_empty() {
            Self(file_name.to_string())
        } else {
            Self(format!("{folder}/{file_name}"))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Everything before the last slash, empty at the root
    pub fn folder(&self) -> &str {
        match self.0.rfind('/') {
            Some(idx) => &self.0[..idx],
            None => "",
        }
    }

    /// The last path segment
    pub fn file_name(&self) -> &str {
        match self.0.rfind('/') {
            Some(idx) => &self.0[idx + 1..],
            None => &self.0,
        }
    }

    /// File name without its extension
    pub fn stem(&self) -> &str {
        let name = self.file_name();
        match name.rfind('.') {
            Some(idx) if idx > 0 => &name[..idx],
            _ => name,
        }
    }

    /// Extension without the dot, if any
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name();
        match name.rfind('.') {
            Some(idx) if idx > 0 => Some(&name[idx + 1..]),
            _ => None,
        }
    }

    /// The same location with `-{n}` appended to the stem: `a/name.svg` → `a/name-3.svg`
    pub fn with_suffix(&self, n: u32) -> Self {
        let file_name = match self.extension() {
            Some(ext) => format!("{}-{}.{}", self.stem(), n, ext),
            None => format!("{}-{}", self.stem(), n),
        };
        Self::join(self.folder(), &file_name)
    }
}

impl fmt::Display for RemotePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RemotePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
