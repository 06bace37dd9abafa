use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const LATEST: &str = "latest";
pub const DEFAULT_REPO: &str = "relbin-dev/relbin";
pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_DOWNLOAD_URL: &str = "https://github.com";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoCoordinate {
    pub owner: String,
    pub repo: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("expected OWNER/REPO, got '{0}'")]
pub struct RepoParseError(String);

impl FromStr for RepoCoordinate {
    type Err = RepoParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((owner, repo)) = s.trim().split_once('/') else {
            return Err(RepoParseError(s.to_string()));
        };
        let valid = |part: &str| !part.is_empty() && !part.contains(['/', ' ']);
        if !valid(owner) || !valid(repo) {
            return Err(RepoParseError(s.to_string()));
        }
        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }
}

impl fmt::Display for RepoCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Everything a run needs to know about where the release lives.
#[derive(Debug, Clone)]
pub struct InstallerConfig {
    pub repo: RepoCoordinate,
    pub binary_name: String,
    pub api_base: String,
    pub download_base: String,
}

impl InstallerConfig {
    pub fn new(repo: RepoCoordinate) -> Self {
        let binary_name = repo.repo.clone();
        Self {
            repo,
            binary_name,
            api_base: DEFAULT_API_URL.to_string(),
            download_base: DEFAULT_DOWNLOAD_URL.to_string(),
        }
    }

    pub fn with_binary_name(mut self, name: impl Into<String>) -> Self {
        self.binary_name = name.into();
        self
    }

    pub fn with_api_base(mut self, base: &str) -> Self {
        self.api_base = base.trim_end_matches('/').to_string();
        self
    }

    pub fn with_download_base(mut self, base: &str) -> Self {
        self.download_base = base.trim_end_matches('/').to_string();
        self
    }
}
