use crate::config::{InstallerConfig, LATEST};
use crate::error::VersionResolutionError;
use crate::transport::Transport;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct LatestRelease {
    #[serde(default)]
    tag_name: Option<String>,
}

/// Exact match only; anything else is a tag and passes through verbatim.
pub fn is_latest(requested: &str) -> bool {
    requested == LATEST
}

pub fn latest_release_url(cfg: &InstallerConfig) -> String {
    format!(
        "{}/repos/{}/{}/releases/latest",
        cfg.api_base, cfg.repo.owner, cfg.repo.repo
    )
}

/// Explicit versions pass through untouched; only the sentinel hits the API,
/// and only once.
pub fn resolve(
    requested: &str,
    cfg: &InstallerConfig,
    transport: &dyn Transport,
) -> Result<String, VersionResolutionError> {
    if !is_latest(requested) {
        return Ok(requested.to_string());
    }
    let url = latest_release_url(cfg);
    debug!("querying {url} via {}", transport.name());
    let body = transport
        .fetch(&url)
        .map_err(|source| VersionResolutionError::Request {
            url: url.clone(),
            source,
        })?;
    let release: LatestRelease =
        serde_json::from_slice(&body).map_err(|source| VersionResolutionError::Malformed {
            url: url.clone(),
            source,
        })?;
    match release.tag_name {
        Some(tag) if !tag.trim().is_empty() => Ok(tag),
        _ => Err(VersionResolutionError::MissingTag { url }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TransportError;
    use std::cell::RefCell;

    struct Canned {
        body: Result<&'static str, u16>,
        calls: RefCell<Vec<String>>,
    }

    impl Canned {
        fn new(body: Result<&'static str, u16>) -> Self {
            Self { body, calls: RefCell::new(Vec::new()) }
        }
    }

    impl Transport for Canned {
        fn name(&self) -> &'static str {
            "canned"
        }
        fn is_available(&self) -> bool {
            true
        }
        fn fetch(&self, url: &str) -> Result<Vec<u8>, TransportError> {
            self.calls.borrow_mut().push(url.to_string());
            match self.body {
                Ok(b) => Ok(b.as_bytes().to_vec()),
                Err(status) => Err(TransportError::Status { status }),
            }
        }
    }

    fn cfg() -> InstallerConfig {
        InstallerConfig::new("octo/tool".parse().unwrap()).with_api_base("https://api.example")
    }

    #[test]
    fn explicit_version_skips_api() {
        let t = Canned::new(Ok("{}"));
        assert_eq!(resolve("v1.2.3", &cfg(), &t).unwrap(), "v1.2.3");
        assert!(t.calls.borrow().is_empty());
    }

    #[test]
    fn explicit_version_is_not_validated() {
        let t = Canned::new(Ok("{}"));
        assert_eq!(resolve("nightly-2024", &cfg(), &t).unwrap(), "nightly-2024");
    }

    #[test]
    fn sentinel_lookalikes_are_tags() {
        let t = Canned::new(Ok("{}"));
        for tag in ["Latest", "LATEST", " latest", "latest "] {
            assert_eq!(resolve(tag, &cfg(), &t).unwrap(), tag);
        }
        assert!(t.calls.borrow().is_empty());
    }

    #[test]
    fn latest_reads_tag_name() {
        let t = Canned::new(Ok(r#"{"tag_name": "v2.0.0", "name": "Release 2"}"#));
        assert_eq!(resolve("latest", &cfg(), &t).unwrap(), "v2.0.0");
        assert_eq!(
            *t.calls.borrow(),
            vec!["https://api.example/repos/octo/tool/releases/latest".to_string()]
        );
    }

    #[test]
    fn missing_tag_fails_without_retry() {
        let t = Canned::new(Ok(r#"{"name": "Release 2"}"#));
        let err = resolve("latest", &cfg(), &t).unwrap_err();
        assert!(matches!(err, VersionResolutionError::MissingTag { .. }));
        assert_eq!(t.calls.borrow().len(), 1);
    }

    #[test]
    fn malformed_body() {
        let t = Canned::new(Ok("<html>rate limited</html>"));
        let err = resolve("latest", &cfg(), &t).unwrap_err();
        assert!(matches!(err, VersionResolutionError::Malformed { .. }));
    }

    #[test]
    fn request_failure() {
        let t = Canned::new(Err(404));
        let err = resolve("latest", &cfg(), &t).unwrap_err();
        assert!(matches!(err, VersionResolutionError::Request { .. }));
        assert_eq!(t.calls.borrow().len(), 1);
    }
}
