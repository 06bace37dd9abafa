use std::path::PathBuf;
use thiserror::Error;

use crate::transport::{NoTransportAvailable, TransportError};

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("platform detection: unsupported platform (os '{os}', arch '{arch}')")]
    UnsupportedPlatform { os: String, arch: String },
    #[error("version resolution")]
    VersionResolution(#[from] VersionResolutionError),
    #[error("retrieval")]
    Retrieval(#[from] RetrievalError),
    #[error("install")]
    Install(#[from] InstallError),
}

#[derive(Debug, Error)]
pub enum VersionResolutionError {
    #[error("request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: TransportError,
    },
    #[error("response from {url} is not valid release metadata")]
    Malformed {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("response from {url} has no tag_name")]
    MissingTag { url: String },
    #[error("cannot query the latest release")]
    NoTransportAvailable(#[from] NoTransportAvailable),
}

#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error(transparent)]
    NoTransportAvailable(#[from] NoTransportAvailable),
    #[error("download of {url} via {transport} failed")]
    DownloadFailed {
        url: String,
        transport: &'static str,
        #[source]
        source: TransportError,
    },
    #[error("staging directory")]
    Staging(#[source] std::io::Error),
}

#[derive(Debug, Error)]
pub enum InstallError {
    #[error("creating directory {}", .dir.display())]
    DirectoryCreationFailed {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("copying {} to {}", .from.display(), .to.display())]
    CopyFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no home directory to fall back to")]
    HomeUnavailable,
}
