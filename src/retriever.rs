use crate::error::RetrievalError;
use crate::locator::ReleaseAsset;
use crate::platform::host;
use crate::transport::{self, Transport};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use tracing::debug;

pub const STAGED_FILE_NAME: &str = "artifact";

/// A downloaded artifact. The staging directory is deleted when this is
/// dropped, whichever way the run ends.
#[derive(Debug)]
pub struct StagedArtifact {
    dir: TempDir,
    path: PathBuf,
    pub size: u64,
}

impl StagedArtifact {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn staging_dir(&self) -> &Path {
        self.dir.path()
    }
}

fn staging_dir(root: Option<&Path>) -> Result<TempDir, RetrievalError> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("relbin-");
    let dir = match root {
        Some(root) => builder.tempdir_in(root),
        None => builder.tempdir(),
    };
    dir.map_err(RetrievalError::Staging)
}

fn spinner(msg: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg);
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Downloads `asset` with the first available transport in `chain` into a
/// fresh staging directory under `staging_root` (the system temp dir if none).
pub fn retrieve(
    asset: &ReleaseAsset,
    chain: &[Box<dyn Transport>],
    staging_root: Option<&Path>,
) -> Result<StagedArtifact, RetrievalError> {
    let transport = transport::select(chain)?;
    let dir = staging_dir(staging_root)?;
    debug!("staging in {}", dir.path().display());

    let pb = spinner(format!("Downloading {}", asset.name));
    let fetched = transport.fetch(&asset.url);
    pb.finish_and_clear();
    let bytes = fetched.map_err(|source| RetrievalError::DownloadFailed {
        url: asset.url.clone(),
        transport: transport.name(),
        source,
    })?;

    let path = dir.path().join(STAGED_FILE_NAME);
    fs_err::write(&path, &bytes).map_err(RetrievalError::Staging)?;
    host()
        .make_executable(&path)
        .map_err(RetrievalError::Staging)?;
    debug!("staged {} bytes at {}", bytes.len(), path.display());
    Ok(StagedArtifact {
        dir,
        path,
        size: bytes.len() as u64,
    })
}
