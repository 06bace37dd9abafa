use crate::platform::Platform;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    Verified { path: PathBuf, version: String },
    /// Resolved on the search path but `--version` did not succeed.
    Failed { path: PathBuf, reason: String },
    /// The name resolves to a different file earlier on the search path.
    Shadowed { found: PathBuf, installed: PathBuf },
    NotOnPath,
    /// The search path change only shows up in a new session.
    Skipped,
}

const RESTART_HINT: &str =
    "Restart your shell (or open a new terminal) so the updated PATH takes effect.";

impl Verification {
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::Verified { .. } => None,
            Self::Shadowed { found, installed } => Some(format!(
                "{} comes first on your PATH and hides {}. Remove it or move {} ahead of it in PATH.",
                found.display(),
                installed.display(),
                installed.parent().unwrap_or(installed.as_path()).display()
            )),
            Self::Failed { .. } | Self::NotOnPath | Self::Skipped => Some(RESTART_HINT.to_string()),
        }
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (fs_err::canonicalize(a), fs_err::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Looks the installed binary's name up on `search_path` (not the persisted
/// one), checks it resolves to `installed` and asks it for its version.
pub fn verify(
    platform: Platform,
    installed: &Path,
    search_path: &OsStr,
    cwd: &Path,
) -> Verification {
    if platform.persists_user_path() {
        return Verification::Skipped;
    }
    let Some(binary_name) = installed.file_name() else {
        return Verification::NotOnPath;
    };
    let path = match which::which_in(binary_name, Some(search_path), cwd) {
        Ok(p) => p,
        Err(e) => {
            debug!("{} not resolvable: {e}", installed.display());
            return Verification::NotOnPath;
        }
    };
    if !same_file(&path, installed) {
        return Verification::Shadowed {
            found: path,
            installed: installed.to_path_buf(),
        };
    }
    let output = match Command::new(&path).arg("--version").output() {
        Ok(o) => o,
        Err(e) => {
            return Verification::Failed {
                path,
                reason: e.to_string(),
            }
        }
    };
    if !output.status.success() {
        return Verification::Failed {
            path,
            reason: format!(
                "exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        };
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    let version = stdout
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("unknown")
        .to_string();
    Verification::Verified { path, version }
}
