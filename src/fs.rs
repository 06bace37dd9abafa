use crate::platform::host;
use std::io;
use std::path::Path;

/// The file operations the installer needs, kept narrow so directory ranking
/// can be exercised against scratch directories.
pub trait Filesystem {
    fn is_dir(&self, path: &Path) -> bool;
    fn exists(&self, path: &Path) -> bool;
    fn is_writable_dir(&self, dir: &Path) -> bool;
    fn create_dir_all(&self, dir: &Path) -> io::Result<()>;
    fn copy(&self, from: &Path, to: &Path) -> io::Result<u64>;
    fn remove_file(&self, path: &Path) -> io::Result<()>;
    fn set_executable(&self, path: &Path) -> io::Result<()>;
}

pub struct HostFs;

impl Filesystem for HostFs {
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    // Permission bits lie under ACLs and read-only mounts; creating a probe
    // file is the only reliable answer.
    fn is_writable_dir(&self, dir: &Path) -> bool {
        dir.is_dir()
            && tempfile::Builder::new()
                .prefix(".relbin-probe")
                .tempfile_in(dir)
                .is_ok()
    }

    fn create_dir_all(&self, dir: &Path) -> io::Result<()> {
        fs_err::create_dir_all(dir)
    }

    fn copy(&self, from: &Path, to: &Path) -> io::Result<u64> {
        fs_err::copy(from, to)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs_err::remove_file(path)
    }

    fn set_executable(&self, path: &Path) -> io::Result<()> {
        host().make_executable(path)
    }
}
