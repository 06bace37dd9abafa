use crate::platform::HostOps;
use std::io;
use std::path::{Path, PathBuf};

pub static UNIX_HOST: Unix = Unix;

pub struct Unix;

impl HostOps for Unix {
    fn home_dir(&self) -> Option<PathBuf> {
        dirs::home_dir()
    }
    fn make_executable(&self, path: &Path) -> io::Result<()> {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs_err::metadata(path)?.permissions();
        perms.set_mode(0o755);
        fs_err::set_permissions(path, perms)?;
        Ok(())
    }
}
