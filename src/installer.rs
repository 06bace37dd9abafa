use crate::error::InstallError;
use crate::fs::Filesystem;
use crate::platform::{OsFamily, Platform};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Already on the search path and present on disk.
    SearchPath,
    /// Well-known system-wide directory.
    System,
    /// Per-user fallback, created on demand.
    User,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallTarget {
    pub dir: PathBuf,
    pub tier: Tier,
    pub writable: bool,
    pub on_path: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledBinary {
    pub path: PathBuf,
    /// Unix permission bits; `None` where the host has none.
    pub mode: Option<u32>,
}

pub fn preferred_dirs(platform: Platform, home: Option<&Path>) -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Some(home) = home {
        dirs.push(home.join(".local").join("bin"));
        dirs.push(home.join("bin"));
    }
    if let Some(system) = system_dir(platform) {
        dirs.push(system);
    }
    dirs
}

pub fn system_dir(platform: Platform) -> Option<PathBuf> {
    match platform.family() {
        OsFamily::Darwin | OsFamily::Linux => Some(PathBuf::from("/usr/local/bin")),
        OsFamily::Windows => None,
    }
}

pub fn user_dir(home: Option<&Path>) -> Option<PathBuf> {
    home.map(|h| h.join(".local").join("bin"))
}

pub fn on_search_path(dir: &Path, search_path: &[PathBuf]) -> bool {
    // Path equality is component-wise, so trailing separators don't matter.
    search_path.iter().any(|p| p.as_path() == dir)
}

pub fn select_target(
    platform: Platform,
    home: Option<&Path>,
    search_path: &[PathBuf],
    fs: &dyn Filesystem,
) -> Result<InstallTarget, InstallError> {
    for dir in preferred_dirs(platform, home) {
        let on_path = on_search_path(&dir, search_path);
        if on_path && fs.is_dir(&dir) && fs.is_writable_dir(&dir) {
            debug!("{} is on PATH and writable", dir.display());
            return Ok(InstallTarget {
                dir,
                tier: Tier::SearchPath,
                writable: true,
                on_path,
            });
        }
        debug!("skipping {} (on_path={on_path})", dir.display());
    }

    if let Some(dir) = system_dir(platform) {
        if fs.is_writable_dir(&dir) {
            let on_path = on_search_path(&dir, search_path);
            return Ok(InstallTarget {
                dir,
                tier: Tier::System,
                writable: true,
                on_path,
            });
        }
    }

    let dir = user_dir(home).ok_or(InstallError::HomeUnavailable)?;
    if !fs.is_dir(&dir) {
        fs.create_dir_all(&dir)
            .map_err(|source| InstallError::DirectoryCreationFailed {
                dir: dir.clone(),
                source,
            })?;
    }
    let on_path = on_search_path(&dir, search_path);
    Ok(InstallTarget {
        writable: fs.is_writable_dir(&dir),
        dir,
        tier: Tier::User,
        on_path,
    })
}

/// Places the staged file at `<target>/<file_name>`, replacing whatever was
/// there. Not atomic: concurrent installs to the same place race.
pub fn install(
    staged: &Path,
    target: &InstallTarget,
    file_name: &str,
    fs: &dyn Filesystem,
) -> Result<InstalledBinary, InstallError> {
    let dest = target.dir.join(file_name);
    let copy_failed = |source| InstallError::CopyFailed {
        from: staged.to_path_buf(),
        to: dest.clone(),
        source,
    };
    // Unlink first so a running copy of the old binary doesn't block the write.
    if fs.exists(&dest) {
        fs.remove_file(&dest).map_err(copy_failed)?;
    }
    fs.copy(staged, &dest).map_err(copy_failed)?;
    fs.set_executable(&dest).map_err(copy_failed)?;
    Ok(InstalledBinary {
        mode: permission_bits(&dest),
        path: dest,
    })
}

#[cfg(unix)]
fn permission_bits(path: &Path) -> Option<u32> {
    use std::os::unix::fs::PermissionsExt;
    fs_err::metadata(path)
        .ok()
        .map(|m| m.permissions().mode() & 0o7777)
}

#[cfg(not(unix))]
fn permission_bits(_path: &Path) -> Option<u32> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::HostFs;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::io;

    #[derive(Default)]
    struct FakeFs {
        dirs: RefCell<HashSet<PathBuf>>,
        writable: HashSet<PathBuf>,
        fail_create: bool,
    }

    impl FakeFs {
        fn with_dir(self, dir: &Path, writable: bool) -> Self {
            let mut fs = self;
            fs.dirs.get_mut().insert(dir.to_path_buf());
            if writable {
                fs.writable.insert(dir.to_path_buf());
            }
            fs
        }
    }

    impl Filesystem for FakeFs {
        fn is_dir(&self, path: &Path) -> bool {
            self.dirs.borrow().contains(path)
        }
        fn exists(&self, path: &Path) -> bool {
            self.is_dir(path)
        }
        fn is_writable_dir(&self, dir: &Path) -> bool {
            self.is_dir(dir) && self.writable.contains(dir)
        }
        fn create_dir_all(&self, dir: &Path) -> io::Result<()> {
            if self.fail_create {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
            }
            self.dirs.borrow_mut().insert(dir.to_path_buf());
            Ok(())
        }
        fn copy(&self, _from: &Path, _to: &Path) -> io::Result<u64> {
            Ok(0)
        }
        fn remove_file(&self, _path: &Path) -> io::Result<()> {
            Ok(())
        }
        fn set_executable(&self, _path: &Path) -> io::Result<()> {
            Ok(())
        }
    }

    fn home() -> PathBuf {
        PathBuf::from("/home/dev")
    }

    #[test]
    fn first_priority_beats_writable_system_dir() {
        let local = home().join(".local/bin");
        let system = PathBuf::from("/usr/local/bin");
        let fs = FakeFs::default()
            .with_dir(&local, true)
            .with_dir(&system, true);
        let path = vec![PathBuf::from("/usr/bin"), local.clone(), system.clone()];
        let target = select_target(Platform::LinuxX86_64, Some(&home()), &path, &fs).unwrap();
        assert_eq!(target.dir, local);
        assert_eq!(target.tier, Tier::SearchPath);
    }

    #[test]
    fn preference_order_not_path_order() {
        let local = home().join(".local/bin");
        let bin = home().join("bin");
        let fs = FakeFs::default().with_dir(&local, true).with_dir(&bin, true);
        let path = vec![bin.clone(), local.clone()];
        let target = select_target(Platform::MacosArm64, Some(&home()), &path, &fs).unwrap();
        assert_eq!(target.dir, local);
    }

    #[test]
    fn on_path_but_missing_is_skipped() {
        let system = PathBuf::from("/usr/local/bin");
        let fs = FakeFs::default().with_dir(&system, true);
        let path = vec![home().join(".local/bin")];
        let target = select_target(Platform::LinuxX86_64, Some(&home()), &path, &fs).unwrap();
        assert_eq!(target.dir, system);
        assert_eq!(target.tier, Tier::System);
        assert!(!target.on_path);
    }

    #[test]
    fn falls_back_to_created_user_dir() {
        let system = PathBuf::from("/usr/local/bin");
        let fs = FakeFs::default().with_dir(&system, false);
        let target = select_target(Platform::LinuxX86_64, Some(&home()), &[], &fs).unwrap();
        assert_eq!(target.tier, Tier::User);
        assert_eq!(target.dir, home().join(".local/bin"));
        assert!(fs.is_dir(&target.dir));
    }

    #[test]
    fn windows_has_no_system_tier() {
        let fs = FakeFs::default().with_dir(Path::new("/usr/local/bin"), true);
        let path = vec![PathBuf::from("/usr/local/bin")];
        let target = select_target(Platform::WindowsX86_64, Some(&home()), &path, &fs).unwrap();
        assert_eq!(target.tier, Tier::User);
    }

    #[test]
    fn creation_failure_is_reported() {
        let fs = FakeFs {
            fail_create: true,
            ..Default::default()
        };
        let err = select_target(Platform::LinuxX86_64, Some(&home()), &[], &fs).unwrap_err();
        assert!(matches!(err, InstallError::DirectoryCreationFailed { .. }));
    }

    #[test]
    fn no_home_and_no_system_dir() {
        let fs = FakeFs::default();
        let err = select_target(Platform::WindowsX86_64, None, &[], &fs).unwrap_err();
        assert!(matches!(err, InstallError::HomeUnavailable));
    }

    #[test]
    fn install_overwrites_previous_binary() {
        let td = tempfile::tempdir().unwrap();
        let staged = td.path().join("artifact");
        std::fs::write(&staged, b"new").unwrap();
        let dir = td.path().join("bin");
        std::fs::create_dir(&dir).unwrap();
        std::fs::write(dir.join("tool"), b"old").unwrap();
        let target = InstallTarget {
            dir: dir.clone(),
            tier: Tier::User,
            writable: true,
            on_path: false,
        };
        let installed = install(&staged, &target, "tool", &HostFs).unwrap();
        assert_eq!(installed.path, dir.join("tool"));
        assert_eq!(std::fs::read(&installed.path).unwrap(), b"new");
        #[cfg(unix)]
        assert_eq!(installed.mode, Some(0o755));
    }

    #[test]
    fn copy_failure_is_reported() {
        let td = tempfile::tempdir().unwrap();
        let target = InstallTarget {
            dir: td.path().join("missing"),
            tier: Tier::User,
            writable: false,
            on_path: false,
        };
        let err = install(&td.path().join("artifact"), &target, "tool", &HostFs).unwrap_err();
        assert!(matches!(err, InstallError::CopyFailed { .. }));
    }
}
