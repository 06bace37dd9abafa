//! Search-path membership for the install directory.
//!
//! POSIX shells keep PATH in profile files we don't touch; there we only check
//! the current PATH and print a hint. Windows keeps the per-user Path in the
//! registry, which we read and append to.

use crate::installer::InstallTarget;
use crate::platform::Platform;
use std::cell::RefCell;
use std::io;
use std::path::Path;
use tracing::{debug, warn};

/// Persisted per-user search path value.
pub trait PathStore {
    fn read(&self) -> io::Result<Option<String>>;
    fn write(&self, value: &str) -> io::Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathOutcome {
    AlreadyPresent,
    Persisted,
    /// Nothing was changed; the user has to act on `hint`.
    Guidance { hint: String },
}

/// In-memory store for tests.
#[derive(Debug, Default)]
pub struct MemoryPathStore {
    value: RefCell<Option<String>>,
    writes: RefCell<usize>,
}

impl MemoryPathStore {
    pub fn new(initial: Option<&str>) -> Self {
        Self {
            value: RefCell::new(initial.map(str::to_string)),
            writes: RefCell::new(0),
        }
    }

    pub fn value(&self) -> Option<String> {
        self.value.borrow().clone()
    }

    pub fn writes(&self) -> usize {
        *self.writes.borrow()
    }
}

impl PathStore for MemoryPathStore {
    fn read(&self) -> io::Result<Option<String>> {
        Ok(self.value())
    }

    fn write(&self, value: &str) -> io::Result<()> {
        *self.value.borrow_mut() = Some(value.to_string());
        *self.writes.borrow_mut() += 1;
        Ok(())
    }
}

/// `HKEY_CURRENT_USER\Environment\Path`.
#[cfg(windows)]
pub struct RegistryPathStore;

/// Value type to write `Path` back with. Keeps whatever is there so
/// `%VAR%` entries in a `REG_EXPAND_SZ` value keep expanding.
#[cfg(windows)]
fn path_value_type(existing: Option<winreg::enums::RegType>) -> winreg::enums::RegType {
    use winreg::enums::RegType::{REG_EXPAND_SZ, REG_SZ};
    match existing {
        Some(REG_SZ) => REG_SZ,
        _ => REG_EXPAND_SZ,
    }
}

#[cfg(windows)]
#[allow(clippy::ptr_arg)]
fn encode_path_value(value: &String, existing: Option<winreg::enums::RegType>) -> winreg::RegValue {
    use winreg::types::ToRegValue;
    let mut raw = value.to_reg_value();
    raw.vtype = path_value_type(existing);
    raw
}

#[cfg(windows)]
impl PathStore for RegistryPathStore {
    fn read(&self) -> io::Result<Option<String>> {
        use winreg::enums::{HKEY_CURRENT_USER, KEY_READ};
        let env = winreg::RegKey::predef(HKEY_CURRENT_USER)
            .open_subkey_with_flags("Environment", KEY_READ)?;
        match env.get_value::<String, _>("Path") {
            Ok(v) => Ok(Some(v)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, value: &str) -> io::Result<()> {
        use winreg::enums::{HKEY_CURRENT_USER, KEY_READ, KEY_WRITE};
        let env = winreg::RegKey::predef(HKEY_CURRENT_USER)
            .open_subkey_with_flags("Environment", KEY_READ | KEY_WRITE)?;
        let existing = match env.get_raw_value("Path") {
            Ok(raw) => Some(raw.vtype),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(e),
        };
        let value = value.to_string();
        env.set_raw_value("Path", &encode_path_value(&value, existing))
    }
}

pub fn default_store() -> Option<Box<dyn PathStore>> {
    #[cfg(windows)]
    {
        Some(Box::new(RegistryPathStore))
    }
    #[cfg(not(windows))]
    {
        None
    }
}

fn normalize(entry: &str) -> &str {
    entry.trim().trim_end_matches(['/', '\\'])
}

/// Segment match, ignoring ASCII case and trailing separators.
pub fn contains_entry(value: &str, dir: &str, sep: char) -> bool {
    let dir = normalize(dir);
    !dir.is_empty()
        && value
            .split(sep)
            .any(|seg| normalize(seg).eq_ignore_ascii_case(dir))
}

/// Returns `value` with `dir` appended unless it is already a segment.
pub fn append_entry(value: &str, dir: &str, sep: char) -> String {
    if contains_entry(value, dir, sep) {
        return value.to_string();
    }
    let base = value.trim_end_matches(sep);
    if base.is_empty() {
        dir.to_string()
    } else {
        format!("{base}{sep}{dir}")
    }
}

fn persist(store: &dyn PathStore, dir: &str, sep: char) -> io::Result<bool> {
    let current = store.read()?.unwrap_or_default();
    let updated = append_entry(&current, dir, sep);
    if updated == current {
        return Ok(false);
    }
    store.write(&updated)?;
    Ok(true)
}

pub fn posix_hint(dir: &Path) -> String {
    format!(
        "{} is not on your PATH. Add it with:\n  export PATH=\"{}:$PATH\"",
        dir.display(),
        dir.display()
    )
}

pub fn windows_hint(dir: &Path) -> String {
    format!(
        "Add {} to your user Path environment variable, then open a new terminal.",
        dir.display()
    )
}

pub fn ensure_on_path(
    platform: Platform,
    target: &InstallTarget,
    store: Option<&dyn PathStore>,
) -> PathOutcome {
    let dir = target.dir.as_path();
    if !platform.persists_user_path() {
        return if target.on_path {
            PathOutcome::AlreadyPresent
        } else {
            PathOutcome::Guidance {
                hint: posix_hint(dir),
            }
        };
    }

    let Some(store) = store else {
        debug!("no persisted path store on this host");
        return PathOutcome::Guidance {
            hint: windows_hint(dir),
        };
    };
    match persist(store, &dir.to_string_lossy(), platform.path_separator()) {
        Ok(true) => PathOutcome::Persisted,
        Ok(false) => PathOutcome::AlreadyPresent,
        Err(e) => {
            warn!("updating persisted Path failed: {e}");
            PathOutcome::Guidance {
                hint: windows_hint(dir),
            }
        }
    }
}
