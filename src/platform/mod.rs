pub fn host() -> &'static dyn HostOps {
    &ConcreteHost
}

use crate::error::BootstrapError;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

/// Operations that depend on the machine we are running on rather than on the
/// platform tag being installed.
pub trait HostOps: Sync + Send {
    fn home_dir(&self) -> Option<PathBuf>;
    fn make_executable(&self, path: &Path) -> io::Result<()>;
}

#[cfg(unix)]
mod unix;
#[cfg(unix)]
pub use unix::UNIX_HOST as ConcreteHost;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub use windows::WINDOWS_HOST as ConcreteHost;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsFamily {
    Darwin,
    Linux,
    Windows,
}

impl OsFamily {
    /// Accepts both `std::env::consts::OS` values and `uname -s` output.
    pub fn classify(raw: &str) -> Option<Self> {
        let os = raw.trim().to_ascii_lowercase();
        match os.as_str() {
            "darwin" | "macos" => Some(Self::Darwin),
            "linux" => Some(Self::Linux),
            "windows" | "windows_nt" => Some(Self::Windows),
            s if s.starts_with("mingw") || s.starts_with("msys") || s.starts_with("cygwin") => {
                Some(Self::Windows)
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    MacosArm64,
    MacosX86_64,
    LinuxX86_64,
    WindowsX86_64,
}

pub const ALL_PLATFORMS: [Platform; 4] = [
    Platform::MacosArm64,
    Platform::MacosX86_64,
    Platform::LinuxX86_64,
    Platform::WindowsX86_64,
];

pub fn detect(os: &str, arch: &str) -> Result<Platform, BootstrapError> {
    let family = OsFamily::classify(os).ok_or_else(|| BootstrapError::UnsupportedPlatform {
        os: os.to_string(),
        arch: arch.to_string(),
    })?;
    Ok(Platform::from_parts(family, arch))
}

impl Platform {
    pub fn current() -> Result<Self, BootstrapError> {
        detect(std::env::consts::OS, std::env::consts::ARCH)
    }

    // Linux and Windows artifacts are only published for x86_64, so the
    // architecture only matters on Darwin.
    pub fn from_parts(family: OsFamily, arch: &str) -> Self {
        match family {
            OsFamily::Darwin if is_arm64(arch) => Self::MacosArm64,
            OsFamily::Darwin => Self::MacosX86_64,
            OsFamily::Linux => Self::LinuxX86_64,
            OsFamily::Windows => Self::WindowsX86_64,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::MacosArm64 => "macos-arm64",
            Self::MacosX86_64 => "macos-x86_64",
            Self::LinuxX86_64 => "linux-x86_64",
            Self::WindowsX86_64 => "windows-x86_64",
        }
    }

    pub fn family(self) -> OsFamily {
        match self {
            Self::MacosArm64 | Self::MacosX86_64 => OsFamily::Darwin,
            Self::LinuxX86_64 => OsFamily::Linux,
            Self::WindowsX86_64 => OsFamily::Windows,
        }
    }

    /// Suffix of both the published asset and the installed file name.
    pub fn exe_suffix(self) -> &'static str {
        match self.family() {
            OsFamily::Windows => ".exe",
            OsFamily::Darwin | OsFamily::Linux => "",
        }
    }

    pub fn final_binary_name(self, base: &str) -> String {
        let suffix = self.exe_suffix();
        if suffix.is_empty() || base.ends_with(suffix) {
            base.to_string()
        } else {
            format!("{base}{suffix}")
        }
    }

    /// Whether the user's search path lives in a persisted store (the Windows
    /// registry) instead of shell profiles.
    pub fn persists_user_path(self) -> bool {
        self.family() == OsFamily::Windows
    }

    pub fn path_separator(self) -> char {
        match self.family() {
            OsFamily::Windows => ';',
            OsFamily::Darwin | OsFamily::Linux => ':',
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_arm64(arch: &str) -> bool {
    matches!(
        arch.trim().to_ascii_lowercase().as_str(),
        "arm64" | "aarch64"
    )
}
