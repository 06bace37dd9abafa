use crate::platform::HostOps;
use std::io;
use std::path::{Path, PathBuf};

pub static WINDOWS_HOST: Windows = Windows;

pub struct Windows;

impl HostOps for Windows {
    fn home_dir(&self) -> Option<PathBuf> { std::env::var_os("USERPROFILE").map(PathBuf::from).or_else(dirs::home_dir) }
    fn make_executable(&self, _path: &Path) -> io::Result<()> { Ok(()) }
}
