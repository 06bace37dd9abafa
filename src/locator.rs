use crate::config::InstallerConfig;
use crate::platform::Platform;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseAsset {
    pub url: String,
    pub name: String,
}

// Published Windows assets carry the `.exe` in their name; POSIX ones carry
// nothing after the platform tag.
pub fn asset_name(binary: &str, platform: Platform) -> String {
    format!("{binary}-{}{}", platform.as_str(), platform.exe_suffix())
}

pub fn locate(cfg: &InstallerConfig, version: &str, platform: Platform) -> ReleaseAsset {
    let name = asset_name(&cfg.binary_name, platform);
    let url = format!(
        "{}/{}/{}/releases/download/{version}/{name}",
        cfg.download_base, cfg.repo.owner, cfg.repo.repo
    );
    ReleaseAsset { url, name }
}
