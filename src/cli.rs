use clap::Parser;
use relbin::config::{
    InstallerConfig, RepoCoordinate, DEFAULT_API_URL, DEFAULT_DOWNLOAD_URL, DEFAULT_REPO, LATEST,
};

#[derive(Parser, Debug)]
#[command(
    version,
    name = "relbin",
    about = "Download a prebuilt release binary and install it on this machine"
)]
pub struct Cli {
    /// Release tag to install, or "latest"
    #[arg(value_name = "VERSION")]
    pub requested: Option<String>,

    /// Release tag to install (same as the positional argument)
    #[arg(long = "tag", value_name = "VERSION", conflicts_with = "requested")]
    pub tag: Option<String>,

    /// Repository publishing the release, as OWNER/REPO
    #[arg(long, env = "RELBIN_REPO", default_value = DEFAULT_REPO)]
    pub repo: RepoCoordinate,

    /// Name of the installed binary (defaults to the repository name)
    #[arg(long, env = "RELBIN_BINARY")]
    pub bin_name: Option<String>,

    #[arg(long, env = "RELBIN_API_URL", default_value = DEFAULT_API_URL, hide = true)]
    pub api_url: String,

    #[arg(long, env = "RELBIN_DOWNLOAD_URL", default_value = DEFAULT_DOWNLOAD_URL, hide = true)]
    pub download_url: String,

    /// Log debug details to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn requested_version(&self) -> &str {
        self.tag
            .as_deref()
            .or(self.requested.as_deref())
            .unwrap_or(LATEST)
    }

    pub fn installer_config(&self) -> InstallerConfig {
        let mut cfg = InstallerConfig::new(self.repo.clone())
            .with_api_base(&self.api_url)
            .with_download_base(&self.download_url);
        if let Some(name) = &self.bin_name {
            cfg = cfg.with_binary_name(name);
        }
        cfg
    }
}
