use crate::config::InstallerConfig;
use crate::error::{BootstrapError, VersionResolutionError};
use crate::fs::{Filesystem, HostFs};
use crate::installer::{self, InstallTarget, InstalledBinary};
use crate::locator::{self, ReleaseAsset};
use crate::path_manager::{self, PathOutcome, PathStore};
use crate::platform::{host, Platform};
use crate::retriever;
use crate::transport::{self, Transport};
use crate::verifier::{self, Verification};
use crate::versioning;
use std::env;
use std::ffi::OsString;
use std::path::PathBuf;
use tracing::{info, warn};

/// The parts of the process environment a run reads.
#[derive(Debug, Clone)]
pub struct HostEnv {
    pub home: Option<PathBuf>,
    pub search_path: OsString,
    pub cwd: PathBuf,
}

impl HostEnv {
    pub fn current() -> Self {
        Self {
            home: host().home_dir(),
            search_path: env::var_os("PATH").unwrap_or_default(),
            cwd: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    pub fn search_dirs(&self) -> Vec<PathBuf> {
        env::split_paths(&self.search_path).collect()
    }
}

#[derive(Debug)]
pub struct Report {
    pub platform: Platform,
    pub version: String,
    pub asset: ReleaseAsset,
    pub target: InstallTarget,
    pub installed: InstalledBinary,
    pub path: PathOutcome,
    pub verification: Verification,
}

pub struct Bootstrapper {
    config: InstallerConfig,
    platform: Platform,
    env: HostEnv,
    transports: Vec<Box<dyn Transport>>,
    fs: Box<dyn Filesystem>,
    path_store: Option<Box<dyn PathStore>>,
    staging_root: Option<PathBuf>,
}

impl Bootstrapper {
    pub fn new(config: InstallerConfig, platform: Platform, env: HostEnv) -> Self {
        Self {
            config,
            platform,
            env,
            transports: transport::default_chain(),
            fs: Box::new(HostFs),
            path_store: path_manager::default_store(),
            staging_root: None,
        }
    }

    /// Detects the platform and reads the real environment.
    pub fn for_host(config: InstallerConfig) -> Result<Self, BootstrapError> {
        let platform = Platform::current()?;
        Ok(Self::new(config, platform, HostEnv::current()))
    }

    pub fn with_transports(mut self, transports: Vec<Box<dyn Transport>>) -> Self {
        self.transports = transports;
        self
    }

    pub fn with_filesystem(mut self, fs: Box<dyn Filesystem>) -> Self {
        self.fs = fs;
        self
    }

    pub fn with_path_store(mut self, store: Option<Box<dyn PathStore>>) -> Self {
        self.path_store = store;
        self
    }

    pub fn with_staging_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.staging_root = Some(root.into());
        self
    }

    pub fn run(&self, requested: &str) -> Result<Report, BootstrapError> {
        println!("Platform: {}", self.platform);

        let version = if versioning::is_latest(requested) {
            println!("Resolving latest release of {}", self.config.repo);
            let transport =
                transport::select(&self.transports).map_err(VersionResolutionError::from)?;
            versioning::resolve(requested, &self.config, transport)?
        } else {
            requested.to_string()
        };
        println!("Version: {version}");

        let asset = locator::locate(&self.config, &version, self.platform);
        println!("Downloading {}", asset.url);
        warn!(
            "{} is installed without checksum or signature verification",
            asset.name
        );
        let staged =
            retriever::retrieve(&asset, &self.transports, self.staging_root.as_deref())?;
        info!("downloaded {} ({} bytes)", asset.name, staged.size);

        let search_dirs = self.env.search_dirs();
        let target = installer::select_target(
            self.platform,
            self.env.home.as_deref(),
            &search_dirs,
            self.fs.as_ref(),
        )?;
        println!("Install directory: {}", target.dir.display());
        if !target.writable {
            warn!("{} does not look writable", target.dir.display());
        }

        let file_name = self.platform.final_binary_name(&self.config.binary_name);
        let installed = installer::install(staged.path(), &target, &file_name, self.fs.as_ref())?;
        drop(staged);

        let path =
            path_manager::ensure_on_path(self.platform, &target, self.path_store.as_deref());
        match &path {
            PathOutcome::AlreadyPresent => {}
            PathOutcome::Persisted => println!("Added {} to your user Path", target.dir.display()),
            PathOutcome::Guidance { hint } => println!("{hint}"),
        }

        let verification = verifier::verify(
            self.platform,
            &installed.path,
            &self.env.search_path,
            &self.env.cwd,
        );
        match &verification {
            Verification::Verified { version, .. } => println!("Verified: {version}"),
            Verification::Failed { path, reason } => {
                warn!("{} did not run: {reason}", path.display())
            }
            Verification::Shadowed { found, .. } => {
                warn!("{} resolves to {} instead", file_name, found.display())
            }
            Verification::NotOnPath | Verification::Skipped => {}
        }
        if let Some(hint) = verification.hint() {
            println!("{hint}");
        }

        println!(
            "Installed {} {} to {}",
            self.config.binary_name,
            version,
            installed.path.display()
        );
        Ok(Report {
            platform: self.platform,
            version,
            asset,
            target,
            installed,
            path,
            verification,
        })
    }
}
