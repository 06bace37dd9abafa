//! Installs a single prebuilt release binary: detect the platform, resolve the
//! version, download the matching asset, place it in a suitable directory and
//! make sure that directory is on the search path.

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod fs;
pub mod installer;
pub mod locator;
pub mod logging;
pub mod path_manager;
pub mod platform;
pub mod retriever;
pub mod transport;
pub mod verifier;
pub mod versioning;

pub use bootstrap::{Bootstrapper, HostEnv, Report};
pub use config::{InstallerConfig, RepoCoordinate};
pub use error::BootstrapError;
pub use platform::Platform;
