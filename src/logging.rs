use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "RELBIN_LOG";

/// Diagnostics go to stderr so stdout only carries progress lines. `RELBIN_LOG`
/// takes the usual `EnvFilter` syntax and wins over `verbose`.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "relbin=debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    // A second init (tests calling main logic twice) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
