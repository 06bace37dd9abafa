use reqwest::blocking::Client;
use std::path::PathBuf;
use std::process::Command;
use thiserror::Error;
use tracing::debug;

const USER_AGENT: &str = concat!("relbin/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("server answered HTTP {status}")]
    Status { status: u16 },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("{program} exited with {status}: {stderr}")]
    Process {
        program: String,
        status: String,
        stderr: String,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
#[error("no download transport available (tried: {})", .tried.join(", "))]
pub struct NoTransportAvailable {
    pub tried: Vec<&'static str>,
}

/// A way of performing a plain HTTP GET.
pub trait Transport {
    fn name(&self) -> &'static str;
    fn is_available(&self) -> bool;
    fn fetch(&self, url: &str) -> Result<Vec<u8>, TransportError>;
}

/// In-process client; unavailable only if the TLS backend fails to initialise.
pub struct HttpTransport {
    client: Option<Client>,
}

impl HttpTransport {
    pub fn new() -> Self {
        let client = match Client::builder().user_agent(USER_AGENT).build() {
            Ok(c) => Some(c),
            Err(e) => {
                debug!("http client unavailable: {e}");
                None
            }
        };
        Self { client }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for HttpTransport {
    fn name(&self) -> &'static str {
        "http"
    }

    fn is_available(&self) -> bool {
        self.client.is_some()
    }

    fn fetch(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        let Some(client) = &self.client else {
            return Err(TransportError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "http client not initialised",
            )));
        };
        let resp = client.get(url).send()?;
        if !resp.status().is_success() {
            return Err(TransportError::Status {
                status: resp.status().as_u16(),
            });
        }
        Ok(resp.bytes()?.to_vec())
    }
}

/// Shells out to a `curl` found on PATH.
pub struct CurlTransport {
    program: Option<PathBuf>,
}

impl CurlTransport {
    pub fn new() -> Self {
        Self {
            program: which::which("curl").ok(),
        }
    }
}

impl Default for CurlTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for CurlTransport {
    fn name(&self) -> &'static str {
        "curl"
    }

    fn is_available(&self) -> bool {
        self.program.is_some()
    }

    fn fetch(&self, url: &str) -> Result<Vec<u8>, TransportError> {
        let Some(program) = &self.program else {
            return Err(TransportError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "curl not found",
            )));
        };
        let output = Command::new(program)
            .args(["--fail", "--silent", "--show-error", "--location"])
            .args(["--user-agent", USER_AGENT])
            .arg(url)
            .output()?;
        if !output.status.success() {
            return Err(TransportError::Process {
                program: program.display().to_string(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output.stdout)
    }
}

pub fn default_chain() -> Vec<Box<dyn Transport>> {
    vec![Box::new(HttpTransport::new()), Box::new(CurlTransport::new())]
}

/// First available transport in chain order. Later entries are only a fallback
/// for availability, never for a failed request.
pub fn select(chain: &[Box<dyn Transport>]) -> Result<&dyn Transport, NoTransportAvailable> {
    match chain.iter().find(|t| t.is_available()) {
        Some(t) => {
            debug!("using {} transport", t.name());
            Ok(t.as_ref())
        }
        None => Err(NoTransportAvailable {
            tried: chain.iter().map(|t| t.name()).collect(),
        }),
    }
}
