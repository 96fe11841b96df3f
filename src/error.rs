use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Failure to produce rendered HTML for a single page.
///
/// Render failures are per page: the paginator ends the current category
/// and the run moves on to the next one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// The page did not finish loading within the bounded wait
    #[error("timed out after {}s rendering {url}", after.as_secs_f64())]
    Timeout { url: String, after: Duration },

    /// Navigation, network or WebDriver session failure
    #[error("failed to render {url}: {reason}")]
    Navigation { url: String, reason: String },
}

/// A listing fragment that has no usable product URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unparseable listing fragment: {reason}")]
pub struct Unparseable {
    pub reason: String,
}

impl Unparseable {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// The renderer could not be started. Fatal: nothing has been scraped yet.
#[derive(Debug, Error)]
#[error("could not open a WebDriver session (tried {})", tried.join(", "))]
pub struct SetupError {
    pub tried: Vec<String>,
    #[source]
    pub source: Option<fantoccini::error::NewSessionError>,
}

/// Errors that end a run
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error("failed to read config {}: {source}", path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    ConfigFormat(#[from] serde_json::Error),

    #[error("invalid product link pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("invalid site base URL {url}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to write {}: {source}", path.display())]
    OutputIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
