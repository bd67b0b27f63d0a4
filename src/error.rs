use std::fmt;

use crate::normalize::ParseError;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The upstream could not be reached or did not answer in time.
    #[error("Connection error: {message}")]
    Connection {
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// The upstream itself answered 429.
    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other rejected or unusable response.
    #[error("API error: {message}")]
    Api {
        status: Option<u16>,
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Flat tag for matching on an [`Error`] without caring about its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Connection,
    RateLimited,
    NotFound,
    Api,
    Parse,
    InvalidUrl,
    Config,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Connection => "connection",
            ErrorKind::RateLimited => "rate-limited",
            ErrorKind::NotFound => "not-found",
            ErrorKind::Api => "api",
            ErrorKind::Parse => "parse",
            ErrorKind::InvalidUrl => "invalid-url",
            ErrorKind::Config => "config",
        };
        f.write_str(name)
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Connection { .. } => ErrorKind::Connection,
            Error::RateLimited(_) => ErrorKind::RateLimited,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::Api { .. } => ErrorKind::Api,
            Error::Parse(_) => ErrorKind::Parse,
            Error::InvalidUrl(_) => ErrorKind::InvalidUrl,
            Error::Config(_) => ErrorKind::Config,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// Generic API error for an unexpected HTTP status.
    pub(crate) fn status(status: u16, body: &str) -> Self {
        Error::Api {
            status: Some(status),
            message: format!("HTTP {status}: {body}"),
            source: None,
        }
    }

    /// Wraps `self` as the cause of a generic API error.
    pub(crate) fn wrap(self, message: impl Into<String>) -> Self {
        Error::Api {
            status: None,
            message: message.into(),
            source: Some(Box::new(self)),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() || e.is_timeout() {
            let message = if e.is_timeout() {
                "request timed out".to_string()
            } else {
                "failed to connect to catalog".to_string()
            };
            Error::Connection {
                message,
                source: Some(e),
            }
        } else {
            Error::Api {
                status: e.status().map(|s| s.as_u16()),
                message: format!("HTTP error: {e}"),
                source: Some(Box::new(e)),
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
