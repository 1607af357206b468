//! Client error types

use cloudops_validation::ValidationError;
use thiserror::Error;

/// The request could not be built
#[derive(Debug, Error)]
pub enum RequestBuildError {
    #[error("unable to create api request body: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("invalid url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("cancelled before the request was sent")]
    Cancelled,
}

/// The request was built but the exchange with the server failed
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("cancelled while the request was in flight")]
    Cancelled,
}

/// Client error types
#[derive(Debug, Error)]
pub enum ClientError {
    /// Request rejected locally; nothing was sent
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The HTTP client itself could not be constructed
    #[error("unable to build http client: {0}")]
    Setup(#[source] reqwest::Error),

    #[error("unable to create api request: {0}")]
    RequestBuild(#[from] RequestBuildError),

    #[error("unable to make api call: {0}")]
    Transport(#[from] TransportError),

    #[error("error reading response body. status code: {status}, error: {source}")]
    ReadBody {
        status: u16,
        #[source]
        source: reqwest::Error,
    },

    /// Non-success status. `body` is kept verbatim.
    #[error("received unexpected status code: {status}, body: {body}")]
    UnexpectedStatus { status: u16, body: String },

    #[error("unable to parse response: {0}")]
    Decode(#[source] serde_json::Error),

    /// The log stream broke after the status line was accepted; bytes
    /// already written to the sink stay there
    #[error("error reading response body. status code: {status}, error: {source}")]
    Stream {
        status: u16,
        #[source]
        source: std::io::Error,
    },
}

impl ClientError {
    /// HTTP status code, when the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::ReadBody { status, .. }
            | ClientError::UnexpectedStatus { status, .. }
            | ClientError::Stream { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            ClientError::RequestBuild(RequestBuildError::Cancelled)
                | ClientError::Transport(TransportError::Cancelled)
        )
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
