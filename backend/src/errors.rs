use crate::models::ErrorResponse;
use rocket::http::Status;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    /// Non-success status from a YouTube Data API endpoint.
    #[error("YouTube {endpoint} API error: {status} {body}")]
    Upstream {
        endpoint: &'static str,
        status: u16,
        body: String,
    },

    #[error("YouTube {endpoint} request failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("YouTube {endpoint} response could not be decoded: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Configuration(String),

    #[error("Failed to upsert {table}: {message}")]
    Store {
        table: &'static str,
        message: String,
    },
}

impl SyncError {
    /// Wraps a reqwest failure, stripping the request URL so the API key
    /// never ends up in a message or log line.
    pub fn transport(endpoint: &'static str, source: reqwest::Error) -> Self {
        SyncError::Transport {
            endpoint,
            source: source.without_url(),
        }
    }

    pub fn decode(endpoint: &'static str, source: reqwest::Error) -> Self {
        SyncError::Decode {
            endpoint,
            source: source.without_url(),
        }
    }

    pub fn store(table: &'static str, message: impl Into<String>) -> Self {
        SyncError::Store {
            table,
            message: message.into(),
        }
    }

    pub fn status(&self) -> Status {
        match self {
            SyncError::Validation(_) => Status::BadRequest,
            _ => Status::InternalServerError,
        }
    }
}

impl From<SyncError> for ErrorResponse {
    fn from(err: SyncError) -> Self {
        ErrorResponse::new(err.status(), err.to_string())
    }
}
