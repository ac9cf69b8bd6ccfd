//! Error handling and custom error types
//!
//! Provider clients use [`Error`] internally and collapse it into a
//! user-facing [`Failure`](crate::models::Failure) at their boundary.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A required API key or endpoint is absent.
    #[error("{0}")]
    Configuration(String),

    /// Network-level failure: refused connection, DNS, timeout.
    #[error("{message}")]
    Transport {
        message: String,
        #[source]
        source: reqwest::Error,
    },

    /// The remote answered with a non-success status.
    #[error("{message}")]
    Remote { status: u16, message: String },

    /// Success status but the payload was not in any expected shape.
    #[error("{0}")]
    Parse(String),

    #[error("{0}")]
    Validation(String),
}

impl Error {
    pub fn transport(message: impl Into<String>, source: reqwest::Error) -> Self {
        Error::Transport {
            message: message.into(),
            source,
        }
    }

    /// HTTP status carried by a [`Error::Remote`], if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
