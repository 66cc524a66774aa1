use std::path::PathBuf;

use petfriends_core::ApiError;
use thiserror::Error;

use crate::config::ConfigError;

/// Everything that can stop a scenario before its assertions run.
///
/// `Precondition` is kept apart from the rest so a report can tell "the
/// environment is not set up" from "the service behaved differently".
#[derive(Debug, Error)]
pub enum SuiteError {
    /// DNS, connection, TLS or timeout failure. Never retried.
    #[error("transport error: {0}")]
    Transport(Box<ureq::Error>),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("cannot read fixture {}: {source}", .path.display())]
    Fixture {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("precondition failed: {0}")]
    Precondition(String),

    #[error("cannot start fake service: {0}")]
    Mock(#[source] std::io::Error),
}

impl From<ureq::Error> for SuiteError {
    fn from(err: ureq::Error) -> Self {
        Self::Transport(Box::new(err))
    }
}

impl SuiteError {
    pub fn is_precondition(&self) -> bool {
        matches!(self, SuiteError::Precondition(_))
    }
}
