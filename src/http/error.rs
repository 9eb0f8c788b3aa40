//! Errors surfaced by the authenticating client.

use thiserror::Error;

use crate::reauth::CallbackError;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A reauthentication callback failed. The original error is the source.
    #[error("authentication callback failed")]
    Callback(#[source] CallbackError),

    #[error("reauthentication worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl From<CallbackError> for ClientError {
    fn from(err: CallbackError) -> Self {
        ClientError::Callback(err)
    }
}
