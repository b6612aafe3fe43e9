//! Error taxonomy for the synchronization engine.
//!
//! Every failure is recoverable at the caller's boundary: operations either
//! leave prior state untouched (list / load / delete) or record an explicit
//! failure notice in the message log (turn exchange). Nothing here should
//! ever terminate the process.

use thiserror::Error;

/// A failed backend call: a non-2xx status or a transport-level error.
///
/// Timeouts surface as transport errors; the engine treats them identically
/// to any other transport failure.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("backend returned {status} for {endpoint}: {body}")]
    Status {
        endpoint: &'static str,
        status: u16,
        body: String,
    },
    #[error("transport error calling {endpoint}: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

impl ApiError {
    pub(crate) fn transport(endpoint: &'static str, source: reqwest::Error) -> Self {
        Self::Transport { endpoint, source }
    }
}

/// Failure categories of the sync engine, one per operation boundary.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("session create failed")]
    SessionCreateFailed(#[source] ApiError),
    #[error("session list failed")]
    SessionListFailed(#[source] ApiError),
    #[error("session load failed")]
    SessionLoadFailed(#[source] ApiError),
    #[error("session delete failed")]
    SessionDeleteFailed(#[source] ApiError),
    #[error("turn exchange failed")]
    TurnExchangeFailed(#[source] ApiError),
    #[error("context persist failed")]
    ContextPersistFailed(#[source] ApiError),
    #[error("attachment upload failed")]
    UploadFailed(#[source] ApiError),
    #[error("assistant operation failed")]
    AssistantOpFailed(#[source] ApiError),
}
