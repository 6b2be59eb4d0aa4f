//! The unified error taxonomy the service's public operations return (§7).
//!
//! `authn-token-core::TokenError` only knows about codec-level failures
//! (`BadToken`, `ExpiredToken`) — it has no notion of "record not found" or
//! "the store timed out", since those concepts belong to a collaborator it
//! doesn't depend on. This module is where those concerns meet: it flattens
//! the core codec error and the column-store's record/store errors into one
//! type the upstream caller can match on.

use authn_column_store::{RecordError, StoreError};
use authn_token_core::TokenError as CoreTokenError;
use thiserror::Error;

/// Every way a token-service operation can fail.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Cannot parse, or signature does not verify. HTTP 400/401 upstream.
    #[error("bad token")]
    BadToken,
    /// Parseable and signed, but past its absolute expiration. HTTP 401
    /// upstream.
    #[error("token expired {elapsed_ms}ms ago")]
    ExpiredToken { elapsed_ms: i64 },
    /// Parseable and signed, but no underlying record — never existed, or
    /// its TTL elapsed. HTTP 401 upstream; deliberately indistinguishable
    /// from the caller's perspective (§4.6).
    #[error("invalid token: {reason}")]
    InvalidToken { reason: &'static str },
    /// I/O failure against the wide-column store. HTTP 5xx upstream.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<CoreTokenError> for TokenError {
    fn from(e: CoreTokenError) -> Self {
        match e {
            CoreTokenError::BadToken => TokenError::BadToken,
            CoreTokenError::ExpiredToken { elapsed_ms } => TokenError::ExpiredToken { elapsed_ms },
        }
    }
}

impl From<RecordError> for TokenError {
    fn from(e: RecordError) -> Self {
        match e {
            RecordError::NotFound => TokenError::InvalidToken { reason: "not found" },
            RecordError::Store(store_err) => TokenError::Store(store_err),
        }
    }
}
