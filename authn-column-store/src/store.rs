//! The narrow wide-column store interface the token core requires (§4.5).

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// A wide-column store's row key: the token's 16-byte identifier.
pub type RowKey = [u8; 16];

/// Errors a [`ColumnStore`] backend can surface. Distinct from
/// `authn-token-core`'s `TokenError` — this is an I/O/operational error, not
/// a judgment about whether a token is valid.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("column store unavailable")]
    Unavailable,
    #[error("column store operation timed out")]
    Timeout,
    #[error("column store error: {0}")]
    Other(String),
}

/// The single logical column family ("tokens") the core addresses.
///
/// `put_columns` writes every given column in one atomic batch per row key,
/// all sharing the same `ttl`. `get_columns` never errors on a column that's
/// missing or expired — it simply omits that column's entry from the
/// returned map; absence is data, not failure (§4.5).
#[async_trait]
pub trait ColumnStore: Send + Sync {
    async fn put_columns(
        &self,
        row_key: RowKey,
        columns: Vec<(String, Vec<u8>)>,
        ttl: Duration,
    ) -> Result<(), StoreError>;

    async fn get_columns(
        &self,
        row_key: RowKey,
        names: &[&str],
    ) -> Result<HashMap<String, Vec<u8>>, StoreError>;
}
