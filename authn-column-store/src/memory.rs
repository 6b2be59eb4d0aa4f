//! In-memory [`ColumnStore`] backend. Backs tests and local development; not
//! intended for production use since nothing here is ever persisted.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::store::{ColumnStore, RowKey, StoreError};

type Row = HashMap<String, (Instant, Vec<u8>)>;

/// A [`ColumnStore`] backed by a single in-process `Mutex<HashMap<..>>`.
///
/// Expiry is lazy: an expired column is treated as absent the next time it's
/// read, and is physically removed at that point. [`Self::sweep`] additionally
/// walks the whole table and drops anything already expired, so that rows
/// which are never read again don't accumulate forever.
#[derive(Default)]
pub struct InMemoryColumnStore {
    rows: Mutex<HashMap<RowKey, Row>>,
}

impl InMemoryColumnStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every column past its TTL, across every row. Best-effort
    /// housekeeping; never required for correctness since reads already
    /// treat expired columns as absent.
    pub async fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut rows = self.rows.lock().await;
        let mut removed = 0;
        rows.retain(|_row_key, row| {
            row.retain(|_name, (expires_at, _value)| {
                let alive = *expires_at > now;
                if !alive {
                    removed += 1;
                }
                alive
            });
            !row.is_empty()
        });
        removed
    }
}

#[async_trait]
impl ColumnStore for InMemoryColumnStore {
    async fn put_columns(
        &self,
        row_key: RowKey,
        columns: Vec<(String, Vec<u8>)>,
        ttl: Duration,
    ) -> Result<(), StoreError> {
        let expires_at = Instant::now() + ttl;
        let mut rows = self.rows.lock().await;
        let row = rows.entry(row_key).or_default();
        for (name, value) in columns {
            row.insert(name, (expires_at, value));
        }
        Ok(())
    }

    async fn get_columns(
        &self,
        row_key: RowKey,
        names: &[&str],
    ) -> Result<HashMap<String, Vec<u8>>, StoreError> {
        let now = Instant::now();
        let mut rows = self.rows.lock().await;
        let mut out = HashMap::with_capacity(names.len());
        if let Some(row) = rows.get_mut(&row_key) {
            row.retain(|_name, (expires_at, _value)| *expires_at > now);
            for name in names {
                if let Some((_, value)) = row.get(*name) {
                    out.insert((*name).to_string(), value.clone());
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn row_key() -> RowKey {
        [7u8; 16]
    }

    #[tokio::test]
    async fn put_then_get_returns_written_columns() {
        let store = InMemoryColumnStore::new();
        store
            .put_columns(
                row_key(),
                vec![("kind".to_string(), b"access".to_vec())],
                Duration::from_secs(60),
            )
            .await
            .unwrap();

        let got = store.get_columns(row_key(), &["kind"]).await.unwrap();
        assert_eq!(got.get("kind").unwrap(), b"access");
    }

    #[tokio::test]
    async fn missing_column_is_simply_absent() {
        let store = InMemoryColumnStore::new();
        let got = store.get_columns(row_key(), &["kind"]).await.unwrap();
        assert!(got.is_empty());
    }

    #[tokio::test]
    async fn expired_column_is_treated_as_absent() {
        let store = InMemoryColumnStore::new();
        store
            .put_columns(
                row_key(),
                vec![("kind".to_string(), b"access".to_vec())],
                Duration::from_millis(1),
            )
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        let got = store.get_columns(row_key(), &["kind"]).await.unwrap();
        assert!(got.is_empty());
    }

    #[tokio::test]
    async fn sweep_removes_expired_rows_entirely() {
        let store = InMemoryColumnStore::new();
        store
            .put_columns(
                row_key(),
                vec![("kind".to_string(), b"access".to_vec())],
                Duration::from_millis(1),
            )
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;

        let removed = store.sweep().await;
        assert_eq!(removed, 1);
        assert!(store.rows.lock().await.is_empty());
    }

    #[tokio::test]
    async fn rewriting_a_column_resets_its_ttl() {
        let store = InMemoryColumnStore::new();
        store
            .put_columns(
                row_key(),
                vec![("kind".to_string(), b"access".to_vec())],
                Duration::from_millis(1),
            )
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        store
            .put_columns(
                row_key(),
                vec![("kind".to_string(), b"refresh".to_vec())],
                Duration::from_secs(60),
            )
            .await
            .unwrap();

        let got = store.get_columns(row_key(), &["kind"]).await.unwrap();
        assert_eq!(got.get("kind").unwrap(), b"refresh");
    }
}
