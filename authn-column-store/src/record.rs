//! Maps [`TokenInfo`] onto the column shapes a [`ColumnStore`] actually
//! stores (§4.6): a small, fixed set of explicit uuid/int64/utf8/JSON-bytes
//! codecs, rather than a single dynamically-dispatched "any" column
//! serializer.

use std::collections::HashMap;
use std::time::Duration;

use authn_token_core::{AuthPrincipalInfo, PrincipalType, TokenInfo};
use thiserror::Error;
use uuid::Uuid;

use crate::store::{ColumnStore, StoreError};

const COL_UUID: &str = "uuid";
const COL_KIND: &str = "kind";
const COL_CREATED: &str = "created";
const COL_ACCESSED: &str = "accessed";
const COL_INACTIVE: &str = "inactive";
const COL_PRINCIPAL: &str = "principal";
const COL_ENTITY: &str = "entity";
const COL_APPLICATION: &str = "application";
const COL_STATE: &str = "state";

const REQUIRED_COLUMNS: [&str; 5] = [COL_UUID, COL_KIND, COL_CREATED, COL_ACCESSED, COL_INACTIVE];
const PRINCIPAL_COLUMNS: [&str; 3] = [COL_PRINCIPAL, COL_ENTITY, COL_APPLICATION];

/// Failure reading a record back out of the store. Distinct from
/// [`StoreError`] — a clean "no such row" response from the store is not an
/// I/O failure, it's the absence of data the caller must account for.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("no record for this token")]
    NotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Adapter between [`TokenInfo`] and a [`ColumnStore`]'s flat column rows.
pub struct TokenRecordStore<S> {
    store: S,
}

impl<S: ColumnStore> TokenRecordStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Write `token_info` as a single batch, every column sharing
    /// `persistence_ttl`. A principal-less token omits the three principal
    /// columns.
    pub async fn put(&self, token_info: &TokenInfo, persistence_ttl: Duration) -> Result<(), StoreError> {
        let mut columns = vec![
            (COL_UUID.to_string(), token_info.uuid.as_bytes().to_vec()),
            (COL_KIND.to_string(), token_info.kind.as_bytes().to_vec()),
            (COL_CREATED.to_string(), token_info.created_ms.to_be_bytes().to_vec()),
            (COL_ACCESSED.to_string(), token_info.accessed_ms.to_be_bytes().to_vec()),
            (COL_INACTIVE.to_string(), token_info.inactive_ms.to_be_bytes().to_vec()),
            (
                COL_STATE.to_string(),
                serde_json::to_vec(&token_info.state).unwrap_or_default(),
            ),
        ];

        if let Some(principal) = &token_info.principal {
            columns.push((COL_PRINCIPAL.to_string(), principal.principal_type.as_column_str().as_bytes().to_vec()));
            columns.push((COL_ENTITY.to_string(), principal.entity_id.as_bytes().to_vec()));
            columns.push((COL_APPLICATION.to_string(), principal.application_id.as_bytes().to_vec()));
        }

        self.store
            .put_columns(*token_info.uuid.as_bytes(), columns, persistence_ttl)
            .await
    }

    /// Read the record for `uuid`. Missing any required column is reported
    /// as [`RecordError::NotFound`] — the record either never existed or its
    /// TTL has elapsed, which are indistinguishable at this layer and
    /// deliberately not distinguished to the caller (§4.6).
    pub async fn get(&self, uuid: Uuid) -> Result<TokenInfo, RecordError> {
        let mut wanted = REQUIRED_COLUMNS.to_vec();
        wanted.extend_from_slice(&PRINCIPAL_COLUMNS);
        wanted.push(COL_STATE);

        let columns = self.store.get_columns(*uuid.as_bytes(), &wanted).await?;

        for required in REQUIRED_COLUMNS {
            if !columns.contains_key(required) {
                return Err(RecordError::NotFound);
            }
        }

        let kind = String::from_utf8_lossy(&columns[COL_KIND]).into_owned();
        let created_ms = decode_i64(&columns[COL_CREATED]);
        let accessed_ms = decode_i64(&columns[COL_ACCESSED]);
        let inactive_ms = decode_i64(&columns[COL_INACTIVE]);

        let principal = decode_principal(&columns);

        let state = columns
            .get(COL_STATE)
            .filter(|bytes| !bytes.is_empty())
            .and_then(|bytes| serde_json::from_slice(bytes).ok())
            .unwrap_or_default();

        Ok(TokenInfo {
            uuid,
            kind,
            created_ms,
            accessed_ms,
            inactive_ms,
            principal,
            state,
        })
    }

    /// Record an access: write `accessed = now_ms`, and if the gap since the
    /// previous access exceeds the previously recorded `inactive_ms`, widen
    /// `inactive_ms` to that gap. Returns the `inactive_ms` the caller should
    /// now reflect on the record it hands back (§4.6).
    pub async fn touch(
        &self,
        uuid: Uuid,
        now_ms: i64,
        previous_accessed_ms: i64,
        previous_inactive_ms: i64,
        persistence_ttl: Duration,
    ) -> Result<i64, StoreError> {
        let gap_ms = now_ms - previous_accessed_ms;
        let inactive_ms = if gap_ms > previous_inactive_ms {
            gap_ms
        } else {
            previous_inactive_ms
        };

        let mut columns = vec![(COL_ACCESSED.to_string(), now_ms.to_be_bytes().to_vec())];
        if inactive_ms != previous_inactive_ms {
            columns.push((COL_INACTIVE.to_string(), inactive_ms.to_be_bytes().to_vec()));
        }

        self.store
            .put_columns(*uuid.as_bytes(), columns, persistence_ttl)
            .await?;

        Ok(inactive_ms)
    }
}

fn decode_i64(bytes: &[u8]) -> i64 {
    let mut buf = [0u8; 8];
    let len = bytes.len().min(8);
    buf[..len].copy_from_slice(&bytes[..len]);
    i64::from_be_bytes(buf)
}

fn decode_principal(columns: &HashMap<String, Vec<u8>>) -> Option<AuthPrincipalInfo> {
    let principal_type = columns
        .get(COL_PRINCIPAL)
        .and_then(|bytes| std::str::from_utf8(bytes).ok())
        .and_then(PrincipalType::from_column_str)?;
    let entity_id = columns.get(COL_ENTITY).and_then(|bytes| uuid_from_slice(bytes))?;
    let application_id = columns
        .get(COL_APPLICATION)
        .and_then(|bytes| uuid_from_slice(bytes))?;

    Some(AuthPrincipalInfo {
        principal_type,
        entity_id,
        application_id,
    })
}

fn uuid_from_slice(bytes: &[u8]) -> Option<Uuid> {
    let array: [u8; 16] = bytes.try_into().ok()?;
    Some(Uuid::from_bytes(array))
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;
    use crate::memory::InMemoryColumnStore;

    fn persistence_ttl() -> Duration {
        Duration::from_secs(7 * 24 * 60 * 60)
    }

    #[tokio::test]
    async fn put_then_get_round_trips_principal_less_record() {
        let adapter = TokenRecordStore::new(InMemoryColumnStore::new());
        let uuid = Uuid::new_v4();
        let mut state = serde_json::Map::new();
        state.insert("scope".to_string(), json!("read"));
        let info = TokenInfo::issued(uuid, 1_000, Some("access".to_string()), None, state.clone());

        adapter.put(&info, persistence_ttl()).await.unwrap();
        let got = adapter.get(uuid).await.unwrap();

        assert_eq!(got.uuid, uuid);
        assert_eq!(got.kind, "access");
        assert_eq!(got.created_ms, 1_000);
        assert_eq!(got.accessed_ms, 1_000);
        assert_eq!(got.inactive_ms, 0);
        assert!(got.principal.is_none());
        assert_eq!(got.state, state);
    }

    #[tokio::test]
    async fn put_then_get_round_trips_principal() {
        let adapter = TokenRecordStore::new(InMemoryColumnStore::new());
        let uuid = Uuid::new_v4();
        let principal = AuthPrincipalInfo {
            principal_type: PrincipalType::ApplicationUser,
            entity_id: Uuid::new_v4(),
            application_id: Uuid::new_v4(),
        };
        let info = TokenInfo::issued(uuid, 1_000, None, Some(principal.clone()), Default::default());

        adapter.put(&info, persistence_ttl()).await.unwrap();
        let got = adapter.get(uuid).await.unwrap();

        assert_eq!(got.principal, Some(principal));
    }

    #[tokio::test]
    async fn get_of_unknown_uuid_is_not_found() {
        let adapter = TokenRecordStore::new(InMemoryColumnStore::new());
        let err = adapter.get(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, RecordError::NotFound));
    }

    #[tokio::test]
    async fn touch_widens_inactive_when_gap_exceeds_previous() {
        let adapter = TokenRecordStore::new(InMemoryColumnStore::new());
        let uuid = Uuid::new_v4();
        let info = TokenInfo::issued(uuid, 0, None, None, Default::default());
        adapter.put(&info, persistence_ttl()).await.unwrap();

        let inactive = adapter.touch(uuid, 10_000, 0, 0, persistence_ttl()).await.unwrap();
        assert_eq!(inactive, 10_000);

        let got = adapter.get(uuid).await.unwrap();
        assert_eq!(got.accessed_ms, 10_000);
        assert_eq!(got.inactive_ms, 10_000);
    }

    #[tokio::test]
    async fn touch_does_not_shrink_inactive() {
        let adapter = TokenRecordStore::new(InMemoryColumnStore::new());
        let uuid = Uuid::new_v4();
        let info = TokenInfo::issued(uuid, 0, None, None, Default::default());
        adapter.put(&info, persistence_ttl()).await.unwrap();

        adapter.touch(uuid, 10_000, 0, 0, persistence_ttl()).await.unwrap();
        let inactive = adapter.touch(uuid, 10_500, 10_000, 10_000, persistence_ttl()).await.unwrap();
        assert_eq!(inactive, 10_000);
    }
}
