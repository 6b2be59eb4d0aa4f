//! Orchestrates the category/codec/signer layer (`authn-token-core`) and the
//! column-store adapter (`authn-column-store`) into the four public
//! operations a caller actually needs (§4.7).

use std::time::Duration;

use authn_column_store::{ColumnStore, TokenRecordStore};
use authn_token_core::{codec, AuthPrincipalInfo, Category, IdAllocator, TokenConfig, TokenInfo};
use serde_json::{Map, Value};

use crate::error::TokenError;

/// Every public operation takes an explicit `now_ms` rather than reading the
/// wall clock itself — this keeps the service deterministic and testable,
/// matching the lower layers it calls (`codec::decode`, `IdAllocator::alloc`)
/// which are built the same way. A caller wiring this into a real server
/// passes `SystemTime::now()` converted to epoch milliseconds.
pub struct TokenService<S> {
    config: TokenConfig,
    allocator: IdAllocator,
    records: TokenRecordStore<S>,
}

impl<S: ColumnStore> TokenService<S> {
    pub fn new(config: TokenConfig, store: S) -> Self {
        Self {
            config,
            allocator: IdAllocator::new(),
            records: TokenRecordStore::new(store),
        }
    }

    fn persistence_ttl(&self) -> Duration {
        Duration::from_millis(self.config.persistence_expires_ms().max(0) as u64)
    }

    /// Allocate a fresh identifier, write its record, and return the opaque
    /// token string a client should present on future requests.
    pub async fn issue(
        &self,
        category: Category,
        kind: Option<String>,
        principal: Option<AuthPrincipalInfo>,
        state: Map<String, Value>,
        now_ms: i64,
    ) -> Result<String, TokenError> {
        let uuid = self.allocator.alloc(now_ms);
        let created_ms = authn_token_core::identifier::timestamp_ms(uuid);
        let info = TokenInfo::issued(uuid, created_ms, kind, principal, state);

        self.records.put(&info, self.persistence_ttl()).await?;

        Ok(codec::encode(&self.config, category, uuid))
    }

    /// Verify `opaque`, touch its record's activity timestamps, and return
    /// the (possibly `inactive_ms`-updated) record.
    pub async fn validate(&self, opaque: &str, now_ms: i64) -> Result<TokenInfo, TokenError> {
        let uuid = codec::decode(&self.config, opaque, now_ms)?;
        let mut info = self.records.get(uuid).await?;

        let inactive_ms = self
            .records
            .touch(uuid, now_ms, info.accessed_ms, info.inactive_ms, self.persistence_ttl())
            .await?;
        info.accessed_ms = now_ms;
        info.inactive_ms = inactive_ms;

        Ok(info)
    }

    /// Validate `opaque`, then fully rewrite its record (resetting every
    /// column's TTL) and return a fresh opaque `Access` token for the same
    /// identifier (§9.3: the identifier is always reused; `ConfigError` at
    /// load time rules out the alternative).
    pub async fn refresh(&self, opaque: &str, now_ms: i64) -> Result<String, TokenError> {
        let mut info = self.validate(opaque, now_ms).await?;
        info.accessed_ms = now_ms;

        self.records.put(&info, self.persistence_ttl()).await?;

        Ok(codec::encode(&self.config, Category::Access, info.uuid))
    }

    /// Report the configured lifetime of `opaque` without enforcing it —
    /// `i64::MAX` for categories that don't carry an absolute expiration.
    pub fn max_token_age(&self, opaque: &str) -> Result<i64, TokenError> {
        let decoded = codec::decode_unchecked(&self.config, opaque)?;
        if decoded.category.carries_expiration() {
            let created_ms = authn_token_core::identifier::timestamp_ms(decoded.uuid);
            Ok(decoded.expires_ms - created_ms)
        } else {
            Ok(i64::MAX)
        }
    }
}
