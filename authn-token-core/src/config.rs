//! Token-related configuration. Built once and shared read-only across every
//! operation (§5) — nothing here is mutated after construction.

use crate::category::Category;

/// Default signing salt, used only if nothing else is configured. Real
/// deployments must override this.
pub const DEFAULT_SECRET_SALT: &str = "super secret token value";

/// 7 days, in milliseconds.
pub const DEFAULT_PERSISTENCE_EXPIRES_MS: i64 = 7 * 24 * 60 * 60 * 1000;
/// 1 day, in milliseconds.
pub const DEFAULT_ACCESS_EXPIRES_MS: i64 = 24 * 60 * 60 * 1000;
/// 7 days, in milliseconds.
pub const DEFAULT_REFRESH_EXPIRES_MS: i64 = 7 * 24 * 60 * 60 * 1000;
/// 7 days, in milliseconds.
pub const DEFAULT_EMAIL_EXPIRES_MS: i64 = 7 * 24 * 60 * 60 * 1000;
/// 7 days, in milliseconds.
pub const DEFAULT_OFFLINE_EXPIRES_MS: i64 = 7 * 24 * 60 * 60 * 1000;

/// Configuration the codec and signer need. Owned by the token service
/// (§4.7), which is responsible for loading it from the environment (see
/// `authn-token-service::config`).
#[derive(Clone, Debug)]
pub struct TokenConfig {
    secret_salt: String,
    persistence_expires_ms: i64,
    access_expires_ms: i64,
    refresh_expires_ms: i64,
    email_expires_ms: i64,
    offline_expires_ms: i64,
    /// See §9.2. Plumbed through and validated, but no code path currently
    /// consults it to extend absolute expiry.
    pub expires_from_last_use: bool,
    /// See §9.3. Only `true` is a supported value; a loader should reject
    /// `false` rather than silently ignore it.
    pub refresh_reuses_id: bool,
}

impl TokenConfig {
    /// Build a config from already-validated values. Non-positive `*_ms`
    /// expiries fall back to their defaults, matching the reference
    /// behavior of ignoring a non-positive configured value (§6).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        secret_salt: String,
        persistence_expires_ms: i64,
        access_expires_ms: i64,
        refresh_expires_ms: i64,
        email_expires_ms: i64,
        offline_expires_ms: i64,
        expires_from_last_use: bool,
        refresh_reuses_id: bool,
    ) -> Self {
        Self {
            secret_salt,
            persistence_expires_ms: positive_or_default(
                persistence_expires_ms,
                DEFAULT_PERSISTENCE_EXPIRES_MS,
            ),
            access_expires_ms: positive_or_default(access_expires_ms, DEFAULT_ACCESS_EXPIRES_MS),
            refresh_expires_ms: positive_or_default(refresh_expires_ms, DEFAULT_REFRESH_EXPIRES_MS),
            email_expires_ms: positive_or_default(email_expires_ms, DEFAULT_EMAIL_EXPIRES_MS),
            offline_expires_ms: positive_or_default(offline_expires_ms, DEFAULT_OFFLINE_EXPIRES_MS),
            expires_from_last_use,
            refresh_reuses_id,
        }
    }

    pub fn secret_salt(&self) -> &[u8] {
        self.secret_salt.as_bytes()
    }

    /// Max record TTL, in milliseconds, enforced at the store layer.
    pub fn persistence_expires_ms(&self) -> i64 {
        self.persistence_expires_ms
    }

    /// The configured absolute max age, in milliseconds, for `category` —
    /// consulted at decode time for every category, whether or not that
    /// category embeds an expiration in its wire format (§4.4).
    pub fn max_age_ms(&self, category: Category) -> i64 {
        match category {
            Category::Access => self.access_expires_ms,
            Category::Refresh => self.refresh_expires_ms,
            Category::Email => self.email_expires_ms,
            Category::Offline => self.offline_expires_ms,
        }
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_SECRET_SALT.to_string(),
            DEFAULT_PERSISTENCE_EXPIRES_MS,
            DEFAULT_ACCESS_EXPIRES_MS,
            DEFAULT_REFRESH_EXPIRES_MS,
            DEFAULT_EMAIL_EXPIRES_MS,
            DEFAULT_OFFLINE_EXPIRES_MS,
            false,
            true,
        )
    }
}

fn positive_or_default(value: i64, default: i64) -> i64 {
    if value > 0 {
        value
    } else {
        default
    }
}
