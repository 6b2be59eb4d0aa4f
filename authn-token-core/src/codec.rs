//! Encoding and decoding of the opaque bearer-token wire format.
//!
//! A token string is `category.base64_prefix()` (2 literal base64-alphabet
//! characters) followed by the URL-safe, unpadded base64 encoding of:
//!
//! ```text
//! uuid(16) || [expires(8), if category.carries_expiration()] || signature(20)
//! ```
//!
//! `expires` is a big-endian `i64` (milliseconds since the Unix epoch), and
//! for non-carrying categories is `i64::MAX` everywhere it's folded into the
//! signed string — the wire body itself just doesn't carry those 8 bytes.

use base64::Engine;
use uuid::Uuid;

use crate::category::{Category, BASE64_PREFIX_LEN};
use crate::config::TokenConfig;
use crate::error::TokenError;
use crate::identifier;
use crate::signer::{self, SIGNATURE_LEN};

const UUID_LEN: usize = 16;
const EXPIRES_LEN: usize = 8;

fn engine() -> base64::engine::GeneralPurpose {
    base64::engine::general_purpose::URL_SAFE_NO_PAD
}

/// A token whose signature has been verified but whose absolute expiration
/// has not — used by `max_token_age`, which reports on an already-expired
/// token rather than rejecting it.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct DecodedToken {
    pub category: Category,
    pub uuid: Uuid,
    /// The `expires` value folded into the signature: the real embedded
    /// timestamp for carrying categories, [`signer::NO_EXPIRATION`] for
    /// every other category.
    pub expires_ms: i64,
}

/// Encode `uuid` as an opaque token of `category`, computing and embedding an
/// absolute expiration when the category carries one (§4.4).
pub fn encode(config: &TokenConfig, category: Category, uuid: Uuid) -> String {
    let expires = if category.carries_expiration() {
        identifier::timestamp_ms(uuid) + config.max_age_ms(category)
    } else {
        signer::NO_EXPIRATION
    };

    let signature = signer::sign(category, uuid, expires, config.secret_salt());

    let mut body = Vec::with_capacity(UUID_LEN + EXPIRES_LEN + SIGNATURE_LEN);
    body.extend_from_slice(uuid.as_bytes());
    if category.carries_expiration() {
        body.extend_from_slice(&expires.to_be_bytes());
    }
    body.extend_from_slice(&signature);

    let mut token = String::with_capacity(BASE64_PREFIX_LEN + (body.len() * 4).div_ceil(3));
    token.push_str(category.base64_prefix());
    token.push_str(&engine().encode(body));
    token
}

/// Verify and decode `token`, rejecting it if the signature is wrong or the
/// store-independent absolute expiration (§4.4, §9.1) has elapsed as of
/// `now_ms`.
///
/// The signature is checked before expiration, so a caller can't learn
/// anything about *why* a token was rejected beyond "bad" vs. "expired" —
/// and a forged, unexpired-looking token is still just `BadToken`.
pub fn decode(config: &TokenConfig, token: &str, now_ms: i64) -> Result<Uuid, TokenError> {
    let decoded = decode_unchecked(config, token)?;

    let limit = identifier::timestamp_ms(decoded.uuid) + config.max_age_ms(decoded.category);
    if now_ms > limit {
        return Err(TokenError::ExpiredToken {
            elapsed_ms: now_ms - limit,
        });
    }

    Ok(decoded.uuid)
}

/// Verify `token`'s signature without enforcing absolute expiration. Used by
/// `max_token_age`, which needs to report on a token's configured lifetime
/// even after that lifetime has passed.
pub fn decode_unchecked(config: &TokenConfig, token: &str) -> Result<DecodedToken, TokenError> {
    let category = Category::from_base64_prefix(token)?;
    let remainder = &token[BASE64_PREFIX_LEN..];

    let body = engine().decode(remainder).map_err(|_| TokenError::BadToken)?;

    let expected_len = UUID_LEN
        + if category.carries_expiration() { EXPIRES_LEN } else { 0 }
        + SIGNATURE_LEN;
    if body.len() != expected_len {
        return Err(TokenError::BadToken);
    }

    let mut cursor = 0;
    let uuid_bytes: [u8; UUID_LEN] = body[cursor..cursor + UUID_LEN]
        .try_into()
        .map_err(|_| TokenError::BadToken)?;
    let uuid = Uuid::from_bytes(uuid_bytes);
    cursor += UUID_LEN;

    let expires_ms = if category.carries_expiration() {
        let bytes: [u8; EXPIRES_LEN] = body[cursor..cursor + EXPIRES_LEN]
            .try_into()
            .map_err(|_| TokenError::BadToken)?;
        cursor += EXPIRES_LEN;
        i64::from_be_bytes(bytes)
    } else {
        signer::NO_EXPIRATION
    };

    let signature = &body[cursor..cursor + SIGNATURE_LEN];
    if !signer::verify(category, uuid, expires_ms, config.secret_salt(), signature) {
        return Err(TokenError::BadToken);
    }

    Ok(DecodedToken {
        category,
        uuid,
        expires_ms,
    })
}
