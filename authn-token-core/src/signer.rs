//! The keyed digest that authenticates a token's category, identifier, and
//! expiration against the configured shared secret.
//!
//! SHA-1 is kept deliberately, for wire compatibility with already-issued
//! tokens (§4.3, §9.5 of the spec this crate implements). Do not "upgrade"
//! this to SHA-256 without also versioning the category prefix — existing
//! tokens would otherwise fail to validate.

use uuid::Uuid;

use crate::category::Category;

/// Length in bytes of the signature this module produces.
pub const SIGNATURE_LEN: usize = 20;

/// Sentinel used in place of a real expiration when a category doesn't embed
/// one in the wire format (§4.4). Folded into the signed string so that an
/// attacker can't "add" an expiration to a non-expiring token by replaying
/// the signature computed for a different `expires` value.
pub const NO_EXPIRATION: i64 = i64::MAX;

/// Compute the 20-byte signature over `(category, uuid, expires)`.
///
/// `expires` should be [`NO_EXPIRATION`] for categories that don't carry an
/// expiration in the wire format; the codec is responsible for picking the
/// right value before calling this.
pub fn sign(category: Category, uuid: Uuid, expires: i64, secret_salt: &[u8]) -> [u8; SIGNATURE_LEN] {
    let canonical = canonical_string(category, uuid, expires, secret_salt);
    let digest = ring::digest::digest(&ring::digest::SHA1_FOR_LEGACY_USE_ONLY, &canonical);
    let mut out = [0u8; SIGNATURE_LEN];
    out.copy_from_slice(digest.as_ref());
    out
}

/// Verify a candidate signature in constant time.
pub fn verify(
    category: Category,
    uuid: Uuid,
    expires: i64,
    secret_salt: &[u8],
    candidate: &[u8],
) -> bool {
    let expected = sign(category, uuid, expires, secret_salt);
    ring::constant_time::verify_slices_are_equal(&expected, candidate).is_ok()
}

/// Build the exact byte string that gets signed: `text_prefix || uuid ||
/// secret_salt || expires`, with no delimiters between the parts (§4.3).
fn canonical_string(category: Category, uuid: Uuid, expires: i64, secret_salt: &[u8]) -> Vec<u8> {
    let text_prefix = category.text_prefix().as_bytes();
    let mut uuid_buf = Uuid::encode_buffer();
    let uuid_str = uuid.hyphenated().encode_lower(&mut uuid_buf);
    let expires_str = expires.to_string();

    let mut out = Vec::with_capacity(
        text_prefix.len() + uuid_str.len() + secret_salt.len() + expires_str.len(),
    );
    out.extend_from_slice(text_prefix);
    out.extend_from_slice(uuid_str.as_bytes());
    out.extend_from_slice(secret_salt);
    out.extend_from_slice(expires_str.as_bytes());
    out
}
