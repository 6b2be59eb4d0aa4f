use thiserror::Error;

/// Everything that can go wrong while decoding, verifying, or aging an
/// opaque token. Does not include store I/O errors — those are a distinct
/// concern layered on top by the service that owns the record store.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum TokenError {
    /// The token could not be parsed, its category prefix is unrecognized,
    /// its body has the wrong length for its category, or its signature
    /// does not verify.
    #[error("bad token")]
    BadToken,

    /// The token's signature verified, but its absolute expiration has
    /// already passed.
    #[error("token expired {elapsed_ms}ms ago")]
    ExpiredToken { elapsed_ms: i64 },
}
