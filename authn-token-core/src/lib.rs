//! Opaque bearer-token categories, identifiers, signing, and wire codec.
//!
//! This crate is deliberately storage-agnostic: it knows how to mint and
//! verify token strings and how to allocate the identifiers they carry, but
//! nothing about where the records those identifiers address actually live.
//! See `authn-column-store` for the storage adapter and `authn-token-service`
//! for the orchestration layer that ties the two together.

pub mod category;
pub mod codec;
pub mod config;
pub mod error;
pub mod identifier;
pub mod signer;
pub mod types;

pub use category::Category;
pub use codec::{decode, decode_unchecked, encode, DecodedToken};
pub use config::TokenConfig;
pub use error::TokenError;
pub use identifier::IdAllocator;
pub use types::{AuthPrincipalInfo, PrincipalType, TokenInfo};
