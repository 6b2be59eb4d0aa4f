//! Issuance, validation, refresh, and max-age reporting for opaque bearer
//! tokens, built on top of `authn-token-core` (codec/signer/identifiers) and
//! `authn-column-store` (the wide-column record adapter).

pub mod config;
pub mod error;
pub mod service;

pub use config::{load, load_from_env, ConfigError};
pub use error::TokenError;
pub use service::TokenService;
