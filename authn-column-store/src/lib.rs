//! A narrow wide-column store abstraction and the adapter that maps token
//! records onto it.
//!
//! `authn-token-core` knows how to mint and verify token strings but nothing
//! about where the records those strings address live. This crate is that
//! "where": a `ColumnStore` trait any backend can implement, an in-memory
//! implementation for tests and local development, and a `TokenRecordStore`
//! that maps `TokenInfo` onto flat columns (§4.5, §4.6).

pub mod memory;
pub mod record;
pub mod store;

pub use memory::InMemoryColumnStore;
pub use record::{RecordError, TokenRecordStore};
pub use store::{ColumnStore, RowKey, StoreError};
