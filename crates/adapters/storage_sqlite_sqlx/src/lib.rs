//! # autoleave-adapter-storage-sqlite-sqlx
//!
//! `SQLite` persistence adapter using [sqlx](https://docs.rs/sqlx).
//!
//! ## Responsibilities
//! - Manage the `SQLite` connection pool lifecycle
//! - Run database migrations (sqlx embedded migrations)
//! - Provide a small string key/value preference store
//! - Implement the `KeywordStore` port on top of it, under the `keywords` key
//!
//! ## Dependency rule
//! Depends on `autoleave-app` (for port traits) and `autoleave-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod error;
mod keyword_store;
mod pool;
mod preference_store;

pub use error::StorageError;
pub use keyword_store::{KEYWORDS_KEY, SqliteKeywordStore};
pub use pool::{Config, Database};
pub use preference_store::SqlitePreferenceStore;
