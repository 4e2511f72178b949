//! Durable local storage for the session.
//!
//! This module provides a small string-keyed store with the same shape as a
//! browser's `localStorage`:
//! - `FileStorage`: entries persisted as a JSON object on disk
//! - `MemoryStorage`: process-local entries, used in tests and ephemeral runs
//!
//! The session keeps exactly two entries here, `token` and `userInfo`.

pub mod file;
pub mod memory;

use anyhow::Result;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Storage key holding the raw bearer credential.
pub const TOKEN_KEY: &str = "token";

/// Storage key holding the JSON-serialized user profile.
pub const USER_INFO_KEY: &str = "userInfo";

pub trait LocalStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Removing a missing key is not an error.
    fn remove_item(&self, key: &str) -> Result<()>;
}
