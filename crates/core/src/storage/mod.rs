//! Storage module
//!
//! The board is mirrored to a single string-keyed slot. This module defines
//! that slot and its backends.

mod file_store;
mod memory_store;
mod repository;

pub use file_store::FileStorage;
pub use memory_store::MemoryStorage;
pub use repository::KeyValueStorage;
