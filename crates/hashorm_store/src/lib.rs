//! # HashORM Store
//!
//! Backing-store trait and implementations for HashORM.
//!
//! This crate provides the lowest-level storage abstraction for
//! HashORM. Stores are **flat string stores** offering key-value,
//! hash and list primitives - they do not interpret the records they
//! hold.
//!
//! ## Design Principles
//!
//! - Stores expose the narrow command set the mapper needs (get, set,
//!   exists, del, hget, hset, hdel, rpush, lrange)
//! - No knowledge of HashORM key layout, counters, or tombstones
//! - Must be `Send + Sync` for concurrent access
//! - HashORM owns all record layout interpretation
//!
//! ## Available Stores
//!
//! - [`MemoryStore`] - For testing and ephemeral storage
//!
//! A networked Redis client can be adapted to [`HashStore`] by
//! forwarding each method to the matching command.
//!
//! ## Example
//!
//! ```rust
//! use hashorm_store::{HashStore, MemoryStore};
//!
//! let mut store = MemoryStore::new();
//! store.set("app:User:__latest__", "0").unwrap();
//! assert!(store.exists("app:User:__latest__").unwrap());
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod memory;
mod store;

pub use error::{StorageError, StorageResult};
pub use memory::MemoryStore;
pub use store::HashStore;
