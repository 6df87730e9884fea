//! Hash store trait definition.

use crate::error::StorageResult;

/// A key-value hash store backing HashORM.
///
/// Stores are **flat string stores**: keys map to plain string values,
/// field-value hashes, or lists of strings. HashORM owns all record
/// layout interpretation - stores do not understand entities, schemas,
/// counters or tombstones.
///
/// # Invariants
///
/// - `get` returns exactly the value previously passed to `set`
/// - `hget` returns exactly the value previously passed to `hset` for
///   that field, or `None` after `hdel`
/// - `del` and `hdel` on absent keys/fields are no-ops
/// - `rpush` appends; `lrange` returns elements in push order
/// - Operating on a key holding a different kind of value fails with
///   [`StorageError::WrongType`](crate::StorageError::WrongType)
/// - Implementors must be `Send + Sync`
///
/// # Implementors
///
/// - [`super::MemoryStore`] - In-memory, for tests and ephemeral data
///
/// A networked Redis client satisfies this trait by forwarding each
/// method to the corresponding command (`GET`, `SET`, `EXISTS`,
/// `HGET`, `HSET`, `HDEL`, `DEL`, `RPUSH`, `LRANGE key 0 -1`).
pub trait HashStore: Send + Sync {
    /// Returns the string value at `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the key holds a hash or list, or on a
    /// backend failure.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Sets the string value at `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error on a backend failure.
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;

    /// Returns whether any value exists at `key`.
    ///
    /// # Errors
    ///
    /// Returns an error on a backend failure.
    fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Removes the value at `key`, whatever its kind. No-op if absent.
    ///
    /// # Errors
    ///
    /// Returns an error on a backend failure.
    fn del(&mut self, key: &str) -> StorageResult<()>;

    /// Returns the value of `field` in the hash at `key`.
    ///
    /// Returns `None` if the key or the field is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the key holds a non-hash value, or on a
    /// backend failure.
    fn hget(&self, key: &str, field: &str) -> StorageResult<Option<String>>;

    /// Sets `field` to `value` in the hash at `key`, creating the hash
    /// if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the key holds a non-hash value, or on a
    /// backend failure.
    fn hset(&mut self, key: &str, field: &str, value: &str) -> StorageResult<()>;

    /// Removes `field` from the hash at `key`. No-op if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the key holds a non-hash value, or on a
    /// backend failure.
    fn hdel(&mut self, key: &str, field: &str) -> StorageResult<()>;

    /// Appends `value` to the list at `key`, creating the list if
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the key holds a non-list value, or on a
    /// backend failure.
    fn rpush(&mut self, key: &str, value: &str) -> StorageResult<()>;

    /// Returns every element of the list at `key`, in push order.
    ///
    /// Returns an empty list if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the key holds a non-list value, or on a
    /// backend failure.
    fn lrange(&self, key: &str) -> StorageResult<Vec<String>>;
}
