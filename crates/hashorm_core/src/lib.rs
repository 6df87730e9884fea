//! # HashORM Core
//!
//! Object-mapping engine persisting entities into a key-value hash
//! store.
//!
//! This crate provides:
//! - Declarative column schemas with at most one primary key
//! - Typed column values with string adapters ([`Kind`] / [`Value`])
//! - Entity instances with coercing accessors
//! - A [`Repository`] mapping entities to hash records: identifier
//!   assignment, soft deletion, primary-key-ordered iteration
//!
//! ## Example
//!
//! ```rust
//! use hashorm_core::{Column, Entity, Kind, Repository, Schema};
//! use hashorm_store::MemoryStore;
//!
//! let schema = Schema::new(
//!     "User",
//!     vec![
//!         Column::new("id").kind(Kind::Integer).primary_key(),
//!         Column::new("name").kind(Kind::Text),
//!     ],
//! )?;
//!
//! let mut repo = Repository::new(MemoryStore::new(), "app");
//!
//! let mut user = Entity::with_values(&schema, [("id", 7i64)])?;
//! user.set("name", "alice")?;
//! repo.save(&mut user)?;
//!
//! let loaded = repo.load(&schema, 0)?.unwrap();
//! assert_eq!(loaded.get("name").unwrap().as_text(), Some("alice"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod entity;
mod error;
mod repository;
mod schema;
mod value;

pub use config::RepositoryConfig;
pub use entity::Entity;
pub use error::{AdapterError, CoreError, CoreResult, SchemaError};
pub use repository::{Repository, Scan, ScanOptions, DELETED_FIELD, SORTED_SEGMENT};
pub use schema::{Column, ColumnDefault, Schema};
pub use value::{Kind, Value};
