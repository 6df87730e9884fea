//! Error types for HashORM core.

use crate::value::Kind;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while constructing an entity schema.
///
/// Schema errors are definition-time failures: they abort the entity
/// type's declaration and are never retried.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// More than one column claims primary-key status.
    #[error("duplicate primary key on {entity}: {first} and {second}")]
    DuplicatePrimaryKey {
        /// The entity type being declared.
        entity: String,
        /// The column that claimed the primary key first.
        first: String,
        /// The column that claimed it again.
        second: String,
    },

    /// A primary-key column's type cannot be ordered.
    ///
    /// Untyped columns are opaque strings and cannot be ordered
    /// either, so they are rejected here as well.
    #[error("non-orderable primary key on {entity}: column {column}")]
    UnorderablePrimaryKey {
        /// The entity type being declared.
        entity: String,
        /// The offending column.
        column: String,
    },

    /// Two columns share one name.
    #[error("duplicate column on {entity}: {column}")]
    DuplicateColumn {
        /// The entity type being declared.
        entity: String,
        /// The repeated column name.
        column: String,
    },

    /// A column name collides with a reserved storage segment.
    #[error("reserved column name on {entity}: {column}")]
    ReservedColumnName {
        /// The entity type being declared.
        entity: String,
        /// The reserved name that was used.
        column: String,
    },
}

/// Errors raised by type adapters when a raw value does not parse.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// A stored string could not be parsed as its declared kind.
    #[error("cannot parse {raw:?} as {kind:?}")]
    Parse {
        /// The declared column kind.
        kind: Kind,
        /// The raw stored string.
        raw: String,
    },
}

impl AdapterError {
    /// Creates a parse error for `raw` against `kind`.
    pub fn parse(kind: Kind, raw: impl Into<String>) -> Self {
        Self::Parse {
            kind,
            raw: raw.into(),
        }
    }
}

/// Errors that can occur in HashORM core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Backing-store error.
    #[error("storage error: {0}")]
    Storage(#[from] hashorm_store::StorageError),

    /// Schema declaration error.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Type adapter error.
    #[error("adapter error: {0}")]
    Adapter(#[from] AdapterError),

    /// The entity has no assigned identifier, so it cannot be deleted.
    #[error("entity of type {entity} has no id and cannot be deleted")]
    NotDeletable {
        /// The entity type.
        entity: String,
    },

    /// A column name is not declared on the entity's schema.
    #[error("unknown column {column} on entity {entity}")]
    UnknownColumn {
        /// The entity type.
        entity: String,
        /// The undeclared column name.
        column: String,
    },

    /// The identifier counter holds a value that is not an integer.
    #[error("invalid identifier counter at {key}: {value:?}")]
    InvalidCounter {
        /// The counter's storage key.
        key: String,
        /// The stored, unparseable value.
        value: String,
    },
}

impl CoreError {
    /// Creates a not-deletable error for an entity type.
    pub fn not_deletable(entity: impl Into<String>) -> Self {
        Self::NotDeletable {
            entity: entity.into(),
        }
    }

    /// Creates an unknown-column error.
    pub fn unknown_column(entity: impl Into<String>, column: impl Into<String>) -> Self {
        Self::UnknownColumn {
            entity: entity.into(),
            column: column.into(),
        }
    }

    /// Creates an invalid-counter error.
    pub fn invalid_counter(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidCounter {
            key: key.into(),
            value: value.into(),
        }
    }
}
