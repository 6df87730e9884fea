//! Column descriptors and entity schemas.
//!
//! A [`Column`] declares one typed field of an entity type; a
//! [`Schema`] is the validated, immutable set of columns computed once
//! when the entity type is declared. Schema construction is the
//! explicit registration step: all declaration-time invariants (one
//! primary key at most, orderable primary-key type, unique and
//! non-reserved names) are checked here and never again.

use crate::error::SchemaError;
use crate::value::{Kind, Value};
use std::fmt;
use std::sync::Arc;

/// The default applied to a column the instance does not supply.
#[derive(Clone)]
pub enum ColumnDefault {
    /// No default; the column starts null.
    None,
    /// A shared literal, cloned into every instance.
    Literal(Value),
    /// A generator invoked once per instance, for defaults that must
    /// be computed fresh (timestamps, nonces).
    Generator(Arc<dyn Fn() -> Value + Send + Sync>),
}

impl ColumnDefault {
    /// Produces the default value for one new instance, if any.
    #[must_use]
    pub fn produce(&self) -> Option<Value> {
        match self {
            Self::None => None,
            Self::Literal(v) => Some(v.clone()),
            Self::Generator(f) => Some(f()),
        }
    }
}

impl fmt::Debug for ColumnDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Literal(v) => f.debug_tuple("Literal").field(v).finish(),
            Self::Generator(_) => f.write_str("Generator(..)"),
        }
    }
}

/// Declares one field of an entity type.
///
/// Columns are metadata, not per-instance state: they are built once,
/// handed to [`Schema::new`], and immutable afterwards.
///
/// # Example
///
/// ```rust
/// use hashorm_core::{Column, Kind};
///
/// let age = Column::new("age").kind(Kind::Integer).default_value(0i64);
/// let id = Column::new("id").kind(Kind::Integer).primary_key();
/// ```
#[derive(Debug, Clone)]
pub struct Column {
    name: String,
    kind: Option<Kind>,
    default: ColumnDefault,
    primary_key: bool,
}

impl Column {
    /// Creates an untyped column with no default.
    ///
    /// An untyped column stores opaque strings with no coercion.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: None,
            default: ColumnDefault::None,
            primary_key: false,
        }
    }

    /// Declares the column's kind.
    #[must_use]
    pub fn kind(mut self, kind: Kind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Sets a shared literal default.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = ColumnDefault::Literal(value.into());
        self
    }

    /// Sets a per-instance generated default.
    #[must_use]
    pub fn default_with(mut self, generator: impl Fn() -> Value + Send + Sync + 'static) -> Self {
        self.default = ColumnDefault::Generator(Arc::new(generator));
        self
    }

    /// Marks the column as the entity type's primary key.
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Returns the column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared kind, or `None` for an opaque column.
    #[must_use]
    pub const fn declared_kind(&self) -> Option<Kind> {
        self.kind
    }

    /// Returns the column's default.
    #[must_use]
    pub const fn default(&self) -> &ColumnDefault {
        &self.default
    }

    /// Returns whether this column is the primary key.
    #[must_use]
    pub const fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    /// Reserved names have the `__name__` shape used by the storage
    /// layout's own segments (tombstone, sorted index, id counter).
    fn is_reserved_name(name: &str) -> bool {
        name.len() > 4 && name.starts_with("__") && name.ends_with("__")
    }
}

/// The validated column set of one entity type.
///
/// Computed exactly once at declaration; shared as `Arc<Schema>` and
/// never mutated. The column list keeps declaration order, which is
/// also the order columns are persisted in.
#[derive(Debug)]
pub struct Schema {
    entity: String,
    columns: Vec<Column>,
    primary_key: Option<usize>,
}

impl Schema {
    /// Builds and validates the schema for an entity type.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] if two columns claim primary-key
    /// status, a primary-key column is untyped or of a non-orderable
    /// kind, a column name repeats, or a column name collides with a
    /// reserved storage segment.
    pub fn new(entity: impl Into<String>, columns: Vec<Column>) -> Result<Arc<Self>, SchemaError> {
        let entity = entity.into();
        let mut primary_key: Option<usize> = None;

        for (idx, column) in columns.iter().enumerate() {
            if Column::is_reserved_name(column.name()) {
                return Err(SchemaError::ReservedColumnName {
                    entity,
                    column: column.name.clone(),
                });
            }
            if columns[..idx].iter().any(|c| c.name == column.name) {
                return Err(SchemaError::DuplicateColumn {
                    entity,
                    column: column.name.clone(),
                });
            }
            if column.primary_key {
                if let Some(first) = primary_key {
                    return Err(SchemaError::DuplicatePrimaryKey {
                        entity,
                        first: columns[first].name.clone(),
                        second: column.name.clone(),
                    });
                }
                match column.kind {
                    Some(kind) if kind.is_orderable() => {}
                    _ => {
                        return Err(SchemaError::UnorderablePrimaryKey {
                            entity,
                            column: column.name.clone(),
                        });
                    }
                }
                primary_key = Some(idx);
            }
        }

        Ok(Arc::new(Self {
            entity,
            columns,
            primary_key,
        }))
    }

    /// Returns the entity type name.
    #[must_use]
    pub fn entity(&self) -> &str {
        &self.entity
    }

    /// Returns the columns in declaration order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Looks up a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Returns the primary-key column, if one is declared.
    #[must_use]
    pub fn primary_key(&self) -> Option<&Column> {
        self.primary_key.map(|idx| &self.columns[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_declaration_order() {
        let schema = Schema::new(
            "User",
            vec![
                Column::new("id").kind(Kind::Integer).primary_key(),
                Column::new("name").kind(Kind::Text),
                Column::new("bio"),
            ],
        )
        .unwrap();

        let names: Vec<_> = schema.columns().iter().map(Column::name).collect();
        assert_eq!(names, vec!["id", "name", "bio"]);
        assert_eq!(schema.primary_key().unwrap().name(), "id");
    }

    #[test]
    fn at_most_one_primary_key() {
        let err = Schema::new(
            "User",
            vec![
                Column::new("id").kind(Kind::Integer).primary_key(),
                Column::new("email").kind(Kind::Text).primary_key(),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicatePrimaryKey { .. }));
    }

    #[test]
    fn primary_key_must_be_orderable() {
        let err = Schema::new(
            "Flag",
            vec![Column::new("on").kind(Kind::Boolean).primary_key()],
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::UnorderablePrimaryKey { .. }));

        // untyped columns are opaque strings, not orderable
        let err = Schema::new("Raw", vec![Column::new("blob").primary_key()]).unwrap_err();
        assert!(matches!(err, SchemaError::UnorderablePrimaryKey { .. }));
    }

    #[test]
    fn rejects_duplicate_and_reserved_names() {
        let err = Schema::new(
            "User",
            vec![Column::new("name"), Column::new("name")],
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateColumn { .. }));

        let err = Schema::new("User", vec![Column::new("__deleted__")]).unwrap_err();
        assert!(matches!(err, SchemaError::ReservedColumnName { .. }));

        let err = Schema::new("User", vec![Column::new("__sorted__")]).unwrap_err();
        assert!(matches!(err, SchemaError::ReservedColumnName { .. }));
    }

    #[test]
    fn defaults_produce_per_instance() {
        let literal = ColumnDefault::Literal(Value::Integer(7));
        assert_eq!(literal.produce(), Some(Value::Integer(7)));

        let counter = std::sync::atomic::AtomicI64::new(0);
        let column = Column::new("seq").kind(Kind::Integer).default_with(move || {
            Value::Integer(counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst))
        });
        assert_eq!(column.default().produce(), Some(Value::Integer(0)));
        assert_eq!(column.default().produce(), Some(Value::Integer(1)));
    }
}
