//! Entity instances.

use crate::error::{CoreError, CoreResult};
use crate::schema::Schema;
use crate::value::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// One record of an entity type.
///
/// An entity holds the current value of each declared column, plus the
/// identifier the repository assigned on first save (`None` until
/// then). Column access is the explicit accessor layer: [`Entity::set`]
/// coerces through the column's declared kind, [`Entity::get`] hands
/// back the typed value, so serialization stays visible at the
/// repository boundary and nowhere else.
///
/// Dropping an entity does not touch storage; the backing record lives
/// until explicitly deleted.
///
/// # Example
///
/// ```rust
/// use hashorm_core::{Column, Entity, Kind, Schema};
///
/// let schema = Schema::new(
///     "User",
///     vec![
///         Column::new("id").kind(Kind::Integer).primary_key(),
///         Column::new("name").kind(Kind::Text),
///     ],
/// )
/// .unwrap();
///
/// let mut user = Entity::new(&schema);
/// user.set("name", "alice").unwrap();
/// // a raw string is coerced through the column kind
/// user.set("id", "3").unwrap();
/// assert_eq!(user.get("id").unwrap().as_integer(), Some(3));
/// ```
#[derive(Clone)]
pub struct Entity {
    schema: Arc<Schema>,
    id: Option<String>,
    values: HashMap<String, Value>,
}

impl Entity {
    /// Creates an instance with every column at its default.
    ///
    /// Literal defaults are cloned; generator defaults are invoked
    /// once per instance. Defaults are trusted to match their column's
    /// declared kind.
    #[must_use]
    pub fn new(schema: &Arc<Schema>) -> Self {
        let mut values = HashMap::new();
        for column in schema.columns() {
            if let Some(value) = column.default().produce() {
                values.insert(column.name().to_owned(), value);
            }
        }
        Self {
            schema: Arc::clone(schema),
            id: None,
            values,
        }
    }

    /// Creates an instance from supplied column values.
    ///
    /// Supplied values are coerced through their column's kind and win
    /// over defaults; columns not supplied fall back to their default.
    ///
    /// # Errors
    ///
    /// Returns an error for an undeclared column name or a value that
    /// does not coerce to its column's kind.
    pub fn with_values<I, N, V>(schema: &Arc<Schema>, pairs: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = (N, V)>,
        N: AsRef<str>,
        V: Into<Value>,
    {
        let mut entity = Self::new(schema);
        for (name, value) in pairs {
            entity.set(name.as_ref(), value)?;
        }
        Ok(entity)
    }

    /// Returns the entity's schema.
    #[must_use]
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Returns the repository-assigned identifier, if any.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub(crate) fn assign_id(&mut self, id: String) {
        self.id = Some(id);
    }

    /// Assigns a value to a column, coercing through its kind.
    ///
    /// A value already of the declared kind is stored as-is; anything
    /// else is constructed from its raw serialized form by the
    /// column's kind. Untyped columns store the raw form as opaque
    /// text.
    ///
    /// # Errors
    ///
    /// Returns an error for an undeclared column name or a raw form
    /// the column's kind cannot parse.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> CoreResult<()> {
        let value = value.into();
        let column = self
            .schema
            .column(name)
            .ok_or_else(|| CoreError::unknown_column(self.schema.entity(), name))?;

        let coerced = match column.declared_kind() {
            Some(kind) if value.kind() == kind => value,
            Some(kind) => kind.parse(&value.serialize())?,
            None => match value {
                Value::Text(_) => value,
                other => Value::Text(other.serialize()),
            },
        };
        self.values.insert(name.to_owned(), coerced);
        Ok(())
    }

    /// Assigns a raw stored string to a column, parsing through its
    /// kind.
    ///
    /// # Errors
    ///
    /// Returns an error for an undeclared column name or an unparseable
    /// raw string.
    pub fn set_raw(&mut self, name: &str, raw: &str) -> CoreResult<()> {
        self.set(name, Value::Text(raw.to_owned()))
    }

    /// Returns the current value of a column, or `None` when null.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Nulls a column. A null column is persisted as field absence.
    ///
    /// # Errors
    ///
    /// Returns an error for an undeclared column name.
    pub fn clear(&mut self, name: &str) -> CoreResult<()> {
        if self.schema.column(name).is_none() {
            return Err(CoreError::unknown_column(self.schema.entity(), name));
        }
        self.values.remove(name);
        Ok(())
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Entity");
        s.field("type", &self.schema.entity()).field("id", &self.id);
        for column in self.schema.columns() {
            s.field(column.name(), &self.values.get(column.name()));
        }
        s.finish()
    }
}
