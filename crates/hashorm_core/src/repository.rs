//! Repository: maps entities to hash records in the backing store.

use crate::config::RepositoryConfig;
use crate::entity::Entity;
use crate::error::{CoreError, CoreResult};
use crate::schema::Schema;
use crate::value::{Kind, Value};
use hashorm_store::HashStore;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::{debug, trace};

/// Hash field marking a record as soft-deleted.
pub const DELETED_FIELD: &str = "__deleted__";

/// Key segment holding the primary-key-ordered id list of a type.
pub const SORTED_SEGMENT: &str = "__sorted__";

/// Options for [`Repository::load_all_with`].
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
    /// Iterate exactly these ids, in insertion order, instead of the
    /// full `0..=max` id range. Disables primary-key ordering.
    pub range: Option<std::ops::Range<u64>>,
    /// Yield in reverse order.
    pub reverse: bool,
    /// Iterate in insertion (id) order even when the type declares a
    /// primary key.
    pub ignore_primary_key: bool,
}

/// Persists entities as hash records in a [`HashStore`].
///
/// The repository owns the key layout
/// (`prefix:Type:{id}` / `prefix:Type:__latest__` /
/// `prefix:Type:__sorted__`), assigns auto-incrementing identifiers,
/// serializes column values through their kinds, soft-deletes via a
/// tombstone field, and keeps a primary-key-ordered id list per type.
///
/// # Consistency
///
/// Operations are plain sequences of store calls with no transaction
/// around them. Two racing saves can read the same identifier counter
/// and issue the same id; writers must be serialized externally. A
/// failure between the record write and the index rebuild inside
/// [`Repository::save`] leaves the record correct but the sorted index
/// stale; the next successful save of the type repairs it.
///
/// # Example
///
/// ```rust
/// use hashorm_core::{Column, Entity, Kind, Repository, Schema};
/// use hashorm_store::MemoryStore;
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
/// let mut repo = Repository::new(MemoryStore::new(), "app");
/// let mut user = Entity::with_values(&schema, [("id", 1i64)]).unwrap();
/// repo.save(&mut user).unwrap();
/// assert_eq!(user.id(), Some("0"));
/// ```
pub struct Repository<S: HashStore> {
    store: S,
    config: RepositoryConfig,
}

impl<S: HashStore> Repository<S> {
    /// Creates a repository over `store` with the given key prefix and
    /// default layout otherwise.
    pub fn new(store: S, prefix: impl Into<String>) -> Self {
        Self::with_config(store, RepositoryConfig::new().prefix(prefix))
    }

    /// Creates a repository with an explicit configuration.
    pub fn with_config(store: S, config: RepositoryConfig) -> Self {
        Self { store, config }
    }

    /// Returns the backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the repository configuration.
    pub fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    fn key(&self, entity: &str, segment: &str) -> String {
        let sep = &self.config.separator;
        let mut key =
            String::with_capacity(self.config.prefix.len() + entity.len() + segment.len() + 2);
        key.push_str(&self.config.prefix);
        key.push_str(sep);
        key.push_str(entity);
        key.push_str(sep);
        key.push_str(segment);
        key
    }

    fn counter_key(&self, schema: &Schema) -> String {
        self.key(schema.entity(), &self.config.counter_segment)
    }

    /// Returns the highest identifier issued for the type, or `None`
    /// if no record was ever saved.
    ///
    /// The counter never decreases, even across deletes.
    ///
    /// # Errors
    ///
    /// Returns an error on a store failure or a corrupt counter value.
    pub fn get_max_id(&self, schema: &Schema) -> CoreResult<Option<u64>> {
        let key = self.counter_key(schema);
        match self.store.get(&key)? {
            None => Ok(None),
            Some(raw) => raw
                .parse::<u64>()
                .map(Some)
                .map_err(|_| CoreError::invalid_counter(key, raw)),
        }
    }

    /// Issues the next identifier for the entity's type and assigns it.
    ///
    /// The first id of a type is `0`; each subsequent call issues the
    /// previous counter value plus one. This is the only path that
    /// creates identifiers; [`Repository::save`] calls it for entities
    /// without one and never reassigns an existing id.
    ///
    /// The counter read and write are two store calls; racing writers
    /// can observe the same value. Serialize writers externally.
    ///
    /// # Errors
    ///
    /// Returns an error on a store failure or a corrupt counter value.
    pub fn update_id(&mut self, entity: &mut Entity) -> CoreResult<u64> {
        let schema = Arc::clone(entity.schema());
        let next = match self.get_max_id(&schema)? {
            Some(n) => n + 1,
            None => 0,
        };
        let key = self.counter_key(&schema);
        self.store.set(&key, &next.to_string())?;
        entity.assign_id(next.to_string());
        trace!(entity = schema.entity(), id = next, "issued identifier");
        Ok(next)
    }

    /// Saves an entity as a hash record.
    ///
    /// Assigns an identifier if the entity has none. Every non-null
    /// column is written as a serialized hash field; null columns are
    /// removed from the record, so null is represented by field
    /// absence. When the type declares a primary key, the sorted index
    /// is rebuilt from scratch afterwards.
    ///
    /// Saving the same values twice leaves the record unchanged. The
    /// record write and the index rebuild are not atomic (see the type
    /// docs).
    ///
    /// # Errors
    ///
    /// Returns an error on a store failure.
    pub fn save(&mut self, entity: &mut Entity) -> CoreResult<()> {
        let schema = Arc::clone(entity.schema());
        let id = match entity.id() {
            Some(id) => id.to_owned(),
            None => self.update_id(entity)?.to_string(),
        };

        let key = self.key(schema.entity(), &id);
        for column in schema.columns() {
            match entity.get(column.name()) {
                Some(value) => self.store.hset(&key, column.name(), &value.serialize())?,
                None => self.store.hdel(&key, column.name())?,
            }
        }
        debug!(entity = schema.entity(), id = %id, "saved record");

        if schema.primary_key().is_some() {
            self.rebuild_sorted_index(&schema)?;
        }
        Ok(())
    }

    /// Loads the record with the given id, or `None` if it does not
    /// exist or is soft-deleted.
    ///
    /// Fields present in storage are decoded through their column's
    /// kind; absent fields fall back to the column's default.
    ///
    /// # Errors
    ///
    /// Returns an error on a store failure or a stored value its
    /// column's kind cannot parse.
    pub fn load(&self, schema: &Arc<Schema>, id: u64) -> CoreResult<Option<Entity>> {
        self.load_str(schema, &id.to_string())
    }

    fn load_str(&self, schema: &Arc<Schema>, id: &str) -> CoreResult<Option<Entity>> {
        let key = self.key(schema.entity(), id);
        if !self.store.exists(&key)? {
            return Ok(None);
        }
        if self.store.hget(&key, DELETED_FIELD)?.is_some() {
            return Ok(None);
        }

        let mut entity = Entity::new(schema);
        for column in schema.columns() {
            if let Some(raw) = self.store.hget(&key, column.name())? {
                entity.set_raw(column.name(), &raw)?;
            }
        }
        entity.assign_id(id.to_owned());
        Ok(Some(entity))
    }

    /// Soft-deletes an entity's record.
    ///
    /// Sets the tombstone field; the record's storage, its id and the
    /// identifier counter are all untouched, but every read operation
    /// treats the record as absent from now on.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotDeletable`] if the entity was never
    /// assigned an id, or an error on a store failure.
    pub fn delete(&mut self, entity: &Entity) -> CoreResult<()> {
        let schema = entity.schema();
        let id = entity
            .id()
            .ok_or_else(|| CoreError::not_deletable(schema.entity()))?;
        let key = self.key(schema.entity(), id);
        self.store.hset(&key, DELETED_FIELD, "1")?;
        debug!(entity = schema.entity(), id, "soft-deleted record");
        Ok(())
    }

    /// Iterates every record of a type in its default order.
    ///
    /// Default order is ascending primary key when the type declares
    /// one, insertion (id) order otherwise. The scan yields
    /// `Ok(None)` for ids whose record is soft-deleted; callers filter.
    /// Each call recomputes the order, so the scan is restartable; it
    /// provides no isolation against concurrent writes to the type.
    ///
    /// # Errors
    ///
    /// Returns an error on a store failure while deriving the order.
    pub fn load_all(&self, schema: &Arc<Schema>) -> CoreResult<Scan<'_, S>> {
        self.load_all_with(schema, ScanOptions::default())
    }

    /// Iterates records of a type with explicit scan options.
    ///
    /// See [`ScanOptions`]; an explicit range or
    /// `ignore_primary_key` falls back to insertion (id) order.
    ///
    /// # Errors
    ///
    /// Returns an error on a store failure while deriving the order.
    pub fn load_all_with(
        &self,
        schema: &Arc<Schema>,
        options: ScanOptions,
    ) -> CoreResult<Scan<'_, S>> {
        let mut ids: Vec<String> = if let Some(range) = options.range {
            range.map(|id| id.to_string()).collect()
        } else if schema.primary_key().is_some() && !options.ignore_primary_key {
            self.ids_by_primary_key(schema, true)?
        } else {
            self.issued_ids(schema)?
        };
        if options.reverse {
            ids.reverse();
        }
        Ok(Scan {
            repository: self,
            schema: Arc::clone(schema),
            ids: ids.into_iter(),
        })
    }

    /// Returns the first non-deleted entity matching `predicate`, in
    /// [`Repository::load_all`] order.
    ///
    /// # Errors
    ///
    /// Returns an error on a store failure.
    pub fn find<P>(&self, schema: &Arc<Schema>, predicate: P) -> CoreResult<Option<Entity>>
    where
        P: Fn(&Entity) -> bool,
    {
        for item in self.load_all(schema)? {
            if let Some(entity) = item? {
                if predicate(&entity) {
                    return Ok(Some(entity));
                }
            }
        }
        Ok(None)
    }

    /// Returns the lowest-id non-deleted record whose raw stored
    /// `column` field equals `value`.
    ///
    /// Comparison is on the stored, serialized form, not the decoded
    /// value. Linear in the number of ever-issued ids.
    ///
    /// # Errors
    ///
    /// Returns an error for an undeclared column or on a store
    /// failure.
    pub fn find_by(
        &self,
        schema: &Arc<Schema>,
        column: &str,
        value: &str,
    ) -> CoreResult<Option<Entity>> {
        if schema.column(column).is_none() {
            return Err(CoreError::unknown_column(schema.entity(), column));
        }
        for id in self.issued_ids(schema)? {
            let key = self.key(schema.entity(), &id);
            if self.store.hget(&key, column)?.as_deref() == Some(value) {
                // a tombstoned match stays invisible; keep scanning
                if let Some(entity) = self.load_str(schema, &id)? {
                    return Ok(Some(entity));
                }
            }
        }
        Ok(None)
    }

    /// Returns the raw stored `column` field for every issued id, in
    /// id order (reversed if `reverse`).
    ///
    /// Absent fields (missing records, null columns) yield `None`.
    /// Tombstoned records are not filtered here; this reads fields,
    /// not records.
    ///
    /// # Errors
    ///
    /// Returns an error on a store failure.
    pub fn load_all_fields(
        &self,
        schema: &Arc<Schema>,
        column: &str,
        reverse: bool,
    ) -> CoreResult<Vec<Option<String>>> {
        let mut ids = self.issued_ids(schema)?;
        if reverse {
            ids.reverse();
        }
        let mut fields = Vec::with_capacity(ids.len());
        for id in &ids {
            fields.push(self.store.hget(&self.key(schema.entity(), id), column)?);
        }
        Ok(fields)
    }

    /// Returns the persisted sorted index: every non-deleted id of the
    /// type, ascending by primary key.
    ///
    /// Empty for types without a primary key or with no records.
    ///
    /// # Errors
    ///
    /// Returns an error on a store failure.
    pub fn sorted_index(&self, schema: &Schema) -> CoreResult<Vec<String>> {
        Ok(self.store.lrange(&self.key(schema.entity(), SORTED_SEGMENT))?)
    }

    /// Every id ever issued for the type, in insertion order.
    fn issued_ids(&self, schema: &Schema) -> CoreResult<Vec<String>> {
        match self.get_max_id(schema)? {
            None => Ok(Vec::new()),
            Some(max) => Ok((0..=max).map(|id| id.to_string()).collect()),
        }
    }

    /// Ids of the type ordered by primary-key value, ascending, stable
    /// by id on ties. Ids whose record is missing are dropped; ids
    /// whose record lacks the primary-key field sort first.
    fn ids_by_primary_key(
        &self,
        schema: &Schema,
        include_deleted: bool,
    ) -> CoreResult<Vec<String>> {
        let Some(pk) = schema.primary_key() else {
            return self.issued_ids(schema);
        };
        // guaranteed orderable by schema validation
        let kind = pk.declared_kind().unwrap_or(Kind::Text);

        let mut pairs: Vec<(String, Option<Value>)> = Vec::new();
        for id in self.issued_ids(schema)? {
            let key = self.key(schema.entity(), &id);
            if !self.store.exists(&key)? {
                continue;
            }
            if !include_deleted && self.store.hget(&key, DELETED_FIELD)?.is_some() {
                continue;
            }
            let value = match self.store.hget(&key, pk.name())? {
                Some(raw) => Some(kind.parse(&raw)?),
                None => None,
            };
            pairs.push((id, value));
        }

        // stable sort keeps ascending id order among equal keys
        pairs.sort_by(|a, b| match (&a.1, &b.1) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(x), Some(y)) => x.cmp_key(y),
        });
        Ok(pairs.into_iter().map(|(id, _)| id).collect())
    }

    /// Clears and rewrites the type's sorted index from the current
    /// record set.
    fn rebuild_sorted_index(&mut self, schema: &Schema) -> CoreResult<()> {
        let ids = self.ids_by_primary_key(schema, false)?;
        let key = self.key(schema.entity(), SORTED_SEGMENT);
        self.store.del(&key)?;
        for id in &ids {
            self.store.rpush(&key, id)?;
        }
        debug!(
            entity = schema.entity(),
            records = ids.len(),
            "rebuilt sorted index"
        );
        Ok(())
    }
}

impl<S: HashStore> std::fmt::Debug for Repository<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repository")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Lazy scan over one entity type's records.
///
/// Yields `Ok(Some(entity))` for live records and `Ok(None)` for
/// soft-deleted ones, in the order fixed when the scan was created.
pub struct Scan<'a, S: HashStore> {
    repository: &'a Repository<S>,
    schema: Arc<Schema>,
    ids: std::vec::IntoIter<String>,
}

impl<S: HashStore> Iterator for Scan<'_, S> {
    type Item = CoreResult<Option<Entity>>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.ids.next()?;
        Some(self.repository.load_str(&self.schema, &id))
    }
}
