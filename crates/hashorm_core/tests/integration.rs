//! Integration tests for the mapping engine over an in-memory store.

use hashorm_core::{Column, Entity, Kind, Repository, Schema, ScanOptions};
use hashorm_store::MemoryStore;
use std::sync::Arc;

fn user_schema() -> Arc<Schema> {
    Schema::new(
        "User",
        vec![
            Column::new("id").kind(Kind::Integer).primary_key(),
            Column::new("name").kind(Kind::Text),
        ],
    )
    .unwrap()
}

fn new_repo() -> Repository<MemoryStore> {
    Repository::new(MemoryStore::new(), "itest")
}

/// Declare User{id: int primary key, name: text}; save two users,
/// delete one, and check ids, ordering, visibility and the counter.
#[test]
fn user_lifecycle() {
    let schema = user_schema();
    let mut repo = new_repo();

    let mut a = Entity::with_values(&schema, [("id", "0"), ("name", "a")]).unwrap();
    repo.save(&mut a).unwrap();
    assert_eq!(a.id(), Some("0"));

    let mut b = Entity::with_values(&schema, [("id", "1"), ("name", "b")]).unwrap();
    repo.save(&mut b).unwrap();
    assert_eq!(b.id(), Some("1"));

    let loaded: Vec<Entity> = repo
        .load_all(&schema)
        .unwrap()
        .filter_map(|item| item.unwrap())
        .collect();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].get("name").unwrap().as_text(), Some("a"));
    assert_eq!(loaded[1].get("name").unwrap().as_text(), Some("b"));

    repo.delete(&a).unwrap();
    assert!(repo.load(&schema, 0).unwrap().is_none());

    let after: Vec<Entity> = repo
        .load_all(&schema)
        .unwrap()
        .filter_map(|item| item.unwrap())
        .collect();
    assert_eq!(after.len(), 1);
    assert_eq!(after[0].id(), Some("1"));

    assert_eq!(repo.get_max_id(&schema).unwrap(), Some(1));
}

/// After any sequence of saves, load_all yields non-decreasing
/// primary-key values.
#[test]
fn load_all_is_sorted_after_every_save() {
    let schema = user_schema();
    let mut repo = new_repo();

    for pk in [9i64, 3, 7, 3, 11, 0, 5] {
        let mut user = Entity::with_values(&schema, [("id", pk)]).unwrap();
        repo.save(&mut user).unwrap();

        let keys: Vec<i64> = repo
            .load_all(&schema)
            .unwrap()
            .filter_map(|item| item.unwrap())
            .map(|e| e.get("id").unwrap().as_integer().unwrap())
            .collect();
        let mut sorted = keys.clone();
        sorted.sort_unstable();
        assert_eq!(keys, sorted);
    }
}

/// Saved column values survive one serialize/parse round trip per
/// column kind.
#[test]
fn save_load_round_trips_every_kind() {
    let schema = Schema::new(
        "Sample",
        vec![
            Column::new("k").kind(Kind::Integer).primary_key(),
            Column::new("t").kind(Kind::Text),
            Column::new("f").kind(Kind::Float),
            Column::new("b").kind(Kind::Boolean),
            Column::new("j").kind(Kind::Json),
            Column::new("raw"),
        ],
    )
    .unwrap();
    let mut repo = new_repo();

    let mut sample = Entity::new(&schema);
    sample.set("k", 42i64).unwrap();
    sample.set("t", "héllo world").unwrap();
    sample.set("f", -2.5f64).unwrap();
    sample.set("b", true).unwrap();
    sample
        .set("j", serde_json::json!({ "tags": ["x", "y"], "n": 3 }))
        .unwrap();
    sample.set("raw", "opaque:string:with:separators").unwrap();
    repo.save(&mut sample).unwrap();

    let loaded = repo.load(&schema, 0).unwrap().unwrap();
    for column in schema.columns() {
        assert_eq!(loaded.get(column.name()), sample.get(column.name()));
    }
}

/// Ids are issued 0, 1, 2, ... with no repeats and no gaps, and
/// deletes never free an id.
#[test]
fn identifier_monotonicity_across_deletes() {
    let schema = user_schema();
    let mut repo = new_repo();
    let mut saved = Vec::new();

    for i in 0..5i64 {
        let mut user = Entity::with_values(&schema, [("id", i)]).unwrap();
        repo.save(&mut user).unwrap();
        assert_eq!(user.id(), Some(i.to_string().as_str()));
        saved.push(user);
    }

    repo.delete(&saved[1]).unwrap();
    repo.delete(&saved[4]).unwrap();

    let mut next = Entity::with_values(&schema, [("id", 99i64)]).unwrap();
    repo.save(&mut next).unwrap();
    assert_eq!(next.id(), Some("5"));
    assert_eq!(repo.get_max_id(&schema).unwrap(), Some(5));
}

/// find_by matches on the stored serialized form and returns the
/// lowest live id.
#[test]
fn find_by_serialized_equality() {
    let schema = Schema::new(
        "Event",
        vec![
            Column::new("at").kind(Kind::Integer).primary_key(),
            Column::new("level").kind(Kind::Integer),
        ],
    )
    .unwrap();
    let mut repo = new_repo();

    for (at, level) in [(3i64, 10i64), (1, 20), (2, 20)] {
        let mut event = Entity::with_values(&schema, [("at", at), ("level", level)]).unwrap();
        repo.save(&mut event).unwrap();
    }

    // id order, not primary-key order: id 1 saved before id 2
    let found = repo.find_by(&schema, "level", "20").unwrap().unwrap();
    assert_eq!(found.id(), Some("1"));
    assert_eq!(found.get("at").unwrap().as_integer(), Some(1));

    // the decoded value "20" never matches as "020"
    assert!(repo.find_by(&schema, "level", "020").unwrap().is_none());
}

/// A fresh scan observes writes made after an earlier scan finished.
#[test]
fn scans_are_restartable() {
    let schema = user_schema();
    let mut repo = new_repo();

    let mut a = Entity::with_values(&schema, [("id", 1i64)]).unwrap();
    repo.save(&mut a).unwrap();
    assert_eq!(repo.load_all(&schema).unwrap().count(), 1);

    let mut b = Entity::with_values(&schema, [("id", 2i64)]).unwrap();
    repo.save(&mut b).unwrap();
    assert_eq!(repo.load_all(&schema).unwrap().count(), 2);
}

/// Reverse iteration without a primary key walks ids downward.
#[test]
fn reverse_insertion_scan() {
    let schema = Schema::new("Log", vec![Column::new("line").kind(Kind::Text)]).unwrap();
    let mut repo = new_repo();
    for line in ["one", "two", "three"] {
        let mut log = Entity::with_values(&schema, [("line", line)]).unwrap();
        repo.save(&mut log).unwrap();
    }

    let lines: Vec<String> = repo
        .load_all_with(
            &schema,
            ScanOptions {
                reverse: true,
                ..ScanOptions::default()
            },
        )
        .unwrap()
        .filter_map(|item| item.unwrap())
        .map(|e| e.get("line").unwrap().as_text().unwrap().to_owned())
        .collect();
    assert_eq!(lines, vec!["three", "two", "one"]);
}
