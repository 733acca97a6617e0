//! Integration tests for unions (joins) between collections.

use joinery_core::{Comparison, Database, MemoryConfig};
use joinery_testkit::{init_tracing, scenarios, Pet, RecordingDriver, TestDatabase, User};
use std::sync::Arc;

#[test]
fn default_keys_follow_foreign_collection() {
    init_tracing();
    let driver = Arc::new(RecordingDriver::new());
    let db = Database::with_driver(driver.clone());

    db.query::<Pet>().unwrap().union::<User>().all().unwrap();

    let statement = driver.last().unwrap();
    let union = &statement.unions[0];
    assert_eq!(union.local().collection(), "pet");
    assert_eq!(union.foreign().collection(), "user");
    assert_eq!(union.local_key(), "user_id");
    assert_eq!(union.foreign_key(), "id");
}

#[test]
fn default_keys_use_driver_id_key() {
    init_tracing();
    let driver = Arc::new(RecordingDriver::with_id_key("_id"));
    let db = Database::with_driver(driver.clone());

    let query = db.query::<Pet>().unwrap().union::<User>();

    assert_eq!(query.unions()[0].local_key(), "user__id");
    assert_eq!(query.unions()[0].foreign_key(), "_id");
    assert_eq!(driver.calls(), 0);
}

#[test]
fn explicit_keys_override_defaults() {
    let db = TestDatabase::memory();

    let both = db
        .query::<User>()
        .unwrap()
        .union_with::<Pet>(Some("id"), Some("user_id"));
    assert_eq!(both.unions()[0].local_key(), "id");
    assert_eq!(both.unions()[0].foreign_key(), "user_id");

    let local_only = db
        .query::<Pet>()
        .unwrap()
        .union_with::<User>(Some("owner"), None);
    assert_eq!(local_only.unions()[0].local_key(), "owner");
    assert_eq!(local_only.unions()[0].foreign_key(), "id");
}

#[test]
fn memory_join_filters_on_foreign_fields() {
    init_tracing();
    let db = TestDatabase::memory();
    scenarios::household(&db);

    let pets = db
        .query::<Pet>()
        .unwrap()
        .union::<User>()
        .filter_eq("user.name", "cat")
        .all()
        .unwrap();

    assert_eq!(pets.len(), 1);
    assert_eq!(pets[0].name, "kit");
}

#[test]
fn memory_join_drops_unmatched_rows() {
    let db = TestDatabase::memory();
    scenarios::household(&db);

    let owners = db
        .query::<User>()
        .unwrap()
        .union_with::<Pet>(Some("id"), Some("user_id"))
        .filter("age", Comparison::GreaterThan, 0i64)
        .all()
        .unwrap();

    let names: Vec<_> = owners.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, vec!["ann", "cat"]);
}

#[test]
fn memory_join_deletes_through_union() {
    let db = TestDatabase::with_config(MemoryConfig::new());
    scenarios::household(&db);

    db.query::<Pet>()
        .unwrap()
        .union::<User>()
        .filter("user.age", Comparison::GreaterThan, 40i64)
        .delete()
        .unwrap();

    let left: Vec<_> = db
        .query::<Pet>()
        .unwrap()
        .all()
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(left, vec!["rex".to_string()]);
}
