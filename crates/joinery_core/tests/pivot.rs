//! Integration tests for many-to-many pivots.

use joinery_core::{pivot_name, Context, CoreError, Entity, FieldKind, MemoryConfig, Pivot, PivotSides};
use joinery_testkit::{distinct_names_strategy, init_tracing, saved_user, Role, TestDatabase, User};
use joinery_value::Value;
use proptest::prelude::*;

type UserRole = Pivot<User, Role>;
type RoleUser = Pivot<Role, User>;

#[test]
fn collection_name_is_order_independent() {
    assert_eq!(UserRole::collection_name(), "role_user");
    assert_eq!(RoleUser::collection_name(), "role_user");
}

#[test]
fn prepare_and_revert() {
    init_tracing();
    let db = TestDatabase::memory();

    db.prepare::<UserRole>().unwrap();
    let schema = db.driver.schema("role_user").unwrap();
    let names: Vec<_> = schema.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["id", "role_id", "user_id"]);
    assert_eq!(schema.fields[1].kind, FieldKind::Int);

    assert!(db.prepare::<RoleUser>().is_err());

    db.revert::<RoleUser>().unwrap();
    assert!(!db.driver.has_collection("role_user"));
}

#[test]
fn link_and_query_through_pivot() {
    init_tracing();
    let db = TestDatabase::memory();
    db.prepare::<UserRole>().unwrap();

    let ann = saved_user(&db, "ann", 31);
    let bob = saved_user(&db, "bob", 17);
    let mut admin = Role::new("admin");
    db.query::<Role>().unwrap().save(&mut admin).unwrap();

    let mut link = UserRole::new(&ann, &admin).unwrap();
    db.query::<UserRole>().unwrap().save(&mut link).unwrap();
    assert!(link.id().is_some());
    assert_eq!(link.left_id(), admin.id.as_ref());
    assert_eq!(link.right_id(), ann.id.as_ref());

    let admins = db
        .query::<User>()
        .unwrap()
        .union_with::<UserRole>(Some("id"), Some("user_id"))
        .filter_eq("role_user.role_id", admin.id.clone())
        .all()
        .unwrap();
    assert_eq!(admins, vec![ann.clone()]);

    let links = db.query::<RoleUser>().unwrap().all().unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].left_id(), admin.id.as_ref());
    assert_eq!(links[0].right_id(), ann.id.as_ref());

    assert_ne!(bob.id, ann.id);
}

#[test]
fn custom_id_key_keeps_links() {
    init_tracing();
    let db = TestDatabase::with_config(MemoryConfig::new().id_key("_id"));
    db.prepare::<UserRole>().unwrap();

    let names: Vec<_> = db
        .driver
        .schema("role_user")
        .unwrap()
        .fields
        .into_iter()
        .map(|f| f.name)
        .collect();
    assert_eq!(names, vec!["_id", "role__id", "user__id"]);

    let ann = saved_user(&db, "ann", 31);
    let mut admin = Role::new("admin");
    db.query::<Role>().unwrap().save(&mut admin).unwrap();

    let mut link = UserRole::new(&ann, &admin).unwrap();
    db.query::<UserRole>().unwrap().save(&mut link).unwrap();

    let links = db.query::<UserRole>().unwrap().all().unwrap();
    assert_eq!(links, vec![link.clone()]);
    assert_eq!(links[0].left_id(), admin.id.as_ref());
    assert_eq!(links[0].right_id(), ann.id.as_ref());

    let admins = db
        .query::<User>()
        .unwrap()
        .union_with::<UserRole>(Some("_id"), Some("user__id"))
        .filter_eq("role_user.role__id", admin.id.clone())
        .all()
        .unwrap();
    assert_eq!(admins, vec![ann]);
}

#[test]
fn pivot_serializes_canonical_columns() {
    let mut user = User::new("ann", 31);
    user.id = Some(Value::Integer(1));
    let mut role = Role::new("admin");
    role.id = Some(Value::Integer(2));

    let value = RoleUser::new(&role, &user)
        .unwrap()
        .to_value(&Context::new("id"))
        .unwrap();

    assert_eq!(value.get("role_id"), Some(&Value::Integer(2)));
    assert_eq!(value.get("user_id"), Some(&Value::Integer(1)));
    assert_eq!(value.get("id"), Some(&Value::Null));
}

#[test]
fn same_collection_pivot_is_rejected() {
    let db = TestDatabase::memory();
    let err = db.query::<Pivot<User, User>>().unwrap_err();
    assert!(matches!(err, CoreError::InvalidConfiguration { .. }));
}

proptest! {
    #[test]
    fn pivot_name_is_symmetric((a, b) in distinct_names_strategy()) {
        prop_assert_eq!(pivot_name(&a, &b), pivot_name(&b, &a));
    }

    #[test]
    fn sides_are_sorted((a, b) in distinct_names_strategy()) {
        use joinery_core::EntityKind;
        let sides = PivotSides::resolve(EntityKind::named(a.clone()), EntityKind::named(b.clone())).unwrap();
        prop_assert!(sides.left().collection() < sides.right().collection());
        prop_assert_eq!(sides.first_is_left(), a < b);
    }
}
