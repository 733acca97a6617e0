//! Basic Joinery Example - Users and Roles
//!
//! This example demonstrates core Joinery functionality:
//! - Opening a database over the in-memory driver
//! - Defining entities
//! - Saving, querying and deleting records
//! - Linking two entity types through a pivot
//!
//! Run with: cargo run -p rust_roles
//! Set `RUST_LOG=joinery_core=debug` to see every statement.

use joinery_core::{
    Comparison, Context, CoreResult, Database, Entity, MemoryDriver, Pivot,
};
use joinery_value::Value;
use std::borrow::Cow;

/// A user account.
#[derive(Debug, Clone)]
struct User {
    id: Option<Value>,
    name: String,
    active: bool,
}

impl User {
    fn new(name: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            active: true,
        }
    }
}

impl Entity for User {
    fn collection_name() -> Cow<'static, str> {
        Cow::Borrowed("user")
    }

    fn id(&self) -> Option<&Value> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: Option<Value>) {
        self.id = id;
    }

    fn from_value(value: &Value, context: &Context) -> CoreResult<Self> {
        Ok(Self {
            id: value.extract_optional(context.id_key())?,
            name: value.extract("name")?,
            active: value.extract_optional("active")?.unwrap_or(true),
        })
    }

    fn to_value(&self, context: &Context) -> CoreResult<Value> {
        Ok(Value::map(vec![
            ("active".to_string(), Value::Bool(self.active)),
            (context.id_key().to_string(), self.id.clone().into()),
            ("name".to_string(), Value::from(self.name.as_str())),
        ]))
    }
}

/// A named role.
#[derive(Debug, Clone)]
struct Role {
    id: Option<Value>,
    title: String,
}

impl Entity for Role {
    fn collection_name() -> Cow<'static, str> {
        Cow::Borrowed("role")
    }

    fn id(&self) -> Option<&Value> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: Option<Value>) {
        self.id = id;
    }

    fn from_value(value: &Value, context: &Context) -> CoreResult<Self> {
        Ok(Self {
            id: value.extract_optional(context.id_key())?,
            title: value.extract("title")?,
        })
    }

    fn to_value(&self, context: &Context) -> CoreResult<Value> {
        Ok(Value::map(vec![
            (context.id_key().to_string(), self.id.clone().into()),
            ("title".to_string(), Value::from(self.title.as_str())),
        ]))
    }
}

type UserRole = Pivot<User, Role>;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("Roles Application Example");
    println!("=========================\n");

    let db = Database::new(MemoryDriver::new());
    db.create_collection("user", |schema| {
        schema.id().text("name").bool("active");
    })?;
    db.create_collection("role", |schema| {
        schema.id().text("title");
    })?;
    db.prepare::<UserRole>()?;
    println!("[OK] Collections prepared (pivot: {})", UserRole::collection_name());

    let mut users: Vec<User> = ["ann", "bob", "cat"].iter().map(|n| User::new(n)).collect();
    for user in &mut users {
        db.query::<User>()?.save(user)?;
    }
    println!("\n[+] Saved {} users", users.len());

    let mut roles = Vec::new();
    for title in ["admin", "editor"] {
        let mut role = Role {
            id: None,
            title: title.to_string(),
        };
        db.query::<Role>()?.save(&mut role)?;
        roles.push(role);
    }
    println!("[+] Saved {} roles", roles.len());

    // ann and cat are admins, bob edits.
    for (user, role) in [(&users[0], &roles[0]), (&users[2], &roles[0]), (&users[1], &roles[1])] {
        let mut link = UserRole::new(user, role)?;
        db.query::<UserRole>()?.save(&mut link)?;
    }
    println!("[OK] Users linked to roles");

    for role in &roles {
        let members = db
            .query::<User>()?
            .union_with::<UserRole>(Some("id"), Some("user_id"))
            .filter_eq("role_user.role_id", role.id.clone())
            .all()?;
        let names: Vec<_> = members.iter().map(|u| u.name.as_str()).collect();
        println!("\n[*] {}: {}", role.title, names.join(", "));
    }

    println!("\n[~] Deactivating users whose name starts with 'b'...");
    db.query::<User>()?
        .filter("name", Comparison::HasPrefix, "b")
        .modify(Value::map(vec![("active".to_string(), Value::Bool(false))]))?;

    let active = db.query::<User>()?.filter_eq("active", true).all()?;
    println!("[OK] {} active users remain", active.len());

    if let Some(first) = db.query::<User>()?.first()? {
        println!("\n[-] Removing {}", first.name);
        db.query::<User>()?.delete_entity(&first)?;
    }
    println!("[OK] {} users left", db.query::<User>()?.all()?.len());

    db.revert::<UserRole>()?;
    println!("\n[OK] Pivot collection reverted");

    Ok(())
}
