//! Query builder and execution.

use crate::database::Database;
use crate::entity::{Context, Entity, EntityKind};
use crate::error::{CoreError, CoreResult};
use crate::filter::{Comparison, Filter, Limit, Relation, Scope};
use crate::statement::{Action, Statement};
use crate::union::Union;
use joinery_value::Value;
use std::fmt;
use std::marker::PhantomData;
use tracing::{debug, trace};

/// A storage operation over `T`'s collection, under construction.
///
/// Builder calls (`filter`, `union`, `limit`, ...) take the query by value
/// and hand it back, so they chain. Terminal calls (`first`, `all`,
/// `create`, `save`, `delete`, `delete_entity`, `modify`) set the action,
/// consume the query and run it against the driver. Filters are only ever
/// appended.
///
/// # Example
///
/// ```rust,ignore
/// let pets = db
///     .query::<Pet>()?
///     .union::<User>()
///     .filter("user.name", Comparison::Equals, "ann")
///     .all()?;
/// ```
pub struct Query<T: Entity> {
    database: Database,
    statement: Statement,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Entity> Query<T> {
    /// Creates an unfiltered fetch over `T`'s collection.
    ///
    /// # Errors
    ///
    /// Returns an error if `T` fails [`Entity::validate`].
    pub fn new(database: Database) -> CoreResult<Self> {
        T::validate()?;
        Ok(Self {
            database,
            statement: Statement::new(T::collection_name()),
            _marker: PhantomData,
        })
    }

    /// Returns the statement as it would be handed to the driver.
    #[must_use]
    pub fn statement(&self) -> &Statement {
        &self.statement
    }

    /// Returns the collection this query targets.
    #[must_use]
    pub fn entity(&self) -> &str {
        &self.statement.entity
    }

    /// Returns the current action.
    #[must_use]
    pub fn action(&self) -> Action {
        self.statement.action
    }

    /// Returns the filters appended so far.
    #[must_use]
    pub fn filters(&self) -> &[Filter] {
        &self.statement.filters
    }

    /// Returns the unions declared so far.
    #[must_use]
    pub fn unions(&self) -> &[Union] {
        &self.statement.unions
    }

    // Builders

    /// Appends a comparison filter.
    #[must_use]
    pub fn filter(self, field: &str, comparison: Comparison, value: impl Into<Value>) -> Self {
        self.with_filter(Filter::compare(field, comparison, value))
    }

    /// Appends an equality filter.
    #[must_use]
    pub fn filter_eq(self, field: &str, value: impl Into<Value>) -> Self {
        self.filter(field, Comparison::Equals, value)
    }

    /// Appends a filter keeping records whose field is one of `values`.
    #[must_use]
    pub fn filter_in(self, field: &str, values: Vec<Value>) -> Self {
        self.with_filter(Filter::subset(field, Scope::In, values))
    }

    /// Appends a filter keeping records whose field is none of `values`.
    #[must_use]
    pub fn filter_not_in(self, field: &str, values: Vec<Value>) -> Self {
        self.with_filter(Filter::subset(field, Scope::NotIn, values))
    }

    /// Appends an arbitrary filter.
    #[must_use]
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.statement.filters.push(filter);
        self
    }

    /// Appends a group matching when any filter built by `build` matches.
    ///
    /// Only the filters added inside `build` are kept.
    #[must_use]
    pub fn or<F>(self, build: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        self.group(Relation::Or, build)
    }

    /// Appends a group matching when every filter built by `build` matches.
    ///
    /// Only the filters added inside `build` are kept.
    #[must_use]
    pub fn and<F>(self, build: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        self.group(Relation::And, build)
    }

    fn group<F>(self, relation: Relation, build: F) -> Self
    where
        F: FnOnce(Self) -> Self,
    {
        let scratch = Self {
            database: self.database.clone(),
            statement: Statement::new(self.statement.entity.clone()),
            _marker: PhantomData,
        };
        let filters = build(scratch).statement.filters;
        self.with_filter(Filter::group(relation, filters))
    }

    /// Caps the number of affected records, replacing any earlier cap.
    #[must_use]
    pub fn limit(mut self, count: usize) -> Self {
        self.statement.limit = Some(Limit::new(count));
        self
    }

    /// Joins `Sibling`'s collection using the default keys.
    ///
    /// Local key `"<sibling collection>_<id key>"`, foreign key the driver's
    /// id key.
    #[must_use]
    pub fn union<Sibling: Entity>(self) -> Self {
        self.union_with::<Sibling>(None, None)
    }

    /// Joins `Sibling`'s collection, overriding whichever keys are given.
    #[must_use]
    pub fn union_with<Sibling: Entity>(
        mut self,
        local_key: Option<&str>,
        foreign_key: Option<&str>,
    ) -> Self {
        let union = Union::new(
            EntityKind::of::<T>(),
            EntityKind::of::<Sibling>(),
            self.database.id_key(),
            local_key,
            foreign_key,
        );
        self.statement.unions.push(union);
        self
    }

    // Fetch

    /// Returns the first matching entity.
    ///
    /// Always runs with a limit of one, whatever limit was set before.
    pub fn first(mut self) -> CoreResult<Option<T>> {
        self.statement.limit = Some(Limit::new(1));
        Ok(self.run()?.into_iter().next())
    }

    /// Returns every matching entity in driver order.
    pub fn all(self) -> CoreResult<Vec<T>> {
        self.run()
    }

    // Create

    /// Creates a record from `payload` and returns it as an entity.
    ///
    /// Whatever the driver echoes back is laid over the payload before
    /// decoding: a full record wins field by field, a bare scalar is taken
    /// as the new identifier. Returns `None` if the driver echoes nothing.
    pub fn create(mut self, payload: Value) -> CoreResult<Option<T>> {
        self.statement.action = Action::Create;
        self.statement.data = Some(payload.clone());

        let Some(reply) = self.execute()?.into_iter().next() else {
            return Ok(None);
        };
        let record = match reply {
            Value::Map(_) => payload.merge(&reply),
            Value::Null => payload,
            id => {
                let mut record = payload;
                record.insert(self.database.id_key(), id);
                record
            }
        };

        decode_record(&record, &self.database.context()).map(Some)
    }

    /// Persists `entity`.
    ///
    /// An entity with an identifier is updated in place by an
    /// identifier-equality modify. One without is created and receives the
    /// identifier the driver assigned.
    pub fn save(self, entity: &mut T) -> CoreResult<()> {
        let data = entity.to_value(&self.database.context())?;

        if let Some(id) = entity.id().cloned() {
            let id_key = self.database.id_key().to_string();
            self.filter(&id_key, Comparison::Equals, id).modify(data)
        } else {
            let created = self.create(data)?;
            entity.set_id(created.and_then(|new| new.id().cloned()));
            Ok(())
        }
    }

    // Delete

    /// Deletes every matching record.
    pub fn delete(mut self) -> CoreResult<()> {
        self.statement.action = Action::Delete;
        self.execute()?;
        Ok(())
    }

    /// Deletes the record behind `entity`.
    ///
    /// Does nothing, and never touches the driver, when the entity has no
    /// identifier.
    pub fn delete_entity(self, entity: &T) -> CoreResult<()> {
        let Some(id) = entity.id().cloned() else {
            return Ok(());
        };
        let id_key = self.database.id_key().to_string();
        self.filter(&id_key, Comparison::Equals, id).delete()
    }

    // Modify

    /// Overlays `payload` onto every matching record.
    pub fn modify(mut self, payload: Value) -> CoreResult<()> {
        self.statement.action = Action::Modify;
        self.statement.data = Some(payload);
        self.execute()?;
        Ok(())
    }

    // Execution

    /// Executes the statement and decodes every returned record.
    fn run(&self) -> CoreResult<Vec<T>> {
        let records = self.execute()?;
        let context = self.database.context();
        records
            .iter()
            .map(|record| decode_record(record, &context))
            .collect()
    }

    fn execute(&self) -> CoreResult<Vec<Value>> {
        debug!(
            action = %self.statement.action,
            entity = %self.statement.entity,
            filters = self.statement.filters.len(),
            unions = self.statement.unions.len(),
            limit = ?self.statement.limit.map(|l| l.count),
            "executing query"
        );
        Ok(self.database.driver().query(&self.statement)?)
    }
}

/// Turns one driver record into an entity.
///
/// Two separate steps: the entity decodes itself, then, if the record is a
/// map, its identifier is overwritten from the driver's id key (absent or
/// null leaves it empty).
pub(crate) fn decode_record<T: Entity>(record: &Value, context: &Context) -> CoreResult<T> {
    let mut entity = T::from_value(record, context).map_err(|err| match err {
        CoreError::Value(source) => CoreError::decode(T::collection_name(), source),
        other => other,
    })?;

    if record.is_map() {
        let id = record
            .get(context.id_key())
            .filter(|id| !id.is_null())
            .cloned();
        entity.set_id(id);
    }

    trace!(entity = %T::collection_name(), id = ?entity.id(), "decoded record");
    Ok(entity)
}

impl<T: Entity> fmt::Display for Query<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.statement, f)
    }
}

impl<T: Entity> fmt::Debug for Query<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("statement", &self.statement)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryDriver;
    use std::borrow::Cow;

    #[derive(Debug, Clone, PartialEq)]
    struct Note {
        id: Option<Value>,
        text: String,
    }

    impl Note {
        fn new(text: &str) -> Self {
            Self {
                id: None,
                text: text.to_string(),
            }
        }
    }

    impl Entity for Note {
        fn collection_name() -> Cow<'static, str> {
            Cow::Borrowed("note")
        }

        fn id(&self) -> Option<&Value> {
            self.id.as_ref()
        }

        fn set_id(&mut self, id: Option<Value>) {
            self.id = id;
        }

        fn from_value(value: &Value, _context: &Context) -> CoreResult<Self> {
            // Deliberately ignores the id; the engine assigns it.
            Ok(Self {
                id: None,
                text: value.extract("text")?,
            })
        }

        fn to_value(&self, context: &Context) -> CoreResult<Value> {
            Ok(Value::map(vec![
                (context.id_key().to_string(), self.id.clone().into()),
                ("text".to_string(), Value::from(self.text.as_str())),
            ]))
        }
    }

    fn database() -> Database {
        Database::new(MemoryDriver::new())
    }

    #[test]
    fn builders_accumulate_without_touching_action() {
        let query = database()
            .query::<Note>()
            .unwrap()
            .filter_eq("text", "a")
            .filter_in("id", vec![Value::Integer(1)])
            .limit(5);

        assert_eq!(query.entity(), "note");
        assert_eq!(query.action(), Action::Fetch);
        assert_eq!(query.filters().len(), 2);
        assert_eq!(query.statement().limit, Some(Limit::new(5)));
        assert_eq!(query.to_string(), "fetch note, 2 filters");
    }

    #[test]
    fn or_group_collects_inner_filters() {
        let query = database()
            .query::<Note>()
            .unwrap()
            .or(|q| q.filter_eq("text", "a").filter_eq("text", "b"));

        assert_eq!(
            query.filters(),
            &[Filter::group(
                Relation::Or,
                vec![
                    Filter::compare("text", Comparison::Equals, "a"),
                    Filter::compare("text", Comparison::Equals, "b"),
                ]
            )]
        );
    }

    #[test]
    fn decode_assigns_id_from_record() {
        let context = Context::new("id");
        let record = Value::map(vec![
            ("id".to_string(), Value::Integer(8)),
            ("text".to_string(), Value::from("hello")),
        ]);

        let note: Note = decode_record(&record, &context).unwrap();
        assert_eq!(note.id, Some(Value::Integer(8)));
        assert_eq!(note.text, "hello");
    }

    #[test]
    fn decode_null_id_leaves_entity_unsaved() {
        let context = Context::new("id");
        let record = Value::map(vec![
            ("id".to_string(), Value::Null),
            ("text".to_string(), Value::from("hello")),
        ]);

        let note: Note = decode_record(&record, &context).unwrap();
        assert!(note.id.is_none());
    }

    #[test]
    fn decode_failure_names_collection() {
        let err = decode_record::<Note>(&Value::empty_map(), &Context::new("id")).unwrap_err();
        assert!(matches!(err, CoreError::Decode { ref entity, .. } if entity == "note"));
    }

    #[test]
    fn save_creates_then_updates() {
        let db = database();
        let mut note = Note::new("draft");

        db.query::<Note>().unwrap().save(&mut note).unwrap();
        assert_eq!(note.id, Some(Value::Integer(1)));

        note.text = "final".to_string();
        db.query::<Note>().unwrap().save(&mut note).unwrap();
        assert_eq!(note.id, Some(Value::Integer(1)));

        let all = db.query::<Note>().unwrap().all().unwrap();
        assert_eq!(all, vec![note]);
    }

    #[test]
    fn first_returns_none_on_empty() {
        let first = database().query::<Note>().unwrap().first().unwrap();
        assert!(first.is_none());
    }

    #[test]
    fn delete_entity_without_id_is_noop() {
        let db = database();
        let payload = Note::new("keep").to_value(&db.context()).unwrap();
        db.query::<Note>().unwrap().create(payload).unwrap();

        db.query::<Note>()
            .unwrap()
            .delete_entity(&Note::new("keep"))
            .unwrap();
        assert_eq!(db.query::<Note>().unwrap().all().unwrap().len(), 1);
    }
}
