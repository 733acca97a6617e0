//! In-memory reference driver.

use crate::config::MemoryConfig;
use crate::driver::Driver;
use crate::error::{DriverError, DriverResult};
use crate::filter::{Comparison, Filter, Relation, Scope};
use crate::schema::Schema;
use crate::statement::{Action, Statement};
use joinery_value::Value;
use parking_lot::RwLock;
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::{debug, trace};

/// A driver that keeps every collection in memory.
///
/// Suitable for:
/// - Unit and integration tests
/// - Ephemeral databases that don't need persistence
///
/// Unions are evaluated as inner joins: a local record is produced once for
/// every combination of joined records whose keys match. Filters may read
/// joined records through `"<collection>.<field>"` names.
///
/// # Thread Safety
///
/// Collections live behind a single `RwLock`; fetches share it, writes
/// take it exclusively.
///
/// # Example
///
/// ```rust
/// use joinery_core::{Action, Driver, MemoryDriver, Statement};
/// use joinery_value::Value;
///
/// let driver = MemoryDriver::new();
/// let mut create = Statement::new("note");
/// create.action = Action::Create;
/// create.data = Some(Value::map(vec![("text".to_string(), Value::from("hi"))]));
///
/// let created = driver.query(&create).unwrap();
/// assert_eq!(created[0].get("id"), Some(&Value::Integer(1)));
/// assert_eq!(driver.query(&Statement::new("note")).unwrap().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MemoryDriver {
    config: MemoryConfig,
    collections: RwLock<HashMap<String, MemoryCollection>>,
}

#[derive(Debug)]
struct MemoryCollection {
    schema: Option<Schema>,
    rows: Vec<Value>,
    next_id: i64,
}

impl MemoryCollection {
    fn new(schema: Option<Schema>, first_id: i64) -> Self {
        Self {
            schema,
            rows: Vec::new(),
            next_id: first_id,
        }
    }
}

/// One local record together with the records joined onto it.
struct JoinedRow<'a> {
    index: usize,
    local: &'a Value,
    joined: Vec<(&'a str, &'a Value)>,
}

impl MemoryDriver {
    /// Creates a driver with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a driver with custom configuration.
    #[must_use]
    pub fn with_config(config: MemoryConfig) -> Self {
        Self {
            config,
            collections: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the driver configuration.
    #[must_use]
    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    /// Returns whether a collection exists.
    #[must_use]
    pub fn has_collection(&self, name: &str) -> bool {
        self.collections.read().contains_key(name)
    }

    /// Returns the schema a collection was created with, if any.
    #[must_use]
    pub fn schema(&self, name: &str) -> Option<Schema> {
        self.collections
            .read()
            .get(name)
            .and_then(|c| c.schema.clone())
    }

    /// Returns the number of records in a collection.
    #[must_use]
    pub fn count(&self, name: &str) -> usize {
        self.collections.read().get(name).map_or(0, |c| c.rows.len())
    }

    fn missing(&self, name: &str) -> DriverResult<()> {
        if self.config.require_schema {
            Err(DriverError::collection_not_found(name))
        } else {
            Ok(())
        }
    }

    fn create(
        &self,
        collections: &mut HashMap<String, MemoryCollection>,
        statement: &Statement,
    ) -> DriverResult<Vec<Value>> {
        let mut row = payload(statement)?;

        if !collections.contains_key(&statement.entity) {
            self.missing(&statement.entity)?;
            debug!(collection = %statement.entity, "creating implicit collection");
            collections.insert(
                statement.entity.clone(),
                MemoryCollection::new(None, self.config.first_id),
            );
        }
        let collection = collections
            .get_mut(&statement.entity)
            .ok_or_else(|| DriverError::collection_not_found(&statement.entity))?;

        match row.get(&self.config.id_key) {
            None | Some(Value::Null) => {
                let id = collection.next_id;
                collection.next_id = successor(&statement.entity, id)?;
                row.insert(self.config.id_key.clone(), Value::Integer(id));
            }
            Some(Value::Integer(id)) if *id >= collection.next_id => {
                collection.next_id = successor(&statement.entity, *id)?;
            }
            Some(_) => {}
        }

        trace!(collection = %statement.entity, "record created");
        collection.rows.push(row.clone());
        Ok(vec![row])
    }

    /// Expands local records with their unions and applies the filters.
    fn select<'a>(
        &self,
        collections: &'a HashMap<String, MemoryCollection>,
        statement: &Statement,
    ) -> DriverResult<Vec<JoinedRow<'a>>> {
        let Some(local) = collections.get(&statement.entity) else {
            self.missing(&statement.entity)?;
            return Ok(Vec::new());
        };

        let mut rows: Vec<JoinedRow<'a>> = local
            .rows
            .iter()
            .enumerate()
            .map(|(index, local)| JoinedRow {
                index,
                local,
                joined: Vec::new(),
            })
            .collect();

        for union in &statement.unions {
            let foreign_name = union.foreign().collection();
            let Some((stored_name, foreign)) = collections.get_key_value(foreign_name) else {
                self.missing(foreign_name)?;
                return Ok(Vec::new());
            };

            let mut expanded = Vec::with_capacity(rows.len());
            for row in rows {
                let Some(local_value) =
                    resolve(&row, &statement.entity, union.local().collection(), union.local_key())
                else {
                    continue;
                };
                for candidate in &foreign.rows {
                    let matches = candidate
                        .get(union.foreign_key())
                        .is_some_and(|v| !v.is_null() && values_equal(local_value, v));
                    if matches {
                        let mut joined = row.joined.clone();
                        joined.push((stored_name.as_str(), candidate));
                        expanded.push(JoinedRow {
                            index: row.index,
                            local: row.local,
                            joined,
                        });
                    }
                }
            }
            rows = expanded;
        }

        rows.retain(|row| {
            statement
                .filters
                .iter()
                .all(|filter| matches_filter(row, &statement.entity, filter))
        });

        if let Some(limit) = statement.limit {
            rows.truncate(limit.count);
        }

        Ok(rows)
    }

    /// Distinct local indices touched by a statement, in storage order.
    fn affected(
        &self,
        collections: &HashMap<String, MemoryCollection>,
        statement: &Statement,
    ) -> DriverResult<Vec<usize>> {
        let mut indices: Vec<usize> = self
            .select(collections, statement)?
            .into_iter()
            .map(|row| row.index)
            .collect();
        indices.sort_unstable();
        indices.dedup();
        Ok(indices)
    }
}

impl Driver for MemoryDriver {
    fn id_key(&self) -> &str {
        &self.config.id_key
    }

    fn query(&self, statement: &Statement) -> DriverResult<Vec<Value>> {
        match statement.action {
            Action::Fetch => {
                let collections = self.collections.read();
                let rows = self.select(&collections, statement)?;
                trace!(collection = %statement.entity, rows = rows.len(), "fetched");
                Ok(rows.into_iter().map(|row| row.local.clone()).collect())
            }
            Action::Create => {
                let mut collections = self.collections.write();
                self.create(&mut collections, statement)
            }
            Action::Modify => {
                let mut patch = payload(statement)?;
                patch.remove(&self.config.id_key);
                let mut collections = self.collections.write();
                let indices = self.affected(&collections, statement)?;
                let Some(collection) = collections.get_mut(&statement.entity) else {
                    return Ok(Vec::new());
                };
                for index in &indices {
                    let row = &mut collection.rows[*index];
                    *row = row.merge(&patch);
                }
                trace!(collection = %statement.entity, rows = indices.len(), "modified");
                Ok(Vec::new())
            }
            Action::Delete => {
                let mut collections = self.collections.write();
                let indices = self.affected(&collections, statement)?;
                let Some(collection) = collections.get_mut(&statement.entity) else {
                    return Ok(Vec::new());
                };
                for index in indices.iter().rev() {
                    collection.rows.remove(*index);
                }
                trace!(collection = %statement.entity, rows = indices.len(), "deleted");
                Ok(Vec::new())
            }
        }
    }

    fn create_collection(&self, schema: &Schema) -> DriverResult<()> {
        let mut collections = self.collections.write();
        match collections.get_mut(&schema.collection) {
            Some(existing) if existing.schema.is_some() => {
                Err(DriverError::collection_exists(&schema.collection))
            }
            Some(existing) => {
                existing.schema = Some(schema.clone());
                Ok(())
            }
            None => {
                debug!(collection = %schema.collection, fields = schema.fields.len(), "creating collection");
                collections.insert(
                    schema.collection.clone(),
                    MemoryCollection::new(Some(schema.clone()), self.config.first_id),
                );
                Ok(())
            }
        }
    }

    fn delete_collection(&self, name: &str) -> DriverResult<()> {
        let removed = self.collections.write().remove(name);
        match removed {
            Some(collection) => {
                debug!(collection = name, rows = collection.rows.len(), "dropped collection");
                Ok(())
            }
            None => Err(DriverError::collection_not_found(name)),
        }
    }
}

/// Reads `field` of `collection` from a joined row.
fn resolve<'a>(
    row: &JoinedRow<'a>,
    local_name: &str,
    collection: &str,
    field: &str,
) -> Option<&'a Value> {
    if collection == local_name {
        return row.local.get(field);
    }
    row.joined
        .iter()
        .find(|(name, _)| *name == collection)
        .and_then(|&(_, record)| record.get(field))
}

/// The statement's data as a record. Absent data is an empty record.
fn payload(statement: &Statement) -> DriverResult<Value> {
    match &statement.data {
        None => Ok(Value::empty_map()),
        Some(data @ Value::Map(_)) => Ok(data.clone()),
        Some(other) => Err(DriverError::unsupported(format!(
            "{} payload must be a map, got {}",
            statement.action,
            other.kind()
        ))),
    }
}

/// Identifier handed out after `id` in `collection`.
fn successor(collection: &str, id: i64) -> DriverResult<i64> {
    id.checked_add(1).ok_or_else(|| {
        DriverError::backend(format!("identifier space exhausted in {collection}"))
    })
}

/// Reads a possibly qualified filter field from a joined row.
fn field_value<'a>(row: &JoinedRow<'a>, local_name: &str, field: &str) -> Option<&'a Value> {
    match field.split_once('.') {
        Some((collection, name)) => resolve(row, local_name, collection, name),
        None => row.local.get(field),
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    a.compare(b) == Some(Ordering::Equal) || a == b
}

fn matches_filter(row: &JoinedRow<'_>, local_name: &str, filter: &Filter) -> bool {
    match filter {
        Filter::Compare {
            field,
            comparison,
            value,
        } => {
            let actual = field_value(row, local_name, field).unwrap_or(&Value::Null);
            compare(actual, *comparison, value)
        }
        Filter::Subset {
            field,
            scope,
            values,
        } => {
            let actual = field_value(row, local_name, field).unwrap_or(&Value::Null);
            let found = values.iter().any(|v| values_equal(actual, v));
            match scope {
                Scope::In => found,
                Scope::NotIn => !found,
            }
        }
        Filter::Group { relation, filters } => match relation {
            Relation::And => filters.iter().all(|f| matches_filter(row, local_name, f)),
            Relation::Or => filters.iter().any(|f| matches_filter(row, local_name, f)),
        },
    }
}

fn compare(actual: &Value, comparison: Comparison, expected: &Value) -> bool {
    match comparison {
        Comparison::Equals => values_equal(actual, expected),
        Comparison::NotEquals => !values_equal(actual, expected),
        Comparison::GreaterThan => actual.compare(expected) == Some(Ordering::Greater),
        Comparison::LessThan => actual.compare(expected) == Some(Ordering::Less),
        Comparison::GreaterThanOrEquals => matches!(
            actual.compare(expected),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        Comparison::LessThanOrEquals => matches!(
            actual.compare(expected),
            Some(Ordering::Less | Ordering::Equal)
        ),
        Comparison::HasPrefix => text_pair(actual, expected).is_some_and(|(a, e)| a.starts_with(e)),
        Comparison::HasSuffix => text_pair(actual, expected).is_some_and(|(a, e)| a.ends_with(e)),
        Comparison::Contains => text_pair(actual, expected).is_some_and(|(a, e)| a.contains(e)),
    }
}

fn text_pair<'a>(actual: &'a Value, expected: &'a Value) -> Option<(&'a str, &'a str)> {
    Some((actual.as_text()?, expected.as_text()?))
}
