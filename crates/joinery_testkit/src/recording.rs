//! A driver that records statements instead of storing anything.

use joinery_core::{Driver, DriverError, DriverResult, Schema, Statement};
use joinery_value::Value;
use parking_lot::Mutex;
use std::collections::VecDeque;

/// A scripted reply for the next `query` call.
#[derive(Debug)]
pub enum Reply {
    /// Return these records.
    Records(Vec<Value>),
    /// Fail with this error.
    Fail(DriverError),
}

/// A [`Driver`] that logs every call and answers from a script.
///
/// Each `query` pops the next scripted [`Reply`]; with the script
/// exhausted it returns no records.
#[derive(Debug)]
pub struct RecordingDriver {
    id_key: String,
    statements: Mutex<Vec<Statement>>,
    replies: Mutex<VecDeque<Reply>>,
    created: Mutex<Vec<Schema>>,
    deleted: Mutex<Vec<String>>,
}

impl RecordingDriver {
    /// Creates a recorder using `"id"` as the identifier field.
    pub fn new() -> Self {
        Self::with_id_key("id")
    }

    /// Creates a recorder with a custom identifier field.
    pub fn with_id_key(id_key: &str) -> Self {
        Self {
            id_key: id_key.to_string(),
            statements: Mutex::new(Vec::new()),
            replies: Mutex::new(VecDeque::new()),
            created: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
        }
    }

    /// Queues records for a later `query` call.
    pub fn reply(&self, records: Vec<Value>) {
        self.replies.lock().push_back(Reply::Records(records));
    }

    /// Queues a failure for a later `query` call.
    pub fn fail(&self, error: DriverError) {
        self.replies.lock().push_back(Reply::Fail(error));
    }

    /// Returns every statement received so far.
    pub fn statements(&self) -> Vec<Statement> {
        self.statements.lock().clone()
    }

    /// Returns the most recent statement.
    pub fn last(&self) -> Option<Statement> {
        self.statements.lock().last().cloned()
    }

    /// Returns the number of `query` calls received.
    pub fn calls(&self) -> usize {
        self.statements.lock().len()
    }

    /// Returns the schemas passed to `create_collection`.
    pub fn created(&self) -> Vec<Schema> {
        self.created.lock().clone()
    }

    /// Returns the names passed to `delete_collection`.
    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().clone()
    }
}

impl Default for RecordingDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl Driver for RecordingDriver {
    fn id_key(&self) -> &str {
        &self.id_key
    }

    fn query(&self, statement: &Statement) -> DriverResult<Vec<Value>> {
        self.statements.lock().push(statement.clone());
        match self.replies.lock().pop_front() {
            Some(Reply::Records(records)) => Ok(records),
            Some(Reply::Fail(error)) => Err(error),
            None => Ok(Vec::new()),
        }
    }

    fn create_collection(&self, schema: &Schema) -> DriverResult<()> {
        self.created.lock().push(schema.clone());
        Ok(())
    }

    fn delete_collection(&self, name: &str) -> DriverResult<()> {
        self.deleted.lock().push(name.to_string());
        Ok(())
    }
}
