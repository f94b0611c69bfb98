//! Machine-readable command reports.
//!
//! Every command prints exactly one JSON object on stdout. The object always
//! carries a `status` field; the remaining fields depend on the command.

use crate::errors::Error;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

#[cfg(test)]
#[path = "report_tests.rs"]
mod tests;

/// Overall status of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Ok,
    Error,
    Skipped,
    RollbackRequired,
}

impl Status {
    /// Process exit code for this status.
    pub fn exit_code(self) -> i32 {
        match self {
            Status::Ok | Status::Skipped => 0,
            Status::Error => 1,
            Status::RollbackRequired => 2,
        }
    }

    /// `Ok` when `passed`, else `Error`.
    pub fn from_check(passed: bool) -> Self {
        if passed {
            Status::Ok
        } else {
            Status::Error
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ok => write!(f, "ok"),
            Status::Error => write!(f, "error"),
            Status::Skipped => write!(f, "skipped"),
            Status::RollbackRequired => write!(f, "rollback_required"),
        }
    }
}

/// A command's status plus its operation-specific fields.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandReport {
    pub status: Status,
    pub fields: Map<String, Value>,
}

impl CommandReport {
    /// Builds a report from any serializable body.
    ///
    /// Object bodies contribute their fields; other values are placed under
    /// `result`. A `status` field in the body is replaced.
    pub fn new<T: Serialize>(status: Status, body: &T) -> Result<Self, Error> {
        let fields = match serde_json::to_value(body)? {
            Value::Object(mut fields) => {
                fields.remove("status");
                fields
            }
            other => {
                let mut fields = Map::new();
                fields.insert("result".to_string(), other);
                fields
            }
        };
        Ok(Self { status, fields })
    }

    /// Report for a command that failed with an error.
    pub fn from_error(error: &Error) -> Self {
        let mut fields = Map::new();
        fields.insert("error".to_string(), Value::String(error.to_string()));
        Self {
            status: Status::Error,
            fields,
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.status.exit_code()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// The report as a JSON object with `status` first.
    pub fn to_value(&self) -> Value {
        let mut object = Map::new();
        object.insert("status".to_string(), Value::String(self.status.to_string()));
        for (key, value) in &self.fields {
            object.insert(key.clone(), value.clone());
        }
        Value::Object(object)
    }

    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }
}
