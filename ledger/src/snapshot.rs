//! Serialized ledger state and its fail-soft decoding.

use std::collections::VecDeque;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::balance::Balances;
use crate::history::HistoryRecord;

/// Everything persisted between sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerSnapshot {
    pub balances: Balances,
    /// Newest first.
    pub history: VecDeque<HistoryRecord>,
    pub user_name: String,
}

/// Part of a stored blob that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorruptField {
    /// The blob is not a JSON object; every field fell back.
    Document(String),
    Balances(String),
    History(String),
    UserName(String),
}

impl CorruptField {
    pub fn field_name(&self) -> &'static str {
        match self {
            CorruptField::Document(_) => "document",
            CorruptField::Balances(_) => "balances",
            CorruptField::History(_) => "history",
            CorruptField::UserName(_) => "userName",
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            CorruptField::Document(r)
            | CorruptField::Balances(r)
            | CorruptField::History(r)
            | CorruptField::UserName(r) => r,
        }
    }
}

impl fmt::Display for CorruptField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field_name(), self.reason())
    }
}

/// Outcome of loading a stored blob.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Fields replaced by their empty default.
    pub corrupt: Vec<CorruptField>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.corrupt.is_empty()
    }
}

impl LedgerSnapshot {
    /// Encode as the JSON blob handed to storage.
    pub fn encode(&self) -> String {
        // Only maps with string keys, sequences and scalars; cannot fail.
        serde_json::to_string(self).unwrap_or_else(|_| String::from("{}"))
    }

    /// Decode a stored blob, field by field.
    ///
    /// Never fails. A field that is missing or `null` takes its default
    /// silently; a field that is present but malformed takes its default and
    /// is listed in the report.
    pub fn decode(blob: &str) -> (Self, LoadReport) {
        let mut report = LoadReport::default();

        let object = match serde_json::from_str::<Value>(blob) {
            Ok(Value::Object(object)) => object,
            Ok(other) => {
                report.corrupt.push(CorruptField::Document(format!(
                    "expected an object, found {}",
                    json_kind(&other)
                )));
                return (Self::default(), report);
            }
            Err(e) => {
                report.corrupt.push(CorruptField::Document(e.to_string()));
                return (Self::default(), report);
            }
        };

        let balances = decode_field::<Balances>(&object, "balances")
            .and_then(|balances| match balances.first_negative() {
                Some((code, amount)) => Err(format!("negative balance {} {}", amount, code)),
                None => Ok(balances),
            })
            .unwrap_or_else(|reason| {
                report.corrupt.push(CorruptField::Balances(reason));
                Balances::default()
            });

        let history = decode_history(&object, &mut report);

        let user_name = decode_field::<String>(&object, "userName").unwrap_or_else(|reason| {
            report.corrupt.push(CorruptField::UserName(reason));
            String::new()
        });

        (
            Self {
                balances,
                history,
                user_name,
            },
            report,
        )
    }
}

fn decode_field<T>(object: &Map<String, Value>, key: &str) -> Result<T, String>
where
    T: DeserializeOwned + Default,
{
    match object.get(key) {
        None | Some(Value::Null) => Ok(T::default()),
        Some(value) => T::deserialize(value).map_err(|e| e.to_string()),
    }
}

/// Decode history record by record. Malformed records are dropped and
/// reported; the valid ones keep their order.
fn decode_history(
    object: &Map<String, Value>,
    report: &mut LoadReport,
) -> VecDeque<HistoryRecord> {
    let items = match object.get("history") {
        None | Some(Value::Null) => return VecDeque::new(),
        Some(Value::Array(items)) => items,
        Some(other) => {
            report.corrupt.push(CorruptField::History(format!(
                "expected an array, found {}",
                json_kind(other)
            )));
            return VecDeque::new();
        }
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match HistoryRecord::deserialize(item) {
            Ok(record) => Some(record),
            Err(e) => {
                report
                    .corrupt
                    .push(CorruptField::History(format!("record {}: {}", index, e)));
                None
            }
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
