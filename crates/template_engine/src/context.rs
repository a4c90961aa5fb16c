//! Binding contexts that template names resolve against

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

use crate::error::{Result, TemplateError};
use crate::value::{Record, Value};

/// Something template directives can resolve names against.
///
/// The top-level [`Context`] and a loop item's [`Record`] both implement it.
/// Lookups never fall back to an enclosing scope.
pub trait Scope {
    /// Scalar value bound to `name`
    fn value(&self, name: &str) -> Option<&Value>;

    /// List bound to `name`, used by `{{#each}}`
    fn list(&self, name: &str) -> Option<&[Record]> {
        let _ = name;
        None
    }

    /// Whether `{{#if name}}` includes its body
    fn is_truthy(&self, name: &str) -> bool {
        self.value(name).is_some_and(Value::is_truthy)
    }
}

impl Scope for Record {
    fn value(&self, name: &str) -> Option<&Value> {
        self.get(name)
    }
}

/// Document-wide binding context: scalar fields plus named lists of records.
///
/// A name is bound to either a field or a list; binding one replaces the other.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Context {
    fields: HashMap<String, Value>,
    lists: HashMap<String, Vec<Record>>,
}

impl Context {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a scalar field
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        self.lists.remove(&name);
        self.fields.insert(name, value.into());
    }

    /// Bind a list of records
    pub fn insert_list(&mut self, name: impl Into<String>, items: Vec<Record>) {
        let name = name.into();
        self.fields.remove(&name);
        self.lists.insert(name, items);
    }

    /// Builder form of [`Context::insert`]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Builder form of [`Context::insert_list`]
    pub fn with_list(mut self, name: impl Into<String>, items: Vec<Record>) -> Self {
        self.insert_list(name, items);
        self
    }

    /// Get a scalar field
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Get a list
    pub fn get_list(&self, name: &str) -> Option<&[Record]> {
        self.lists.get(name).map(Vec::as_slice)
    }

    /// Number of bound names
    pub fn len(&self) -> usize {
        self.fields.len() + self.lists.len()
    }

    /// Check if nothing is bound
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.lists.is_empty()
    }

    /// All bound names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .fields
            .keys()
            .chain(self.lists.keys())
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names
    }

    /// Parse a context from a JSON document string
    pub fn from_json_str(data: &str) -> Result<Self> {
        let json: JsonValue = serde_json::from_str(data)?;
        Self::from_json(&json)
    }

    /// Build a context from a JSON object.
    ///
    /// Scalars become fields and arrays of flat objects become lists.
    /// Nested objects, and arrays or objects inside list items, are rejected.
    pub fn from_json(json: &JsonValue) -> Result<Self> {
        let object = match json {
            JsonValue::Object(map) => map,
            other => return Err(TemplateError::NotAnObject(json_kind(other))),
        };

        let mut context = Context::new();
        for (key, value) in object {
            match value {
                JsonValue::Array(items) => {
                    let records = items
                        .iter()
                        .enumerate()
                        .map(|(index, item)| list_item_to_record(key, index, item))
                        .collect::<Result<Vec<_>>>()?;
                    context.insert_list(key.clone(), records);
                }
                JsonValue::Object(_) => {
                    return Err(TemplateError::UnsupportedValue {
                        field: key.clone(),
                        kind: "object",
                    });
                }
                scalar => context.insert(key.clone(), scalar_to_value(scalar)),
            }
        }
        Ok(context)
    }
}

impl Scope for Context {
    fn value(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    fn list(&self, name: &str) -> Option<&[Record]> {
        self.get_list(name)
    }

    fn is_truthy(&self, name: &str) -> bool {
        match self.lists.get(name) {
            Some(items) => !items.is_empty(),
            None => self.fields.get(name).is_some_and(Value::is_truthy),
        }
    }
}

fn list_item_to_record(list: &str, index: usize, item: &JsonValue) -> Result<Record> {
    let object: &Map<String, JsonValue> = match item {
        JsonValue::Object(map) => map,
        other => {
            return Err(TemplateError::InvalidListItem {
                list: list.to_string(),
                index,
                kind: json_kind(other),
            })
        }
    };

    let mut record = Record::with_capacity(object.len());
    for (field, value) in object {
        if matches!(value, JsonValue::Array(_) | JsonValue::Object(_)) {
            return Err(TemplateError::NestedValue {
                list: list.to_string(),
                index,
                field: field.clone(),
            });
        }
        record.insert(field.clone(), scalar_to_value(value));
    }
    Ok(record)
}

fn scalar_to_value(json: &JsonValue) -> Value {
    match json {
        JsonValue::String(s) => Value::Text(s.clone()),
        JsonValue::Number(n) => n.as_f64().map(Value::Number).unwrap_or(Value::Null),
        JsonValue::Bool(b) => Value::Boolean(*b),
        _ => Value::Null,
    }
}

fn json_kind(json: &JsonValue) -> &'static str {
    match json {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
