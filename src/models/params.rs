//! Request parameters
//!
//! Key/value parameters sent as a query string, a JSON body or multipart form fields

use crate::utils::error::{SparkError, SparkResult};
use serde_json::{Map, Value};
use std::path::Path;

/// Binary file content sent as a multipart file field
#[derive(Clone, PartialEq, Eq)]
pub struct Attachment {
    /// File name reported to the service
    pub name: String,
    /// Raw file content
    pub content: Vec<u8>,
}

impl std::fmt::Debug for Attachment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attachment")
            .field("name", &self.name)
            .field("content", &format_args!("<{} bytes>", self.content.len()))
            .finish()
    }
}

impl Attachment {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Read a local file into memory.
    ///
    /// The file handle is released before this returns, whatever the outcome.
    pub async fn from_path(path: impl AsRef<Path>) -> SparkResult<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("file")
            .to_string();
        Ok(Self { name, content })
    }
}

/// A single parameter value
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Integer(i64),
    Bool(bool),
    /// Sent as a JSON array, or comma separated in a query string
    List(Vec<String>),
    /// Arbitrary JSON passed through untouched
    Json(Value),
    /// Binary file, only valid in multipart requests
    File(Attachment),
}

impl ParamValue {
    /// Textual form used in query strings and plain multipart fields
    pub fn to_text(&self) -> String {
        match self {
            ParamValue::Text(s) => s.clone(),
            ParamValue::Integer(i) => i.to_string(),
            ParamValue::Bool(b) => b.to_string(),
            ParamValue::List(items) => items.join(","),
            ParamValue::Json(Value::String(s)) => s.clone(),
            ParamValue::Json(v) => v.to_string(),
            ParamValue::File(a) => a.name.clone(),
        }
    }

    /// JSON form used in request bodies, `None` for files
    pub fn to_json(&self) -> Option<Value> {
        match self {
            ParamValue::Text(s) => Some(Value::String(s.clone())),
            ParamValue::Integer(i) => Some(Value::from(*i)),
            ParamValue::Bool(b) => Some(Value::Bool(*b)),
            ParamValue::List(items) => Some(Value::from(items.clone())),
            ParamValue::Json(v) => Some(v.clone()),
            ParamValue::File(_) => None,
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        ParamValue::Text(value.clone())
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Integer(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Integer(i64::from(value))
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(value: Vec<String>) -> Self {
        ParamValue::List(value)
    }
}

impl From<Value> for ParamValue {
    fn from(value: Value) -> Self {
        ParamValue::Json(value)
    }
}

impl From<Attachment> for ParamValue {
    fn from(value: Attachment) -> Self {
        ParamValue::File(value)
    }
}

/// Ordered parameter mapping.
///
/// Keys are unique; inserting an existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    entries: Vec<(String, ParamValue)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a parameter
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Insert a parameter only when a value is present
    pub fn insert_opt<V: Into<ParamValue>>(&mut self, key: impl Into<String>, value: Option<V>) {
        if let Some(value) = value {
            self.insert(key, value);
        }
    }

    /// Builder style [`Params::insert`]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Whether any value is a binary file
    pub fn has_attachment(&self) -> bool {
        self.entries.iter().any(|(_, v)| matches!(v, ParamValue::File(_)))
    }

    /// Render as a JSON object body.
    ///
    /// Fails when a binary file is present, those can only be sent as multipart.
    pub fn to_json(&self) -> SparkResult<Value> {
        let mut map = Map::with_capacity(self.entries.len());
        for (key, value) in &self.entries {
            let json = value.to_json().ok_or_else(|| {
                SparkError::Validation(format!("parameter '{}' holds a file and needs a multipart request", key))
            })?;
            map.insert(key.clone(), json);
        }
        Ok(Value::Object(map))
    }
}

impl<K, V> FromIterator<(K, V)> for Params
where
    K: Into<String>,
    V: Into<ParamValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.insert(k, v);
        }
        params
    }
}
