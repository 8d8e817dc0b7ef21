//! Read-only response views
//!
//! A [`View`] pairs the typed fields of a response object with the raw JSON it
//! was decoded from. Field access goes through `Deref` to the typed data,
//! unknown keys stay reachable through [`View::get`], and equality compares the
//! raw objects.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::ops::Deref;

#[derive(Debug, Clone)]
pub struct View<T> {
    data: T,
    raw: Value,
}

impl<T: DeserializeOwned> View<T> {
    /// Decode a raw response object
    pub fn from_value(raw: Value) -> Result<Self, serde_json::Error> {
        let data = T::deserialize(&raw)?;
        Ok(Self { data, raw })
    }
}

impl<T> View<T> {
    /// Look up any key of the raw object, declared or not
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.raw.get(key)
    }

    /// Typed fields
    pub fn data(&self) -> &T {
        &self.data
    }

    /// The object exactly as the service returned it
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn into_raw(self) -> Value {
        self.raw
    }
}

impl<T> Deref for View<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.data
    }
}

impl<T> PartialEq for View<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T> PartialEq<Value> for View<T> {
    fn eq(&self, other: &Value) -> bool {
        self.raw == *other
    }
}

impl<T> fmt::Display for View<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string_pretty(&self.raw) {
            Ok(s) => f.write_str(&s),
            Err(_) => write!(f, "{}", self.raw),
        }
    }
}

impl<T> Serialize for View<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for View<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        View::from_value(raw).map_err(D::Error::custom)
    }
}

impl<T: DeserializeOwned> TryFrom<Value> for View<T> {
    type Error = serde_json::Error;

    fn try_from(raw: Value) -> Result<Self, Self::Error> {
        View::from_value(raw)
    }
}
