//! Read-merge-write helpers shared by every update path.
//!
//! Updates always send the full current document with the desired fields
//! overlaid, so fields the manager knows and this crate does not are
//! written back as they were read.

use crate::core::domain::error::{OvmError, OvmResult};
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::{Map, Value};

/// A representation read for update.
///
/// `record` is the typed view used for decisions; `fields` holds every
/// field exactly as the manager sent it, explicit nulls included, and is
/// what gets written back.
#[derive(Debug, Clone, PartialEq)]
pub struct Document<T> {
    pub record: T,
    pub fields: Map<String, Value>,
}

impl<T: DeserializeOwned> Document<T> {
    pub fn from_fields(fields: Map<String, Value>) -> Result<Self, serde_json::Error> {
        let record = serde_json::from_value(Value::Object(fields.clone()))?;
        Ok(Self { record, fields })
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Document<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let fields = Map::deserialize(deserializer)?;
        Self::from_fields(fields).map_err(serde::de::Error::custom)
    }
}

/// Serializes a representation or desired state into a JSON object.
pub fn to_document<T: Serialize>(value: &T) -> OvmResult<Map<String, Value>> {
    match serde_json::to_value(value) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(other) => Err(OvmError::UnexpectedResponse(format!(
            "expected a JSON object, got {}",
            other
        ))),
        Err(e) => Err(OvmError::UnexpectedResponse(format!(
            "failed to serialize document: {}",
            e
        ))),
    }
}

/// Overlays `desired` onto `current` and returns the keys whose value changed.
///
/// Keys absent from `desired` are left untouched.
pub fn overlay(current: &mut Map<String, Value>, desired: &Map<String, Value>) -> Vec<String> {
    let mut modified = Vec::new();
    for (key, value) in desired {
        if current.get(key) != Some(value) {
            current.insert(key.clone(), value.clone());
            modified.push(key.clone());
        }
    }
    modified
}
