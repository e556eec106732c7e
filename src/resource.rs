// src/resource.rs

//! Snapshot model: resources, their identity, and change notifications.

use std::fmt;

use serde_json::{Map, Value};

use crate::errors::{DriftwatchError, Result};
use crate::types::EventType;

/// Resource type identifier (`apiVersion` + `kind`).
///
/// Displayed like `apps/v1, Kind=Deployment`. This is also the unit the
/// runtime uses to group notifications into per-kind workers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceType {
    pub api_version: String,
    pub kind: String,
}

impl ResourceType {
    pub fn new(api_version: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            api_version: api_version.into(),
            kind: kind.into(),
        }
    }

    /// Read the type fields from a top-level object.
    pub fn from_object(object: &Map<String, Value>) -> Self {
        Self::new(str_field(object, "apiVersion"), str_field(object, "kind"))
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, Kind={}", self.api_version, self.kind)
    }
}

/// Stable identity of one logical entity, used as the cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectKey {
    pub resource_type: ResourceType,
    pub namespace: String,
    pub name: String,
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.resource_type, self.namespace, self.name)
    }
}

/// A structured snapshot of one entity.
///
/// The top-level value is always an object. Cloning performs a deep copy.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    object: Map<String, Value>,
}

impl Resource {
    /// Interpret `value` as a snapshot; anything but an object is rejected.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(object) => Ok(Self { object }),
            other => Err(DriftwatchError::MalformedNotification(format!(
                "expected an object, got {}",
                value_type_name(&other)
            ))),
        }
    }

    pub fn object(&self) -> &Map<String, Value> {
        &self.object
    }

    pub fn object_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.object
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.object)
    }

    pub fn api_version(&self) -> &str {
        str_field(&self.object, "apiVersion")
    }

    pub fn kind(&self) -> &str {
        str_field(&self.object, "kind")
    }

    pub fn name(&self) -> &str {
        self.metadata_str("name")
    }

    pub fn namespace(&self) -> &str {
        self.metadata_str("namespace")
    }

    pub fn resource_version(&self) -> &str {
        self.metadata_str("resourceVersion")
    }

    /// `metadata.generation`, or 0 when unset.
    pub fn generation(&self) -> i64 {
        self.metadata()
            .and_then(|meta| meta.get("generation"))
            .and_then(Value::as_i64)
            .unwrap_or(0)
    }

    pub fn resource_type(&self) -> ResourceType {
        ResourceType::from_object(&self.object)
    }

    pub fn key(&self) -> ObjectKey {
        ObjectKey {
            resource_type: self.resource_type(),
            namespace: self.namespace().to_string(),
            name: self.name().to_string(),
        }
    }

    /// `namespace/name` for namespaced entities, `name` otherwise.
    pub fn display_name(&self) -> String {
        match self.namespace() {
            "" => self.name().to_string(),
            ns => format!("{ns}/{}", self.name()),
        }
    }

    fn metadata(&self) -> Option<&Map<String, Value>> {
        self.object.get("metadata").and_then(Value::as_object)
    }

    fn metadata_str(&self, field: &str) -> &str {
        self.metadata()
            .map(|meta| str_field(meta, field))
            .unwrap_or("")
    }
}

impl TryFrom<Value> for Resource {
    type Error = DriftwatchError;

    fn try_from(value: Value) -> Result<Self> {
        Resource::from_value(value)
    }
}

/// One change reported by a source.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub event: EventType,
    pub payload: Value,
}

impl Notification {
    pub fn new(event: EventType, payload: Value) -> Self {
        Self { event, payload }
    }

    pub fn added(payload: Value) -> Self {
        Self::new(EventType::Added, payload)
    }

    pub fn modified(payload: Value) -> Self {
        Self::new(EventType::Modified, payload)
    }

    pub fn deleted(payload: Value) -> Self {
        Self::new(EventType::Deleted, payload)
    }

    /// Routing key for the runtime; `None` if the payload is not an object.
    pub fn resource_type(&self) -> Option<ResourceType> {
        self.payload.as_object().map(ResourceType::from_object)
    }
}

fn str_field<'a>(object: &'a Map<String, Value>, field: &str) -> &'a str {
    object.get(field).and_then(Value::as_str).unwrap_or("")
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
