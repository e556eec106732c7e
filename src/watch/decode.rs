// src/watch/decode.rs

//! Turning YAML/JSON documents into notifications.

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::Result;
use crate::resource::Notification;
use crate::types::EventType;

/// Decode every document of a (possibly multi-document) YAML text.
///
/// JSON is valid YAML, so this also accepts JSON files. Empty documents
/// decode to `Value::Null` and are dropped here.
pub fn decode_yaml_documents(text: &str) -> Vec<Result<Value>> {
    serde_yaml::Deserializer::from_str(text)
        .map(|document| Value::deserialize(document).map_err(Into::into))
        .filter(|decoded| !matches!(decoded, Ok(Value::Null)))
        .collect()
}

/// Flatten list documents into their items.
///
/// Handles both bare arrays and `kind: List` style objects (anything whose
/// kind ends with `List` and which carries an `items` array), as produced by
/// `kubectl get -o yaml`.
pub fn expand_document(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        Value::Object(mut object) if is_list_object(&object) => match object.remove("items") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        other => vec![other],
    }
}

fn is_list_object(object: &serde_json::Map<String, Value>) -> bool {
    let kind_is_list = object
        .get("kind")
        .and_then(Value::as_str)
        .is_some_and(|kind| kind.ends_with("List"));

    kind_is_list && object.get("items").is_some_and(Value::is_array)
}

/// Build the notification for one decoded document.
///
/// Documents shaped like a watch event, `{"type": "ADDED", "object": {...}}`,
/// carry their own event type. Any other document is reported with
/// `default_event`. Watch events of any other type (`BOOKMARK`, `ERROR`)
/// describe no change to an entity and yield `None`.
pub fn into_notification(value: Value, default_event: EventType) -> Option<Notification> {
    let Some(event_type) = watch_event_type(&value) else {
        return Some(Notification::new(default_event, value));
    };

    let event = match event_type.parse::<EventType>() {
        Ok(event) => event,
        Err(_) => {
            if event_type.eq_ignore_ascii_case("ERROR") {
                warn!(object = %value["object"], "watch stream reported an error");
            } else {
                debug!(event_type = %event_type, "skipping watch event");
            }
            return None;
        }
    };

    let payload = match value {
        Value::Object(mut object) => object.remove("object").unwrap_or(Value::Null),
        other => other,
    };
    Some(Notification::new(event, payload))
}

/// The `type` of a watch-event envelope, or `None` for a plain document.
fn watch_event_type(value: &Value) -> Option<String> {
    let object = value.as_object()?;

    if object.contains_key("apiVersion") || object.contains_key("kind") {
        return None;
    }

    if !object.get("object").is_some_and(Value::is_object) {
        return None;
    }

    object.get("type")?.as_str().map(str::to_string)
}

/// Turn everything in one decoded document into notifications.
pub fn notifications_from_value(value: Value, default_event: EventType) -> Vec<Notification> {
    expand_document(value)
        .into_iter()
        .filter_map(|item| into_notification(item, default_event))
        .collect()
}
