//! Declared-event instances.
//!
//! `GetEventInstances` answers with a topic *tree*: nested elements whose
//! path spells out the topic and whose leaves carry an `@topic` marker. This
//! module flattens that tree into `(topic, leaf)` records so the standard
//! collection machinery can hold one [`EventInstance`] per declared topic.

use serde_json::Value;

use crate::api::item::{ApiItem, RawPayload};
use crate::error::ResponseError;

/// Capability identifier for the event-instances endpoint.
pub const API_ID: &str = "event-instances";

const TOPIC_SET_PATH: [&str; 4] = ["Envelope", "Body", "GetEventInstancesResponse", "TopicSet"];

/// One declared event topic on the device.
#[derive(Debug, Clone, PartialEq)]
pub struct EventInstance {
    topic: String,
    is_available: bool,
    is_application_data: bool,
    name: String,
}

impl EventInstance {
    /// The slash-joined topic path, in the short `onvif:`/`axis:` scheme.
    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// True iff the device marks the topic as usable (`@topic="true"`).
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.is_available
    }

    /// True for internal application-data topics not meant for event rules.
    #[must_use]
    pub const fn is_application_data(&self) -> bool {
        self.is_application_data
    }

    /// Human-readable topic name, `""` when the device supplies none.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl ApiItem for EventInstance {
    fn decode(id: &str, raw: &Value) -> Result<Self, ResponseError> {
        Ok(Self {
            topic: id.to_string(),
            is_available: attribute(raw, "@topic") == "true",
            is_application_data: attribute(raw, "@isApplicationData") == "true",
            name: attribute(raw, "@NiceName").to_string(),
        })
    }

    fn id(&self) -> &str {
        &self.topic
    }
}

/// Flattens a parsed `GetEventInstances` document into a raw payload keyed
/// by topic path.
///
/// The walk is iterative over an explicit stack: `@`-attribute keys are
/// skipped during descent, and a node carrying the `@topic` marker ends its
/// branch — its children are not visited, and the slash-joined path down to
/// it becomes the record id. Records come back sorted by topic path; a
/// document without a topic set yields an empty payload.
#[must_use]
pub fn parse_event_instances(doc: &Value) -> RawPayload {
    let Some(topic_set) = walk_local(doc, &TOPIC_SET_PATH) else {
        return Vec::new();
    };

    let mut payload = Vec::new();
    let mut stack: Vec<(String, &Value)> = Vec::new();
    push_children(&mut stack, String::new(), topic_set);

    while let Some((path, node)) = stack.pop() {
        if node.get("@topic").is_some() {
            payload.push((normalize_topic(&path), node.clone()));
            continue;
        }
        push_children(&mut stack, path, node);
    }

    payload.sort_by(|(a, _), (b, _)| a.cmp(b));
    payload
}

fn push_children<'a>(stack: &mut Vec<(String, &'a Value)>, path: String, node: &'a Value) {
    let Value::Object(map) = node else {
        return;
    };
    for (key, child) in map {
        if key.starts_with('@') || key == "#text" {
            continue;
        }
        let child_path = if path.is_empty() {
            key.clone()
        } else {
            format!("{path}/{key}")
        };
        match child {
            Value::Array(entries) => {
                for entry in entries {
                    stack.push((child_path.clone(), entry));
                }
            }
            _ => stack.push((child_path, child)),
        }
    }
}

/// Descends by local element name, ignoring any namespace prefix, since the
/// SOAP envelope's namespace is not one of the collapsed ones.
fn walk_local<'a>(doc: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = doc;
    for wanted in path {
        let Value::Object(map) = current else {
            return None;
        };
        current = map
            .iter()
            .find(|(key, _)| local_name(key) == *wanted)
            .map(|(_, value)| value)?;
    }
    Some(current)
}

fn local_name(key: &str) -> &str {
    key.rsplit_once(':').map_or(key, |(_, local)| local)
}

fn normalize_topic(path: &str) -> String {
    path.replace("tns1", "onvif").replace("tnsaxis", "axis")
}

fn attribute<'a>(value: &'a Value, key: &str) -> &'a str {
    value.get(key).and_then(Value::as_str).unwrap_or("")
}
