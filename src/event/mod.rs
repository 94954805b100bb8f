//! Event decoding.
//!
//! Devices report state changes through two payload shapes: an
//! already-flattened key/value mapping (from the RTSP/WebSocket collaborator)
//! and a raw metadata-stream XML blob. Both normalize into the same [`Event`]
//! record here. Decoding is total wherever the vendor format is merely
//! inconsistent; only syntactically broken XML is an error.

/// Declared-event topic-tree walking.
pub mod instances;
/// Metadata-stream XML parsing.
pub mod stream;
/// Known topics and active values.
pub mod topic;

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::error::ResponseError;

pub use instances::EventInstance;
pub use topic::EventTopic;

/// Source index marking a device-wide, non-channel-specific event.
pub const ANY_SOURCE: &str = "ANY";

/// Raw source index the device uses for device-wide events.
const DEVICE_WIDE_SOURCE_IDX: &str = "-1";

/// Mapping key for the property operation.
pub const KEY_OPERATION: &str = "operation";
/// Mapping key for the topic string.
pub const KEY_TOPIC: &str = "topic";
/// Mapping key for the source name.
pub const KEY_SOURCE: &str = "source";
/// Mapping key for the source index.
pub const KEY_SOURCE_IDX: &str = "source_idx";
/// Mapping key for the data type name.
pub const KEY_TYPE: &str = "type";
/// Mapping key for the data value.
pub const KEY_VALUE: &str = "value";

/// What a notification says happened to the property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EventOperation {
    /// First report of the property's state.
    Initialized,
    /// The property changed.
    Changed,
    /// The property was removed.
    Deleted,
    /// Missing or unrecognized operation string.
    #[default]
    Unknown,
}

impl EventOperation {
    /// Parses the vendor operation string; unrecognized input yields
    /// [`EventOperation::Unknown`], never an error.
    #[must_use]
    pub fn parse(operation: &str) -> Self {
        match operation {
            "Initialized" => Self::Initialized,
            "Changed" => Self::Changed,
            "Deleted" => Self::Deleted,
            _ => Self::Unknown,
        }
    }
}

/// One normalized device notification.
///
/// Constructed once per decode and immutable thereafter; equality is
/// structural.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// The flat originating mapping, verbatim, for caller introspection.
    pub data: HashMap<String, String>,
    /// Normalized source index; [`ANY_SOURCE`] for device-wide events.
    pub id: String,
    /// True iff the extracted value equals the topic's active value.
    pub is_tripped: bool,
    /// What happened to the property.
    pub operation: EventOperation,
    /// Source name (e.g. `"port"`), `""` when absent.
    pub source: String,
    /// Raw extracted value.
    pub state: String,
    /// Notification timestamp from the metadata stream; `None` on the
    /// mapping path.
    pub timestamp: Option<DateTime<Utc>>,
    /// Full normalized topic string.
    pub topic: String,
    /// The known topic this event belongs to.
    pub topic_base: EventTopic,
}

impl Event {
    /// Decodes an already-flattened notification mapping.
    ///
    /// Total: missing or unrecognized fields degrade to `Unknown`/empty
    /// defaults, never an error.
    ///
    /// When the topic matches no known constant it is split on its last `/`
    /// and the left part retried as the topic base; the right part becomes
    /// the source index when none was supplied explicitly. This recovers
    /// per-channel topics that embed their index as a trailing path segment.
    #[must_use]
    pub fn from_mapping(data: HashMap<String, String>) -> Self {
        let field = |key: &str| data.get(key).cloned().unwrap_or_default();

        let operation = EventOperation::parse(&field(KEY_OPERATION));
        let topic = field(KEY_TOPIC);
        let source = field(KEY_SOURCE);
        let mut source_idx = field(KEY_SOURCE_IDX);
        let value = field(KEY_VALUE);

        let mut topic_base = EventTopic::parse(&topic);
        if topic_base == EventTopic::Unknown {
            if let Some((base, index)) = topic.rsplit_once('/') {
                topic_base = EventTopic::parse(base);
                if source_idx.is_empty() {
                    source_idx = index.to_string();
                }
            }
        }

        let id = if source_idx == DEVICE_WIDE_SOURCE_IDX {
            ANY_SOURCE.to_string()
        } else {
            source_idx
        };
        let is_tripped = value == topic_base.active_value();

        Self {
            data,
            id,
            is_tripped,
            operation,
            source,
            state: value,
            timestamp: None,
            topic,
            topic_base,
        }
    }

    /// Decodes a raw metadata-stream notification body.
    ///
    /// A body without the metadata-stream root element decodes to an
    /// all-default event; missing nested keys degrade to empty strings. Only
    /// syntactically broken XML fails.
    ///
    /// # Errors
    ///
    /// Fails with [`ResponseError::MalformedXml`] on unparseable input.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ResponseError> {
        let doc = stream::xml_to_value(bytes)?;
        let Some(metadata) = doc.get("MetadataStream") else {
            return Ok(Self::from_mapping(HashMap::new()));
        };

        let notification = stream::walk(metadata, &["Event", "NotificationMessage"]);
        let topic = stream::text(stream::walk(notification, &["Topic"]))
            .replace("tns1", "onvif")
            .replace("tnsaxis", "axis");

        let message = stream::walk(notification, &["Message", "Message"]);
        let operation = stream::text(stream::walk(message, &["@PropertyOperation"]));
        let timestamp = stream::text(stream::walk(message, &["@UtcTime"]));
        let (source, source_idx) = stream::simple_item(stream::walk(message, &["Source"]));
        let (data_type, value) = stream::simple_item(stream::walk(message, &["Data"]));

        let mut fields = HashMap::new();
        fields.insert(KEY_OPERATION.to_string(), operation.to_string());
        fields.insert(KEY_TOPIC.to_string(), topic);
        fields.insert(KEY_SOURCE.to_string(), source);
        fields.insert(KEY_SOURCE_IDX.to_string(), source_idx);
        fields.insert(KEY_TYPE.to_string(), data_type);
        fields.insert(KEY_VALUE.to_string(), value);

        let mut event = Self::from_mapping(fields);
        event.timestamp = DateTime::parse_from_rfc3339(timestamp)
            .ok()
            .map(|dt| dt.with_timezone(&Utc));
        Ok(event)
    }
}
