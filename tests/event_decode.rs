//! End-to-end event decoding, mapping and metadata-stream paths.

use std::collections::HashMap;

use chrono::{TimeZone, Utc};

use vapix::event::{KEY_OPERATION, KEY_SOURCE, KEY_SOURCE_IDX, KEY_TOPIC, KEY_VALUE};
use vapix::{Event, EventOperation, EventTopic, ResponseError, ANY_SOURCE};

fn mapping(entries: &[(&str, &str)]) -> HashMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

/// A real-world shaped metadata-stream notification for a digital input.
const PORT_NOTIFICATION: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
<tt:MetadataStream xmlns:tt="http://www.onvif.org/ver10/schema">
  <tt:Event>
    <wsnt:NotificationMessage xmlns:tns1="http://www.onvif.org/ver10/topics"
        xmlns:tnsaxis="http://www.axis.com/2009/event/topics"
        xmlns:wsnt="http://docs.oasis-open.org/wsn/b-2">
      <wsnt:Topic Dialect="http://docs.oasis-open.org/wsn/t-1/TopicExpression/Simple">tns1:Device/tnsaxis:IO/Port</wsnt:Topic>
      <wsnt:Message>
        <tt:Message UtcTime="2024-03-01T09:26:33.529217Z" PropertyOperation="Changed">
          <tt:Source>
            <tt:SimpleItem Name="port" Value="1"/>
          </tt:Source>
          <tt:Data>
            <tt:SimpleItem Name="state" Value="1"/>
          </tt:Data>
        </tt:Message>
      </wsnt:Message>
    </wsnt:NotificationMessage>
  </tt:Event>
</tt:MetadataStream>"#;

/// A source block with the vendor's list shape: two SimpleItem siblings.
const LIST_SOURCE_NOTIFICATION: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
<tt:MetadataStream xmlns:tt="http://www.onvif.org/ver10/schema">
  <tt:Event>
    <wsnt:NotificationMessage xmlns:wsnt="http://docs.oasis-open.org/wsn/b-2">
      <wsnt:Topic>tns1:Device/tnsaxis:Sensor/PIR</wsnt:Topic>
      <wsnt:Message>
        <tt:Message UtcTime="2024-03-01T10:00:00Z" PropertyOperation="Initialized">
          <tt:Source>
            <tt:SimpleItem Name="sensor" Value="-1"/>
            <tt:SimpleItem Name="extra" Value="9"/>
          </tt:Source>
          <tt:Data>
            <tt:SimpleItem Name="state" Value="0"/>
          </tt:Data>
        </tt:Message>
      </wsnt:Message>
    </wsnt:NotificationMessage>
  </tt:Event>
</tt:MetadataStream>"#;

#[test]
fn port_mapping_decodes_to_a_tripped_port_event() {
    let event = Event::from_mapping(mapping(&[
        (KEY_OPERATION, "Changed"),
        (KEY_TOPIC, "onvif:Device/axis:IO/Port"),
        (KEY_SOURCE, "port"),
        (KEY_SOURCE_IDX, "1"),
        (KEY_VALUE, "1"),
    ]));

    assert_eq!(event.operation, EventOperation::Changed);
    assert_eq!(event.topic_base, EventTopic::PortInput);
    assert_eq!(event.id, "1");
    assert!(event.is_tripped);
}

#[test]
fn any_sentinel_for_device_wide_source() {
    let event = Event::from_mapping(mapping(&[
        (KEY_TOPIC, "onvif:Device/axis:Sensor/PIR"),
        (KEY_SOURCE_IDX, "-1"),
        (KEY_VALUE, "1"),
    ]));
    assert_eq!(event.id, ANY_SOURCE);
}

#[test]
fn trailing_segment_fallback_resolves_vmd_profiles() {
    let event = Event::from_mapping(mapping(&[
        (KEY_TOPIC, "axis:CameraApplicationPlatform/VMD/Camera1Profile2"),
        (KEY_VALUE, "1"),
    ]));
    assert_eq!(event.topic_base, EventTopic::MotionDetection4);
    assert_eq!(event.id, "Camera1Profile2");
}

#[test]
fn light_status_active_value_override() {
    let on = Event::from_mapping(mapping(&[
        (KEY_TOPIC, "onvif:Device/axis:Light/Status"),
        (KEY_VALUE, "ON"),
    ]));
    assert!(on.is_tripped);

    let off = Event::from_mapping(mapping(&[
        (KEY_TOPIC, "onvif:Device/axis:Light/Status"),
        (KEY_VALUE, "OFF"),
    ]));
    assert!(!off.is_tripped);

    // The default "1" does not trip a light-status topic.
    let one = Event::from_mapping(mapping(&[
        (KEY_TOPIC, "onvif:Device/axis:Light/Status"),
        (KEY_VALUE, "1"),
    ]));
    assert!(!one.is_tripped);
}

#[test]
fn metadata_stream_notification_decodes() {
    let event = Event::from_bytes(PORT_NOTIFICATION).unwrap();

    assert_eq!(event.operation, EventOperation::Changed);
    assert_eq!(event.topic, "onvif:Device/axis:IO/Port");
    assert_eq!(event.topic_base, EventTopic::PortInput);
    assert_eq!(event.source, "port");
    assert_eq!(event.id, "1");
    assert_eq!(event.state, "1");
    assert!(event.is_tripped);

    let expected = Utc.with_ymd_and_hms(2024, 3, 1, 9, 26, 33).unwrap()
        + chrono::Duration::microseconds(529_217);
    assert_eq!(event.timestamp, Some(expected));

    // The originating mapping is retained verbatim.
    assert_eq!(event.data.get(KEY_TOPIC).unwrap(), "onvif:Device/axis:IO/Port");
    assert_eq!(event.data.get(KEY_VALUE).unwrap(), "1");
}

#[test]
fn list_shaped_source_block_takes_the_first_item() {
    let event = Event::from_bytes(LIST_SOURCE_NOTIFICATION).unwrap();

    assert_eq!(event.operation, EventOperation::Initialized);
    assert_eq!(event.topic_base, EventTopic::Pir);
    assert_eq!(event.source, "sensor");
    assert_eq!(event.id, ANY_SOURCE);
    assert_eq!(event.state, "0");
    assert!(!event.is_tripped);
}

#[test]
fn malformed_xml_fails_with_a_response_error() {
    let err = Event::from_bytes(b"definitely not xml").unwrap_err();
    assert!(matches!(err, ResponseError::MalformedXml { .. }));

    let err = Event::from_bytes(b"<tt:MetadataStream><unclosed>").unwrap_err();
    assert!(matches!(err, ResponseError::MalformedXml { .. }));
}

#[test]
fn stream_without_metadata_root_decodes_to_a_default_event() {
    let event = Event::from_bytes(b"<Heartbeat/>").unwrap();

    assert_eq!(event.operation, EventOperation::Unknown);
    assert_eq!(event.topic_base, EventTopic::Unknown);
    assert_eq!(event.topic, "");
    assert_eq!(event.id, "");
    assert!(!event.is_tripped);
    assert!(event.timestamp.is_none());
}

#[test]
fn stream_with_empty_event_section_degrades_gracefully() {
    let event = Event::from_bytes(
        br#"<tt:MetadataStream xmlns:tt="http://www.onvif.org/ver10/schema"><tt:Event/></tt:MetadataStream>"#,
    )
    .unwrap();

    assert_eq!(event.operation, EventOperation::Unknown);
    assert_eq!(event.state, "");
    assert_eq!(event.source, "");
}
