//! Metadata-stream XML parsing.
//!
//! Converts a notification body into a nested [`serde_json::Value`] shaped
//! the way the rest of the decoder expects: attributes become `@`-prefixed
//! keys, element text becomes `#text`, repeated sibling elements coalesce
//! into arrays, and the two fixed ONVIF namespaces collapse to no prefix so
//! element lookups are plain local names.

use quick_xml::events::{BytesStart, Event as XmlEvent};
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;
use serde_json::{Map, Value};

use crate::error::ResponseError;

/// Namespaces collapsed to no prefix during parsing.
const COLLAPSED_NAMESPACES: [&str; 2] = [
    "http://www.onvif.org/ver10/schema",
    "http://docs.oasis-open.org/wsn/b-2",
];

const NULL: &Value = &Value::Null;

struct PendingElement {
    name: String,
    map: Map<String, Value>,
}

/// Parses a metadata-stream body into a nested document value.
///
/// # Errors
///
/// Fails with [`ResponseError::MalformedXml`] on syntactically broken input,
/// including input with no root element at all.
pub fn xml_to_value(bytes: &[u8]) -> Result<Value, ResponseError> {
    let mut reader = NsReader::from_reader(bytes);
    reader.config_mut().trim_text(true);

    // Index 0 is a sentinel holding the document root's children.
    let mut stack: Vec<PendingElement> = vec![PendingElement {
        name: String::new(),
        map: Map::new(),
    }];
    let mut buf = Vec::new();

    loop {
        let (resolution, event) = reader
            .read_resolved_event_into(&mut buf)
            .map_err(|err| ResponseError::malformed_xml(err.to_string()))?;

        match event {
            XmlEvent::Start(ref start) => {
                let element = open_element(&resolution, start)?;
                stack.push(element);
            }
            XmlEvent::Empty(ref start) => {
                let element = open_element(&resolution, start)?;
                let value = close_element(element.map);
                if let Some(parent) = stack.last_mut() {
                    insert_child(&mut parent.map, element.name, value);
                }
            }
            XmlEvent::End(_) => {
                let Some(element) = stack.pop() else {
                    return Err(ResponseError::malformed_xml("unbalanced end tag"));
                };
                let Some(parent) = stack.last_mut() else {
                    return Err(ResponseError::malformed_xml("unbalanced end tag"));
                };
                let value = close_element(element.map);
                insert_child(&mut parent.map, element.name, value);
            }
            XmlEvent::Text(ref t) => {
                let text = t
                    .unescape()
                    .map_err(|err| ResponseError::malformed_xml(err.to_string()))?;
                // Text outside any element is not part of the document tree.
                if stack.len() > 1 {
                    if let Some(element) = stack.last_mut() {
                        append_text(element, &text);
                    }
                }
            }
            XmlEvent::CData(t) => {
                let text = String::from_utf8_lossy(&t.into_inner()).into_owned();
                if stack.len() > 1 {
                    if let Some(element) = stack.last_mut() {
                        append_text(element, &text);
                    }
                }
            }
            XmlEvent::Eof => break,
            _ => {}
        }

        buf.clear();
    }

    if stack.len() != 1 {
        return Err(ResponseError::malformed_xml("unexpected end of document"));
    }
    let root = stack
        .pop()
        .ok_or_else(|| ResponseError::malformed_xml("unexpected end of document"))?;
    if root.map.is_empty() {
        return Err(ResponseError::malformed_xml("no root element"));
    }
    Ok(Value::Object(root.map))
}

fn open_element(
    resolution: &ResolveResult<'_>,
    start: &BytesStart<'_>,
) -> Result<PendingElement, ResponseError> {
    let name = element_name(resolution, start);
    let mut map = Map::new();

    for attr in start.attributes() {
        let attr = attr.map_err(|err| ResponseError::malformed_xml(err.to_string()))?;
        let raw_key = attr.key.as_ref();
        if raw_key == b"xmlns" || raw_key.starts_with(b"xmlns:") {
            continue;
        }
        let key = format!(
            "@{}",
            String::from_utf8_lossy(attr.key.local_name().as_ref())
        );
        let value = attr
            .unescape_value()
            .map_err(|err| ResponseError::malformed_xml(err.to_string()))?;
        map.insert(key, Value::String(value.into_owned()));
    }

    Ok(PendingElement { name, map })
}

fn element_name(resolution: &ResolveResult<'_>, start: &BytesStart<'_>) -> String {
    if let ResolveResult::Bound(ns) = resolution {
        if COLLAPSED_NAMESPACES
            .iter()
            .any(|uri| uri.as_bytes() == ns.0)
        {
            return String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
        }
    }
    String::from_utf8_lossy(start.name().as_ref()).into_owned()
}

fn append_text(element: &mut PendingElement, text: &str) {
    if text.is_empty() {
        return;
    }
    match element.map.get_mut("#text") {
        Some(Value::String(existing)) => existing.push_str(text),
        _ => {
            element
                .map
                .insert("#text".to_string(), Value::String(text.to_string()));
        }
    }
}

fn close_element(mut map: Map<String, Value>) -> Value {
    if map.is_empty() {
        return Value::Null;
    }
    if map.len() == 1 && matches!(map.get("#text"), Some(Value::String(_))) {
        return map.remove("#text").unwrap_or(Value::Null);
    }
    Value::Object(map)
}

fn insert_child(parent: &mut Map<String, Value>, name: String, value: Value) {
    match parent.get_mut(&name) {
        Some(Value::Array(list)) => list.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            parent.insert(name, value);
        }
    }
}

/// Follows `path` through nested objects, yielding `Null` as soon as a key
/// is absent. Traversal is total: it never fails on missing keys.
pub(crate) fn walk<'a>(doc: &'a Value, path: &[&str]) -> &'a Value {
    let mut current = doc;
    for key in path {
        current = match current.get(*key) {
            Some(next) => next,
            None => return NULL,
        };
    }
    current
}

/// The text carried by a node: a bare string, an element's `#text`, or `""`.
pub(crate) fn text(value: &Value) -> &str {
    match value {
        Value::String(s) => s,
        Value::Object(map) => map.get("#text").and_then(Value::as_str).unwrap_or(""),
        _ => "",
    }
}

/// Extracts the `(@Name, @Value)` pair from a source or data block.
///
/// Single-valued blocks carry one `SimpleItem` object, multi-valued blocks a
/// list; the first entry wins in the list case.
pub(crate) fn simple_item(block: &Value) -> (String, String) {
    let item = first(walk(block, &["SimpleItem"]));
    (attribute(item, "@Name"), attribute(item, "@Value"))
}

fn first(value: &Value) -> &Value {
    if let Value::Array(list) = value {
        list.first().unwrap_or(NULL)
    } else {
        value
    }
}

fn attribute(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn nested_elements_attributes_and_text() {
        let doc = xml_to_value(
            br#"<a><b Name="x">hello</b><c/></a>"#,
        )
        .unwrap();
        assert_eq!(
            doc,
            json!({"a": {"b": {"@Name": "x", "#text": "hello"}, "c": null}})
        );
    }

    #[test]
    fn repeated_siblings_coalesce_into_an_array() {
        let doc = xml_to_value(br"<a><b>1</b><b>2</b><b>3</b></a>").unwrap();
        assert_eq!(doc, json!({"a": {"b": ["1", "2", "3"]}}));
    }

    #[test]
    fn known_namespaces_collapse_to_local_names() {
        let doc = xml_to_value(
            br#"<tt:MetadataStream xmlns:tt="http://www.onvif.org/ver10/schema" xmlns:wsnt="http://docs.oasis-open.org/wsn/b-2"><wsnt:Topic>t</wsnt:Topic></tt:MetadataStream>"#,
        )
        .unwrap();
        assert_eq!(doc, json!({"MetadataStream": {"Topic": "t"}}));
    }

    #[test]
    fn unknown_namespace_keeps_its_prefix() {
        let doc = xml_to_value(
            br#"<x:root xmlns:x="http://example.com/other"><x:leaf>v</x:leaf></x:root>"#,
        )
        .unwrap();
        assert_eq!(doc, json!({"x:root": {"x:leaf": "v"}}));
    }

    #[test]
    fn non_xml_input_is_malformed() {
        assert!(matches!(
            xml_to_value(b"this is not xml"),
            Err(ResponseError::MalformedXml { .. })
        ));
    }

    #[test]
    fn truncated_document_is_malformed() {
        assert!(matches!(
            xml_to_value(b"<a><b>unclosed"),
            Err(ResponseError::MalformedXml { .. })
        ));
    }

    #[test]
    fn mismatched_tags_are_malformed() {
        assert!(matches!(
            xml_to_value(b"<a><b></a></b>"),
            Err(ResponseError::MalformedXml { .. })
        ));
    }

    #[test]
    fn walk_is_total() {
        let doc = json!({"a": {"b": "leaf"}});
        assert_eq!(walk(&doc, &["a", "b"]).as_str(), Some("leaf"));
        assert_eq!(*walk(&doc, &["a", "missing", "deeper"]), Value::Null);
        assert_eq!(*walk(&doc, &["a", "b", "beyond-a-leaf"]), Value::Null);
    }

    #[test]
    fn simple_item_prefers_the_first_list_entry() {
        let single = json!({"SimpleItem": {"@Name": "port", "@Value": "1"}});
        assert_eq!(simple_item(&single), ("port".to_string(), "1".to_string()));

        let list = json!({"SimpleItem": [
            {"@Name": "port", "@Value": "0"},
            {"@Name": "extra", "@Value": "9"},
        ]});
        assert_eq!(simple_item(&list), ("port".to_string(), "0".to_string()));

        assert_eq!(simple_item(&Value::Null), (String::new(), String::new()));
    }
}
