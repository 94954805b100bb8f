//! I/O port items.
//!
//! Ports arrive through the legacy parameter dump (`root.IOPort.I<n>.*`),
//! already flattened by the parameter collaborator into one record per port
//! with dotted keys. Every field has a device-side default, so decoding
//! never fails on a sparse record.

use serde_json::Value;

use crate::api::item::ApiItem;
use crate::error::ResponseError;

/// Capability identifier for the I/O port endpoint.
pub const API_ID: &str = "io-port";

/// Whether a port is wired as an input or an output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PortDirection {
    /// The port reads an external circuit.
    #[default]
    Input,
    /// The port drives an external circuit.
    Output,
}

impl PortDirection {
    fn parse(direction: &str) -> Self {
        if direction.eq_ignore_ascii_case("output") {
            Self::Output
        } else {
            Self::Input
        }
    }
}

/// One digital I/O port.
#[derive(Debug, Clone, PartialEq)]
pub struct Port {
    id: String,
    configurable: bool,
    direction: PortDirection,
    input_name: String,
    input_trigger: String,
    output_name: String,
    output_active: String,
}

impl Port {
    /// True iff the port's direction can be changed.
    #[must_use]
    pub const fn configurable(&self) -> bool {
        self.configurable
    }

    /// Input or output.
    #[must_use]
    pub const fn direction(&self) -> PortDirection {
        self.direction
    }

    /// User-assigned input name.
    #[must_use]
    pub fn input_name(&self) -> &str {
        &self.input_name
    }

    /// Circuit state that counts as triggered (`"closed"` or `"open"`).
    #[must_use]
    pub fn input_trigger(&self) -> &str {
        &self.input_trigger
    }

    /// User-assigned output name.
    #[must_use]
    pub fn output_name(&self) -> &str {
        &self.output_name
    }

    /// Circuit state that counts as active (`"closed"` or `"open"`).
    #[must_use]
    pub fn output_active(&self) -> &str {
        &self.output_active
    }
}

fn str_field(raw: &Value, key: &str) -> String {
    raw.get(key).and_then(Value::as_str).unwrap_or("").to_string()
}

impl ApiItem for Port {
    fn decode(id: &str, raw: &Value) -> Result<Self, ResponseError> {
        Ok(Self {
            id: id.to_string(),
            configurable: raw
                .get("Configurable")
                .and_then(Value::as_str)
                .map_or(false, |v| v.eq_ignore_ascii_case("yes")),
            direction: PortDirection::parse(&str_field(raw, "Direction")),
            input_name: str_field(raw, "Input.Name"),
            input_trigger: str_field(raw, "Input.Trig"),
            output_name: str_field(raw, "Output.Name"),
            output_active: str_field(raw, "Output.Active"),
        })
    }

    fn id(&self) -> &str {
        &self.id
    }
}
