//! Light control items.
//!
//! Lights come from the light-control endpoint's `getLightInformation`
//! answer, one JSON object per light. `lightID` is the record's identity and
//! therefore required; everything else defaults.

use serde_json::Value;

use crate::api::item::ApiItem;
use crate::error::ResponseError;

/// Capability identifier for the light-control endpoint.
pub const API_ID: &str = "light-control";

/// One controllable light (IR illuminator, white LED, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    light_id: String,
    light_type: String,
    enabled: bool,
    light_state: bool,
    synchronize_day_night_mode: bool,
}

impl Light {
    /// The device's light identifier (e.g. `"led0"`).
    #[must_use]
    pub fn light_id(&self) -> &str {
        &self.light_id
    }

    /// Kind of light, as reported (e.g. `"IR"`).
    #[must_use]
    pub fn light_type(&self) -> &str {
        &self.light_type
    }

    /// True iff the light may be used at all.
    #[must_use]
    pub const fn enabled(&self) -> bool {
        self.enabled
    }

    /// True iff the light is currently lit.
    #[must_use]
    pub const fn light_state(&self) -> bool {
        self.light_state
    }

    /// True iff the light follows the day/night mode automatically.
    #[must_use]
    pub const fn synchronize_day_night_mode(&self) -> bool {
        self.synchronize_day_night_mode
    }
}

fn bool_field(raw: &Value, key: &str) -> bool {
    raw.get(key).and_then(Value::as_bool).unwrap_or(false)
}

impl ApiItem for Light {
    fn decode(_id: &str, raw: &Value) -> Result<Self, ResponseError> {
        let light_id = raw
            .get("lightID")
            .and_then(Value::as_str)
            .ok_or_else(|| ResponseError::missing_key("lightID"))?
            .to_string();

        Ok(Self {
            light_id,
            light_type: raw
                .get("lightType")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string(),
            enabled: bool_field(raw, "enabled"),
            light_state: bool_field(raw, "lightState"),
            synchronize_day_night_mode: bool_field(raw, "synchronizeDayNightMode"),
        })
    }

    fn id(&self) -> &str {
        &self.light_id
    }
}
