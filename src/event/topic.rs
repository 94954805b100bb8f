//! Known event topics and their active-value table.
//!
//! Topics are slash-delimited hierarchical category strings in the short
//! `onvif:`/`axis:` prefix scheme. Most topics report `"1"` when tripped;
//! the exceptions live in one explicit table here rather than scattered per
//! endpoint.

use serde::{Deserialize, Serialize};

/// Value meaning "tripped" for topics without an explicit override.
pub const DEFAULT_ACTIVE_VALUE: &str = "1";

/// The event topics this library recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventTopic {
    /// Day/night vision mode of a video source.
    DayNightVision,
    /// ACAP fence guard scenario.
    FenceGuard,
    /// IR illumination / light status.
    LightStatus,
    /// ACAP loitering guard scenario.
    LoiteringGuard,
    /// ONVIF motion detection analytics.
    MotionDetection,
    /// Video motion detection 3.
    MotionDetection3,
    /// Video motion detection 4 (per-camera, per-profile).
    MotionDetection4,
    /// ACAP motion guard scenario.
    MotionGuard,
    /// ACAP object analytics scenario.
    ObjectAnalytics,
    /// Passive infrared sensor.
    Pir,
    /// Digital input port.
    PortInput,
    /// Supervised digital input port.
    PortSupervised,
    /// PTZ autotracking state.
    PtzAutotracking,
    /// PTZ movement on a channel.
    PtzMove,
    /// PTZ preset reached on a channel.
    PtzPreset,
    /// Relay output state.
    RelayStatus,
    /// Audio trigger level crossed.
    SoundTriggerLevel,
    /// A topic this library has no constant for.
    Unknown,
}

impl EventTopic {
    /// Matches a normalized topic string against the known constants.
    /// Unrecognized input yields [`EventTopic::Unknown`], never an error.
    #[must_use]
    pub fn parse(topic: &str) -> Self {
        match topic {
            "onvif:VideoSource/axis:DayNightVision" => Self::DayNightVision,
            "axis:CameraApplicationPlatform/FenceGuard" => Self::FenceGuard,
            "onvif:Device/axis:Light/Status" => Self::LightStatus,
            "axis:CameraApplicationPlatform/LoiteringGuard" => Self::LoiteringGuard,
            "onvif:VideoAnalytics/axis:MotionDetection" => Self::MotionDetection,
            "onvif:RuleEngine/axis:VMD3/vmd3_video_1" => Self::MotionDetection3,
            "axis:CameraApplicationPlatform/VMD" => Self::MotionDetection4,
            "axis:CameraApplicationPlatform/MotionGuard" => Self::MotionGuard,
            "axis:CameraApplicationPlatform/ObjectAnalytics" => Self::ObjectAnalytics,
            "onvif:Device/axis:Sensor/PIR" => Self::Pir,
            "onvif:Device/axis:IO/Port" => Self::PortInput,
            "onvif:Device/axis:IO/SupervisedPort" => Self::PortSupervised,
            "onvif:PTZController/axis:PTZ/Autotracking" => Self::PtzAutotracking,
            "onvif:PTZController/axis:Move" => Self::PtzMove,
            "onvif:PTZController/axis:PTZPresets" => Self::PtzPreset,
            "onvif:Device/Trigger/Relay" => Self::RelayStatus,
            "onvif:AudioSource/axis:TriggerLevel" => Self::SoundTriggerLevel,
            _ => Self::Unknown,
        }
    }

    /// The canonical topic string, or `""` for [`EventTopic::Unknown`].
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DayNightVision => "onvif:VideoSource/axis:DayNightVision",
            Self::FenceGuard => "axis:CameraApplicationPlatform/FenceGuard",
            Self::LightStatus => "onvif:Device/axis:Light/Status",
            Self::LoiteringGuard => "axis:CameraApplicationPlatform/LoiteringGuard",
            Self::MotionDetection => "onvif:VideoAnalytics/axis:MotionDetection",
            Self::MotionDetection3 => "onvif:RuleEngine/axis:VMD3/vmd3_video_1",
            Self::MotionDetection4 => "axis:CameraApplicationPlatform/VMD",
            Self::MotionGuard => "axis:CameraApplicationPlatform/MotionGuard",
            Self::ObjectAnalytics => "axis:CameraApplicationPlatform/ObjectAnalytics",
            Self::Pir => "onvif:Device/axis:Sensor/PIR",
            Self::PortInput => "onvif:Device/axis:IO/Port",
            Self::PortSupervised => "onvif:Device/axis:IO/SupervisedPort",
            Self::PtzAutotracking => "onvif:PTZController/axis:PTZ/Autotracking",
            Self::PtzMove => "onvif:PTZController/axis:Move",
            Self::PtzPreset => "onvif:PTZController/axis:PTZPresets",
            Self::RelayStatus => "onvif:Device/Trigger/Relay",
            Self::SoundTriggerLevel => "onvif:AudioSource/axis:TriggerLevel",
            Self::Unknown => "",
        }
    }

    /// The value meaning "tripped" for this topic.
    ///
    /// Light status reports `"ON"`/`"OFF"` and relays `"active"`/`"inactive"`
    /// instead of the usual `"1"`/`"0"`.
    #[must_use]
    pub const fn active_value(&self) -> &'static str {
        match self {
            Self::LightStatus => "ON",
            Self::RelayStatus => "active",
            _ => DEFAULT_ACTIVE_VALUE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_known_constants() {
        for topic in [
            EventTopic::DayNightVision,
            EventTopic::FenceGuard,
            EventTopic::LightStatus,
            EventTopic::MotionDetection4,
            EventTopic::Pir,
            EventTopic::PortInput,
            EventTopic::PortSupervised,
            EventTopic::PtzMove,
            EventTopic::RelayStatus,
            EventTopic::SoundTriggerLevel,
        ] {
            assert_eq!(EventTopic::parse(topic.as_str()), topic);
        }
    }

    #[test]
    fn unrecognized_topic_is_unknown() {
        assert_eq!(EventTopic::parse("onvif:Device/axis:NewThing"), EventTopic::Unknown);
        assert_eq!(EventTopic::parse(""), EventTopic::Unknown);
    }

    #[test]
    fn active_value_overrides() {
        assert_eq!(EventTopic::LightStatus.active_value(), "ON");
        assert_eq!(EventTopic::RelayStatus.active_value(), "active");
        assert_eq!(EventTopic::PortInput.active_value(), DEFAULT_ACTIVE_VALUE);
        assert_eq!(EventTopic::Unknown.active_value(), DEFAULT_ACTIVE_VALUE);
    }
}
