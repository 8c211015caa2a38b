//! Timeline entities and the lane assignment record produced by layout.
//!
//! The JSON shape uses camelCase keys (`startTime`, `relatesTo`, `fromId`, ...) so datasets can be
//! shared with browser-side renderers unchanged.

use crate::Result;
use crate::time::TimeValue;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub time: TimeValue,
    /// Id of the period this event is contextually tied to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relates_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<serde_json::Value>,
}

impl Event {
    pub fn new(id: impl Into<String>, time: impl Into<TimeValue>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            time: time.into(),
            relates_to: None,
            info: None,
        }
    }

    pub fn relating_to(mut self, period_id: impl Into<String>) -> Self {
        self.relates_to = Some(period_id.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Period {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub start_time: TimeValue,
    /// `None` means the period is ongoing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<TimeValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<serde_json::Value>,
}

impl Period {
    pub fn new(
        id: impl Into<String>,
        start_time: impl Into<TimeValue>,
        end_time: impl Into<TimeValue>,
    ) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            start_time: start_time.into(),
            end_time: Some(end_time.into()),
            info: None,
        }
    }

    pub fn ongoing(id: impl Into<String>, start_time: impl Into<TimeValue>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            start_time: start_time.into(),
            end_time: None,
            info: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectorKind {
    /// Strong succession/causation; participates in lane layout.
    Defined,
    /// Loose relationship; drawn but ignored by layout.
    Undefined,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connector {
    pub id: String,
    pub from_id: String,
    pub to_id: String,
    /// Required; there is no default kind.
    #[serde(rename = "type")]
    pub kind: ConnectorKind,
}

impl Connector {
    pub fn defined(
        id: impl Into<String>,
        from_id: impl Into<String>,
        to_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            from_id: from_id.into(),
            to_id: to_id.into(),
            kind: ConnectorKind::Defined,
        }
    }

    pub fn undefined(
        id: impl Into<String>,
        from_id: impl Into<String>,
        to_id: impl Into<String>,
    ) -> Self {
        Self {
            kind: ConnectorKind::Undefined,
            ..Self::defined(id, from_id, to_id)
        }
    }
}

/// A full timeline as supplied on every render call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(default)]
    pub periods: Vec<Period>,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub connectors: Vec<Connector>,
}

impl Dataset {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Period,
    Event,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaneAssignment {
    pub item_id: String,
    pub lane: usize,
    pub start_time: f64,
    pub end_time: f64,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    /// Sub-lane label for related events, overflow index for unrelated events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_lane: Option<i32>,
}

impl LaneAssignment {
    pub fn period(item_id: impl Into<String>, lane: usize, start: f64, end: f64) -> Self {
        Self {
            item_id: item_id.into(),
            lane,
            start_time: start,
            end_time: end,
            kind: ItemKind::Period,
            sub_lane: None,
        }
    }

    pub fn event(item_id: impl Into<String>, lane: usize, time: f64, sub_lane: i32) -> Self {
        Self {
            item_id: item_id.into(),
            lane,
            start_time: time,
            end_time: time,
            kind: ItemKind::Event,
            sub_lane: Some(sub_lane),
        }
    }

    pub fn is_period(&self) -> bool {
        self.kind == ItemKind::Period
    }

    pub fn is_event(&self) -> bool {
        self.kind == ItemKind::Event
    }
}
