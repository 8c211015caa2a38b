use crate::error::Result;
use serde::{Deserialize, Serialize};
use tideline_core::{ConnectorKind, Dataset, TimeNormalizer};

/// Scalar-only view of a timeline, as seen by the layout algorithms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutInput {
    pub periods: Vec<PeriodSpan>,
    pub events: Vec<EventPoint>,
    pub links: Vec<Link>,
}

impl LayoutInput {
    /// Normalizes every time value of `dataset`; ongoing periods end at `normalizer.now()`.
    pub fn from_dataset(dataset: &Dataset, normalizer: &dyn TimeNormalizer) -> Result<Self> {
        let mut periods = Vec::with_capacity(dataset.periods.len());
        for p in &dataset.periods {
            periods.push(PeriodSpan {
                id: p.id.clone(),
                start: normalizer.normalize(&p.start_time)?,
                end: normalizer.normalize_end(p.end_time.as_ref())?,
            });
        }

        let mut events = Vec::with_capacity(dataset.events.len());
        for e in &dataset.events {
            events.push(EventPoint {
                id: e.id.clone(),
                time: normalizer.normalize(&e.time)?,
                relates_to: e.relates_to.clone(),
            });
        }

        let links = dataset
            .connectors
            .iter()
            .map(|c| Link {
                from: c.from_id.clone(),
                to: c.to_id.clone(),
                kind: c.kind,
            })
            .collect();

        Ok(Self {
            periods,
            events,
            links,
        })
    }
}

/// Half-open interval `[start, end)` on the linear time axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSpan {
    pub id: String,
    pub start: f64,
    pub end: f64,
}

impl PeriodSpan {
    pub fn new(id: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            id: id.into(),
            start,
            end,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventPoint {
    pub id: String,
    pub time: f64,
    pub relates_to: Option<String>,
}

impl EventPoint {
    pub fn new(id: impl Into<String>, time: f64) -> Self {
        Self {
            id: id.into(),
            time,
            relates_to: None,
        }
    }

    pub fn related(id: impl Into<String>, time: f64, period_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            time,
            relates_to: Some(period_id.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub from: String,
    pub to: String,
    pub kind: ConnectorKind,
}

impl Link {
    pub fn defined(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            kind: ConnectorKind::Defined,
        }
    }

    pub fn undefined(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            kind: ConnectorKind::Undefined,
        }
    }

    pub fn is_defined(&self) -> bool {
        self.kind == ConnectorKind::Defined
    }
}
