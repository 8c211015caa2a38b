#![forbid(unsafe_code)]

//! `tideline-core` holds the timeline data model shared by the layout engine and its hosts.
//!
//! - [`model`]: periods, events, connectors and the `LaneAssignment` output record
//! - [`time`]: the time normalizer contract and the default calendar/geological normalizer
//! - [`validate`]: data-shape checks a host runs before handing a dataset to layout

pub mod error;
pub mod model;
pub mod time;
pub mod validate;

pub use error::{Error, Result};
pub use model::{Connector, ConnectorKind, Dataset, Event, ItemKind, LaneAssignment, Period};
pub use time::{CalendarNormalizer, TimeError, TimeNormalizer, TimeValue};
pub use validate::ValidationError;
