//! Data-shape checks run before layout.
//!
//! Layout assumes unique ids, parseable times, `start <= end` and connectors that reference
//! existing periods. It never crashes on input that breaks those rules, but the output is then
//! meaningless, so hosts should call [`Dataset::validate`] first.

use crate::model::Dataset;
use crate::time::TimeNormalizer;
use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("duplicate item id: {id}")]
    DuplicateId { id: String },

    #[error("unparseable time on {item_id}: {input:?}")]
    UnparseableTime { item_id: String, input: String },

    #[error("period {id} ends before it starts ({start} > {end})")]
    InvertedInterval { id: String, start: f64, end: f64 },

    #[error("connector {connector_id} references missing period {missing}")]
    DanglingConnector {
        connector_id: String,
        missing: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ItemSlot {
    Period,
    Event,
}

impl Dataset {
    /// Returns the first data-shape problem found, checking ids, then times, then connectors.
    pub fn validate(&self, normalizer: &dyn TimeNormalizer) -> Result<(), ValidationError> {
        let mut ids: IndexMap<&str, ItemSlot> = IndexMap::new();
        let items = self
            .periods
            .iter()
            .map(|p| (p.id.as_str(), ItemSlot::Period))
            .chain(self.events.iter().map(|e| (e.id.as_str(), ItemSlot::Event)));
        for (id, slot) in items {
            if ids.insert(id, slot).is_some() {
                return Err(ValidationError::DuplicateId { id: id.to_string() });
            }
        }

        for p in &self.periods {
            let start = normalizer
                .normalize(&p.start_time)
                .map_err(|_| ValidationError::UnparseableTime {
                    item_id: p.id.clone(),
                    input: p.start_time.to_string(),
                })?;
            let end = normalizer.normalize_end(p.end_time.as_ref()).map_err(|_| {
                ValidationError::UnparseableTime {
                    item_id: p.id.clone(),
                    input: p
                        .end_time
                        .as_ref()
                        .map(ToString::to_string)
                        .unwrap_or_default(),
                }
            })?;
            if start > end {
                return Err(ValidationError::InvertedInterval {
                    id: p.id.clone(),
                    start,
                    end,
                });
            }
        }

        for e in &self.events {
            normalizer
                .normalize(&e.time)
                .map_err(|_| ValidationError::UnparseableTime {
                    item_id: e.id.clone(),
                    input: e.time.to_string(),
                })?;
            if let Some(target) = e.relates_to.as_deref() {
                if ids.get(target) != Some(&ItemSlot::Period) {
                    tracing::debug!(
                        event = %e.id,
                        relates_to = target,
                        "event relates to an unknown period; it will be laid out as unrelated"
                    );
                }
            }
        }

        for c in &self.connectors {
            for end in [&c.from_id, &c.to_id] {
                if ids.get(end.as_str()) != Some(&ItemSlot::Period) {
                    return Err(ValidationError::DanglingConnector {
                        connector_id: c.id.clone(),
                        missing: end.clone(),
                    });
                }
            }
        }

        Ok(())
    }
}
