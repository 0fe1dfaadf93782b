//! Categorical Encoder
//!
//! Ánh xạ giá trị categorical → số nguyên, học một lần lúc train.
//! Mapping theo thứ tự sắp xếp nên không phụ thuộc thứ tự dòng.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::layout::FEATURE_COUNT;
use super::vector::FeatureVector;
use crate::logic::events::Event;

/// Sorted vocabulary for one categorical column
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Vocabulary {
    codes: BTreeMap<String, u32>,
}

impl Vocabulary {
    pub fn fit<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut codes: BTreeMap<String, u32> =
            values.into_iter().map(|v| (v.to_string(), 0)).collect();
        for (code, slot) in codes.values_mut().enumerate() {
            *slot = code as u32;
        }
        Self { codes }
    }

    /// Code reserved for values never seen during fitting
    pub fn unknown_code(&self) -> u32 {
        self.codes.len() as u32
    }

    pub fn code(&self, value: &str) -> u32 {
        self.codes.get(value).copied().unwrap_or_else(|| self.unknown_code())
    }

    pub fn contains(&self, value: &str) -> bool {
        self.codes.contains_key(value)
    }
}

/// Fitted encoder for the three categorical feature columns
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CategoricalEncoder {
    pub hash_algorithms: Vocabulary,
    pub event_id: Vocabulary,
    pub protocol: Vocabulary,
}

impl CategoricalEncoder {
    pub fn fit(events: &[Event]) -> Self {
        Self {
            hash_algorithms: Vocabulary::fit(events.iter().map(|e| e.hash_algorithms.as_str())),
            event_id: Vocabulary::fit(events.iter().map(|e| e.event_id.as_str())),
            protocol: Vocabulary::fit(events.iter().map(|e| e.protocol.as_str())),
        }
    }

    /// Unscaled codes in layout order
    pub fn encode(&self, event: &Event) -> FeatureVector {
        let values: [f64; FEATURE_COUNT] = [
            f64::from(self.hash_algorithms.code(&event.hash_algorithms)),
            f64::from(self.event_id.code(&event.event_id)),
            f64::from(self.protocol.code(&event.protocol)),
        ];
        FeatureVector::from_values(values)
    }

    /// Number of columns of this event that fall into the unknown bucket
    pub fn unseen_fields(&self, event: &Event) -> usize {
        [
            self.hash_algorithms.contains(&event.hash_algorithms),
            self.event_id.contains(&event.event_id),
            self.protocol.contains(&event.protocol),
        ]
        .iter()
        .filter(|known| !**known)
        .count()
    }
}
