use std::collections::BTreeMap;

use indexmap::IndexSet;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::field::FieldMeta;
use crate::writer::IndicatorRow;

/// Values of one indicator kind in one row.
///
/// Set semantics, first-seen order. Serializes as a JSON array of strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndicatorSet(IndexSet<String>);

impl IndicatorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when the value was already present.
    pub fn insert(&mut self, value: &str) -> bool {
        if self.0.contains(value) {
            return false;
        }
        self.0.insert(value.to_string())
    }

    pub fn extend<'a>(&mut self, values: impl IntoIterator<Item = &'a str>) {
        for value in values {
            self.insert(value);
        }
    }

    pub fn contains(&self, value: &str) -> bool {
        self.0.contains(value)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<'a> FromIterator<&'a str> for IndicatorSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

/// All indicator collections of one row, keyed by wire name.
///
/// A collection exists only once something was written to it, and empty
/// collections are left out of the serialized row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Indicators {
    sets: BTreeMap<String, IndicatorSet>,
}

impl Indicators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name_json: &str) -> Option<&IndicatorSet> {
        self.sets.get(name_json)
    }

    /// Values under `name_json`, empty when nothing was collected.
    pub fn values(&self, name_json: &str) -> Vec<&str> {
        self.get(name_json).map(|set| set.iter().collect()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.values().all(IndicatorSet::is_empty)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndicatorSet)> {
        self.sets.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn append(&mut self, name_json: &str, values: &[&str]) {
        if values.is_empty() {
            return;
        }
        if let Some(set) = self.sets.get_mut(name_json) {
            set.extend(values.iter().copied());
            return;
        }
        // Created on first write.
        self.sets
            .entry(name_json.to_string())
            .or_default()
            .extend(values.iter().copied());
    }
}

impl IndicatorRow for Indicators {
    fn append_indicator(&mut self, meta: &FieldMeta, values: &[&str]) {
        self.append(&meta.name_json, values);
    }
}

impl Serialize for Indicators {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let present: Vec<_> = self.sets.iter().filter(|(_, set)| !set.is_empty()).collect();
        let mut map = serializer.serialize_map(Some(present.len()))?;
        for (name, set) in present {
            map.serialize_entry(name, set)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Indicators {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let sets = BTreeMap::<String, IndicatorSet>::deserialize(deserializer)?;
        Ok(Self { sets })
    }
}
