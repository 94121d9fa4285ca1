//! Weighted entries: selections carrying a relative importance
//!
//! Used for audience age bands, interests and location importance. A set is
//! ordered and unique by `id`; every operation returns a new set.

use crate::error::{Result, ScoutlineError};
use serde::{Deserialize, Serialize};

/// Discrete importance step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub enum Weight {
    Minimal,
    Low,
    Moderate,
    Medium,
    High,
    Essential,
}

impl Weight {
    /// All steps in ascending order
    pub const ALL: [Weight; 6] = [
        Weight::Minimal,
        Weight::Low,
        Weight::Moderate,
        Weight::Medium,
        Weight::High,
        Weight::Essential,
    ];

    pub fn value(self) -> f64 {
        match self {
            Weight::Minimal => 0.1,
            Weight::Low => 0.2,
            Weight::Moderate => 0.3,
            Weight::Medium => 0.5,
            Weight::High => 0.7,
            Weight::Essential => 1.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Weight::Minimal => "minimal",
            Weight::Low => "low",
            Weight::Moderate => "moderate",
            Weight::Medium => "medium",
            Weight::High => "high",
            Weight::Essential => "essential",
        }
    }

    /// Clamp an arbitrary value to the closest step (NaN maps to the lowest)
    pub fn nearest(value: f64) -> Weight {
        if value.is_nan() {
            return Weight::Minimal;
        }
        Self::ALL
            .into_iter()
            .min_by(|a, b| {
                (a.value() - value)
                    .abs()
                    .total_cmp(&(b.value() - value).abs())
            })
            .unwrap_or(Weight::Minimal)
    }
}

impl TryFrom<f64> for Weight {
    type Error = ScoutlineError;

    fn try_from(value: f64) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|step| (step.value() - value).abs() < 1e-9)
            .ok_or(ScoutlineError::InvalidWeight { value })
    }
}

impl From<Weight> for f64 {
    fn from(weight: Weight) -> Self {
        weight.value()
    }
}

/// Selection with importance; `name` is accepted as an alias of `id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedEntry {
    #[serde(alias = "name")]
    pub id: String,
    pub weight: Weight,
}

impl WeightedEntry {
    pub fn new(id: impl Into<String>, weight: Weight) -> Self {
        Self {
            id: id.into(),
            weight,
        }
    }
}

/// Insert or reweight `id`, keeping the position of an existing entry
pub fn upsert(set: &[WeightedEntry], id: &str, weight: f64) -> Result<Vec<WeightedEntry>> {
    let weight = Weight::try_from(weight)?;
    Ok(upsert_weight(set, id, weight))
}

pub fn upsert_weight(set: &[WeightedEntry], id: &str, weight: Weight) -> Vec<WeightedEntry> {
    let mut entries = set.to_vec();
    match entries.iter_mut().find(|entry| entry.id == id) {
        Some(entry) => entry.weight = weight,
        None => entries.push(WeightedEntry::new(id, weight)),
    }
    entries
}

/// Drop `id`; unknown ids leave the set unchanged
pub fn remove(set: &[WeightedEntry], id: &str) -> Vec<WeightedEntry> {
    set.iter().filter(|entry| entry.id != id).cloned().collect()
}

/// Ordered weighted entries, unique by id
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<WeightedEntry>", into = "Vec<WeightedEntry>")]
pub struct WeightedEntrySet {
    entries: Vec<WeightedEntry>,
}

impl WeightedEntrySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set, rejecting duplicate ids
    pub fn from_entries(entries: impl IntoIterator<Item = WeightedEntry>) -> Result<Self> {
        let entries: Vec<WeightedEntry> = entries.into_iter().collect();
        for (idx, entry) in entries.iter().enumerate() {
            if entries[..idx].iter().any(|seen| seen.id == entry.id) {
                return Err(ScoutlineError::DuplicateEntry {
                    id: entry.id.clone(),
                });
            }
        }
        Ok(Self { entries })
    }

    pub fn upsert(&self, id: &str, weight: Weight) -> Self {
        Self {
            entries: upsert_weight(&self.entries, id, weight),
        }
    }

    /// Like [`WeightedEntrySet::upsert`] but validates a raw weight first
    pub fn try_upsert(&self, id: &str, weight: f64) -> Result<Self> {
        Ok(Self {
            entries: upsert(&self.entries, id, weight)?,
        })
    }

    pub fn remove(&self, id: &str) -> Self {
        Self {
            entries: remove(&self.entries, id),
        }
    }

    pub fn get(&self, id: &str) -> Option<Weight> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.weight)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn entries(&self) -> &[WeightedEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &WeightedEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl TryFrom<Vec<WeightedEntry>> for WeightedEntrySet {
    type Error = ScoutlineError;

    fn try_from(entries: Vec<WeightedEntry>) -> Result<Self> {
        Self::from_entries(entries)
    }
}

impl From<WeightedEntrySet> for Vec<WeightedEntry> {
    fn from(set: WeightedEntrySet) -> Self {
        set.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_upsert_replaces_existing_weight() {
        let set = upsert(&[], "13-17", 0.3).unwrap();
        let set = upsert(&set, "13-17", 0.7).unwrap();

        assert_eq!(set.len(), 1);
        assert_eq!(set[0].id, "13-17");
        assert_eq!(set[0].weight, Weight::High);
    }

    #[test]
    fn test_upsert_preserves_position() {
        let set = WeightedEntrySet::new()
            .upsert("18-24", Weight::Low)
            .upsert("25-34", Weight::Medium)
            .upsert("35-44", Weight::Minimal);

        let updated = set.upsert("25-34", Weight::Essential);
        let ids: Vec<&str> = updated.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["18-24", "25-34", "35-44"]);
        assert_eq!(updated.get("25-34"), Some(Weight::Essential));

        // input untouched
        assert_eq!(set.get("25-34"), Some(Weight::Medium));
    }

    #[test]
    fn test_upsert_rejects_off_step_weight() {
        let err = upsert(&[], "gaming", 0.4).unwrap_err();
        assert!(matches!(err, ScoutlineError::InvalidWeight { .. }));
    }

    #[test]
    fn test_remove_missing_id_is_noop() {
        let set = WeightedEntrySet::new()
            .upsert("FR", Weight::Essential)
            .upsert("BE", Weight::Moderate);

        assert_eq!(set.remove("nonexistent"), set);
        assert_eq!(set.remove("FR").len(), 1);
        assert!(!set.remove("FR").contains("FR"));
    }

    #[test]
    fn test_nearest_step() {
        assert_eq!(Weight::nearest(0.42), Weight::Medium);
        assert_eq!(Weight::nearest(0.0), Weight::Minimal);
        assert_eq!(Weight::nearest(3.0), Weight::Essential);
        assert_eq!(Weight::nearest(f64::NAN), Weight::Minimal);
    }

    #[test]
    fn test_deserialize_validates_weights_and_ids() {
        let ok: WeightedEntrySet =
            serde_json::from_value(json!([{"id": "FR", "weight": 1.0}, {"name": "US", "weight": 0.5}]))
                .unwrap();
        assert_eq!(ok.len(), 2);
        assert_eq!(ok.get("US"), Some(Weight::Medium));

        let bad_weight =
            serde_json::from_value::<WeightedEntrySet>(json!([{"id": "FR", "weight": 0.9}]));
        assert!(bad_weight.is_err());

        let duplicate = serde_json::from_value::<WeightedEntrySet>(json!([
            {"id": "FR", "weight": 1.0},
            {"id": "FR", "weight": 0.2}
        ]));
        assert!(duplicate.is_err());
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let set = WeightedEntrySet::new().upsert("13-17", Weight::Moderate);
        assert_eq!(
            serde_json::to_value(&set).unwrap(),
            json!([{"id": "13-17", "weight": 0.3}])
        );
    }
}
