use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Numeric range with independently optional bounds
///
/// A missing bound is open: `{min: 5}` means "at least 5", never "exactly 5".
/// `min <= max` is not enforced here; see [`RangeValue::is_satisfiable`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RangeValue<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<T>,
}

impl<T> RangeValue<T> {
    pub fn new(min: Option<T>, max: Option<T>) -> Self {
        Self { min, max }
    }

    pub fn between(min: T, max: T) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn at_least(min: T) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    pub fn at_most(max: T) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    /// True when neither bound is set
    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

impl<T: PartialOrd> RangeValue<T> {
    /// False for inverted ranges (`min > max`), which match no candidate
    pub fn is_satisfiable(&self) -> bool {
        match (&self.min, &self.max) {
            (Some(min), Some(max)) => min <= max,
            _ => true,
        }
    }

    pub fn contains(&self, value: &T) -> bool {
        let above_min = self.min.as_ref().map_or(true, |min| value >= min);
        let below_max = self.max.as_ref().map_or(true, |max| value <= max);
        above_min && below_max
    }
}

/// Whether a JSON object has the shape of a range: non-empty, keys limited to `min`/`max`
pub fn is_range_object(map: &Map<String, Value>) -> bool {
    !map.is_empty() && map.keys().all(|k| k == "min" || k == "max")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_bound_stays_open() {
        let range = RangeValue::at_least(5u64);
        assert_eq!(range.max, None);
        assert!(range.contains(&1_000_000));
        assert!(!range.contains(&4));

        let json = serde_json::to_value(range).unwrap();
        assert_eq!(json, json!({"min": 5}));
    }

    #[test]
    fn test_inverted_range_is_unsatisfiable() {
        let range = RangeValue::between(10.0, 2.0);
        assert!(!range.is_satisfiable());
        assert!(!range.contains(&5.0));
        assert!(RangeValue::<u32>::default().is_satisfiable());
    }

    #[test]
    fn test_range_object_shape() {
        let range = json!({"min": 1, "max": null});
        let sub_object = json!({"malePercentage": {"min": 10}});
        assert!(is_range_object(range.as_object().unwrap()));
        assert!(!is_range_object(sub_object.as_object().unwrap()));
        assert!(!is_range_object(&Map::new()));
    }
}
