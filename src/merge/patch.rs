use crate::error::{Result, ScoutlineError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Partial update for one section, keyed by wire field name
///
/// A `null` value removes the field from the section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Patch(Map<String, Value>);

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a JSON object; any other JSON type is rejected
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(ScoutlineError::InvalidPatch {
                section: "-".to_string(),
                message: format!("patch must be a JSON object, got {}", other),
            }),
        }
    }

    /// Patch setting every serialized field of `section`
    pub fn from_serializable<T: Serialize>(section: &T) -> Result<Self> {
        let value = serde_json::to_value(section).map_err(|e| ScoutlineError::Json {
            source: e,
            context: "Failed to serialize patch".to_string(),
        })?;
        Self::from_value(value)
    }

    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    pub fn set_serialized<T: Serialize>(self, field: impl Into<String>, value: &T) -> Result<Self> {
        let field = field.into();
        let value = serde_json::to_value(value).map_err(|e| ScoutlineError::Json {
            source: e,
            context: format!("Failed to serialize patch field {}", field),
        })?;
        Ok(self.set(field, value))
    }

    /// Mark a field for removal
    pub fn clear(self, field: impl Into<String>) -> Self {
        self.set(field, Value::Null)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries that set a value, as a JSON object
    pub fn assigned(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .filter(|(_, value)| !Self::clears(value))
                .map(|(field, value)| (field.clone(), value.clone()))
                .collect(),
        )
    }

    /// Values that collapse a field instead of setting it
    pub fn clears(value: &Value) -> bool {
        match value {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            Value::Array(items) => items.is_empty(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder() {
        let patch = Patch::new().set("verified", true).clear("gender");
        assert_eq!(patch.len(), 2);
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({"verified": true, "gender": null})
        );
    }

    #[test]
    fn test_from_value_requires_object() {
        assert!(Patch::from_value(json!([1, 2])).is_err());
        assert!(Patch::from_value(json!({})).unwrap().is_empty());
    }

    #[test]
    fn test_clearing_values() {
        assert!(Patch::clears(&Value::Null));
        assert!(Patch::clears(&json!("")));
        assert!(Patch::clears(&json!([])));
        assert!(!Patch::clears(&json!(0)));
        assert!(!Patch::clears(&json!(false)));
        assert!(!Patch::clears(&json!({})));
    }

    #[test]
    fn test_assigned_skips_clears() {
        let patch = Patch::new()
            .set("ageRange", json!({"min": 18}))
            .set("bio", "")
            .clear("gender");
        assert_eq!(patch.assigned(), json!({"ageRange": {"min": 18}}));
    }
}
