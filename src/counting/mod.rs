//! Active filter accounting
//!
//! Counts "facets touched" rather than individual knobs: a populated
//! sub-object such as `audienceGender` contributes exactly one, however many
//! of its own fields are set.

use crate::filters::{is_range_object, FilterState, SectionKey};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Active fields of one section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionSummary {
    pub section: SectionKey,
    pub count: usize,
    pub fields: Vec<String>,
}

/// Badge view of a whole filter state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSummary {
    pub total: usize,
    pub query_active: bool,
    pub platforms_active: bool,
    pub user_search_active: bool,
    /// Present sections only, in section order
    pub sections: Vec<SectionSummary>,
}

/// Shape-aware counter over section JSON
pub struct ActiveFilterCounter;

impl ActiveFilterCounter {
    /// Number of meaningfully set fields in a section; absent or `{}` gives 0
    pub fn count_active(section: Option<&Value>) -> usize {
        Self::active_fields(section).len()
    }

    /// Names of the meaningfully set fields, in key order
    pub fn active_fields(section: Option<&Value>) -> Vec<String> {
        match section {
            Some(Value::Object(map)) => map
                .iter()
                .filter(|(_, value)| Self::is_field_active(value))
                .map(|(key, _)| key.clone())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Count for a typed section of `state`
    pub fn count_section(state: &FilterState, key: SectionKey) -> usize {
        Self::count_active(state.section_value(key).as_ref())
    }

    /// Sections plus the free-text query, platforms and handle lookup
    pub fn count_all(state: &FilterState, query: &str) -> usize {
        Self::summarize(state, query).total
    }

    pub fn summarize(state: &FilterState, query: &str) -> FilterSummary {
        let sections: Vec<SectionSummary> = state
            .present_sections()
            .into_iter()
            .map(|key| {
                let fields = Self::active_fields(state.section_value(key).as_ref());
                SectionSummary {
                    section: key,
                    count: fields.len(),
                    fields,
                }
            })
            .collect();

        let query_active = !query.trim().is_empty();
        let platforms_active = state.platforms.as_ref().is_some_and(|p| !p.is_empty());
        let user_search_active = state
            .user_search
            .as_ref()
            .is_some_and(|handle| !handle.trim().is_empty());

        let total = sections.iter().map(|s| s.count).sum::<usize>()
            + usize::from(query_active)
            + usize::from(platforms_active)
            + usize::from(user_search_active);

        FilterSummary {
            total,
            query_active,
            platforms_active,
            user_search_active,
            sections,
        }
    }

    fn is_field_active(value: &Value) -> bool {
        match value {
            Value::Object(map) if is_range_object(map) => map.values().any(|b| !b.is_null()),
            Value::Object(map) => map.values().any(Self::has_content),
            other => Self::has_content(other),
        }
    }

    // Emptiness one level down; deeper objects are opaque
    fn has_content(value: &Value) -> bool {
        match value {
            Value::Null => false,
            Value::String(s) => !s.trim().is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::Object(map) => map.values().any(|v| !v.is_null()),
            Value::Bool(_) | Value::Number(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{CreatorFilters, Platform};
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn test_vacuous_sections() {
        assert_eq!(ActiveFilterCounter::count_active(None), 0);
        assert_eq!(ActiveFilterCounter::count_active(Some(&json!({}))), 0);
    }

    #[test]
    fn test_sub_object_counts_once() {
        let one_leaf = json!({"audienceGender": {"malePercentage": {"min": 10}}});
        let two_leaves = json!({
            "audienceGender": {
                "malePercentage": {"min": 10},
                "femalePercentage": {"min": 20, "max": 60}
            }
        });

        assert_eq!(ActiveFilterCounter::count_active(Some(&one_leaf)), 1);
        assert_eq!(ActiveFilterCounter::count_active(Some(&two_leaves)), 1);
    }

    #[test]
    fn test_shape_rules() {
        let section = json!({
            "bio": "   ",
            "keywords": "travel",
            "categories": [],
            "languages": ["fr"],
            "followersRange": {"min": null, "max": null},
            "engagementRate": {"max": 4.5},
            "location": {"country": "", "city": null},
            "verified": false,
            "lastPostWithinDays": 0,
            "gender": null
        });

        let fields = ActiveFilterCounter::active_fields(Some(&section));
        assert_eq!(
            fields,
            vec![
                "engagementRate".to_string(),
                "keywords".to_string(),
                "languages".to_string(),
                "lastPostWithinDays".to_string(),
                "verified".to_string(),
            ]
        );
    }

    #[test]
    fn test_count_all_top_level_fields() {
        let state = FilterState {
            platforms: Some(vec![Platform::Tiktok]),
            user_search: Some("@handle".to_string()),
            creator: Some(Arc::new(CreatorFilters {
                verified: Some(true),
                ..Default::default()
            })),
            ..Default::default()
        };

        assert_eq!(ActiveFilterCounter::count_all(&state, ""), 3);
        assert_eq!(ActiveFilterCounter::count_all(&state, "  beauty  "), 4);
        assert_eq!(ActiveFilterCounter::count_all(&FilterState::new(), "   "), 0);
    }

    #[test]
    fn test_empty_section_equals_absent() {
        let with_empty = FilterState {
            creator: Some(Arc::new(CreatorFilters::default())),
            ..Default::default()
        };
        assert_eq!(ActiveFilterCounter::count_all(&with_empty, ""), 0);
        assert_eq!(
            ActiveFilterCounter::count_section(&with_empty, SectionKey::Creator),
            0
        );
    }

    #[test]
    fn test_summary_lists_sections() {
        let state = FilterState {
            creator: Some(Arc::new(CreatorFilters {
                verified: Some(true),
                categories: Some(vec!["gaming".to_string()]),
                ..Default::default()
            })),
            ..Default::default()
        };

        let summary = ActiveFilterCounter::summarize(&state, "gamers");
        assert_eq!(summary.total, 3);
        assert!(summary.query_active);
        assert_eq!(summary.sections.len(), 1);
        assert_eq!(summary.sections[0].section, SectionKey::Creator);
        assert_eq!(summary.sections[0].fields, vec!["categories", "verified"]);
    }
}
