use crate::error::ValidationError;
use crate::filters::sections::{
    AudienceFilters, ContentFilters, CreatorFilters, GrowthFilters, PerformanceFilters, Platform,
    SectionKey,
};
use crate::filters::validation;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Root of a partially specified creator query
///
/// Sections sit behind `Arc` so that cloning a state and replacing one
/// section leaves every other section pointer-identical to the original.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platforms: Option<Vec<Platform>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<Arc<CreatorFilters>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audience: Option<Arc<AudienceFilters>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Arc<ContentFilters>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance: Option<Arc<PerformanceFilters>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub growth: Option<Arc<GrowthFilters>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sponsoring: Option<Arc<GrowthFilters>>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// JSON view of one section, `None` when the section is absent
    pub fn section_value(&self, key: SectionKey) -> Option<Value> {
        let value = match key {
            SectionKey::Creator => self.creator.as_ref().map(serde_json::to_value),
            SectionKey::Audience => self.audience.as_ref().map(serde_json::to_value),
            SectionKey::Content => self.content.as_ref().map(serde_json::to_value),
            SectionKey::Performance => self.performance.as_ref().map(serde_json::to_value),
            SectionKey::Growth => self.growth.as_ref().map(serde_json::to_value),
            SectionKey::Sponsoring => self.sponsoring.as_ref().map(serde_json::to_value),
        };
        value.and_then(|v| v.ok())
    }

    pub fn has_section(&self, key: SectionKey) -> bool {
        match key {
            SectionKey::Creator => self.creator.is_some(),
            SectionKey::Audience => self.audience.is_some(),
            SectionKey::Content => self.content.is_some(),
            SectionKey::Performance => self.performance.is_some(),
            SectionKey::Growth => self.growth.is_some(),
            SectionKey::Sponsoring => self.sponsoring.is_some(),
        }
    }

    /// Sections that are present, in [`SectionKey::ALL`] order
    pub fn present_sections(&self) -> Vec<SectionKey> {
        SectionKey::ALL
            .into_iter()
            .filter(|key| self.has_section(*key))
            .collect()
    }

    pub fn without_section(&self, key: SectionKey) -> Self {
        let mut next = self.clone();
        match key {
            SectionKey::Creator => next.creator = None,
            SectionKey::Audience => next.audience = None,
            SectionKey::Content => next.content = None,
            SectionKey::Performance => next.performance = None,
            SectionKey::Growth => next.growth = None,
            SectionKey::Sponsoring => next.sponsoring = None,
        }
        next
    }

    /// Exclusive platform selection: the new platform replaces any previous one
    pub fn select_platform(&self, platform: Platform) -> Self {
        Self {
            platforms: Some(vec![platform]),
            ..self.clone()
        }
    }

    /// Add the platform if missing, remove it otherwise
    pub fn toggle_platform(&self, platform: Platform) -> Self {
        let mut platforms = self.platforms.clone().unwrap_or_default();
        if let Some(pos) = platforms.iter().position(|p| *p == platform) {
            platforms.remove(pos);
        } else {
            platforms.push(platform);
        }
        self.with_platforms(platforms)
    }

    /// Replace the platform list; an empty list clears it
    pub fn with_platforms(&self, platforms: Vec<Platform>) -> Self {
        Self {
            platforms: (!platforms.is_empty()).then_some(platforms),
            ..self.clone()
        }
    }

    /// Set the handle lookup; blank input clears it
    pub fn with_user_search(&self, handle: Option<String>) -> Self {
        Self {
            user_search: handle.filter(|h| !h.trim().is_empty()),
            ..self.clone()
        }
    }

    /// Report every range with `min > max`
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        for key in SectionKey::ALL {
            if let Some(value) = self.section_value(key) {
                validation::collect_range_errors(key.as_str(), &value, &mut errors);
            }
        }
        errors
    }
}
