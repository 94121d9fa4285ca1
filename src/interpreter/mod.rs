//! Free-text query interpreter
//!
//! Maps a sentence such as "100k followers gaming sur YouTube" onto a partial
//! [`FilterState`] by running the ordered rule table once over the lowercased
//! query. Parsing is pure and never fails: a query nothing matches yields empty
//! filters and every hint.

use crate::config::{expand_path, InterpreterConfig};
use crate::error::Result;
use crate::filters::{
    AudienceFilters, CreatorFilters, CreatorLocation, FilterState, Gender, Platform, RangeValue,
    SectionKey,
};
use crate::merge::{FilterMerger, Patch};
use crate::patterns::{Gap, RuleEffect, RuleRegistry};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const DEFAULT_CONFIDENCE: f64 = 0.8;
pub const DEFAULT_FOLLOWER_TOLERANCE: f64 = 0.2;

/// Result of interpreting one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseOutcome {
    pub parsed_filters: FilterState,
    pub confidence: f64,
    pub suggestions: Vec<String>,
}

impl ParseOutcome {
    /// Sections the interpreter populated
    pub fn touched_sections(&self) -> Vec<SectionKey> {
        self.parsed_filters.present_sections()
    }

    /// Merge the parsed filters into `state`, one section at a time
    ///
    /// Parsed platforms replace the current selection.
    pub fn apply(&self, state: &FilterState, merger: &FilterMerger) -> Result<FilterState> {
        let mut next = match &self.parsed_filters.platforms {
            Some(platforms) => state.with_platforms(platforms.clone()),
            None => state.clone(),
        };

        for key in self.touched_sections() {
            if let Some(value) = self.parsed_filters.section_value(key) {
                let patch = Patch::from_value(value)?;
                next = merger.merge_section(&next, key, &patch)?;
            }
        }

        Ok(next)
    }
}

/// Heuristic query-to-filter parser
#[derive(Debug, Clone)]
pub struct QueryInterpreter {
    registry: Arc<RuleRegistry>,
    confidence: f64,
    follower_tolerance: f64,
}

impl QueryInterpreter {
    pub fn new(registry: Arc<RuleRegistry>) -> Self {
        Self {
            registry,
            confidence: DEFAULT_CONFIDENCE,
            follower_tolerance: DEFAULT_FOLLOWER_TOLERANCE,
        }
    }

    /// Interpreter over the built-in rule table
    pub fn builtin() -> Result<Self> {
        Ok(Self::new(Arc::new(RuleRegistry::builtin()?)))
    }

    pub fn from_config(config: &InterpreterConfig) -> Result<Self> {
        let registry = match &config.rules_file {
            Some(path) => RuleRegistry::from_config_file(&expand_path(path)?)?,
            None => RuleRegistry::builtin()?,
        };

        Ok(Self::new(Arc::new(registry))
            .with_confidence(config.confidence)
            .with_follower_tolerance(config.follower_tolerance))
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_follower_tolerance(mut self, tolerance: f64) -> Self {
        self.follower_tolerance = tolerance;
        self
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn parse(&self, query: &str) -> ParseOutcome {
        let text = query.to_lowercase();

        let mut platforms: Vec<Platform> = Vec::new();
        let mut gender: Option<Gender> = None;
        let mut followers: Option<RangeValue<u64>> = None;
        let mut categories: Vec<String> = Vec::new();
        let mut country: Option<String> = None;

        for rule in &self.registry.rules {
            match &rule.effect {
                RuleEffect::Platform(platform) => {
                    if !platforms.contains(platform) && rule.matcher.is_match(&text) {
                        tracing::debug!("Rule {} matched platform {}", rule.name, platform);
                        platforms.push(*platform);
                    }
                }
                RuleEffect::Gender(value) => {
                    if gender.is_none() && rule.matcher.is_match(&text) {
                        tracing::debug!("Rule {} matched gender {:?}", rule.name, value);
                        gender = Some(*value);
                    }
                }
                RuleEffect::Followers => {
                    if followers.is_none() {
                        if let Some(count) = rule.extract_count(&text) {
                            followers = self.follower_band(count);
                            if followers.is_some() {
                                tracing::debug!("Rule {} matched {} followers", rule.name, count);
                            } else {
                                tracing::debug!("Rule {} ignored oversized count {}", rule.name, count);
                            }
                        }
                    }
                }
                RuleEffect::Category(category) => {
                    if !categories.contains(category) && rule.matcher.is_match(&text) {
                        tracing::debug!("Rule {} matched category {}", rule.name, category);
                        categories.push(category.clone());
                    }
                }
                RuleEffect::Country(code) => {
                    if country.is_none() && rule.matcher.is_match(&text) {
                        tracing::debug!("Rule {} matched country {}", rule.name, code);
                        country = Some(code.clone());
                    }
                }
            }
        }

        let suggestions: Vec<String> = Gap::ORDER
            .into_iter()
            .filter(|gap| match gap {
                Gap::Platform => platforms.is_empty(),
                Gap::Followers => followers.is_none(),
                Gap::Category => categories.is_empty(),
            })
            .filter_map(|gap| self.registry.suggestion(gap).map(str::to_string))
            .collect();

        let creator = CreatorFilters {
            gender,
            categories: (!categories.is_empty()).then_some(categories),
            location: country.map(|code| CreatorLocation {
                country: Some(code),
                ..Default::default()
            }),
            ..Default::default()
        };

        let audience = followers.map(|band| AudienceFilters {
            followers_range: Some(band),
            ..Default::default()
        });

        let parsed_filters = FilterState {
            platforms: (!platforms.is_empty()).then_some(platforms),
            creator: (creator != CreatorFilters::default()).then(|| Arc::new(creator)),
            audience: audience.map(Arc::new),
            ..Default::default()
        };

        ParseOutcome {
            parsed_filters,
            confidence: self.confidence,
            suggestions,
        }
    }

    /// Tolerance band around a parsed follower count, rounded to whole followers
    ///
    /// `None` when the upper bound does not fit in a `u64`.
    fn follower_band(&self, count: f64) -> Option<RangeValue<u64>> {
        let max = (count * (1.0 + self.follower_tolerance)).round().max(0.0);
        if !max.is_finite() || max >= u64::MAX as f64 {
            return None;
        }
        let min = (count * (1.0 - self.follower_tolerance)).round().max(0.0);
        Some(RangeValue::between(min as u64, max as u64))
    }
}
