//! Section merges
//!
//! Every editor of the filter UI owns one section and sends partial updates.
//! A merge shallow-merges the patch into that section only; the untouched
//! sections of the returned state are the same `Arc`s as in the input.

mod patch;

pub use patch::Patch;

use crate::config::MergeConfig;
use crate::error::{Result, ScoutlineError};
use crate::filters::{range_errors, FilterSection, FilterState, SectionKey};
use serde_json::{Map, Value};
use std::sync::Arc;

/// What a merge checks before accepting a patch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergePolicy {
    /// Reject patch keys the section schema does not define
    pub reject_unknown_fields: bool,
    /// Reject ranges with `min > max`
    pub validate_ranges: bool,
}

impl MergePolicy {
    /// Accept anything that deserializes; unknown keys are stored as-is
    pub fn lenient() -> Self {
        Self {
            reject_unknown_fields: false,
            validate_ranges: false,
        }
    }
}

impl Default for MergePolicy {
    fn default() -> Self {
        Self {
            reject_unknown_fields: true,
            validate_ranges: true,
        }
    }
}

impl From<&MergeConfig> for MergePolicy {
    fn from(config: &MergeConfig) -> Self {
        Self {
            reject_unknown_fields: config.reject_unknown_fields,
            validate_ranges: config.validate_ranges,
        }
    }
}

/// Applies section patches under a [`MergePolicy`]
#[derive(Debug, Clone, Copy, Default)]
pub struct FilterMerger {
    policy: MergePolicy,
}

impl FilterMerger {
    pub fn new(policy: MergePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> MergePolicy {
        self.policy
    }

    /// Merge `patch` into one section of `state`
    ///
    /// `null`, `""` and `[]` values remove the field; `0` and `false` are kept.
    /// A section left without fields becomes absent.
    pub fn merge_section(
        &self,
        state: &FilterState,
        key: SectionKey,
        patch: &Patch,
    ) -> Result<FilterState> {
        if patch.is_empty() {
            return Ok(state.clone());
        }

        let mut next = state.clone();
        match key {
            SectionKey::Creator => {
                next.creator = self.merge_into(key, state.creator.as_ref(), patch)?;
            }
            SectionKey::Audience => {
                next.audience = self.merge_into(key, state.audience.as_ref(), patch)?;
            }
            SectionKey::Content => {
                next.content = self.merge_into(key, state.content.as_ref(), patch)?;
            }
            SectionKey::Performance => {
                next.performance = self.merge_into(key, state.performance.as_ref(), patch)?;
            }
            SectionKey::Growth => {
                next.growth = self.merge_into(key, state.growth.as_ref(), patch)?;
            }
            SectionKey::Sponsoring => {
                next.sponsoring = self.merge_into(key, state.sponsoring.as_ref(), patch)?;
            }
        }

        tracing::debug!("Merged {} field(s) into section {}", patch.len(), key);
        Ok(next)
    }

    fn merge_into<S: FilterSection>(
        &self,
        key: SectionKey,
        current: Option<&Arc<S>>,
        patch: &Patch,
    ) -> Result<Option<Arc<S>>> {
        let mut fields = match current {
            Some(section) => {
                let value =
                    serde_json::to_value(section.as_ref()).map_err(|e| ScoutlineError::Json {
                        source: e,
                        context: format!("Failed to serialize section {}", key),
                    })?;
                match value {
                    Value::Object(map) => map,
                    _ => Map::new(),
                }
            }
            None => Map::new(),
        };

        for (field, value) in patch.iter() {
            if Patch::clears(value) {
                fields.remove(field);
            } else {
                fields.insert(field.clone(), value.clone());
            }
        }

        if fields.is_empty() {
            return Ok(None);
        }

        let candidate = Value::Object(fields);

        // only ranges this patch sets
        if self.policy.validate_ranges {
            let errors = range_errors(key.as_str(), &patch.assigned());
            if !errors.is_empty() {
                tracing::warn!("Rejected patch for {}: {} inverted range(s)", key, errors.len());
                return Err(ScoutlineError::InvalidRange { errors });
            }
        }

        let section: S =
            serde_json::from_value(candidate).map_err(|e| ScoutlineError::InvalidPatch {
                section: key.to_string(),
                message: e.to_string(),
            })?;

        if self.policy.reject_unknown_fields && !section.extra().is_empty() {
            let fields: Vec<String> = section.extra().keys().cloned().collect();
            tracing::warn!("Rejected patch for {}: unknown fields {:?}", key, fields);
            return Err(ScoutlineError::UnknownFields {
                section: key.to_string(),
                fields,
            });
        }

        if section.is_empty() {
            return Ok(None);
        }

        Ok(Some(Arc::new(section)))
    }
}

/// Merge with the default (strict) policy
pub fn merge_section(state: &FilterState, key: SectionKey, patch: &Patch) -> Result<FilterState> {
    FilterMerger::default().merge_section(state, key, patch)
}
