//! Search session management
//!
//! A session is the only stateful holder of a filter state: editors send
//! [`FilterAction`]s, the pure [`reduce`] function produces the next state,
//! and the session swaps it in.
use crate::counting::{ActiveFilterCounter, FilterSummary};
use crate::error::Result;
use crate::filters::{FilterState, Platform, SectionKey};
use crate::interpreter::ParseOutcome;
use crate::merge::{FilterMerger, Patch};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use uuid::Uuid;

/// Edit emitted by one filter editor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterAction {
    MergeSection { section: SectionKey, patch: Patch },
    /// Exclusive selection
    SelectPlatform { platform: Platform },
    TogglePlatform { platform: Platform },
    ClearPlatforms,
    SetUserSearch { handle: Option<String> },
    ClearSection { section: SectionKey },
    ClearAll,
    ApplyParsed { outcome: ParseOutcome },
}

/// Next state for `action`; `state` itself is never modified
pub fn reduce(
    state: &FilterState,
    action: &FilterAction,
    merger: &FilterMerger,
) -> Result<FilterState> {
    match action {
        FilterAction::MergeSection { section, patch } => {
            merger.merge_section(state, *section, patch)
        }
        FilterAction::SelectPlatform { platform } => Ok(state.select_platform(*platform)),
        FilterAction::TogglePlatform { platform } => Ok(state.toggle_platform(*platform)),
        FilterAction::ClearPlatforms => Ok(state.with_platforms(Vec::new())),
        FilterAction::SetUserSearch { handle } => Ok(state.with_user_search(handle.clone())),
        FilterAction::ClearSection { section } => Ok(state.without_section(*section)),
        FilterAction::ClearAll => Ok(FilterState::default()),
        FilterAction::ApplyParsed { outcome } => outcome.apply(state, merger),
    }
}

/// Results returned by the downstream candidate search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub items: Vec<serde_json::Value>,
    pub total_count: u64,
    pub search_time_ms: u64,
}

/// Opaque candidate retrieval service
pub trait CandidateSearch {
    fn search(&self, filters: &FilterState, query: &str) -> Result<SearchResults>;
}

/// One operator's search: current filters plus the free-text query
#[derive(Debug, Clone)]
pub struct SearchSession {
    /// Unique session identifier
    pub id: Uuid,

    /// When the session was started
    pub started_at: DateTime<Utc>,

    filters: FilterState,
    query: String,
    merger: FilterMerger,

    /// Number of accepted actions
    pub edit_count: u64,
}

impl SearchSession {
    /// Start a session with an empty filter state
    pub fn new(merger: FilterMerger) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            filters: FilterState::default(),
            query: String::new(),
            merger,
            edit_count: 0,
        }
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Apply an action; on error the current state is left untouched
    pub fn apply(&mut self, action: &FilterAction) -> Result<&FilterState> {
        let next = reduce(&self.filters, action, &self.merger)?;
        if matches!(action, FilterAction::ClearAll) {
            self.query.clear();
        }
        self.filters = next;
        self.edit_count += 1;
        Ok(&self.filters)
    }

    /// Reset filters and query
    pub fn clear_all(&mut self) {
        self.filters = FilterState::default();
        self.query.clear();
        self.edit_count += 1;
    }

    pub fn active_count(&self) -> usize {
        ActiveFilterCounter::count_all(&self.filters, &self.query)
    }

    pub fn summary(&self) -> FilterSummary {
        ActiveFilterCounter::summarize(&self.filters, &self.query)
    }

    /// Run the current filters and query against `backend`
    pub fn run_search(&self, backend: &dyn CandidateSearch) -> Result<SearchResults> {
        let start = Instant::now();
        let results = backend.search(&self.filters, &self.query)?;
        tracing::info!(
            "Session {} search returned {} candidate(s) in {}ms ({} active filters)",
            self.id,
            results.total_count,
            start.elapsed().as_millis(),
            self.active_count()
        );
        Ok(results)
    }
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new(FilterMerger::default())
    }
}
