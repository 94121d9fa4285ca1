//! Filter data model
//!
//! This module provides:
//! - Range and weighted-entry primitives
//! - The six section schemas (creator, audience, content, performance, growth, sponsoring)
//! - `FilterState`, the aggregate consumed by counting, merging and search

mod range;
mod sections;
mod state;
mod validation;
mod weighted;

pub use range::{is_range_object, RangeValue};
pub use sections::{
    AnalysisPeriod, AudienceFilters, AudienceGender, ContentFilters, CreatorFilters,
    CreatorLocation, ExtraFields, FilterSection, Gender, GrowthFilters, HashtagUsage,
    PerformanceFilters, Platform, PostingFrequency, PostingTimeWindow, SectionKey, TrendBucket,
};
pub use state::FilterState;
pub use validation::{collect_range_errors, range_errors};
pub use weighted::{remove, upsert, upsert_weight, Weight, WeightedEntry, WeightedEntrySet};
