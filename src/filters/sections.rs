//! Section schemas of a filter state
//!
//! Every field is optional and serialized in camelCase; absent fields are
//! skipped so a section's JSON carries only what an editor has set. Keys not
//! defined by a schema land in `extra` and are rejected or kept depending on
//! the merge policy.

use crate::error::{Result, ScoutlineError};
use crate::filters::{RangeValue, WeightedEntrySet};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Keys not covered by a section schema
pub type ExtraFields = BTreeMap<String, Value>;

/// Common behaviour of the object-shaped sections
pub trait FilterSection:
    Serialize + DeserializeOwned + Default + Clone + PartialEq + fmt::Debug
{
    /// Fields the schema does not define
    fn extra(&self) -> &ExtraFields;

    /// No field set at all
    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Object-shaped sections of a [`crate::filters::FilterState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKey {
    Creator,
    Audience,
    Content,
    Performance,
    Growth,
    Sponsoring,
}

impl SectionKey {
    pub const ALL: [SectionKey; 6] = [
        SectionKey::Creator,
        SectionKey::Audience,
        SectionKey::Content,
        SectionKey::Performance,
        SectionKey::Growth,
        SectionKey::Sponsoring,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SectionKey::Creator => "creator",
            SectionKey::Audience => "audience",
            SectionKey::Content => "content",
            SectionKey::Performance => "performance",
            SectionKey::Growth => "growth",
            SectionKey::Sponsoring => "sponsoring",
        }
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionKey {
    type Err = ScoutlineError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == wanted)
            .ok_or_else(|| ScoutlineError::UnknownSection(s.to_string()))
    }
}

/// Social platform a creator publishes on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Instagram,
    Youtube,
    Tiktok,
}

impl Platform {
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::Youtube => "youtube",
            Platform::Tiktok => "tiktok",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = ScoutlineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "instagram" => Ok(Platform::Instagram),
            "youtube" => Ok(Platform::Youtube),
            "tiktok" => Ok(Platform::Tiktok),
            other => Err(ScoutlineError::Rules(format!("Unknown platform '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Gender {
    Male,
    Female,
}

impl FromStr for Gender {
    type Err = ScoutlineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "MALE" => Ok(Gender::Male),
            "FEMALE" => Ok(Gender::Female),
            other => Err(ScoutlineError::Rules(format!("Unknown gender '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreatorLocation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub continent: Option<String>,
}

/// Identity and thematic facet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CreatorFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_range: Option<RangeValue<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<CreatorLocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_email: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_phone: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    /// Topics the creator should be relevant to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relevance: Option<Vec<String>>,
    /// Handles of creators to find lookalikes of
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lookalikes: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hashtags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mentions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brands: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interests: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_account: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_shorts: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_live_streams: Option<bool>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl FilterSection for CreatorFilters {
    fn extra(&self) -> &ExtraFields {
        &self.extra
    }
}

/// Audience split by gender, in percent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AudienceGender {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub male_percentage: Option<RangeValue<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub female_percentage: Option<RangeValue<f64>>,
}

/// Demographic and geographic targeting facet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AudienceFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub followers_range: Option<RangeValue<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engagement_rate: Option<RangeValue<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub likes_range: Option<RangeValue<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments_range: Option<RangeValue<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub views_range: Option<RangeValue<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audience_gender: Option<AudienceGender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audience_age_range: Option<RangeValue<u32>>,
    /// Age bands such as "18-24" with their importance
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_bands: Option<WeightedEntrySet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub countries: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cities: Option<Vec<String>>,
    /// Importance of each selected country or city
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_weights: Option<WeightedEntrySet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interests: Option<WeightedEntrySet>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl FilterSection for AudienceFilters {
    fn extra(&self) -> &ExtraFields {
        &self.extra
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostingFrequency {
    Daily,
    SeveralPerWeek,
    Weekly,
    Monthly,
    Rarely,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashtagUsage {
    Low,
    Medium,
    High,
}

/// Hours of the day, 0-23, inclusive
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PostingTimeWindow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_hour: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_hour: Option<u8>,
}

/// Posting behaviour facet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContentFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posting_frequency: Option<PostingFrequency>,
    /// Last post no older than this many days
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_post_within_days: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_posts: Option<RangeValue<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_types: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posting_days: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posting_time: Option<PostingTimeWindow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hashtag_usage: Option<HashtagUsage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collaboration_rate: Option<RangeValue<f64>>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl FilterSection for ContentFilters {
    fn extra(&self) -> &ExtraFields {
        &self.extra
    }
}

/// Size and performance facet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PerformanceFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub followers: Option<RangeValue<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub views: Option<RangeValue<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engagement: Option<RangeValue<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_likes: Option<RangeValue<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_comments: Option<RangeValue<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_views: Option<RangeValue<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_shares: Option<RangeValue<u64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contactable: Option<bool>,
    /// Video length in seconds (YouTube, TikTok)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_duration: Option<RangeValue<u32>>,
    /// Uploads per week (YouTube)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_frequency: Option<RangeValue<f64>>,
    /// Share of posts published as stories (Instagram)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stories_ratio: Option<RangeValue<f64>>,
    /// Uses trending sounds/formats (TikTok)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uses_trends: Option<bool>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl FilterSection for PerformanceFilters {
    fn extra(&self) -> &ExtraFields {
        &self.extra
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnalysisPeriod {
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "90d")]
    Quarter,
    #[serde(rename = "180d")]
    HalfYear,
    #[serde(rename = "365d")]
    Year,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendBucket {
    Rising,
    Stable,
    Declining,
}

/// Trend facet, shared by the growth and sponsoring sections
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GrowthFilters {
    /// Growth rates in percent over `period`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub followers_growth: Option<RangeValue<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engagement_growth: Option<RangeValue<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub views_growth: Option<RangeValue<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<AnalysisPeriod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<TrendBucket>,
    /// Account age in months
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_age: Option<RangeValue<u32>>,
    #[serde(flatten)]
    pub extra: ExtraFields,
}

impl FilterSection for GrowthFilters {
    fn extra(&self) -> &ExtraFields {
        &self.extra
    }
}
