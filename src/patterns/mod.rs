//! Rule registry for the query interpreter
//!
//! This module provides:
//! - The TOML rule table format (`[[rule]]` and `[[suggestion]]` entries)
//! - Compilation of keyword and regex matchers, validated up front
//! - The built-in table shipped in `config-templates/rules.toml`

use crate::error::{Result, ScoutlineError};
use crate::filters::{Gender, Platform};
use ahash::{HashMap, HashMapExt};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Rule table shipped with the crate
pub const BUILTIN_RULES: &str = include_str!("../../config-templates/rules.toml");

/// What a matching rule contributes to the parsed filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    /// Collects every matching platform
    Platform,
    /// First match wins
    Gender,
    /// Follower count turned into a tolerance band
    Followers,
    /// Collects every matching category
    Category,
    /// First match wins
    Country,
}

/// Rule as written in the rule table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleConfig {
    pub name: String,
    pub kind: RuleKind,
    /// Substrings matched against the lowercased query
    #[serde(default)]
    pub keywords: Vec<String>,
    /// Regex used instead of keywords when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// Facet a query can leave unspecified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gap {
    Platform,
    Followers,
    Category,
}

impl Gap {
    /// Order in which hints are reported
    pub const ORDER: [Gap; 3] = [Gap::Platform, Gap::Followers, Gap::Category];
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionConfig {
    pub gap: Gap,
    pub text: String,
}

/// Rule table file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesConfig {
    pub rule: Vec<RuleConfig>,
    #[serde(default)]
    pub suggestion: Vec<SuggestionConfig>,
}

#[derive(Debug, Clone)]
pub enum Matcher {
    Keywords(Vec<String>),
    Pattern(Regex),
}

impl Matcher {
    /// `text` is expected to be lowercased already
    pub fn is_match(&self, text: &str) -> bool {
        match self {
            Matcher::Keywords(keywords) => keywords.iter().any(|k| text.contains(k.as_str())),
            Matcher::Pattern(regex) => regex.is_match(text),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RuleEffect {
    Platform(Platform),
    Gender(Gender),
    Followers,
    Category(String),
    Country(String),
}

/// Rule with its matcher compiled and its value parsed
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub name: String,
    pub matcher: Matcher,
    pub effect: RuleEffect,
}

impl CompiledRule {
    /// Follower count captured by a `followers` rule, `k` suffix applied
    pub fn extract_count(&self, text: &str) -> Option<f64> {
        let Matcher::Pattern(regex) = &self.matcher else {
            return None;
        };
        let captures = regex.captures(text)?;
        let number: f64 = captures.get(1)?.as_str().replace(',', ".").parse().ok()?;
        let multiplier = if captures.get(2).is_some() { 1000.0 } else { 1.0 };
        Some(number * multiplier)
    }
}

/// Ordered, compiled rule table
#[derive(Debug, Clone)]
pub struct RuleRegistry {
    /// Rules in evaluation order
    pub rules: Vec<CompiledRule>,
    /// Rule lookup by name
    pub rules_by_name: HashMap<String, usize>,
    /// Hint text per gap
    pub suggestions: HashMap<Gap, String>,
}

impl RuleRegistry {
    /// Table shipped with the crate
    pub fn builtin() -> Result<Self> {
        let config: RulesConfig = toml::from_str(BUILTIN_RULES)?;
        Self::from_config(config)
    }

    /// Load and compile a rule table file
    pub fn from_config_file(path: &Path) -> Result<Self> {
        let rules_toml = std::fs::read_to_string(path).map_err(|e| ScoutlineError::Io {
            source: e,
            context: format!("Failed to read rules file: {:?}", path),
        })?;
        let config: RulesConfig = toml::from_str(&rules_toml)?;
        Self::from_config(config)
    }

    /// Build registry from a parsed rule table
    pub fn from_config(config: RulesConfig) -> Result<Self> {
        let mut rules = Vec::with_capacity(config.rule.len());
        let mut rules_by_name = HashMap::new();

        for (idx, rule_cfg) in config.rule.iter().enumerate() {
            if rules_by_name.insert(rule_cfg.name.clone(), idx).is_some() {
                return Err(ScoutlineError::Rules(format!(
                    "Duplicate rule name '{}'",
                    rule_cfg.name
                )));
            }
            rules.push(Self::compile_rule(rule_cfg)?);
        }

        let suggestions = config
            .suggestion
            .into_iter()
            .map(|s| (s.gap, s.text))
            .collect();

        Ok(Self {
            rules,
            rules_by_name,
            suggestions,
        })
    }

    fn compile_rule(rule_cfg: &RuleConfig) -> Result<CompiledRule> {
        let matcher = match &rule_cfg.pattern {
            Some(pattern) => Matcher::Pattern(Regex::new(pattern).map_err(|e| {
                ScoutlineError::Rules(format!(
                    "Invalid pattern for rule '{}': {}",
                    rule_cfg.name, e
                ))
            })?),
            None => {
                let keywords: Vec<String> = rule_cfg
                    .keywords
                    .iter()
                    .map(|k| k.trim().to_lowercase())
                    .filter(|k| !k.is_empty())
                    .collect();
                if keywords.is_empty() {
                    return Err(ScoutlineError::Rules(format!(
                        "Rule '{}' needs keywords or a pattern",
                        rule_cfg.name
                    )));
                }
                Matcher::Keywords(keywords)
            }
        };

        let value = || {
            rule_cfg.value.clone().ok_or_else(|| {
                ScoutlineError::Rules(format!("Rule '{}' is missing a value", rule_cfg.name))
            })
        };

        let effect = match rule_cfg.kind {
            RuleKind::Platform => RuleEffect::Platform(value()?.parse()?),
            RuleKind::Gender => RuleEffect::Gender(value()?.parse()?),
            RuleKind::Category => RuleEffect::Category(value()?),
            RuleKind::Country => RuleEffect::Country(value()?),
            RuleKind::Followers => {
                let has_groups = matches!(&matcher, Matcher::Pattern(r) if r.captures_len() >= 3);
                if !has_groups {
                    return Err(ScoutlineError::Rules(format!(
                        "Followers rule '{}' needs a pattern with two capture groups",
                        rule_cfg.name
                    )));
                }
                RuleEffect::Followers
            }
        };

        Ok(CompiledRule {
            name: rule_cfg.name.clone(),
            matcher,
            effect,
        })
    }

    pub fn rule(&self, name: &str) -> Option<&CompiledRule> {
        self.rules_by_name.get(name).map(|&idx| &self.rules[idx])
    }

    pub fn suggestion(&self, gap: Gap) -> Option<&str> {
        self.suggestions.get(&gap).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(name: &str, kind: RuleKind, keywords: &[&str], value: Option<&str>) -> RuleConfig {
        RuleConfig {
            name: name.to_string(),
            kind,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            pattern: None,
            value: value.map(str::to_string),
        }
    }

    #[test]
    fn test_builtin_table_compiles() {
        let registry = RuleRegistry::builtin().unwrap();
        assert_eq!(registry.rules.len(), 13);
        assert!(registry.suggestion(Gap::Platform).is_some());
        assert!(registry.suggestion(Gap::Followers).is_some());
        assert!(registry.suggestion(Gap::Category).is_some());

        let female = registry.rules_by_name["gender_female"];
        let male = registry.rules_by_name["gender_male"];
        assert!(female < male);
    }

    #[test]
    fn test_keywords_are_lowercased() {
        let config = RulesConfig {
            rule: vec![rule("yt", RuleKind::Platform, &["YouTube"], Some("youtube"))],
            suggestion: vec![],
        };
        let registry = RuleRegistry::from_config(config).unwrap();
        assert!(registry.rules[0].matcher.is_match("top youtube channels"));
        assert_eq!(
            registry.rules[0].effect,
            RuleEffect::Platform(Platform::Youtube)
        );
    }

    #[test]
    fn test_unknown_platform_value_rejected() {
        let config = RulesConfig {
            rule: vec![rule("p", RuleKind::Platform, &["snap"], Some("snapchat"))],
            suggestion: vec![],
        };
        assert!(RuleRegistry::from_config(config).is_err());
    }

    #[test]
    fn test_duplicate_rule_name_rejected() {
        let config = RulesConfig {
            rule: vec![
                rule("dup", RuleKind::Category, &["a"], Some("a")),
                rule("dup", RuleKind::Category, &["b"], Some("b")),
            ],
            suggestion: vec![],
        };
        assert!(RuleRegistry::from_config(config).is_err());
    }

    #[test]
    fn test_followers_rule_requires_groups() {
        let mut followers = rule("f", RuleKind::Followers, &[], None);
        followers.pattern = Some(r"\d+ followers".to_string());
        let config = RulesConfig {
            rule: vec![followers],
            suggestion: vec![],
        };
        assert!(RuleRegistry::from_config(config).is_err());
    }

    #[test]
    fn test_extract_count() {
        let registry = RuleRegistry::builtin().unwrap();
        let followers = registry.rule("follower_count").unwrap();

        assert_eq!(followers.extract_count("100k followers"), Some(100_000.0));
        assert_eq!(followers.extract_count("au moins 2500 abonnés"), Some(2500.0));
        assert_eq!(followers.extract_count("1.5k follower"), Some(1500.0));
        assert_eq!(followers.extract_count("no numbers here"), None);
    }
}
