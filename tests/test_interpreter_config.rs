use scoutline::config::Config;
use scoutline::filters::{Gender, Platform, RangeValue};
use scoutline::interpreter::QueryInterpreter;
use scoutline::patterns::{Gap, RuleRegistry};
use scoutline::ScoutlineError;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const CUSTOM_RULES: &str = r#"
[[rule]]
name = "platform_twitch_like_youtube"
kind = "platform"
keywords = ["stream", "youtube"]
value = "youtube"

[[rule]]
name = "followers_subs"
kind = "followers"
pattern = '([0-9]+(?:[.,][0-9]+)?)\s*(k)?\s*subs'

[[rule]]
name = "category_cooking"
kind = "category"
keywords = ["cuisine", "cooking"]
value = "cooking"

[[suggestion]]
gap = "category"
text = "Name a niche"
"#;

fn template_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("config-templates")
        .join(name)
}

#[test]
fn test_builtin_query_interpretation() {
    let interpreter = QueryInterpreter::builtin().unwrap();

    let outcome = interpreter.parse("100k followers gaming sur YouTube");
    let filters = &outcome.parsed_filters;
    assert_eq!(filters.platforms, Some(vec![Platform::Youtube]));
    assert_eq!(
        filters.audience.as_ref().unwrap().followers_range,
        Some(RangeValue::between(80_000, 120_000))
    );
    assert_eq!(
        filters.creator.as_ref().unwrap().categories,
        Some(vec!["gaming".to_string()])
    );
    assert!(outcome.suggestions.is_empty());

    let outcome = interpreter.parse("homme ou femme");
    assert_eq!(
        outcome.parsed_filters.creator.as_ref().unwrap().gender,
        Some(Gender::Female)
    );

    let outcome = interpreter.parse("bonjour");
    assert!(outcome.parsed_filters.is_empty());
    assert_eq!(outcome.suggestions.len(), 3);
}

#[test]
fn test_decimal_follower_counts() {
    let interpreter = QueryInterpreter::builtin().unwrap();
    let outcome = interpreter.parse("1,5k abonnés");
    assert_eq!(
        outcome.parsed_filters.audience.as_ref().unwrap().followers_range,
        Some(RangeValue::between(1200, 1800))
    );
}

#[test]
fn test_custom_rules_file() {
    let temp_dir = TempDir::new().unwrap();
    let rules_path = temp_dir.path().join("rules.toml");
    std::fs::write(&rules_path, CUSTOM_RULES).unwrap();

    let registry = RuleRegistry::from_config_file(&rules_path).unwrap();
    assert_eq!(registry.rules.len(), 3);
    assert!(registry.rule("category_cooking").is_some());
    assert!(registry.suggestion(Gap::Platform).is_none());

    let mut config = Config::default();
    config.interpreter.rules_file = Some(rules_path);
    config.interpreter.confidence = 0.6;
    let interpreter = QueryInterpreter::from_config(&config.interpreter).unwrap();

    let outcome = interpreter.parse("Cuisine stream 2k subs");
    assert_eq!(outcome.confidence, 0.6);
    assert_eq!(outcome.parsed_filters.platforms, Some(vec![Platform::Youtube]));
    assert_eq!(
        outcome.parsed_filters.audience.as_ref().unwrap().followers_range,
        Some(RangeValue::between(1600, 2400))
    );
    assert!(outcome.suggestions.is_empty());

    // only the category hint is configured
    let outcome = interpreter.parse("rien");
    assert_eq!(outcome.suggestions, vec!["Name a niche".to_string()]);
}

#[test]
fn test_invalid_rules_file() {
    let temp_dir = TempDir::new().unwrap();
    let rules_path = temp_dir.path().join("rules.toml");
    std::fs::write(
        &rules_path,
        r#"
[[rule]]
name = "broken"
kind = "platform"
keywords = ["vimeo"]
value = "vimeo"
"#,
    )
    .unwrap();

    let result = RuleRegistry::from_config_file(&rules_path);
    assert!(matches!(result, Err(ScoutlineError::Rules(_))));

    let missing = RuleRegistry::from_config_file(&temp_dir.path().join("missing.toml"));
    assert!(matches!(missing, Err(ScoutlineError::Io { .. })));
}

#[test]
fn test_config_template_loads() {
    let config = Config::load(&template_path("config.toml")).unwrap();
    assert!(config.merge.reject_unknown_fields);
    assert!(config.profiles.contains_key("lenient"));

    let lenient = Config::load_with_profile(&template_path("config.toml"), "lenient").unwrap();
    assert!(!lenient.merge.validate_ranges);
}

#[test]
fn test_config_save_and_load() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    let mut config = Config::default();
    config.interpreter.follower_tolerance = 0.1;
    config.merge.validate_ranges = false;
    config.save(&config_path).unwrap();

    let loaded = Config::load(&config_path).unwrap();
    assert_eq!(loaded.interpreter.follower_tolerance, 0.1);
    assert!(!loaded.merge.validate_ranges);
    assert!(loaded.interpreter.rules_file.is_none());
    assert!(loaded.profiles.contains_key("lenient"));
}

#[test]
fn test_config_errors() {
    let temp_dir = TempDir::new().unwrap();

    let missing = Config::load(&temp_dir.path().join("nope.toml"));
    assert!(matches!(missing, Err(ScoutlineError::ConfigNotFound { .. })));

    let config_path = temp_dir.path().join("config.toml");
    let mut config = Config::default();
    config.interpreter.confidence = 1.5;
    config.save(&config_path).unwrap();

    match Config::load(&config_path) {
        Err(ScoutlineError::ConfigValidation { errors }) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].path, "interpreter.confidence");
        }
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[test]
fn test_init_files_wires_installed_rule_table() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("scoutline").join("config.toml");

    let rules_path = Config::init_files(&config_path, false).unwrap();
    assert_eq!(rules_path, temp_dir.path().join("scoutline").join("rules.toml"));
    assert!(rules_path.exists());

    let config = Config::load(&config_path).unwrap();
    assert_eq!(config.interpreter.rules_file.as_ref(), Some(&rules_path));

    // edits to the installed table are picked up and survive a second init
    std::fs::write(&rules_path, CUSTOM_RULES).unwrap();
    Config::init_files(&config_path, false).unwrap();
    let config = Config::load(&config_path).unwrap();
    let interpreter = QueryInterpreter::from_config(&config.interpreter).unwrap();
    assert_eq!(interpreter.registry().rules.len(), 3);
    assert!(interpreter
        .parse("cooking")
        .parsed_filters
        .creator
        .is_some());

    Config::init_files(&config_path, true).unwrap();
    let config = Config::load(&config_path).unwrap();
    let interpreter = QueryInterpreter::from_config(&config.interpreter).unwrap();
    assert_eq!(interpreter.registry().rules.len(), 13);
}
