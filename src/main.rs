use scoutline::cli::{Cli, Commands, ConfigAction};
use scoutline::config::Config;
use scoutline::counting::ActiveFilterCounter;
use scoutline::error::{Result, ScoutlineError};
use scoutline::filters::{FilterState, SectionKey};
use scoutline::interpreter::QueryInterpreter;
use scoutline::merge::{FilterMerger, MergePolicy, Patch};
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    init_logging(cli.verbose);

    match cli.command {
        Commands::Parse { query, json } => {
            let config = load_config(cli.config, cli.profile)?;
            cmd_parse(&config, &query, json)?;
        }
        Commands::Count { state, query, json } => {
            cmd_count(&state, &query, json)?;
        }
        Commands::Merge {
            state,
            section,
            patch,
        } => {
            let config = load_config(cli.config, cli.profile)?;
            cmd_merge(&config, state, &section, &patch)?;
        }
        Commands::Validate { state } => {
            cmd_validate(&state)?;
        }
        Commands::Config { action } => {
            cmd_config(cli.config, cli.profile, action)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose {
        "scoutline=debug"
    } else {
        "scoutline=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_parse(config: &Config, query: &str, json: bool) -> Result<()> {
    let interpreter = QueryInterpreter::from_config(&config.interpreter)?;
    let outcome = interpreter.parse(query);

    if json {
        println!("{}", to_pretty_json(&outcome)?);
        return Ok(());
    }

    println!("Confidence: {:.2}", outcome.confidence);
    if outcome.parsed_filters.is_empty() {
        println!("No filters detected");
    } else {
        println!("Filters:");
        println!("{}", to_pretty_json(&outcome.parsed_filters)?);
    }
    for suggestion in &outcome.suggestions {
        println!("  hint: {}", suggestion);
    }

    Ok(())
}

fn cmd_count(state_path: &Path, query: &str, json: bool) -> Result<()> {
    let state = read_state(state_path)?;
    let summary = ActiveFilterCounter::summarize(&state, query);

    if json {
        println!("{}", to_pretty_json(&summary)?);
        return Ok(());
    }

    println!("Active filters: {}", summary.total);
    if summary.platforms_active {
        println!("  platforms");
    }
    if summary.user_search_active {
        println!("  userSearch");
    }
    if summary.query_active {
        println!("  query");
    }
    for section in &summary.sections {
        println!(
            "  {} ({}): {}",
            section.section,
            section.count,
            section.fields.join(", ")
        );
    }

    Ok(())
}

fn cmd_merge(
    config: &Config,
    state_path: Option<PathBuf>,
    section: &str,
    patch: &str,
) -> Result<()> {
    let state = match state_path {
        Some(path) => read_state(&path)?,
        None => FilterState::default(),
    };
    let key: SectionKey = section.parse()?;
    let patch_value = serde_json::from_str(patch).map_err(|e| ScoutlineError::Json {
        source: e,
        context: "Failed to parse patch".to_string(),
    })?;
    let patch = Patch::from_value(patch_value)?;

    let merger = FilterMerger::new(MergePolicy::from(&config.merge));
    let next = merger.merge_section(&state, key, &patch)?;

    println!("{}", to_pretty_json(&next)?);
    Ok(())
}

fn cmd_validate(state_path: &Path) -> Result<()> {
    let state = read_state(state_path)?;
    let errors = state.validate();

    if errors.is_empty() {
        println!("✓ Filter state is valid");
        return Ok(());
    }

    for error in &errors {
        println!("✗ {}", error);
    }
    Err(ScoutlineError::InvalidRange { errors })
}

fn cmd_config(
    config_path: Option<PathBuf>,
    profile: Option<String>,
    action: ConfigAction,
) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = load_config(config_path, profile)?;
            println!("{}", to_pretty_json(&config)?);
        }
        ConfigAction::Validate { file } => {
            let path = match file.or(config_path) {
                Some(path) => path,
                None => Config::default_path()?,
            };
            let config = Config::load(&path)?;
            println!("✓ Configuration is valid");
            println!("  Schema version: {}", config.meta.schema_version);
        }
        ConfigAction::Init { force } => {
            let path = match config_path {
                Some(path) => path,
                None => Config::default_path()?,
            };

            if path.exists() && !force {
                println!("Configuration file already exists at: {}", path.display());
                println!("Use --force to overwrite");
                return Ok(());
            }

            let rules_path = Config::init_files(&path, force)?;
            println!("✓ Configuration initialized at: {}", path.display());
            println!("✓ Rule table at: {}", rules_path.display());
        }
        ConfigAction::Path => {
            println!("{}", Config::default_path()?.display());
        }
    }

    Ok(())
}

fn load_config(config_path: Option<PathBuf>, profile: Option<String>) -> Result<Config> {
    let path = match config_path {
        Some(path) => path,
        None => Config::default_path()?,
    };

    if !path.exists() {
        tracing::debug!(
            "Config file not found, using defaults. Run 'scoutline config init' to create one."
        );
        let mut config = Config::default();
        config.apply_env_overrides();
        if let Some(profile) = profile {
            config.apply_profile(&profile)?;
        }
        return Ok(config);
    }

    match profile {
        Some(profile) => Config::load_with_profile(&path, &profile),
        None => Config::load(&path),
    }
}

fn read_state(path: &Path) -> Result<FilterState> {
    let content = std::fs::read_to_string(path).map_err(|e| ScoutlineError::Io {
        source: e,
        context: format!("Failed to read filter state: {:?}", path),
    })?;
    serde_json::from_str(&content).map_err(|e| ScoutlineError::Json {
        source: e,
        context: format!("Failed to parse filter state: {:?}", path),
    })
}

fn to_pretty_json<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| ScoutlineError::Json {
        source: e,
        context: "Failed to serialize output".to_string(),
    })
}
