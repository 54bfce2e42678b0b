//! Config validation CLI tool
//!
//! Checks an iqnotify configuration file and shows which channels each
//! presence entity feeds.

use iqnotify_config::{ConfigError, NotifyConfig, CURRENT_CONFIG_VERSION};
use iqnotify_util::default_config_path;
use std::path::PathBuf;
use std::process::ExitCode;

fn print_help() {
    eprintln!("Usage: validate-config [config-file]");
    eprintln!();
    eprintln!("Checks the (entity, service) pairs and the lookback window of an");
    eprintln!("iqnotify configuration, then lists the channels fed by each entity.");
    eprintln!();
    eprintln!("Without an argument the default config is checked:");
    eprintln!("  {}", default_config_path().display());
    eprintln!("(set IQNOTIFY_CONFIG to change the default)");
}

fn print_summary(config: &NotifyConfig) {
    println!("✓ Configuration is valid");
    println!();
    println!("  Lookback window:   {}", config.service.default_window);
    println!("  Presence database: {}", config.service.presence_db.display());
    if !config.service.presence_db.exists() {
        println!("    (not found yet; iqnotifyd will fail to open it)");
    }

    if config.pairs.is_empty() {
        println!();
        println!("No pairs configured: every notification will be dropped.");
        return;
    }

    // Group channels under their entity, keeping first-seen order
    let mut entities: Vec<(&str, Vec<&str>)> = Vec::new();
    for pair in &config.pairs {
        let entity = pair.entity.as_str();
        match entities.iter_mut().find(|(e, _)| *e == entity) {
            Some((_, channels)) => channels.push(pair.channel.as_str()),
            None => entities.push((entity, vec![pair.channel.as_str()])),
        }
    }

    println!();
    println!(
        "{} pair(s) over {} presence entit{}:",
        config.pairs.len(),
        entities.len(),
        if entities.len() == 1 { "y" } else { "ies" }
    );
    for (entity, channels) in entities {
        println!("  {} -> notify.{}", entity, channels.join(", notify."));
    }
}

fn print_error(err: &ConfigError) {
    eprintln!("✗ Configuration is invalid");
    eprintln!();
    match err {
        ConfigError::ReadError(io_err) => eprintln!("Cannot read file: {}", io_err),
        ConfigError::ParseError(parse_err) => eprintln!("TOML parse error:\n  {}", parse_err),
        ConfigError::ValidationFailed { errors } => {
            for err in errors {
                eprintln!("  - {}", err);
            }
        }
        ConfigError::UnsupportedVersion(ver) => eprintln!(
            "config_version = {} is not supported (expected {})",
            ver, CURRENT_CONFIG_VERSION
        ),
    }
}

fn main() -> ExitCode {
    let config_path = match std::env::args().nth(1).as_deref() {
        Some("-h" | "--help") => {
            print_help();
            return ExitCode::SUCCESS;
        }
        Some(path) => PathBuf::from(path),
        None => default_config_path(),
    };

    match iqnotify_config::load_config(&config_path) {
        Ok(config) => {
            println!("{}", config_path.display());
            print_summary(&config);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", config_path.display());
            print_error(&e);
            ExitCode::from(1)
        }
    }
}
