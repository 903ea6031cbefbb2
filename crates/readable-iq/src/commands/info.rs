//! Info command implementation

use clap::Args;
use owo_colors::OwoColorize;
use readable_iq_core::config::{Config, ConfigSources};
use readable_iq_core::metrics::MetricId;
use readable_iq_core::narrative::NarrativeConfig;
use serde::Serialize;
use tracing::{debug, instrument};

/// Arguments for the `info` subcommand.
#[derive(Args, Debug, Default)]
pub struct InfoArgs {
    // No subcommand-specific arguments; uses global --json flag
}

#[derive(Serialize)]
struct PackageInfo {
    name: &'static str,
    version: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    description: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    repository: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    license: &'static str,
}

impl PackageInfo {
    const fn new() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            description: env!("CARGO_PKG_DESCRIPTION"),
            repository: env!("CARGO_PKG_REPOSITORY"),
            license: env!("CARGO_PKG_LICENSE"),
        }
    }
}

#[derive(Serialize)]
struct ConfigInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    config_file: Option<String>,
    log_level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    log_dir: Option<String>,
    /// `None` when the limit is disabled.
    input_limit: Option<usize>,
}

impl ConfigInfo {
    fn from_config(config: &Config, sources: &ConfigSources) -> Self {
        Self {
            config_file: sources.primary_file().map(ToString::to_string),
            log_level: config.log_level.as_str().to_string(),
            log_dir: config.log_dir.as_ref().map(ToString::to_string),
            input_limit: config.input_limit(),
        }
    }
}

/// The narrator as `report --narrate` would run it.
#[derive(Serialize)]
struct NarratorInfo {
    /// Program and arguments joined by spaces; `None` disables narratives.
    command: Option<String>,
    timeout_secs: u64,
    role: String,
    goal: String,
    max_iterations: u32,
    allow_delegation: bool,
    custom_prompt: bool,
}

impl NarratorInfo {
    fn from_config(narrative: &NarrativeConfig) -> Self {
        Self {
            command: narrative.command.as_ref().map(|argv| argv.join(" ")),
            timeout_secs: narrative.timeout_secs,
            role: narrative.role.clone(),
            goal: narrative.goal.clone(),
            max_iterations: narrative.max_iterations,
            allow_delegation: narrative.allow_delegation,
            custom_prompt: narrative.has_custom_prompt(),
        }
    }
}

#[derive(Serialize)]
struct MetricInfo {
    code: &'static str,
    name: &'static str,
}

#[derive(Serialize)]
struct FullInfo {
    #[serde(flatten)]
    package: PackageInfo,
    config: ConfigInfo,
    narrative: NarratorInfo,
    metrics: Vec<MetricInfo>,
}

impl FullInfo {
    fn gather(config: &Config, sources: &ConfigSources) -> Self {
        Self {
            package: PackageInfo::new(),
            config: ConfigInfo::from_config(config, sources),
            narrative: NarratorInfo::from_config(&config.narrative),
            metrics: MetricId::ALL
                .iter()
                .map(|id| MetricInfo {
                    code: id.as_str(),
                    name: id.name(),
                })
                .collect(),
        }
    }
}

/// Print package, configuration, narrator and metric information.
#[instrument(name = "cmd_info", skip_all)]
pub fn cmd_info(
    _args: InfoArgs,
    global_json: bool,
    config: &Config,
    sources: &ConfigSources,
) -> anyhow::Result<()> {
    debug!(json_output = global_json, "executing info command");

    let info = FullInfo::gather(config, sources);

    if global_json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    let package = &info.package;
    println!("{} {}", package.name.bold(), package.version.green());
    if !package.description.is_empty() {
        println!("{}", package.description);
    }
    if !package.license.is_empty() {
        println!("{}: {}", "License".dimmed(), package.license);
    }
    if !package.repository.is_empty() {
        println!("{}: {}", "Repository".dimmed(), package.repository.cyan());
    }

    let config = &info.config;
    println!();
    println!("{}", "Configuration".bold().underline());
    match config.config_file {
        Some(ref path) => println!("{}: {}", "Config file".dimmed(), path.cyan()),
        None => println!("{}: {}", "Config file".dimmed(), "none loaded".yellow()),
    }
    println!("{}: {}", "Log level".dimmed(), config.log_level);
    if let Some(ref dir) = config.log_dir {
        println!("{}: {}", "Log directory".dimmed(), dir);
    }
    match config.input_limit {
        Some(bytes) => println!("{}: {bytes} bytes", "Input limit".dimmed()),
        None => println!("{}: {}", "Input limit".dimmed(), "disabled".yellow()),
    }

    let narrator = &info.narrative;
    println!();
    println!("{}", "Narrative".bold().underline());
    match narrator.command {
        Some(ref command) => println!("{}: {}", "Command".dimmed(), command.cyan()),
        None => println!("{}: {}", "Command".dimmed(), "(not set)".dimmed()),
    }
    println!("{}: {}s", "Timeout".dimmed(), narrator.timeout_secs);
    println!("{}: {}", "Role".dimmed(), narrator.role);
    println!("{}: {}", "Goal".dimmed(), narrator.goal);
    println!(
        "{}: {} (delegation {})",
        "Max iterations".dimmed(),
        narrator.max_iterations,
        if narrator.allow_delegation { "allowed" } else { "off" }
    );
    let prompt = if narrator.custom_prompt {
        "custom".yellow().to_string()
    } else {
        "built-in".to_string()
    };
    println!("{}: {prompt}", "Prompt".dimmed());

    println!();
    println!("{}", "Metrics".bold().underline());
    for metric in &info.metrics {
        println!("  {:<5} {}", metric.code.cyan(), metric.name);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_output_succeeds() {
        let result = cmd_info(
            InfoArgs::default(),
            false,
            &Config::default(),
            &ConfigSources::default(),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn json_output_succeeds() {
        let result = cmd_info(
            InfoArgs::default(),
            true,
            &Config::default(),
            &ConfigSources::default(),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn config_info_reflects_config() {
        let mut config = Config::default();
        config.disable_input_limit = true;

        let info = ConfigInfo::from_config(&config, &ConfigSources::default());
        assert!(info.config_file.is_none());
        assert_eq!(info.log_level, "info");
        assert_eq!(info.input_limit, None);
    }

    #[test]
    fn narrator_info_carries_persona_settings() {
        let mut narrative = NarrativeConfig {
            command: Some(vec!["llm".into(), "-s".into()]),
            role: "Plain Language Editor".into(),
            max_iterations: 3,
            allow_delegation: true,
            ..NarrativeConfig::default()
        };
        let info = NarratorInfo::from_config(&narrative);
        assert_eq!(info.command.as_deref(), Some("llm -s"));
        assert_eq!(info.role, "Plain Language Editor");
        assert_eq!(info.max_iterations, 3);
        assert!(info.allow_delegation);
        assert!(!info.custom_prompt);

        narrative.prompt_template = "Explain {scores}".into();
        assert!(NarratorInfo::from_config(&narrative).custom_prompt);
    }

    #[test]
    fn metrics_listed_in_score_order() {
        let info = FullInfo::gather(&Config::default(), &ConfigSources::default());
        let codes: Vec<_> = info.metrics.iter().map(|m| m.code).collect();
        assert_eq!(
            codes,
            ["FRE", "SMOG", "FKG", "CLI", "ARI", "DCRS", "DW", "LWF", "GFI", "TS"]
        );
        assert_eq!(info.metrics[0].name, "Flesch Reading Ease");
    }
}
