//! Report command: scores, explanations and an optional narrative.

use std::time::Duration;

use anyhow::Context;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, instrument, warn};

use readable_iq_core::{
    CommandNarrator, NarrativeConfig, Report, ReportFormat, ScoreSet, Text, score,
};

use super::InputArgs;

/// Arguments for the `report` subcommand.
#[derive(Args, Debug, Default)]
pub struct ReportArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Ask the configured narrator to explain the scores
    #[arg(long)]
    pub narrate: bool,

    /// Report layout (ignored with --json)
    #[arg(long, value_enum, default_value_t)]
    pub format: ReportFormat,
}

/// Assemble and print a report for the input.
#[instrument(name = "cmd_report", skip_all, fields(file = ?args.input.file, narrate = args.narrate))]
pub fn cmd_report(
    args: ReportArgs,
    global_json: bool,
    narrative: &NarrativeConfig,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    let text = args.input.load(max_input_bytes)?;
    debug!(format = ?args.format, "executing report command");

    let scores = score(&text).context("failed to score text")?;
    let report = if args.narrate {
        narrated_report(&text, &scores, narrative)
    } else {
        Report::assemble(&text, &scores, None)
    };

    if global_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render(args.format));
    }
    Ok(())
}

fn narrated_report(text: &Text, scores: &ScoreSet, config: &NarrativeConfig) -> Report {
    let narrator = match CommandNarrator::from_config(config) {
        Ok(narrator) => narrator,
        Err(e) => {
            warn!(error = %e, "set narrative.command in the config to enable --narrate");
            return Report::assemble(text, scores, None);
        }
    };

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Waiting for {} to explain the scores...", narrator.program()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let report = Report::assemble_with_narrator(text, scores, Some(&narrator));
    spinner.finish_and_clear();
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(narrate: bool, format: ReportFormat) -> ReportArgs {
        ReportArgs {
            input: InputArgs {
                text: Some("The quick brown fox jumps over the lazy dog.".into()),
                ..InputArgs::default()
            },
            narrate,
            format,
        }
    }

    #[test]
    fn markdown_report_succeeds() {
        let config = NarrativeConfig::default();
        assert!(cmd_report(args(false, ReportFormat::Markdown), false, &config, None).is_ok());
    }

    #[test]
    fn narrate_without_command_still_reports() {
        let config = NarrativeConfig::default();
        assert!(cmd_report(args(true, ReportFormat::Text), true, &config, None).is_ok());
    }

    #[test]
    fn unconfigured_narrator_yields_no_narrative() {
        let text = Text::new("The cat sat.").unwrap();
        let scores = score(&text).unwrap();
        let report = narrated_report(&text, &scores, &NarrativeConfig::default());
        assert!(report.narrative.is_none());
        assert_eq!(report.entries.len(), 10);
    }

    #[cfg(unix)]
    #[test]
    fn configured_narrator_adds_narrative() {
        let config = NarrativeConfig {
            command: Some(vec![
                "sh".into(),
                "-c".into(),
                "cat > /dev/null; echo Plain words.".into(),
            ]),
            ..NarrativeConfig::default()
        };
        let text = Text::new("The cat sat.").unwrap();
        let scores = score(&text).unwrap();
        let report = narrated_report(&text, &scores, &config);
        assert_eq!(report.narrative.as_deref(), Some("Plain words."));
    }
}
