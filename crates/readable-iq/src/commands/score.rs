//! Score command: the ten readability metrics.

use anyhow::Context;
use clap::Args;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use readable_iq_core::{ScoreSet, TextStatistics, score_with_statistics};

use super::InputArgs;

/// Arguments for the `score` subcommand.
#[derive(Args, Debug, Default)]
pub struct ScoreArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Also print the counts the scores are derived from
    #[arg(long)]
    pub stats: bool,
}

#[derive(Serialize)]
struct ScoreOutput<'a> {
    scores: &'a ScoreSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    statistics: Option<&'a TextStatistics>,
}

/// Score the input and print the metrics.
#[instrument(name = "cmd_score", skip_all, fields(file = ?args.input.file))]
pub fn cmd_score(
    args: ScoreArgs,
    global_json: bool,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    let text = args.input.load(max_input_bytes)?;
    debug!(text_len = text.as_str().len(), "executing score command");

    let (scores, stats) = score_with_statistics(&text).context("failed to score text")?;

    if global_json {
        let output = ScoreOutput {
            scores: &scores,
            statistics: args.stats.then_some(&stats),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    for (id, value) in scores.entries() {
        println!("{}: {}", id.as_str().bold(), value);
    }
    if args.stats {
        println!();
        for (label, count) in [
            ("Sentences", stats.sentences),
            ("Words", stats.words),
            ("Syllables", stats.syllables),
            ("Letters", stats.letters),
            ("Characters", stats.characters),
            ("Polysyllables", stats.polysyllables),
            ("Unfamiliar words", stats.unfamiliar_words),
        ] {
            println!("{}: {count}", label.dimmed());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(text: &str, stats: bool) -> ScoreArgs {
        ScoreArgs {
            input: InputArgs {
                text: Some(text.to_string()),
                ..InputArgs::default()
            },
            stats,
        }
    }

    #[test]
    fn text_output_succeeds() {
        assert!(cmd_score(args("The cat sat.", true), false, None).is_ok());
    }

    #[test]
    fn json_output_succeeds() {
        assert!(cmd_score(args("The cat sat.", false), true, None).is_ok());
    }

    #[test]
    fn punctuation_only_fails() {
        let err = cmd_score(args("?!", false), false, None).unwrap_err();
        assert!(format!("{err:#}").contains("no words"), "{err:#}");
    }
}
