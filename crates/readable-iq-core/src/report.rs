//! Report assembly and rendering.
//!
//! A [`Report`] pairs the analysed text with its scores, in fixed metric
//! order, and an optional narrative. Assembly never fails: a narrator that
//! errors or returns nothing simply leaves the narrative out.

use std::fmt::Write as _;

use serde::Serialize;

use crate::metrics::{MetricId, MetricValue, ScoreSet};
use crate::narrative::{NarrativeRequest, Narrator};
use crate::readability::Text;

/// Output layout for a rendered report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ReportFormat {
    /// Aligned plain-text table.
    #[default]
    Text,
    /// The full "Readability Analysis Report" with explanations.
    Markdown,
}

/// One metric line of a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreEntry {
    /// Short metric code.
    pub id: MetricId,
    /// Display name.
    pub name: &'static str,
    /// The value exactly as scored.
    pub value: MetricValue,
    /// What the metric measures.
    pub explanation: &'static str,
}

/// A text, its scores, and an optional narrative.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// The analysed text, verbatim.
    pub text: String,
    /// One entry per metric, in score-set order.
    pub entries: Vec<ScoreEntry>,
    /// Free-text explanation, when one was produced.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative: Option<String>,
}

impl Report {
    /// Assemble a report from already-computed parts.
    ///
    /// A narrative that is empty or only whitespace is dropped.
    pub fn assemble(text: &Text, scores: &ScoreSet, narrative: Option<String>) -> Self {
        let entries = scores
            .entries()
            .map(|(id, value)| ScoreEntry {
                id,
                name: id.name(),
                value,
                explanation: id.explanation(),
            })
            .collect();
        Self {
            text: text.as_str().to_string(),
            entries,
            narrative: narrative.filter(|n| !n.trim().is_empty()),
        }
    }

    /// Assemble a report, asking `narrator` for a narrative if one is given.
    ///
    /// Narrator failures are logged and the report is returned without a
    /// narrative.
    #[tracing::instrument(skip_all, fields(text_len = text.as_str().len(), narrated = narrator.is_some()))]
    pub fn assemble_with_narrator(
        text: &Text,
        scores: &ScoreSet,
        narrator: Option<&dyn Narrator>,
    ) -> Self {
        let narrative = narrator.and_then(|narrator| {
            match narrator.narrate(&NarrativeRequest::new(text, scores)) {
                Ok(narrative) => Some(narrative),
                Err(e) => {
                    tracing::warn!(error = %e, "narrative unavailable; reporting scores only");
                    None
                }
            }
        });
        Self::assemble(text, scores, narrative)
    }

    /// The scores as `ID: value` lines.
    pub fn listing(&self) -> String {
        self.entries
            .iter()
            .map(|entry| format!("{}: {}", entry.id, entry.value))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Render in the requested layout.
    pub fn render(&self, format: ReportFormat) -> String {
        match format {
            ReportFormat::Text => self.render_text(),
            ReportFormat::Markdown => self.render_markdown(),
        }
    }

    /// Aligned name/code/value table followed by the narrative.
    pub fn render_text(&self) -> String {
        let width = self
            .entries
            .iter()
            .map(|entry| entry.name.len() + entry.id.as_str().len() + 3)
            .max()
            .unwrap_or(0);

        let mut out = String::new();
        for entry in &self.entries {
            let label = format!("{} ({})", entry.name, entry.id);
            let _ = writeln!(out, "{label:<width$}  {}", entry.value);
        }
        if let Some(narrative) = &self.narrative {
            let _ = write!(out, "\n{narrative}\n");
        }
        out
    }

    /// The full export: text, score listing, numbered explanations, and a
    /// summary section when a narrative exists.
    pub fn render_markdown(&self) -> String {
        let mut out = String::new();
        section(&mut out, "Readability Analysis Report", '=');
        out.push('\n');
        section(&mut out, "Text Analyzed:", '-');
        let _ = writeln!(out, "{}\n", self.text.trim_end());
        section(&mut out, "Readability Scores:", '-');
        let _ = writeln!(out, "{}\n", self.listing());
        section(&mut out, "Analysis and Explanation:", '-');

        for (n, entry) in self.entries.iter().enumerate() {
            let _ = writeln!(out, "{}. **{} ({}):**", n + 1, entry.name, entry.id);
            let _ = writeln!(out, "    - **{}:** {}", entry.id.value_label(), entry.value);
            let _ = writeln!(out, "    - **Explanation:** {}", entry.explanation);
            out.push('\n');
        }

        if let Some(narrative) = &self.narrative {
            section(&mut out, "Summary:", '-');
            let _ = writeln!(out, "{narrative}");
        }
        out
    }
}

fn section(out: &mut String, title: &str, underline: char) {
    let rule: String = std::iter::repeat_n(underline, title.len()).collect();
    let _ = writeln!(out, "{title}\n{rule}");
}
