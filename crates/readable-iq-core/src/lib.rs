//! Core library for readable-iq.
//!
//! Scores prose with ten classic readability metrics and assembles the
//! results into a report, optionally with a narrative from an external
//! generator.
//!
//! # Modules
//!
//! - [`readability`] - The scorer: [`Text`] in, [`ScoreSet`] out
//! - [`metrics`] - Metric identifiers, values and the ordered score set
//! - [`report`] - Report assembly and rendering
//! - [`narrative`] - The narrative generator seam
//! - [`text`] - Sentence and word segmentation
//! - [`dictionaries`] - Abbreviations, syllables and familiar words
//! - [`markdown`] - Markdown to prose
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//!
//! # Quick Start
//!
//! ```
//! use readable_iq_core::{Report, Text, score};
//!
//! let text = Text::new("The quick brown fox jumps over the lazy dog.")?;
//! let scores = score(&text)?;
//! assert_eq!(scores.difficult_words(), 0);
//!
//! let report = Report::assemble(&text, &scores, None);
//! println!("{}", report.render_markdown());
//! # Ok::<(), readable_iq_core::AnalysisError>(())
//! ```
#![deny(unsafe_code)]

pub mod config;
pub mod dictionaries;
pub mod error;
pub mod markdown;
pub mod metrics;
pub mod narrative;
pub mod readability;
pub mod report;
pub mod text;

pub use config::{Config, ConfigLoader, ConfigSources, DEFAULT_MAX_INPUT_BYTES, LogLevel};
pub use error::{
    AnalysisError, AnalysisResult, ConfigError, ConfigResult, NarrativeError, NarrativeResult,
};
pub use metrics::{MetricId, MetricValue, ScoreSet};
pub use narrative::{CommandNarrator, NarrativeConfig, NarrativeRequest, Narrator};
pub use readability::{Text, TextStatistics, score, score_with_statistics};
pub use report::{Report, ReportFormat, ScoreEntry};
