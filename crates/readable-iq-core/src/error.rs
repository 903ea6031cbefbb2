//! Error types for readable-iq-core.

use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),

    /// Configuration file not found after searching all locations.
    #[error("no configuration file found")]
    NotFound,
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while scoring text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// The input is empty or whitespace-only.
    #[error("no scorable text in input; enter some non-empty text to analyze")]
    EmptyInput,

    /// The input has visible characters but no words to measure.
    #[error("readability computation failed: input contains no words")]
    NoWords,

    /// A formula produced NaN or infinity.
    #[error("readability computation failed: {metric} is not a finite number")]
    NonFinite {
        /// Short code of the metric that failed.
        metric: &'static str,
    },
}

/// Result type alias using [`AnalysisError`].
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Reasons a narrative could not be produced.
///
/// None of these are fatal: the report is rendered without a narrative.
#[derive(Error, Debug)]
pub enum NarrativeError {
    /// No narrator command is configured.
    #[error("narrative generation is not configured")]
    Disabled,

    /// The narrator process could not be started.
    #[error("failed to start narrator `{program}`: {source}")]
    Spawn {
        /// Program that was invoked.
        program: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Reading from or writing to the narrator failed.
    #[error("narrator I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The narrator exited unsuccessfully.
    #[error("narrator exited with {status}: {stderr}")]
    Failed {
        /// Exit status description.
        status: String,
        /// Captured standard error (trimmed).
        stderr: String,
    },

    /// The narrator did not finish in time.
    #[error("narrator timed out after {secs}s")]
    Timeout {
        /// Configured timeout in seconds.
        secs: u64,
    },

    /// The narrator produced no text.
    #[error("narrator returned an empty narrative")]
    Empty,
}

/// Result type alias using [`NarrativeError`].
pub type NarrativeResult<T> = Result<T, NarrativeError>;
