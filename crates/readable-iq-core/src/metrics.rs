//! Metric identifiers, values, and the fixed-order score set.
//!
//! A [`ScoreSet`] always holds exactly ten metrics in the order of
//! [`MetricId::ALL`]. It is only built by [`crate::readability::score`], so a
//! partially filled set can never be observed.

use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Identifier of one readability metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum MetricId {
    /// Flesch Reading Ease.
    #[cfg_attr(feature = "clap", value(name = "FRE"))]
    Fre,
    /// SMOG grade.
    #[cfg_attr(feature = "clap", value(name = "SMOG"))]
    Smog,
    /// Flesch-Kincaid grade level.
    #[cfg_attr(feature = "clap", value(name = "FKG"))]
    Fkg,
    /// Coleman-Liau index.
    #[cfg_attr(feature = "clap", value(name = "CLI"))]
    Cli,
    /// Automated Readability Index.
    #[cfg_attr(feature = "clap", value(name = "ARI"))]
    Ari,
    /// Dale-Chall readability score.
    #[cfg_attr(feature = "clap", value(name = "DCRS"))]
    Dcrs,
    /// Difficult-word count.
    #[cfg_attr(feature = "clap", value(name = "DW"))]
    Dw,
    /// Linsear Write formula.
    #[cfg_attr(feature = "clap", value(name = "LWF"))]
    Lwf,
    /// Gunning Fog index.
    #[cfg_attr(feature = "clap", value(name = "GFI"))]
    Gfi,
    /// Consolidated grade-level label.
    #[cfg_attr(feature = "clap", value(name = "TS"))]
    Ts,
}

impl MetricId {
    /// Every metric, in score-set order.
    pub const ALL: [Self; 10] = [
        Self::Fre,
        Self::Smog,
        Self::Fkg,
        Self::Cli,
        Self::Ari,
        Self::Dcrs,
        Self::Dw,
        Self::Lwf,
        Self::Gfi,
        Self::Ts,
    ];

    /// Short code used as the score-set key ("FRE", "DW", ...).
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Fre => "FRE",
            Self::Smog => "SMOG",
            Self::Fkg => "FKG",
            Self::Cli => "CLI",
            Self::Ari => "ARI",
            Self::Dcrs => "DCRS",
            Self::Dw => "DW",
            Self::Lwf => "LWF",
            Self::Gfi => "GFI",
            Self::Ts => "TS",
        }
    }

    /// Human-readable metric name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Fre => "Flesch Reading Ease",
            Self::Smog => "SMOG Index",
            Self::Fkg => "Flesch-Kincaid Grade Level",
            Self::Cli => "Coleman-Liau Index",
            Self::Ari => "Automated Readability Index",
            Self::Dcrs => "Dale-Chall Readability Score",
            Self::Dw => "Difficult Words",
            Self::Lwf => "Linsear Write Formula",
            Self::Gfi => "Gunning Fog Index",
            Self::Ts => "Text Standard",
        }
    }

    /// What the metric measures, for readers of a report.
    pub const fn explanation(&self) -> &'static str {
        match self {
            Self::Fre => {
                "This score indicates how easy the text is to read. A higher score suggests \
                 easier readability. This score is influenced by the average sentence length \
                 and the average number of syllables per word."
            }
            Self::Smog => {
                "This score estimates the years of education needed to understand the text. \
                 It considers the number of polysyllabic words."
            }
            Self::Fkg => {
                "This score represents the U.S. school grade level required to understand the \
                 text. It is derived from sentence length and word length."
            }
            Self::Cli => {
                "This index calculates the readability of the text based on characters per \
                 word and words per sentence, rather than syllables."
            }
            Self::Ari => {
                "This index estimates the U.S. grade level needed to comprehend the text, \
                 based on characters per word and words per sentence."
            }
            Self::Dcrs => {
                "This score considers the familiarity of words used in the text, comparing \
                 them against a list of commonly known words."
            }
            Self::Dw => {
                "This is the number of complex words in the text that may be difficult for \
                 readers to understand."
            }
            Self::Lwf => {
                "This formula calculates readability based on the number of easy and hard \
                 words, and the sentence length."
            }
            Self::Gfi => {
                "This index estimates the years of formal education needed to understand the \
                 text, based on sentence complexity and word difficulty."
            }
            Self::Ts => {
                "This standard gives an overall grade level for the text based on various \
                 readability formulas."
            }
        }
    }

    /// Label for the value line in a report: "Count" for DW, "Standard" for TS.
    pub const fn value_label(&self) -> &'static str {
        match self {
            Self::Dw => "Count",
            Self::Ts => "Standard",
            _ => "Score",
        }
    }
}

impl fmt::Display for MetricId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for MetricId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// The value of one metric.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    /// A real-valued score or grade.
    Real(f64),
    /// A non-negative count.
    Count(u64),
    /// A textual label.
    Label(String),
}

impl MetricValue {
    /// The value as a number, if it is one. Useful for charting.
    #[allow(clippy::cast_precision_loss)]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Real(v) => Some(*v),
            Self::Count(n) => Some(*n as f64),
            Self::Label(_) => None,
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Keep a decimal point on whole numbers so "0.0" reads as a score
            Self::Real(v) if v.fract() == 0.0 => write!(f, "{v:.1}"),
            Self::Real(v) => write!(f, "{v}"),
            Self::Count(n) => write!(f, "{n}"),
            Self::Label(s) => f.write_str(s),
        }
    }
}

/// The ten readability metrics for one text.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreSet {
    pub(crate) fre: f64,
    pub(crate) smog: f64,
    pub(crate) fkg: f64,
    pub(crate) cli: f64,
    pub(crate) ari: f64,
    pub(crate) dcrs: f64,
    pub(crate) dw: u64,
    pub(crate) lwf: f64,
    pub(crate) gfi: f64,
    pub(crate) ts: String,
}

impl ScoreSet {
    /// Flesch Reading Ease.
    pub const fn flesch_reading_ease(&self) -> f64 {
        self.fre
    }

    /// SMOG grade (0.0 for texts under three sentences).
    pub const fn smog_index(&self) -> f64 {
        self.smog
    }

    /// Flesch-Kincaid grade level.
    pub const fn flesch_kincaid_grade(&self) -> f64 {
        self.fkg
    }

    /// Coleman-Liau index.
    pub const fn coleman_liau_index(&self) -> f64 {
        self.cli
    }

    /// Automated Readability Index.
    pub const fn automated_readability_index(&self) -> f64 {
        self.ari
    }

    /// Dale-Chall readability score.
    pub const fn dale_chall_score(&self) -> f64 {
        self.dcrs
    }

    /// Number of distinct difficult words.
    pub const fn difficult_words(&self) -> u64 {
        self.dw
    }

    /// Linsear Write formula result.
    pub const fn linsear_write(&self) -> f64 {
        self.lwf
    }

    /// Gunning Fog index.
    pub const fn gunning_fog(&self) -> f64 {
        self.gfi
    }

    /// Consolidated grade-level label.
    pub fn text_standard(&self) -> &str {
        &self.ts
    }

    /// Value of a single metric.
    pub fn get(&self, id: MetricId) -> MetricValue {
        match id {
            MetricId::Fre => MetricValue::Real(self.fre),
            MetricId::Smog => MetricValue::Real(self.smog),
            MetricId::Fkg => MetricValue::Real(self.fkg),
            MetricId::Cli => MetricValue::Real(self.cli),
            MetricId::Ari => MetricValue::Real(self.ari),
            MetricId::Dcrs => MetricValue::Real(self.dcrs),
            MetricId::Dw => MetricValue::Count(self.dw),
            MetricId::Lwf => MetricValue::Real(self.lwf),
            MetricId::Gfi => MetricValue::Real(self.gfi),
            MetricId::Ts => MetricValue::Label(self.ts.clone()),
        }
    }

    /// All metrics as `(id, value)` pairs in fixed order.
    pub fn entries(&self) -> impl Iterator<Item = (MetricId, MetricValue)> + '_ {
        MetricId::ALL.into_iter().map(|id| (id, self.get(id)))
    }

    /// One `ID: value` line per metric, in fixed order.
    ///
    /// This is the listing handed to a narrative generator alongside the text.
    pub fn to_listing(&self) -> String {
        self.entries()
            .map(|(id, value)| format!("{id}: {value}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Serialize for ScoreSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(MetricId::ALL.len()))?;
        for (id, value) in self.entries() {
            map.serialize_entry(id.as_str(), &value)?;
        }
        map.end()
    }
}
