//! The readability scorer.
//!
//! [`score`] turns a validated [`Text`] into a [`ScoreSet`] of ten metrics:
//! Flesch Reading Ease, SMOG, Flesch-Kincaid, Coleman-Liau, ARI, Dale-Chall,
//! difficult words, Linsear Write, Gunning Fog and a consolidated grade label.
//!
//! Scoring is deterministic and does no I/O. Values are rounded half-up to the
//! precision each formula is conventionally reported at.

use std::collections::HashSet;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::dictionaries::familiar_words::is_familiar;
use crate::dictionaries::syllables::count_syllables;
use crate::error::{AnalysisError, AnalysisResult};
use crate::metrics::ScoreSet;
use crate::text;

/// Sentences with this many words or fewer are not counted.
const MAX_FRAGMENT_WORDS: usize = 2;
/// Words sampled by the Linsear Write formula.
const LINSEAR_SAMPLE_WORDS: usize = 100;
/// SMOG is undefined below this many sentences and reported as 0.0.
const SMOG_MIN_SENTENCES: usize = 3;
/// Syllables at which a word counts as polysyllabic (or "hard").
const POLYSYLLABLE: usize = 3;

/// Input text, guaranteed non-empty after trimming whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text(String);

impl Text {
    /// Validate raw input.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::EmptyInput`] for empty or whitespace-only input.
    pub fn new(raw: impl Into<String>) -> AnalysisResult<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(AnalysisError::EmptyInput);
        }
        Ok(Self(raw))
    }

    /// The text as given.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Text {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Segmentation counts the formulas are computed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TextStatistics {
    /// Sentences of three or more words (at least 1).
    pub sentences: usize,
    /// Words.
    pub words: usize,
    /// Total syllables.
    pub syllables: usize,
    /// Letters and digits.
    pub letters: usize,
    /// Non-whitespace characters.
    pub characters: usize,
    /// Words of three or more syllables.
    pub polysyllables: usize,
    /// Word occurrences not on the familiar-word list.
    pub unfamiliar_words: usize,
    /// Unfamiliar word occurrences of three or more syllables.
    pub complex_words: usize,
    /// Distinct unfamiliar words of two or more syllables.
    pub difficult_words: usize,
}

impl TextStatistics {
    /// Count everything the formulas need in one pass over the words.
    #[tracing::instrument(skip_all, fields(text_len = text.len()))]
    pub fn collect(text: &str) -> Self {
        let words = text::words(text);
        let mut stats = Self {
            sentences: sentence_count(text),
            words: words.len(),
            syllables: 0,
            letters: text::letter_count(text),
            characters: text::char_count(text),
            polysyllables: 0,
            unfamiliar_words: 0,
            complex_words: 0,
            difficult_words: 0,
        };

        let mut difficult = HashSet::new();
        for word in words {
            let syllables = count_syllables(word);
            stats.syllables += syllables;
            if syllables >= POLYSYLLABLE {
                stats.polysyllables += 1;
            }
            // Numbers are not vocabulary
            if !word.chars().any(char::is_alphabetic) || is_familiar(word) {
                continue;
            }
            stats.unfamiliar_words += 1;
            if syllables >= POLYSYLLABLE {
                stats.complex_words += 1;
            }
            if syllables >= 2 {
                difficult.insert(word.to_lowercase());
            }
        }
        stats.difficult_words = difficult.len();

        tracing::debug!(
            sentences = stats.sentences,
            words = stats.words,
            syllables = stats.syllables,
            "collected text statistics"
        );
        stats
    }
}

/// Score a text.
///
/// # Errors
///
/// Returns [`AnalysisError::NoWords`] when the text has nothing to count
/// (only punctuation or symbols) and [`AnalysisError::NonFinite`] if a
/// formula leaves the finite range.
pub fn score(text: &Text) -> AnalysisResult<ScoreSet> {
    score_with_statistics(text).map(|(scores, _)| scores)
}

/// Score a text and return the counts the scores were derived from.
///
/// # Errors
///
/// Same as [`score`].
#[tracing::instrument(skip(text), fields(text_len = text.as_str().len()))]
pub fn score_with_statistics(text: &Text) -> AnalysisResult<(ScoreSet, TextStatistics)> {
    let stats = TextStatistics::collect(text.as_str());
    if stats.words == 0 {
        return Err(AnalysisError::NoWords);
    }

    let words = stats.words as f64;
    let sentences = stats.sentences as f64;
    let asl = words / sentences;
    let asw = stats.syllables as f64 / words;

    let fre = finite("FRE", 206.835 - 1.015f64.mul_add(asl, 84.6 * asw), 2)?;
    let fkg = finite("FKG", 0.39f64.mul_add(asl, 11.8 * asw) - 15.59, 1)?;

    let smog = if stats.sentences >= SMOG_MIN_SENTENCES {
        let per_thirty = 30.0 * stats.polysyllables as f64 / sentences;
        finite("SMOG", 1.043f64.mul_add(per_thirty.sqrt(), 3.1291), 1)?
    } else {
        0.0
    };

    let letters_per_100 = stats.letters as f64 / words * 100.0;
    let sentences_per_100 = sentences / words * 100.0;
    let cli = finite(
        "CLI",
        0.058f64.mul_add(letters_per_100, -0.296 * sentences_per_100) - 15.8,
        2,
    )?;

    let chars_per_word = stats.characters as f64 / words;
    let ari = finite("ARI", 4.71f64.mul_add(chars_per_word, 0.5 * asl) - 21.43, 1)?;

    let unfamiliar_pct = stats.unfamiliar_words as f64 / words * 100.0;
    let mut dale_chall = 0.1579f64.mul_add(unfamiliar_pct, 0.0496 * asl);
    if unfamiliar_pct > 5.0 {
        dale_chall += 3.6365;
    }
    let dcrs = finite("DCRS", dale_chall, 2)?;

    let lwf = finite("LWF", linsear_write(text.as_str()), 2)?;

    let complex_pct = stats.complex_words as f64 / words * 100.0;
    let gfi = finite("GFI", 0.4 * (asl + complex_pct), 2)?;

    let ts = text_standard(fre, [fkg, smog, cli, ari, dcrs, lwf, gfi]);

    let scores = ScoreSet {
        fre,
        smog,
        fkg,
        cli,
        ari,
        dcrs,
        dw: stats.difficult_words as u64,
        lwf,
        gfi,
        ts,
    };
    tracing::debug!(fre, fkg, standard = %scores.ts, "scored text");
    Ok((scores, stats))
}

/// Count sentences, ignoring fragments of two words or fewer.
fn sentence_count(text: &str) -> usize {
    text::split_sentences(text)
        .iter()
        .filter(|sentence| text::words(sentence).len() > MAX_FRAGMENT_WORDS)
        .count()
        .max(1)
}

/// Linsear Write over the first hundred words.
fn linsear_write(text: &str) -> f64 {
    let sample = text::leading_words(text, LINSEAR_SAMPLE_WORDS);
    let (easy, hard) = text::words(sample)
        .into_iter()
        .fold((0usize, 0usize), |(easy, hard), word| {
            if count_syllables(word) >= POLYSYLLABLE {
                (easy, hard + 1)
            } else {
                (easy + 1, hard)
            }
        });

    let mut raw = (easy + 3 * hard) as f64 / sentence_count(sample) as f64;
    if raw <= 20.0 {
        raw -= 2.0;
    }
    raw / 2.0
}

fn finite(metric: &'static str, value: f64, places: i32) -> AnalysisResult<f64> {
    if value.is_finite() {
        Ok(round_half_up(value, places))
    } else {
        Err(AnalysisError::NonFinite { metric })
    }
}

/// Round half up, toward positive infinity, as school-grade rounding expects.
fn round_half_up(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale + 0.5).floor() / scale
}

/// Consolidate the grade-type metrics into a single label.
///
/// Each grade contributes its rounded and ceiling values, Flesch Reading Ease
/// contributes its school-grade bucket, and the most frequent grade wins
/// (ties go to the earliest).
fn text_standard(fre: f64, grades: [f64; 7]) -> String {
    let [fkg, rest @ ..] = grades;
    let mut votes = Vec::with_capacity(15);
    push_grade(&mut votes, fkg);
    votes.extend_from_slice(reading_ease_grades(fre));
    for grade in rest {
        push_grade(&mut votes, grade);
    }
    grade_label(most_common(&votes))
}

#[allow(clippy::cast_possible_truncation)]
fn push_grade(votes: &mut Vec<i64>, grade: f64) {
    votes.push(round_half_up(grade, 0) as i64);
    votes.push(grade.ceil() as i64);
}

fn reading_ease_grades(fre: f64) -> &'static [i64] {
    match fre {
        f if f >= 90.0 => &[5],
        f if f >= 80.0 => &[6],
        f if f >= 70.0 => &[7],
        f if f >= 60.0 => &[8, 9],
        f if f >= 50.0 => &[10],
        f if f >= 40.0 => &[11],
        f if f >= 30.0 => &[12],
        _ => &[13],
    }
}

fn most_common(votes: &[i64]) -> i64 {
    let mut best = (0, 0);
    for &grade in votes {
        let count = votes.iter().filter(|&&g| g == grade).count();
        if count > best.1 {
            best = (grade, count);
        }
    }
    best.0
}

fn grade_label(grade: i64) -> String {
    let upper = grade.max(1);
    let lower = upper - 1;
    if lower == 0 {
        return format!("kindergarten and {upper}{} grade", ordinal_suffix(upper));
    }
    format!(
        "{lower}{} and {upper}{} grade",
        ordinal_suffix(lower),
        ordinal_suffix(upper)
    )
}

const fn ordinal_suffix(n: i64) -> &'static str {
    match (n % 100, n % 10) {
        (11..=13, _) => "th",
        (_, 1) => "st",
        (_, 2) => "nd",
        (_, 3) => "rd",
        _ => "th",
    }
}
