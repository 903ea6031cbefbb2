//! Word tables for text segmentation and scoring.
//!
//! Provides the abbreviation set used by sentence splitting, the syllable
//! counter, and the Dale-Chall familiar-word list.

pub mod abbreviations;
pub mod familiar_words;
pub mod syllables;
