//! Abbreviations that should not end a sentence when followed by a period.
//!
//! Two tiers: tokens that are abbreviations however they are cased, and tokens
//! that double as ordinary English words ("sat", "no", "fig") and only count
//! as abbreviations when capitalized ("Sat.", "No.", "Fig.").

use std::collections::HashSet;
use std::sync::LazyLock;

/// Abbreviations matched case-insensitively.
static ABBREVIATIONS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    let mut set = HashSet::new();

    // Titles and honorifics
    set.extend([
        "mr", "mrs", "ms", "dr", "prof", "rev", "fr", "sr", "jr", "messrs", "mmes", "msgr", "hon",
        "esq", "phd", "capt", "col", "gen", "lt", "maj", "sgt", "cpl", "pvt", "adm", "cmdr",
        "sen", "gov", "pres",
    ]);

    // Academic degrees
    set.extend([
        "b.a", "b.s", "m.a", "m.s", "m.b.a", "ph.d", "m.d", "j.d", "ll.b", "ll.m", "d.d.s",
        "d.v.m", "ed.d", "psy.d",
    ]);

    // Latin and reference shorthand
    set.extend([
        "etc", "vs", "e.g", "i.e", "al", "cf", "viz", "ibid", "n.b", "p.s", "r.s.v.p", "approx",
        "pp",
    ]);

    // Time and places
    set.extend([
        "a.m", "p.m", "b.c", "a.d", "c.e", "b.c.e", "sept", "tues", "thurs", "ave", "blvd",
        "apt", "bldg", "dept", "u.s", "u.k", "u.s.a", "e.u", "n.y", "calif", "fla",
    ]);

    // Organizations
    set.extend(["inc", "corp", "ltd", "llc", "bros", "assn", "mfg", "intl"]);

    // Units of measurement that are not also words
    set.extend([
        "oz", "lb", "lbs", "kg", "mg", "ml", "cm", "mm", "km", "ft", "yd", "sq", "mph", "kph",
        "rpm",
    ]);

    set
});

/// Abbreviations that are also common words; only honoured when capitalized.
static CAPITALIZED_ABBREVIATIONS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "jan", "feb", "mar", "apr", "jun", "jul", "aug", "sep", "oct", "nov", "dec", "mon", "tue",
        "wed", "thu", "fri", "sat", "sun", "st", "rd", "no", "nos", "vol", "fig", "ch", "eq",
        "rep", "sec", "co", "mt", "ed", "eds",
    ]
    .into_iter()
    .collect()
});

/// Check if a word (without its trailing period) is a known abbreviation.
pub fn is_abbreviation(word: &str) -> bool {
    let trimmed = word.trim_matches('.');
    let lower = trimmed.to_lowercase();
    if ABBREVIATIONS.contains(lower.as_str()) {
        return true;
    }
    trimmed.chars().next().is_some_and(char::is_uppercase)
        && CAPITALIZED_ABBREVIATIONS.contains(lower.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_abbreviations() {
        assert!(is_abbreviation("dr"));
        assert!(is_abbreviation("Dr"));
        assert!(is_abbreviation("etc"));
        assert!(is_abbreviation("i.e"));
        assert!(is_abbreviation("Ph.D"));
    }

    #[test]
    fn word_like_abbreviations_need_a_capital() {
        assert!(is_abbreviation("Sat"));
        assert!(is_abbreviation("No"));
        assert!(!is_abbreviation("sat"));
        assert!(!is_abbreviation("no"));
    }

    #[test]
    fn not_abbreviations() {
        assert!(!is_abbreviation("hello"));
        assert!(!is_abbreviation("mat"));
        assert!(!is_abbreviation(""));
    }
}
