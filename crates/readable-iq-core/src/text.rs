//! Text segmentation.
//!
//! Splits prose into sentences and words and counts the character classes the
//! readability formulas need. All functions are pure and allocation-light so
//! the scorer can call them on every request.

use regex::Regex;
use std::sync::LazyLock;

use crate::dictionaries::abbreviations::is_abbreviation;

/// Initials (J.K., U.S.A., etc.).
static INITIALS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z]\.(?:[A-Z]\.)*").expect("valid regex"));

/// Sentences shorter than this many bytes are dropped as noise.
const MIN_SENTENCE_LEN: usize = 3;

/// Split text into sentences.
///
/// Scans character by character and decides at each `.`, `!` or `?` whether
/// it ends a sentence. Terminators glued to the following character (decimals,
/// URLs, email addresses, `?!`) never split; periods after abbreviations,
/// initials and ellipses don't either. Trailing text without a terminator
/// counts as a final sentence.
#[tracing::instrument(skip_all, fields(text_len = text.len()))]
pub fn split_sentences(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let chars: Vec<char> = text.chars().collect();
    let mut sentences = Vec::new();
    let mut current = String::new();

    for (pos, &ch) in chars.iter().enumerate() {
        current.push(ch);
        if matches!(ch, '.' | '!' | '?') && ends_sentence(&Boundary::at(&chars, pos), &current) {
            push_sentence(&mut sentences, &current);
            current.clear();
        }
    }
    push_sentence(&mut sentences, &current);

    sentences
}

fn push_sentence(sentences: &mut Vec<String>, raw: &str) {
    let sentence = raw.trim();
    if sentence.len() >= MIN_SENTENCE_LEN {
        sentences.push(sentence.to_string());
    }
}

/// Split text into words.
///
/// A word is a whitespace-delimited token with leading and trailing
/// punctuation removed (inner apostrophes and hyphens are kept). Tokens with
/// no letters or digits, such as a lone dash, are not words.
pub fn words(text: &str) -> Vec<&str> {
    text.split_whitespace()
        .map(|token| token.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|word| word.chars().any(char::is_alphanumeric))
        .collect()
}

/// The leading slice of `text` that ends with its `n`th word.
///
/// Returns the whole text when it has `n` words or fewer.
pub fn leading_words(text: &str, n: usize) -> &str {
    let start = text.as_ptr() as usize;
    text.split_whitespace()
        .filter(|token| token.chars().any(char::is_alphanumeric))
        .nth(n.saturating_sub(1))
        .map_or(text, |token| {
            let end = token.as_ptr() as usize - start + token.len();
            &text[..end]
        })
}

/// Count letters and digits, the units the Coleman-Liau index measures.
pub fn letter_count(text: &str) -> usize {
    text.chars().filter(|c| c.is_alphanumeric()).count()
}

/// Count every non-whitespace character, punctuation included.
pub fn char_count(text: &str) -> usize {
    text.chars().filter(|c| !c.is_whitespace()).count()
}

/// Characters inspected on either side of a terminator.
const CONTEXT_WINDOW: usize = 20;

/// What surrounds a candidate sentence terminator.
struct Boundary<'a> {
    chars: &'a [char],
    pos: usize,
    next_char: Option<char>,
    text_after: String,
    at_end: bool,
    inside_token: bool,
}

impl<'a> Boundary<'a> {
    fn at(chars: &'a [char], pos: usize) -> Self {
        let mut after = pos + 1;
        while after < chars.len() && chars[after].is_whitespace() {
            after += 1;
        }

        Self {
            chars,
            pos,
            next_char: chars.get(after).copied(),
            text_after: chars[after.min(chars.len())..]
                .iter()
                .take(CONTEXT_WINDOW)
                .collect(),
            at_end: after >= chars.len(),
            inside_token: chars
                .get(pos + 1)
                .is_some_and(|&c| !c.is_whitespace() && !is_closing_mark(c)),
        }
    }

    const fn punctuation(&self) -> char {
        self.chars[self.pos]
    }

    fn next_is_capitalized(&self) -> bool {
        match self.next_char {
            Some(c) if c.is_uppercase() => true,
            Some('"' | '\'') => self
                .text_after
                .chars()
                .nth(1)
                .is_none_or(|c| c.is_uppercase()),
            _ => true,
        }
    }

    /// The token ending just before the terminator, skipping spaces and
    /// earlier periods. Both scans stop after [`CONTEXT_WINDOW`] characters so
    /// long runs of periods cost the same as short ones.
    fn word_before(&self) -> String {
        let chars = self.chars;
        let floor = self.pos.saturating_sub(CONTEXT_WINDOW);
        let Some(end) = (floor..self.pos)
            .rev()
            .find(|&i| !chars[i].is_whitespace() && chars[i] != '.')
        else {
            return String::new();
        };
        if !chars[end].is_alphanumeric() {
            return String::new();
        }

        let floor = end.saturating_sub(CONTEXT_WINDOW);
        let start = (floor..end)
            .rev()
            .take_while(|&i| is_word_char(chars[i]))
            .last()
            .unwrap_or(end);
        // Tokens longer than the window are never abbreviations
        if start == floor && floor > 0 && is_word_char(chars[floor - 1]) {
            return String::new();
        }
        chars[start..=end].iter().collect()
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '.'
}

const fn is_closing_mark(c: char) -> bool {
    matches!(c, '"' | '\'' | ')' | ']' | '\u{201d}' | '\u{2019}')
}

fn ends_sentence(boundary: &Boundary<'_>, current: &str) -> bool {
    if boundary.at_end {
        return true;
    }
    if boundary.inside_token {
        return false;
    }

    if boundary.punctuation() != '.' {
        return boundary.next_is_capitalized();
    }

    let word = boundary.word_before();
    if looks_like_abbreviation(&word) || looks_like_initial(&word) || current.ends_with("...")
    {
        return false;
    }

    // A lowercase continuation means the period was not terminal
    !boundary.next_char.is_some_and(char::is_lowercase)
}

fn looks_like_abbreviation(word: &str) -> bool {
    let bare = word.trim_end_matches('.');
    if bare.is_empty() {
        return false;
    }
    is_abbreviation(bare) || (bare.len() == 1 && bare.chars().all(char::is_uppercase))
}

fn looks_like_initial(word: &str) -> bool {
    INITIALS_PATTERN.is_match(word)
}
