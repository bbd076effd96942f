//! Search engine: match queries and directional match finding.
//!
//! All offsets are character offsets into the snapshot a match was
//! computed against. The engine is stateless; callers pass the text and
//! a query per operation.

use regex::RegexBuilder;
use std::fmt;

/// How the query pattern is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Plain substring search.
    Literal,
    /// Literal text that must sit on word boundaries.
    WholeWord,
    /// The pattern is a regular expression.
    Regex,
}

/// An immutable description of what to search for and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchQuery {
    /// The pattern text.
    pub pattern: String,
    /// How the pattern is interpreted.
    pub mode: SearchMode,
    /// Whether matching is case sensitive.
    pub case_sensitive: bool,
}

impl MatchQuery {
    /// Creates a new query.
    pub fn new(pattern: &str, mode: SearchMode, case_sensitive: bool) -> Self {
        Self {
            pattern: pattern.to_string(),
            mode,
            case_sensitive,
        }
    }

    /// Creates a case-sensitive literal query.
    pub fn literal(pattern: &str) -> Self {
        Self::new(pattern, SearchMode::Literal, true)
    }

    /// Returns true if the pattern is empty (nothing to search for).
    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }
}

/// A located occurrence of a query in a text snapshot.
/// Half-open character range; valid only against that exact snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    /// Start character position (inclusive).
    pub start: usize,
    /// End character position (exclusive).
    pub end: usize,
}

impl Match {
    /// Creates a new match.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Returns the length of the match in characters.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true if the match is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A search hit, with whether the search wrapped around to find it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Found {
    /// The located match.
    pub range: Match,
    /// True if the match was only found after wrapping around.
    pub wrapped: bool,
}

/// A malformed user-supplied regular expression.
///
/// Surfaced to the caller as a value; an invalid pattern never aborts
/// the search session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternError {
    message: String,
}

impl PatternError {
    /// Returns the underlying parse error message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid pattern: {}", self.message)
    }
}

impl std::error::Error for PatternError {}

impl From<regex::Error> for PatternError {
    fn from(err: regex::Error) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

/// Finds the first match at or after `from`, wrapping to the start of
/// the text when the tail holds none. `wrapped` reports which pass hit.
pub fn find_next(text: &str, query: &MatchQuery, from: usize) -> Result<Option<Found>, PatternError> {
    let matcher = Matcher::compile(query)?;
    let from = from.min(text.chars().count());

    if let Some(range) = matcher.first_from(text, from) {
        return Ok(Some(Found {
            range,
            wrapped: false,
        }));
    }
    if from > 0 {
        if let Some(range) = matcher.first_from(text, 0) {
            return Ok(Some(Found {
                range,
                wrapped: true,
            }));
        }
    }
    Ok(None)
}

/// Finds the last match starting at or before `from` (a match starting
/// exactly at `from` counts). When none exists, wraps and returns the
/// last match in the text, closest to the end.
pub fn find_prev(text: &str, query: &MatchQuery, from: usize) -> Result<Option<Found>, PatternError> {
    let matcher = Matcher::compile(query)?;
    let len = text.chars().count();
    let from = from.min(len);

    if let Some(range) = matcher.last_up_to(text, from) {
        return Ok(Some(Found {
            range,
            wrapped: false,
        }));
    }
    if let Some(range) = matcher.last_up_to(text, len) {
        return Ok(Some(Found {
            range,
            wrapped: true,
        }));
    }
    Ok(None)
}

/// Returns true if `selected` on its own is a complete match for the
/// query, under its mode and case rules.
pub fn matches_selection(query: &MatchQuery, selected: &str) -> Result<bool, PatternError> {
    if selected.is_empty() || query.is_empty() {
        return Ok(false);
    }
    let matcher = Matcher::compile(query)?;
    Ok(matcher.is_full_match(selected))
}

/// A compiled query, reusable across one text snapshot.
pub(crate) enum Matcher {
    Literal {
        /// The needle, case-folded when matching is insensitive.
        needle: String,
        needle_chars: usize,
        fold: bool,
    },
    Pattern {
        re: regex::Regex,
        /// The same pattern anchored at both ends, for selection checks.
        whole: regex::Regex,
    },
}

impl Matcher {
    pub(crate) fn compile(query: &MatchQuery) -> Result<Self, PatternError> {
        match query.mode {
            SearchMode::Literal => {
                let needle = if query.case_sensitive {
                    query.pattern.clone()
                } else {
                    fold_case(&query.pattern)
                };
                Ok(Self::Literal {
                    needle_chars: needle.chars().count(),
                    needle,
                    fold: !query.case_sensitive,
                })
            }
            SearchMode::WholeWord | SearchMode::Regex => {
                let source = if query.mode == SearchMode::WholeWord {
                    format!(r"\b{}\b", regex::escape(&query.pattern))
                } else {
                    query.pattern.clone()
                };
                let re = RegexBuilder::new(&source)
                    .case_insensitive(!query.case_sensitive)
                    .build()?;
                let whole = RegexBuilder::new(&format!(r"\A(?:{source})\z"))
                    .case_insensitive(!query.case_sensitive)
                    .build()?;
                Ok(Self::Pattern { re, whole })
            }
        }
    }

    /// First match whose start is at or after `from` (character offset).
    pub(crate) fn first_from(&self, text: &str, from: usize) -> Option<Match> {
        match self {
            Self::Literal {
                needle,
                needle_chars,
                fold,
            } => {
                if needle.is_empty() {
                    return None;
                }
                let hay = folded_haystack(text, *fold);
                let from_byte = char_to_byte(&hay, from);
                hay[from_byte..].find(needle.as_str()).map(|pos| {
                    let start = byte_to_char(&hay, from_byte + pos);
                    Match::new(start, start + needle_chars)
                })
            }
            Self::Pattern { re, .. } => {
                let from_byte = char_to_byte(text, from);
                re.find_at(text, from_byte).map(|m| {
                    let start = byte_to_char(text, m.start());
                    Match::new(start, start + m.as_str().chars().count())
                })
            }
        }
    }

    /// Last match whose start is at or before `from` (character offset).
    ///
    /// Literal mode honors overlapping occurrences (a reverse substring
    /// scan); pattern modes enumerate non-overlapping matches forward
    /// and keep the last eligible one.
    pub(crate) fn last_up_to(&self, text: &str, from: usize) -> Option<Match> {
        match self {
            Self::Literal {
                needle,
                needle_chars,
                fold,
            } => {
                if needle.is_empty() {
                    return None;
                }
                let hay = folded_haystack(text, *fold);
                let limit = char_to_byte(&hay, from);
                let region_end = hay.len().min(limit + needle.len());
                hay[..region_end].rfind(needle.as_str()).map(|pos| {
                    let start = byte_to_char(&hay, pos);
                    Match::new(start, start + needle_chars)
                })
            }
            Self::Pattern { .. } => {
                let mut last = None;
                for m in self.all_matches(text) {
                    if m.start > from {
                        break;
                    }
                    last = Some(m);
                }
                last
            }
        }
    }

    /// All non-overlapping matches from offset 0, in order. The scan
    /// resumes at the end of each match; a zero-length match advances
    /// by one character so the scan always terminates.
    pub(crate) fn all_matches(&self, text: &str) -> Vec<Match> {
        match self {
            Self::Literal {
                needle,
                needle_chars,
                fold,
            } => {
                let mut matches = Vec::new();
                if needle.is_empty() {
                    return matches;
                }
                let hay = folded_haystack(text, *fold);
                let mut pos = 0;
                let mut chars_before = 0;
                while let Some(found) = hay[pos..].find(needle.as_str()) {
                    chars_before += hay[pos..pos + found].chars().count();
                    let start = chars_before;
                    matches.push(Match::new(start, start + needle_chars));
                    pos += found + needle.len();
                    chars_before += needle_chars;
                }
                matches
            }
            Self::Pattern { re, .. } => {
                let mut matches = Vec::new();
                let mut pos = 0;
                let mut chars_before = 0;
                while pos <= text.len() {
                    let m = match re.find_at(text, pos) {
                        Some(m) => m,
                        None => break,
                    };
                    chars_before += text[pos..m.start()].chars().count();
                    let start = chars_before;
                    let match_chars = m.as_str().chars().count();
                    matches.push(Match::new(start, start + match_chars));
                    if m.is_empty() {
                        // Step over one character to guarantee progress.
                        match text[m.end()..].chars().next() {
                            Some(c) => {
                                pos = m.end() + c.len_utf8();
                                chars_before += 1;
                            }
                            None => break,
                        }
                    } else {
                        pos = m.end();
                        chars_before += match_chars;
                    }
                }
                matches
            }
        }
    }

    /// True if `candidate` in its entirety matches the query.
    pub(crate) fn is_full_match(&self, candidate: &str) -> bool {
        match self {
            Self::Literal { needle, fold, .. } => {
                if *fold {
                    fold_case(candidate) == *needle
                } else {
                    candidate == needle
                }
            }
            Self::Pattern { whole, .. } => whole.is_match(candidate),
        }
    }
}

/// Case-folds character by character, keeping the original character
/// whenever its lowercase expansion is not exactly one character. The
/// result always has the same character count as the input, so
/// character offsets computed on the folded text are valid in the
/// original.
fn fold_case(text: &str) -> String {
    text.chars().map(fold_char).collect()
}

fn fold_char(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

fn folded_haystack(text: &str, fold: bool) -> String {
    if fold {
        fold_case(text)
    } else {
        text.to_string()
    }
}

/// Converts a character offset to a byte offset, clamping to the end.
pub(crate) fn char_to_byte(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map(|(b, _)| b)
        .unwrap_or(text.len())
}

/// Converts a byte offset (on a char boundary) to a character offset.
pub(crate) fn byte_to_char(text: &str, byte_idx: usize) -> usize {
    text[..byte_idx].chars().count()
}
