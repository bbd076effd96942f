//! Replace engine, built on the search engine.
//!
//! `replace_one` steps through occurrences one at a time; `replace_all`
//! rebuilds the text in a single pass and writes it back in one
//! mutation, so intermediate replacements can never shift the offsets
//! of later matches.

use crate::search::{self, char_to_byte, MatchQuery, Matcher, Found, PatternError};
use crate::source::TextSource;

/// The result of a single replace-and-advance step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplaceOutcome {
    /// True if the selection matched the query and was replaced.
    pub replaced: bool,
    /// The next occurrence found (and selected) after the step.
    pub next: Option<Found>,
}

/// Replaces the current selection if it matches the query, then finds
/// and selects the next occurrence.
///
/// When the selection does not match (or nothing is selected) this is a
/// plain find-next: a single "replace" action doubles as find.
pub fn replace_one(
    source: &mut dyn TextSource,
    query: &MatchQuery,
    replacement: &str,
) -> Result<ReplaceOutcome, PatternError> {
    let (sel_start, sel_end) = source.selection();
    let selected = source.selected_text();

    let replaced = search::matches_selection(query, &selected)?;
    if replaced {
        source.replace_range(sel_start, sel_end, replacement);
        source.set_caret(sel_start + replacement.chars().count());
    }

    let next = find_and_select(source, query)?;
    Ok(ReplaceOutcome { replaced, next })
}

/// Replaces every occurrence of the query in one pass over the current
/// text, writing the rebuilt text back as a single mutation. Returns
/// the number of replacements made; zero means the text was untouched.
pub fn replace_all(
    source: &mut dyn TextSource,
    query: &MatchQuery,
    replacement: &str,
) -> Result<usize, PatternError> {
    let matcher = Matcher::compile(query)?;
    let text = source.text();
    let matches = matcher.all_matches(&text);
    if matches.is_empty() {
        return Ok(0);
    }

    let mut rebuilt = String::with_capacity(text.len());
    let mut consumed = 0;
    for m in &matches {
        let start_byte = char_to_byte(&text, m.start);
        rebuilt.push_str(&text[char_to_byte(&text, consumed)..start_byte]);
        rebuilt.push_str(replacement);
        // A zero-length match consumes nothing; the character at its
        // position is emitted as unmatched text by the next prefix.
        consumed = m.end;
    }
    rebuilt.push_str(&text[char_to_byte(&text, consumed)..]);

    let caret = source.caret();
    source.replace_range(0, source.len_chars(), &rebuilt);
    source.set_caret(caret.min(source.len_chars()));
    Ok(matches.len())
}

/// Finds the next occurrence after the caret/selection and selects it.
pub(crate) fn find_and_select(
    source: &mut dyn TextSource,
    query: &MatchQuery,
) -> Result<Option<Found>, PatternError> {
    let (sel_start, sel_end) = source.selection();
    let selected = source.selected_text();
    let from = if sel_end > sel_start && search::matches_selection(query, &selected)? {
        sel_end
    } else {
        source.caret()
    };

    let text = source.text();
    let found = search::find_next(&text, query, from)?;
    if let Some(found) = found {
        source.set_selection(found.range.start, found.range.end);
        source.scroll_into_view(found.range.start);
    }
    Ok(found)
}
