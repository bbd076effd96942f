//! A find/replace session: per-dialog query state and status reporting.
//!
//! The session owns the active query and translates engine results into
//! the statuses a status line can phrase ("found", "wrapped to
//! beginning", "no matches"). It holds no reference to the text source;
//! every operation takes the source as a parameter.

use crate::replace;
use crate::search::{self, MatchQuery, PatternError, SearchMode};
use crate::source::TextSource;

/// Outcome of a session operation, for the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchStatus {
    /// A match was found without wrapping.
    Found,
    /// A match was found after wrapping around the buffer.
    FoundWrapped,
    /// The query is valid but matches nothing.
    NotFound,
    /// The query pattern failed to parse as a regular expression.
    InvalidPattern(String),
    /// The query pattern is empty.
    EmptyQuery,
}

impl SearchStatus {
    /// A short human-readable message for the status line.
    pub fn message(&self) -> String {
        match self {
            Self::Found => "Found".to_string(),
            Self::FoundWrapped => "Found (wrapped around)".to_string(),
            Self::NotFound => "No matches found".to_string(),
            Self::InvalidPattern(msg) => format!("Invalid regular expression: {msg}"),
            Self::EmptyQuery => "Please enter text to find".to_string(),
        }
    }

    /// Returns true for the outcomes the UI styles as errors.
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound | Self::InvalidPattern(_) | Self::EmptyQuery
        )
    }
}

impl From<PatternError> for SearchStatus {
    fn from(err: PatternError) -> Self {
        Self::InvalidPattern(err.message().to_string())
    }
}

/// State for one find/replace dialog session.
#[derive(Debug, Clone, Default)]
pub struct FindReplaceSession {
    query: Option<MatchQuery>,
}

impl FindReplaceSession {
    /// Creates a session with no active query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the active query, if any.
    pub fn query(&self) -> Option<&MatchQuery> {
        self.query.as_ref()
    }

    /// Sets the active query. Changing the pattern text resets the
    /// session state.
    pub fn set_query(&mut self, pattern: &str, mode: SearchMode, case_sensitive: bool) {
        self.query = Some(MatchQuery::new(pattern, mode, case_sensitive));
    }

    /// Finds and selects the next occurrence after the caret (or after
    /// the selection, when the selection is itself a match).
    pub fn find_next(&mut self, source: &mut dyn TextSource) -> SearchStatus {
        let query = match self.active_query() {
            Ok(q) => q,
            Err(status) => return status,
        };
        match replace::find_and_select(source, &query) {
            Ok(Some(found)) if found.wrapped => SearchStatus::FoundWrapped,
            Ok(Some(_)) => SearchStatus::Found,
            Ok(None) => SearchStatus::NotFound,
            Err(err) => err.into(),
        }
    }

    /// Finds and selects the previous occurrence before the caret (or
    /// before the selection, when the selection is itself a match).
    pub fn find_previous(&mut self, source: &mut dyn TextSource) -> SearchStatus {
        let query = match self.active_query() {
            Ok(q) => q,
            Err(status) => return status,
        };

        let (sel_start, sel_end) = source.selection();
        let selected = source.selected_text();
        let selection_matches = match search::matches_selection(&query, &selected) {
            Ok(matches) => matches && sel_end > sel_start,
            Err(err) => return err.into(),
        };

        let text = source.text();
        let result = if selection_matches && sel_start == 0 {
            // The selection sits at the buffer start; there is nothing
            // before it, so go straight to the wrapped scan.
            search::find_prev(&text, &query, text.chars().count()).map(|found| {
                found.map(|f| search::Found {
                    range: f.range,
                    wrapped: true,
                })
            })
        } else {
            let from = if selection_matches {
                sel_start - 1
            } else {
                source.caret()
            };
            search::find_prev(&text, &query, from)
        };

        match result {
            Ok(Some(found)) => {
                source.set_selection(found.range.start, found.range.end);
                source.scroll_into_view(found.range.start);
                if found.wrapped {
                    SearchStatus::FoundWrapped
                } else {
                    SearchStatus::Found
                }
            }
            Ok(None) => SearchStatus::NotFound,
            Err(err) => err.into(),
        }
    }

    /// Replaces the selected occurrence (if it matches) and steps to
    /// the next one. With no matching selection this is a find.
    pub fn replace_one(&mut self, source: &mut dyn TextSource, replacement: &str) -> SearchStatus {
        let query = match self.active_query() {
            Ok(q) => q,
            Err(status) => return status,
        };
        match replace::replace_one(source, &query, replacement) {
            Ok(outcome) => match outcome.next {
                Some(found) if found.wrapped => SearchStatus::FoundWrapped,
                Some(_) => SearchStatus::Found,
                None if outcome.replaced => SearchStatus::Found,
                None => SearchStatus::NotFound,
            },
            Err(err) => err.into(),
        }
    }

    /// Replaces every occurrence. Returns the status and the number of
    /// replacements made.
    pub fn replace_all(
        &mut self,
        source: &mut dyn TextSource,
        replacement: &str,
    ) -> (SearchStatus, usize) {
        let query = match self.active_query() {
            Ok(q) => q,
            Err(status) => return (status, 0),
        };
        match replace::replace_all(source, &query, replacement) {
            Ok(0) => (SearchStatus::NotFound, 0),
            Ok(count) => (SearchStatus::Found, count),
            Err(err) => (err.into(), 0),
        }
    }

    fn active_query(&self) -> Result<MatchQuery, SearchStatus> {
        match &self.query {
            Some(q) if !q.is_empty() => Ok(q.clone()),
            _ => Err(SearchStatus::EmptyQuery),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;

    fn session_with(pattern: &str) -> FindReplaceSession {
        let mut session = FindReplaceSession::new();
        session.set_query(pattern, SearchMode::Literal, true);
        session
    }

    #[test]
    fn test_empty_query_reported() {
        let mut src = MemorySource::from_str("hello");
        let mut session = FindReplaceSession::new();
        assert_eq!(session.find_next(&mut src), SearchStatus::EmptyQuery);

        session.set_query("", SearchMode::Literal, true);
        assert_eq!(session.find_next(&mut src), SearchStatus::EmptyQuery);
        assert_eq!(src.selection(), (0, 0));
    }

    #[test]
    fn test_find_next_selects_and_scrolls() {
        let mut src = MemorySource::from_str("one two one");
        let mut session = session_with("two");
        assert_eq!(session.find_next(&mut src), SearchStatus::Found);
        assert_eq!(src.selection(), (4, 7));
        assert_eq!(src.scroll_target(), Some(4));
    }

    #[test]
    fn test_find_next_skips_current_selection() {
        let mut src = MemorySource::from_str("one two one");
        let mut session = session_with("one");
        assert_eq!(session.find_next(&mut src), SearchStatus::Found);
        assert_eq!(src.selection(), (0, 3));
        // The selection equals a match, so the next search starts after it.
        assert_eq!(session.find_next(&mut src), SearchStatus::Found);
        assert_eq!(src.selection(), (8, 11));
    }

    #[test]
    fn test_find_next_wraps_with_status() {
        let mut src = MemorySource::from_str("one two one");
        let mut session = session_with("one");
        session.find_next(&mut src);
        session.find_next(&mut src);
        assert_eq!(src.selection(), (8, 11));
        assert_eq!(session.find_next(&mut src), SearchStatus::FoundWrapped);
        assert_eq!(src.selection(), (0, 3));
    }

    #[test]
    fn test_find_next_not_found_leaves_selection() {
        let mut src = MemorySource::from_str("hello world");
        src.set_selection(2, 4);
        let mut session = session_with("absent");
        assert_eq!(session.find_next(&mut src), SearchStatus::NotFound);
        assert_eq!(src.selection(), (2, 4));
    }

    #[test]
    fn test_find_previous_steps_back() {
        let mut src = MemorySource::from_str("a b a c a");
        src.set_caret(9);
        let mut session = session_with("a");
        assert_eq!(session.find_previous(&mut src), SearchStatus::Found);
        assert_eq!(src.selection(), (8, 9));
        assert_eq!(session.find_previous(&mut src), SearchStatus::Found);
        assert_eq!(src.selection(), (4, 5));
        assert_eq!(session.find_previous(&mut src), SearchStatus::Found);
        assert_eq!(src.selection(), (0, 1));
        assert_eq!(session.find_previous(&mut src), SearchStatus::FoundWrapped);
        assert_eq!(src.selection(), (8, 9));
    }

    #[test]
    fn test_invalid_pattern_status() {
        let mut src = MemorySource::from_str("text");
        let mut session = FindReplaceSession::new();
        session.set_query("(unclosed", SearchMode::Regex, true);
        match session.find_next(&mut src) {
            SearchStatus::InvalidPattern(msg) => assert!(!msg.is_empty()),
            other => panic!("expected InvalidPattern, got {other:?}"),
        }
        assert_eq!(src.selection(), (0, 0));
        assert_eq!(src.text(), "text");
    }

    #[test]
    fn test_replace_all_status_and_count() {
        let mut src = MemorySource::from_str("aaa");
        let mut session = session_with("a");
        assert_eq!(session.replace_all(&mut src, "b"), (SearchStatus::Found, 3));
        assert_eq!(src.text(), "bbb");
        assert_eq!(
            session.replace_all(&mut src, "b"),
            (SearchStatus::NotFound, 0)
        );
    }

    #[test]
    fn test_replace_one_statuses() {
        let mut src = MemorySource::from_str("cat dog");
        let mut session = session_with("cat");
        // First call only selects.
        assert_eq!(session.replace_one(&mut src, "cow"), SearchStatus::Found);
        assert_eq!(src.selection(), (0, 3));
        // Second call replaces; no further occurrence.
        assert_eq!(session.replace_one(&mut src, "cow"), SearchStatus::Found);
        assert_eq!(src.text(), "cow dog");
        // Nothing left to find or replace.
        assert_eq!(session.replace_one(&mut src, "cow"), SearchStatus::NotFound);
    }

    #[test]
    fn test_status_messages() {
        assert!(SearchStatus::EmptyQuery.is_error());
        assert!(SearchStatus::NotFound.is_error());
        assert!(!SearchStatus::Found.is_error());
        assert!(SearchStatus::InvalidPattern("x".into())
            .message()
            .contains("x"));
    }
}
