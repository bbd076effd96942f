//! Single-pass tokenizer: classifies text into gap-filling style spans.

use super::profile::LanguageProfile;

/// A classified (or unstyled) sub-range of a text snapshot.
/// Half-open character offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// Start character position (inclusive).
    pub start: usize,
    /// End character position (exclusive).
    pub end: usize,
    /// Style category, `None` for unstyled text.
    pub category: Option<String>,
}

impl Span {
    /// Creates a categorized span.
    pub fn styled(start: usize, end: usize, category: &str) -> Self {
        Self {
            start,
            end,
            category: Some(category.to_string()),
        }
    }

    /// Creates an unstyled span.
    pub fn plain(start: usize, end: usize) -> Self {
        Self {
            start,
            end,
            category: None,
        }
    }

    /// Returns the length of the span in characters.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns true if the span is empty.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Tokenizes a full text snapshot against a profile.
///
/// The returned spans are contiguous, non-overlapping, and cover
/// `[0, len_chars)` exactly: every gap between rule matches becomes an
/// unstyled span, and a trailing gap is emitted after the last match.
/// Empty text yields an empty sequence.
pub fn tokenize(text: &str, profile: &LanguageProfile) -> Vec<Span> {
    let mut spans = Vec::new();
    if text.is_empty() {
        return spans;
    }

    let re = profile.alternation();
    // Byte position of the scan, with its running character offset.
    let mut pos = 0;
    let mut pos_chars = 0;
    // End of the last emitted span, in characters.
    let mut covered = 0;

    while pos <= text.len() {
        let caps = match re.captures_at(text, pos) {
            Some(caps) => caps,
            None => break,
        };
        let m = match caps.get(0) {
            Some(m) => m,
            None => break,
        };
        if m.is_empty() {
            // A rule that matches empty classifies nothing; step one
            // character past it so the scan terminates. The skipped
            // text falls into the trailing or next gap span.
            pos_chars += text[pos..m.end()].chars().count();
            match text[m.end()..].chars().next() {
                Some(c) => {
                    pos = m.end() + c.len_utf8();
                    pos_chars += 1;
                }
                None => break,
            }
            continue;
        }

        pos_chars += text[pos..m.start()].chars().count();
        let start = pos_chars;
        let match_chars = m.as_str().chars().count();
        let end = start + match_chars;

        if start > covered {
            spans.push(Span::plain(covered, start));
        }
        match profile.category_of(&caps) {
            Some(category) => spans.push(Span::styled(start, end, category)),
            None => spans.push(Span::plain(start, end)),
        }
        covered = end;

        pos = m.end();
        pos_chars = end;
    }

    let total = text.chars().count();
    if covered < total {
        spans.push(Span::plain(covered, total));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::profile::LexRule;

    fn profile() -> LanguageProfile {
        LanguageProfile::compile(
            "test",
            vec![
                LexRule::new("word", r"[a-z]+"),
                LexRule::new("number", r"\d+"),
            ],
        )
        .unwrap()
    }

    fn assert_covers(spans: &[Span], len: usize) {
        let mut expected_start = 0;
        for span in spans {
            assert_eq!(span.start, expected_start, "spans must be contiguous");
            assert!(span.end >= span.start);
            expected_start = span.end;
        }
        assert_eq!(expected_start, len, "spans must cover the whole text");
    }

    #[test]
    fn test_empty_text() {
        assert!(tokenize("", &profile()).is_empty());
    }

    #[test]
    fn test_no_matches_single_plain_span() {
        let spans = tokenize("!!!", &profile());
        assert_eq!(spans, vec![Span::plain(0, 3)]);
    }

    #[test]
    fn test_gap_filling() {
        let spans = tokenize("ab 12!", &profile());
        assert_eq!(
            spans,
            vec![
                Span::styled(0, 2, "word"),
                Span::plain(2, 3),
                Span::styled(3, 5, "number"),
                Span::plain(5, 6),
            ]
        );
        assert_covers(&spans, 6);
    }

    #[test]
    fn test_adjacent_matches_no_gap() {
        let spans = tokenize("ab12", &profile());
        assert_eq!(
            spans,
            vec![Span::styled(0, 2, "word"), Span::styled(2, 4, "number")]
        );
        assert_covers(&spans, 4);
    }

    #[test]
    fn test_multibyte_offsets_are_char_based() {
        let spans = tokenize("é ab", &profile());
        assert_eq!(spans, vec![Span::plain(0, 2), Span::styled(2, 4, "word")]);
        assert_covers(&spans, 4);
    }

    #[test]
    fn test_generic_code_profile() {
        let profile = LanguageProfile::builtin("generic-code").unwrap();
        let text = "if (x) { return 42; } // done";
        let spans = tokenize(text, profile);
        assert_covers(&spans, text.chars().count());

        let categories: Vec<(&str, usize, usize)> = spans
            .iter()
            .filter_map(|s| s.category.as_deref().map(|c| (c, s.start, s.end)))
            .collect();
        assert!(categories.contains(&("keyword", 0, 2)));
        assert!(categories.contains(&("keyword", 9, 15)));
        assert!(categories.contains(&("number", 16, 18)));
        assert!(categories.contains(&("comment", 22, 29)));
    }

    #[test]
    fn test_markup_profile() {
        let profile = LanguageProfile::builtin("markup").unwrap();
        let text = r#"<a href="x">hi</a>"#;
        let spans = tokenize(text, profile);
        assert_covers(&spans, text.chars().count());
        assert!(spans
            .iter()
            .any(|s| s.category.as_deref() == Some("string")));
    }

    #[test]
    fn test_block_comment_spans_lines() {
        let profile = LanguageProfile::builtin("generic-code").unwrap();
        let text = "a /* one\ntwo */ b";
        let spans = tokenize(text, profile);
        assert_covers(&spans, text.chars().count());
        let comment = spans
            .iter()
            .find(|s| s.category.as_deref() == Some("comment"))
            .unwrap();
        assert_eq!((comment.start, comment.end), (2, 15));
    }

    #[test]
    fn test_empty_rule_match_terminates() {
        let profile =
            LanguageProfile::compile("degenerate", vec![LexRule::new("opt", "x*")]).unwrap();
        let spans = tokenize("ab", &profile);
        assert_covers(&spans, 2);
        // Nothing was classified; the whole text is plain.
        assert!(spans.iter().all(|s| s.category.is_none()));
    }
}
