//! Language profiles: ordered lexical rules for one language.
//!
//! A profile compiles its rules into a single alternation, one uniquely
//! named capture group per rule. Rule order is the tie-break priority:
//! when several rules could match at the same offset, the earliest
//! listed rule wins.

use regex::Regex;
use std::sync::OnceLock;

/// One lexical rule: a category name and the pattern that produces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexRule {
    /// Style category emitted for this rule (e.g. "keyword").
    pub category: String,
    /// Regular expression for the rule.
    pub pattern: String,
}

impl LexRule {
    /// Creates a new rule.
    pub fn new(category: &str, pattern: &str) -> Self {
        Self {
            category: category.to_string(),
            pattern: pattern.to_string(),
        }
    }
}

/// An immutable, named set of lexical rules, compiled once.
#[derive(Debug, Clone)]
pub struct LanguageProfile {
    name: String,
    rules: Vec<LexRule>,
    /// All rules as one alternation; group `g<i>` wraps rule `i`.
    alternation: Regex,
}

impl LanguageProfile {
    /// Compiles a profile from an ordered rule list.
    ///
    /// Returns the regex error when any rule pattern is malformed; for
    /// built-in profiles that is a programming error and surfaces at
    /// first load, not per keystroke.
    pub fn compile(name: &str, rules: Vec<LexRule>) -> Result<Self, regex::Error> {
        let alternation = rules
            .iter()
            .enumerate()
            .map(|(i, rule)| format!("(?P<g{i}>{})", rule.pattern))
            .collect::<Vec<_>>()
            .join("|");
        let alternation = Regex::new(&alternation)?;
        Ok(Self {
            name: name.to_string(),
            rules,
            alternation,
        })
    }

    /// Returns the profile name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the rules in priority order.
    pub fn rules(&self) -> &[LexRule] {
        &self.rules
    }

    /// Returns the compiled alternation over all rules.
    pub(crate) fn alternation(&self) -> &Regex {
        &self.alternation
    }

    /// Returns the category of the first rule (in profile order) whose
    /// capture group participated in the given captures.
    pub(crate) fn category_of(&self, caps: &regex::Captures<'_>) -> Option<&str> {
        (0..self.rules.len())
            .find(|i| caps.name(&format!("g{i}")).is_some())
            .map(|i| self.rules[i].category.as_str())
    }

    /// Looks up a built-in profile by name.
    pub fn builtin(name: &str) -> Option<&'static LanguageProfile> {
        builtins().iter().find(|p| p.name == name)
    }

    /// Returns the names of all built-in profiles.
    pub fn builtin_names() -> Vec<&'static str> {
        builtins().iter().map(|p| p.name.as_str()).collect()
    }
}

/// Built-in profiles, compiled once at first use. A malformed built-in
/// pattern is a bug in this file and fails fast here.
fn builtins() -> &'static [LanguageProfile] {
    static BUILTINS: OnceLock<Vec<LanguageProfile>> = OnceLock::new();
    BUILTINS.get_or_init(|| {
        vec![
            generic_code(),
            markup(),
        ]
    })
}

fn generic_code() -> LanguageProfile {
    const KEYWORDS: &[&str] = &[
        "abstract", "as", "assert", "async", "await", "boolean", "break", "byte", "case",
        "catch", "char", "class", "const", "continue", "default", "do", "double", "else",
        "enum", "extends", "final", "finally", "float", "fn", "for", "goto", "if", "impl",
        "implements", "import", "in", "instanceof", "int", "interface", "let", "long",
        "match", "mod", "mut", "native", "new", "package", "private", "protected", "pub",
        "public", "return", "self", "short", "static", "struct", "super", "switch",
        "synchronized", "this", "throw", "throws", "trait", "try", "use", "var", "void",
        "volatile", "while",
    ];
    let keyword_pattern = format!(r"\b(?:{})\b", KEYWORDS.join("|"));
    let rules = vec![
        LexRule::new("comment", r"//[^\n]*|/\*(?s:.*?)\*/"),
        LexRule::new("string", r#""(?:[^"\\]|\\.)*""#),
        LexRule::new("keyword", &keyword_pattern),
        LexRule::new("number", r"\b\d+(?:\.\d+)?\b"),
        LexRule::new("punctuation", r"[(){}\[\];]"),
    ];
    match LanguageProfile::compile("generic-code", rules) {
        Ok(profile) => profile,
        Err(err) => panic!("built-in profile 'generic-code' is malformed: {err}"),
    }
}

fn markup() -> LanguageProfile {
    let rules = vec![
        LexRule::new("comment", r"<!--(?s:.*?)-->"),
        LexRule::new("tag", r"</?\s*[a-zA-Z][a-zA-Z0-9]*\s*/?>"),
        LexRule::new("attribute", r"\s[a-zA-Z][a-zA-Z0-9-]*\s*="),
        LexRule::new("string", r#""(?:[^"\\]|\\.)*""#),
    ];
    match LanguageProfile::compile("markup", rules) {
        Ok(profile) => profile,
        Err(err) => panic!("built-in profile 'markup' is malformed: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup() {
        assert!(LanguageProfile::builtin("generic-code").is_some());
        assert!(LanguageProfile::builtin("markup").is_some());
        assert!(LanguageProfile::builtin("cobol").is_none());
        assert_eq!(
            LanguageProfile::builtin_names(),
            vec!["generic-code", "markup"]
        );
    }

    #[test]
    fn test_compile_rejects_bad_rule() {
        let rules = vec![LexRule::new("broken", "(unclosed")];
        assert!(LanguageProfile::compile("bad", rules).is_err());
    }

    #[test]
    fn test_category_of_prefers_earlier_rule() {
        // Both rules match "if"; the first listed wins.
        let rules = vec![
            LexRule::new("first", r"\bif\b"),
            LexRule::new("second", r"\b[a-z]+\b"),
        ];
        let profile = LanguageProfile::compile("tiebreak", rules).unwrap();
        let caps = profile.alternation().captures("if").unwrap();
        assert_eq!(profile.category_of(&caps), Some("first"));
    }

    #[test]
    fn test_generic_code_classifies() {
        let profile = LanguageProfile::builtin("generic-code").unwrap();
        let caps = profile.alternation().captures("return").unwrap();
        assert_eq!(profile.category_of(&caps), Some("keyword"));
        let caps = profile.alternation().captures("// note").unwrap();
        assert_eq!(profile.category_of(&caps), Some("comment"));
        let caps = profile.alternation().captures("\"text\"").unwrap();
        assert_eq!(profile.category_of(&caps), Some("string"));
    }
}
