//! Debounced highlighting driver.
//!
//! Edits arm a quiet-window timer; tokenization runs once the burst
//! settles. Everything is single-threaded: the host event loop calls
//! [`Highlighter::text_edited`] on each edit, polls for a due pass, and
//! feeds the pass back with a text snapshot. A pass scheduled before a
//! newer edit is stale and is dropped, so spans for an old snapshot can
//! never overwrite spans for a newer one.

use std::time::{Duration, Instant};

use log::debug;

use super::profile::LanguageProfile;
use super::tokenizer::{tokenize, Span};

/// A due tokenization, carrying the buffer revision it was scheduled
/// against. Obtained from [`Highlighter::poll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenizePass {
    revision: u64,
}

/// Debounced, supersession-safe highlighting state for one document.
#[derive(Debug)]
pub struct Highlighter {
    profile: &'static LanguageProfile,
    window: Duration,
    /// Bumped on every edit; identifies the current buffer state.
    revision: u64,
    deadline: Option<Instant>,
    spans: Vec<Span>,
}

impl Highlighter {
    /// The default quiet window between the last edit and tokenization.
    pub const DEFAULT_WINDOW: Duration = Duration::from_millis(50);

    /// Creates a highlighter with the default window and profile.
    pub fn new() -> Self {
        Self::with_window(Self::DEFAULT_WINDOW)
    }

    /// Creates a highlighter with a custom quiet window.
    pub fn with_window(window: Duration) -> Self {
        let profile = match LanguageProfile::builtin("generic-code") {
            Some(p) => p,
            None => unreachable!("default built-in profile must exist"),
        };
        Self {
            profile,
            window,
            revision: 0,
            deadline: None,
            spans: Vec::new(),
        }
    }

    /// Switches the active built-in profile. Returns false (and keeps
    /// the current profile) when the name is unknown. Existing spans
    /// stay in place until the next settled tokenization.
    pub fn set_profile(&mut self, name: &str) -> bool {
        match LanguageProfile::builtin(name) {
            Some(profile) => {
                debug!("highlight profile set to '{}'", profile.name());
                self.profile = profile;
                true
            }
            None => false,
        }
    }

    /// Returns the active profile.
    pub fn profile(&self) -> &LanguageProfile {
        self.profile
    }

    /// Records an edit: bumps the revision and re-arms the quiet
    /// window, superseding any pending pass.
    pub fn text_edited(&mut self, now: Instant) {
        self.revision += 1;
        self.deadline = Some(now + self.window);
    }

    /// Returns a tokenize pass once the quiet window has elapsed,
    /// disarming the timer. Returns `None` while edits are still
    /// settling or nothing is pending.
    pub fn poll(&mut self, now: Instant) -> Option<TokenizePass> {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                Some(TokenizePass {
                    revision: self.revision,
                })
            }
            _ => None,
        }
    }

    /// Tokenizes the settled snapshot for a due pass and stores the
    /// spans. Returns false and drops the result when the pass is stale
    /// (an edit arrived after it was scheduled).
    pub fn on_text_settled(&mut self, pass: TokenizePass, text: &str) -> bool {
        if pass.revision != self.revision {
            debug!(
                "dropping stale tokenize pass (revision {} < {})",
                pass.revision, self.revision
            );
            return false;
        }
        self.spans = tokenize(text, self.profile);
        true
    }

    /// Returns the spans for the last settled snapshot.
    pub fn current_spans(&self) -> &[Span] {
        &self.spans
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_nothing_due_without_edits() {
        let mut hl = Highlighter::new();
        assert_eq!(hl.poll(Instant::now()), None);
        assert!(hl.current_spans().is_empty());
    }

    #[test]
    fn test_pass_due_after_quiet_window() {
        let mut hl = Highlighter::with_window(ms(50));
        let t0 = Instant::now();
        hl.text_edited(t0);
        assert_eq!(hl.poll(t0 + ms(10)), None);
        let pass = hl.poll(t0 + ms(50)).unwrap();
        assert!(hl.on_text_settled(pass, "let x"));
        assert!(!hl.current_spans().is_empty());
        // Disarmed after firing.
        assert_eq!(hl.poll(t0 + ms(100)), None);
    }

    #[test]
    fn test_burst_resets_window() {
        let mut hl = Highlighter::with_window(ms(50));
        let t0 = Instant::now();
        hl.text_edited(t0);
        hl.text_edited(t0 + ms(40));
        // The first deadline has passed but was superseded.
        assert_eq!(hl.poll(t0 + ms(60)), None);
        assert!(hl.poll(t0 + ms(90)).is_some());
    }

    #[test]
    fn test_stale_pass_is_dropped() {
        let mut hl = Highlighter::with_window(ms(50));
        let t0 = Instant::now();
        hl.text_edited(t0);
        let pass = hl.poll(t0 + ms(50)).unwrap();
        // An edit lands after the pass was scheduled.
        hl.text_edited(t0 + ms(51));
        assert!(!hl.on_text_settled(pass, "stale snapshot"));
        assert!(hl.current_spans().is_empty());

        // The newer edit settles normally.
        let pass = hl.poll(t0 + ms(101)).unwrap();
        assert!(hl.on_text_settled(pass, "if"));
        assert_eq!(hl.current_spans().len(), 1);
    }

    #[test]
    fn test_set_profile() {
        let mut hl = Highlighter::new();
        assert_eq!(hl.profile().name(), "generic-code");
        assert!(hl.set_profile("markup"));
        assert_eq!(hl.profile().name(), "markup");
        assert!(!hl.set_profile("unknown"));
        assert_eq!(hl.profile().name(), "markup");
    }

    #[test]
    fn test_spans_follow_active_profile() {
        let mut hl = Highlighter::with_window(ms(0));
        let t0 = Instant::now();
        hl.text_edited(t0);
        let pass = hl.poll(t0).unwrap();
        hl.on_text_settled(pass, "<!-- c -->");
        // generic-code sees no markup comment.
        assert!(hl.current_spans().iter().all(|s| s.category.is_none()));

        hl.set_profile("markup");
        hl.text_edited(t0);
        let pass = hl.poll(t0).unwrap();
        hl.on_text_settled(pass, "<!-- c -->");
        assert_eq!(hl.current_spans()[0].category.as_deref(), Some("comment"));
    }
}
