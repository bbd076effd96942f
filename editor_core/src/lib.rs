//! Scribe Core - Pure search, replace, and highlighting logic.
//!
//! This crate contains the text-processing engines of the editor
//! without any dependencies on windowing or rendering systems. The
//! enclosing UI implements [`TextSource`] for its text widget and
//! drives [`FindReplaceSession`] and [`Highlighter`] from its event
//! loop.

pub mod buffer;
pub mod replace;
pub mod search;
pub mod session;
pub mod source;
pub mod syntax;

pub use buffer::TextBuffer;
pub use replace::{replace_all, replace_one, ReplaceOutcome};
pub use search::{find_next, find_prev, Found, Match, MatchQuery, PatternError, SearchMode};
pub use session::{FindReplaceSession, SearchStatus};
pub use source::{MemorySource, TextSource};
pub use syntax::{tokenize, Highlighter, LanguageProfile, LexRule, Span, TokenizePass};
