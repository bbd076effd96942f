//! Lexical highlighting: language profiles, tokenization, debounce.

pub mod highlight;
pub mod profile;
pub mod tokenizer;

pub use highlight::{Highlighter, TokenizePass};
pub use profile::{LanguageProfile, LexRule};
pub use tokenizer::{tokenize, Span};
