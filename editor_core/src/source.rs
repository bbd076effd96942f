//! The text source abstraction consumed by the search and replace engines.
//!
//! The widget that owns the buffer on screen implements [`TextSource`];
//! the engines never talk to a concrete UI control. [`MemorySource`]
//! is the in-memory implementation used by tests and headless embedders.

use crate::buffer::TextBuffer;

/// A mutable sequence of characters with a caret and a selection.
///
/// All offsets are character offsets. Implementations are expected to
/// keep the caret and selection clamped to `[0, len_chars()]` and to
/// return the selection as an ordered `(start, end)` pair.
pub trait TextSource {
    /// Returns the full text as a string snapshot.
    fn text(&self) -> String;

    /// Returns the number of characters in the text.
    fn len_chars(&self) -> usize;

    /// Returns the caret position.
    fn caret(&self) -> usize;

    /// Returns the selection as an ordered `(start, end)` pair.
    /// `start == end` means no active selection.
    fn selection(&self) -> (usize, usize);

    /// Replaces the given character range with new text.
    /// Collapses the selection and places the caret after the inserted text.
    fn replace_range(&mut self, start: usize, end: usize, text: &str);

    /// Moves the caret, collapsing any selection.
    fn set_caret(&mut self, offset: usize);

    /// Selects the given range and places the caret at its end.
    fn set_selection(&mut self, start: usize, end: usize);

    /// Asks the widget to bring the given offset into view.
    fn scroll_into_view(&mut self, offset: usize);

    /// Returns the selected text, empty when there is no selection.
    fn selected_text(&self) -> String {
        let (start, end) = self.selection();
        self.text().chars().skip(start).take(end - start).collect()
    }
}

/// An in-memory [`TextSource`] over a [`TextBuffer`].
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    buffer: TextBuffer,
    caret: usize,
    /// Selection anchor; equals `caret` when nothing is selected.
    anchor: usize,
    /// Last offset passed to `scroll_into_view`, for embedders and tests.
    scroll_target: Option<usize>,
}

impl MemorySource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a source with the given initial text, caret at 0.
    pub fn from_str(text: &str) -> Self {
        Self {
            buffer: TextBuffer::from_str(text),
            caret: 0,
            anchor: 0,
            scroll_target: None,
        }
    }

    /// Returns the underlying buffer.
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// Returns the last offset requested to be scrolled into view.
    pub fn scroll_target(&self) -> Option<usize> {
        self.scroll_target
    }

    fn clamp(&self, offset: usize) -> usize {
        offset.min(self.buffer.len_chars())
    }
}

impl TextSource for MemorySource {
    fn text(&self) -> String {
        self.buffer.to_string()
    }

    fn len_chars(&self) -> usize {
        self.buffer.len_chars()
    }

    fn caret(&self) -> usize {
        self.caret
    }

    fn selection(&self) -> (usize, usize) {
        (self.anchor.min(self.caret), self.anchor.max(self.caret))
    }

    fn replace_range(&mut self, start: usize, end: usize, text: &str) {
        let start = self.clamp(start);
        let end = self.clamp(end).max(start);
        self.buffer.replace_range(start, end, text);
        self.caret = start + text.chars().count();
        self.anchor = self.caret;
    }

    fn set_caret(&mut self, offset: usize) {
        self.caret = self.clamp(offset);
        self.anchor = self.caret;
    }

    fn set_selection(&mut self, start: usize, end: usize) {
        self.anchor = self.clamp(start);
        self.caret = self.clamp(end);
    }

    fn scroll_into_view(&mut self, offset: usize) {
        self.scroll_target = Some(self.clamp(offset));
    }

    fn selected_text(&self) -> String {
        let (start, end) = self.selection();
        self.buffer.slice(start, end)
    }
}
