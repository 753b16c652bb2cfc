use ropey::Rope;

use crate::selection::{Selection, SelectionDirection};

/// Editable text with a selection range.
///
/// All offsets are `char` indices. Selection updates follow input-element
/// rules: offsets are clamped to the text length and `start` never passes
/// `end`.
pub struct TextSurface {
    rope: Rope,
    selection: Selection,
}

impl TextSurface {
    /// Create a surface holding `text`, caret at the start.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            selection: Selection::caret(0),
        }
    }

    /// Create an empty surface.
    pub fn empty() -> Self {
        Self::from_text("")
    }

    /// The full text content.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Whether the content equals `text`, without allocating.
    pub fn text_eq(&self, text: &str) -> bool {
        self.rope.len_bytes() == text.len() && self.rope == text
    }

    /// Replace the whole content. The selection is clamped to the new length.
    pub fn set_text(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
        self.selection = self.selection.clamped(self.len_chars());
    }

    /// Length of the content in chars.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub const fn selection(&self) -> Selection {
        self.selection
    }

    /// Set the selection range, clamped to the content.
    pub fn set_selection_range(&mut self, start: usize, end: usize, direction: SelectionDirection) {
        self.selection = Selection::new(start, end, direction).clamped(self.len_chars());
    }

    /// Text covered by the selection.
    pub fn selected_text(&self) -> String {
        let Selection { start, end, .. } = self.selection;
        self.rope.slice(start..end).to_string()
    }

    /// Replace the selected text with `text` and put the caret after it.
    pub fn replace_selection(&mut self, text: &str) {
        let Selection { start, end, .. } = self.selection;
        if start < end {
            self.rope.remove(start..end);
        }
        self.rope.insert(start, text);
        self.selection = Selection::caret(start + text.chars().count());
    }
}

impl Default for TextSurface {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for TextSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextSurface")
            .field("rope", &format_args!("Rope({} chars)", self.rope.len_chars()))
            .field("selection", &self.selection)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_surface_has_caret_at_zero() {
        let surface = TextSurface::empty();
        assert_eq!(surface.text(), "");
        assert_eq!(surface.selection(), Selection::caret(0));
    }

    #[test]
    fn test_text_roundtrip() {
        let content = "line one\nline two\nline three";
        let surface = TextSurface::from_text(content);
        assert_eq!(surface.text(), content);
        assert!(surface.text_eq(content));
        assert!(!surface.text_eq("line one"));
    }

    #[test]
    fn test_set_text_clamps_selection() {
        let mut surface = TextSurface::from_text("hello world");
        surface.set_selection_range(6, 11, SelectionDirection::Forward);
        surface.set_text("hey");
        assert_eq!(surface.selection(), Selection::new(3, 3, SelectionDirection::Forward));
    }

    #[test]
    fn test_selection_range_is_clamped() {
        let mut surface = TextSurface::from_text("abc");
        surface.set_selection_range(2, 99, SelectionDirection::Backward);
        assert_eq!(surface.selection(), Selection::new(2, 3, SelectionDirection::Backward));
        surface.set_selection_range(3, 1, SelectionDirection::None);
        assert_eq!(surface.selection(), Selection::new(1, 1, SelectionDirection::None));
    }

    #[test]
    fn test_replace_selection_inserts_at_caret() {
        let mut surface = TextSurface::from_text("ac");
        surface.set_selection_range(1, 1, SelectionDirection::None);
        surface.replace_selection("b");
        assert_eq!(surface.text(), "abc");
        assert_eq!(surface.selection(), Selection::caret(2));
    }

    #[test]
    fn test_replace_selection_overwrites_range() {
        let mut surface = TextSurface::from_text("hello world");
        surface.set_selection_range(0, 5, SelectionDirection::Forward);
        assert_eq!(surface.selected_text(), "hello");
        surface.replace_selection("bye\nnow");
        assert_eq!(surface.text(), "bye\nnow world");
        assert_eq!(surface.selection(), Selection::caret(7));
    }

    #[test]
    fn test_offsets_are_chars() {
        let mut surface = TextSurface::from_text("héllo");
        surface.set_selection_range(2, 2, SelectionDirection::None);
        surface.replace_selection("X");
        assert_eq!(surface.text(), "héXllo");
    }
}
