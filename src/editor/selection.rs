use std::ops::Range;

/// A selection in document positions. `anchor` is where it started and
/// `focus` where it ends; either may come first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub anchor: usize,
    pub focus: usize,
}

impl Selection {
    pub fn new(anchor: usize, focus: usize) -> Self {
        Self { anchor, focus }
    }

    pub fn caret(pos: usize) -> Self {
        Self::new(pos, pos)
    }

    pub fn range(&self) -> Range<usize> {
        self.anchor.min(self.focus)..self.anchor.max(self.focus)
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// Keep both ends inside a document of `len` positions.
    pub fn clamp(self, len: usize) -> Self {
        Self::new(self.anchor.min(len), self.focus.min(len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backwards_selection_normalizes_its_range() {
        let sel = Selection::new(9, 3);
        assert_eq!(sel.range(), 3..9);
        assert!(!sel.is_collapsed());
        assert_eq!(sel.clamp(5).range(), 3..5);
    }
}
