use std::ops::Range;

use super::toolbar::FontSize;

/// Block-level formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockKind {
    #[default]
    Paragraph,
    Heading1,
    Heading2,
    Heading3,
}

impl BlockKind {
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Paragraph => "p",
            Self::Heading1 => "h1",
            Self::Heading2 => "h2",
            Self::Heading3 => "h3",
        }
    }

    pub fn is_heading(&self) -> bool {
        !matches!(self, Self::Paragraph)
    }
}

/// Font size attached to a run.
///
/// `Pending` is the intermediate marker left by the first half of a font-size
/// command; it is replaced by a concrete size in the second half.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeMark {
    Pending,
    Size(FontSize),
}

/// Inline formatting of a run of text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    /// CSS color as written in the markup, e.g. `#DC2626`.
    pub color: Option<String>,
    pub font_size: Option<SizeMark>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub style: TextStyle,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockKind,
    pub runs: Vec<Run>,
}

impl Block {
    pub fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            runs: Vec::new(),
        }
    }

    pub fn char_len(&self) -> usize {
        self.runs.iter().map(|r| r.text.chars().count()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(|r| r.text.is_empty())
    }

    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Append text, extending the last run when the style matches.
    pub fn push_text(&mut self, text: &str, style: &TextStyle) {
        if text.is_empty() {
            return;
        }
        match self.runs.last_mut() {
            Some(last) if &last.style == style => last.text.push_str(text),
            _ => self.runs.push(Run {
                text: text.to_string(),
                style: style.clone(),
            }),
        }
    }

    fn styled_chars(&self) -> Vec<(char, TextStyle)> {
        self.runs
            .iter()
            .flat_map(|run| run.text.chars().map(move |c| (c, run.style.clone())))
            .collect()
    }

    fn set_styled_chars(&mut self, chars: Vec<(char, TextStyle)>) {
        self.runs.clear();
        for (c, style) in chars {
            match self.runs.last_mut() {
                Some(last) if last.style == style => last.text.push(c),
                _ => self.runs.push(Run {
                    text: c.to_string(),
                    style,
                }),
            }
        }
    }
}

/// Formatted text as an ordered list of blocks.
///
/// Positions are character offsets across the whole document; the break
/// between two blocks occupies one position. A document always has at least
/// one block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            blocks: vec![Block::default()],
        }
    }

    pub fn from_blocks(blocks: Vec<Block>) -> Self {
        if blocks.is_empty() {
            Self::new()
        } else {
            Self { blocks }
        }
    }

    /// One unstyled paragraph per line.
    pub fn from_plain_text(text: &str) -> Self {
        let mut doc = Self::new();
        doc.insert(0, text, &TextStyle::default());
        doc
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.iter().map(Block::char_len).sum::<usize>() + self.blocks.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.len() == 1 && self.blocks[0].is_empty()
    }

    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(Block::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Block index and offset inside it for a document position.
    fn locate(&self, pos: usize) -> (usize, usize) {
        let mut start = 0;
        for (idx, block) in self.blocks.iter().enumerate() {
            let len = block.char_len();
            if pos <= start + len {
                return (idx, pos - start);
            }
            start += len + 1;
        }
        let last = self.blocks.len() - 1;
        (last, self.blocks[last].char_len())
    }

    /// Per-block slices of `range`, as `(block index, local range)`.
    fn block_spans(&self, range: &Range<usize>) -> Vec<(usize, Range<usize>)> {
        let mut spans = Vec::new();
        let mut start = 0;
        for (idx, block) in self.blocks.iter().enumerate() {
            let len = block.char_len();
            let end = start + len;
            if range.start <= end && range.end >= start {
                let local_start = range.start.max(start) - start;
                let local_end = range.end.min(end) - start;
                spans.push((idx, local_start..local_end));
            }
            start = end + 1;
        }
        spans
    }

    /// Style a character typed at `pos` would inherit.
    pub fn style_at(&self, pos: usize) -> TextStyle {
        let (idx, offset) = self.locate(pos);
        let chars = self.blocks[idx].styled_chars();
        let neighbour = if offset > 0 {
            chars.get(offset - 1)
        } else {
            chars.first()
        };
        neighbour.map(|(_, s)| s.clone()).unwrap_or_default()
    }

    /// Insert `text` at `pos`; each `\n` starts a new block. Returns the
    /// position just after the inserted text.
    pub fn insert(&mut self, pos: usize, text: &str, style: &TextStyle) -> usize {
        let pos = pos.min(self.len());
        let (idx, offset) = self.locate(pos);
        let kind = self.blocks[idx].kind;
        let mut chars = self.blocks[idx].styled_chars();
        let tail = chars.split_off(offset);

        let mut segments = text.split('\n');
        let first = segments.next().unwrap_or_default();
        chars.extend(first.chars().map(|c| (c, style.clone())));

        let mut finished = Vec::new();
        let mut current = (kind, chars);
        for segment in segments {
            let next_kind = if kind.is_heading() && tail.is_empty() {
                BlockKind::Paragraph
            } else {
                kind
            };
            let next_chars = segment.chars().map(|c| (c, style.clone())).collect();
            finished.push(std::mem::replace(&mut current, (next_kind, next_chars)));
        }
        current.1.extend(tail);
        finished.push(current);

        let new_blocks: Vec<Block> = finished
            .into_iter()
            .map(|(kind, chars)| {
                let mut block = Block::new(kind);
                block.set_styled_chars(chars);
                block
            })
            .collect();
        self.blocks.splice(idx..=idx, new_blocks);

        pos + text.chars().count()
    }

    /// Remove the characters in `range`, joining blocks it spans.
    pub fn delete(&mut self, range: Range<usize>) {
        let len = self.len();
        let (start, end) = (range.start.min(len), range.end.min(len));
        if start >= end {
            return;
        }
        let (first, start_offset) = self.locate(start);
        let (last, end_offset) = self.locate(end);

        let mut chars = self.blocks[first].styled_chars();
        chars.truncate(start_offset);
        let tail = self.blocks[last].styled_chars().split_off(end_offset);
        chars.extend(tail);

        self.blocks[first].set_styled_chars(chars);
        self.blocks.drain(first + 1..=last);
    }

    /// Apply `f` to the style of every character in `range`.
    pub fn apply_inline(&mut self, range: Range<usize>, f: impl Fn(&mut TextStyle)) {
        for (idx, local) in self.block_spans(&range) {
            if local.is_empty() {
                continue;
            }
            let mut chars = self.blocks[idx].styled_chars();
            for (_, style) in &mut chars[local] {
                f(style);
            }
            self.blocks[idx].set_styled_chars(chars);
        }
    }

    /// Whether every character in `range` satisfies `pred`. False when the
    /// range holds no characters.
    pub fn all_chars(&self, range: Range<usize>, pred: impl Fn(&TextStyle) -> bool) -> bool {
        let mut seen = false;
        for (idx, local) in self.block_spans(&range) {
            let chars = self.blocks[idx].styled_chars();
            for (_, style) in &chars[local] {
                seen = true;
                if !pred(style) {
                    return false;
                }
            }
        }
        seen
    }

    /// Set the kind of every block touched by `range`.
    pub fn set_block_kind(&mut self, range: Range<usize>, kind: BlockKind) {
        let (first, _) = self.locate(range.start);
        let (last, _) = self.locate(range.end);
        for block in &mut self.blocks[first..=last] {
            block.kind = kind;
        }
    }

    /// Replace the pending size markers inside `range` with `size`. Markers
    /// elsewhere in the document are left alone. Returns how many characters
    /// were resolved.
    pub fn resolve_pending_size(&mut self, range: Range<usize>, size: FontSize) -> usize {
        let mut resolved = 0;
        for (idx, local) in self.block_spans(&range) {
            if local.is_empty() {
                continue;
            }
            let mut chars = self.blocks[idx].styled_chars();
            for (_, style) in &mut chars[local] {
                if style.font_size == Some(SizeMark::Pending) {
                    style.font_size = Some(SizeMark::Size(size));
                    resolved += 1;
                }
            }
            self.blocks[idx].set_styled_chars(chars);
        }
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bold() -> TextStyle {
        TextStyle {
            bold: true,
            ..Default::default()
        }
    }

    #[test]
    fn plain_text_splits_lines_into_blocks() {
        let doc = Document::from_plain_text("Tank\nPlants");
        assert_eq!(doc.blocks().len(), 2);
        assert_eq!(doc.len(), 11);
        assert_eq!(doc.plain_text(), "Tank\nPlants");
    }

    #[test]
    fn insert_in_the_middle_keeps_the_tail() {
        let mut doc = Document::from_plain_text("Hello world");
        let caret = doc.insert(5, ",", &TextStyle::default());
        assert_eq!(caret, 6);
        assert_eq!(doc.plain_text(), "Hello, world");
        assert_eq!(doc.blocks()[0].runs.len(), 1);
    }

    #[test]
    fn newline_at_end_of_heading_starts_a_paragraph() {
        let mut doc = Document::from_plain_text("Title");
        doc.set_block_kind(0..0, BlockKind::Heading1);
        doc.insert(5, "\nBody", &TextStyle::default());
        assert_eq!(doc.blocks()[0].kind, BlockKind::Heading1);
        assert_eq!(doc.blocks()[1].kind, BlockKind::Paragraph);
        assert_eq!(doc.plain_text(), "Title\nBody");
    }

    #[test]
    fn delete_across_blocks_joins_them() {
        let mut doc = Document::from_plain_text("abc\ndef");
        doc.delete(2..5);
        assert_eq!(doc.blocks().len(), 1);
        assert_eq!(doc.plain_text(), "abef");
    }

    #[test]
    fn apply_inline_splits_runs_at_range_edges() {
        let mut doc = Document::from_plain_text("neon tetra");
        doc.apply_inline(0..4, |s| s.bold = true);
        let runs = &doc.blocks()[0].runs;
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].text, "neon");
        assert_eq!(runs[0].style, bold());
        assert_eq!(runs[1].text, " tetra");
    }

    #[test]
    fn all_chars_is_false_for_empty_ranges() {
        let doc = Document::from_plain_text("abc");
        assert!(!doc.all_chars(1..1, |_| true));
        assert!(doc.all_chars(0..3, |s| !s.bold));
    }

    #[test]
    fn style_at_follows_the_previous_character() {
        let mut doc = Document::new();
        doc.insert(0, "ab", &bold());
        assert!(doc.style_at(2).bold);
        assert!(doc.style_at(0).bold);
        assert!(!Document::new().style_at(0).bold);
    }

    #[test]
    fn pending_markers_resolve_to_a_size() {
        let mut doc = Document::from_plain_text("big text");
        doc.apply_inline(0..3, |s| s.font_size = Some(SizeMark::Pending));
        let resolved = doc.resolve_pending_size(0..3, FontSize::Large);
        assert_eq!(resolved, 3);
        assert_eq!(
            doc.blocks()[0].runs[0].style.font_size,
            Some(SizeMark::Size(FontSize::Large))
        );
    }

    #[test]
    fn markers_outside_the_range_stay_pending() {
        let mut doc = Document::from_plain_text("huge small");
        doc.apply_inline(0..4, |s| s.font_size = Some(SizeMark::Pending));
        doc.apply_inline(5..10, |s| s.font_size = Some(SizeMark::Pending));

        let resolved = doc.resolve_pending_size(5..10, FontSize::Small);
        assert_eq!(resolved, 5);

        let runs = &doc.blocks()[0].runs;
        assert_eq!(runs[0].text, "huge");
        assert_eq!(runs[0].style.font_size, Some(SizeMark::Pending));
        assert_eq!(runs.last().map(|r| r.text.as_str()), Some("small"));
        assert_eq!(
            runs.last().and_then(|r| r.style.font_size.clone()),
            Some(SizeMark::Size(FontSize::Small))
        );
    }
}
