//! Rich text editing for build descriptions.
//!
//! The editor owns a [`Document`] plus two selections: the live selection of
//! the editable surface, and a saved copy. Toolbar interactions take focus
//! away from the surface and with it the live selection, so every toolbar
//! command follows the same sequence:
//!
//! 1. [`RichTextEditor::toolbar_pointer_down`] saves the selection before focus moves.
//! 2. [`RichTextEditor::apply`] restores it, runs the command, saves the
//!    resulting selection again and refocuses the surface.
//!
//! After every keystroke, command and blur the full serialized HTML is passed
//! to the change callback.

mod document;
pub mod html;
mod selection;
mod toolbar;

pub use document::{Block, BlockKind, Document, Run, SizeMark, TextStyle};
pub use selection::Selection;
pub use toolbar::{FontSize, FormatCommand, HeadingLevel, TextColor};

pub type ChangeCallback = Box<dyn FnMut(&str) + Send>;
pub type BlurCallback = Box<dyn FnMut() + Send>;

pub struct RichTextEditor {
    document: Document,
    /// Selection inside the focused surface. `None` while unfocused.
    selection: Option<Selection>,
    /// Last selection captured before focus left the surface.
    saved: Option<Selection>,
    focused: bool,
    /// Formatting chosen on a collapsed selection, used by the next typed text.
    typing_style: Option<TextStyle>,
    on_change: Option<ChangeCallback>,
    on_blur: Option<BlurCallback>,
}

impl RichTextEditor {
    /// Create an editor showing `html`.
    pub fn new(html: &str) -> Self {
        Self {
            document: html::parse(html),
            selection: None,
            saved: None,
            focused: false,
            typing_style: None,
            on_change: None,
            on_blur: None,
        }
    }

    pub fn on_change(mut self, callback: impl FnMut(&str) + Send + 'static) -> Self {
        self.on_change = Some(Box::new(callback));
        self
    }

    pub fn on_blur(mut self, callback: impl FnMut() + Send + 'static) -> Self {
        self.on_blur = Some(Box::new(callback));
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn html(&self) -> String {
        html::to_html(&self.document)
    }

    pub fn plain_text(&self) -> String {
        self.document.plain_text()
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn saved_selection(&self) -> Option<Selection> {
        self.saved
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Replace the content from outside. Nothing happens when `html` already
    /// matches the current serialization, so echoing the change callback's
    /// output back in is harmless.
    pub fn set_value(&mut self, html: &str) {
        if html == self.html() {
            return;
        }
        self.document = html::parse(html);
        let len = self.document.len();
        self.selection = self.selection.map(|s| s.clamp(len));
        self.saved = self.saved.map(|s| s.clamp(len));
        self.typing_style = None;
    }

    // ============================================================
    // Surface interaction
    // ============================================================

    pub fn focus(&mut self) {
        self.focused = true;
        if self.selection.is_none() {
            self.selection = self.saved;
        }
    }

    /// Focus leaves the surface: the live selection is gone.
    pub fn blur(&mut self) {
        self.focused = false;
        self.selection = None;
        self.emit_change();
        if let Some(on_blur) = self.on_blur.as_mut() {
            on_blur();
        }
    }

    /// Select with pointer or keyboard. The selection is saved immediately.
    pub fn select(&mut self, anchor: usize, focus: usize) {
        self.focused = true;
        let selection = Selection::new(anchor, focus).clamp(self.document.len());
        self.selection = Some(selection);
        self.saved = Some(selection);
        self.typing_style = None;
    }

    /// Type `text` over the current selection; `\n` starts a new block.
    pub fn type_text(&mut self, text: &str) {
        self.focus();
        let selection = self.current_or_end();
        let range = selection.range();
        if !selection.is_collapsed() {
            self.document.delete(range.clone());
        }

        let style = self
            .typing_style
            .take()
            .unwrap_or_else(|| self.document.style_at(range.start));
        let caret = self.document.insert(range.start, text, &style);

        self.selection = Some(Selection::caret(caret));
        self.save_selection();
        self.emit_change();
    }

    /// Delete the selection, or the character before the caret.
    pub fn backspace(&mut self) {
        self.focus();
        let selection = self.current_or_end();
        let range = selection.range();

        let caret = if !selection.is_collapsed() {
            self.document.delete(range.clone());
            range.start
        } else if range.start > 0 {
            self.document.delete(range.start - 1..range.start);
            range.start - 1
        } else {
            0
        };

        self.selection = Some(Selection::caret(caret));
        self.save_selection();
        self.emit_change();
    }

    // ============================================================
    // Toolbar
    // ============================================================

    /// Pointer pressed on a toolbar control. Saves the selection, then the
    /// control takes focus away from the surface.
    pub fn toolbar_pointer_down(&mut self) {
        self.save_selection();
        self.focused = false;
        self.selection = None;
    }

    /// Run a toolbar command against the saved selection.
    pub fn apply(&mut self, command: FormatCommand) {
        self.restore_selection();
        match self.selection {
            Some(selection) => self.execute(command, selection),
            None => tracing::debug!(?command, "No selection to format"),
        }
        self.save_selection();
        self.focused = true;
        self.emit_change();
    }

    fn execute(&mut self, command: FormatCommand, selection: Selection) {
        let range = selection.range();
        match command {
            FormatCommand::Bold => self.toggle(selection, |s| s.bold, |s, on| s.bold = on),
            FormatCommand::Italic => self.toggle(selection, |s| s.italic, |s, on| s.italic = on),
            FormatCommand::Underline => {
                self.toggle(selection, |s| s.underline, |s, on| s.underline = on)
            }
            FormatCommand::Heading(level) => {
                self.document.set_block_kind(range, level.block_kind());
            }
            FormatCommand::FontSize(size) => {
                if selection.is_collapsed() {
                    self.typing_style_mut(selection).font_size = Some(SizeMark::Size(size));
                } else {
                    self.document
                        .apply_inline(range.clone(), |s| s.font_size = Some(SizeMark::Pending));
                    self.document.resolve_pending_size(range, size);
                }
            }
            FormatCommand::Color(color) => {
                let hex = color.hex().to_string();
                if selection.is_collapsed() {
                    self.typing_style_mut(selection).color = Some(hex);
                } else {
                    self.document
                        .apply_inline(range, |s| s.color = Some(hex.clone()));
                }
            }
        }
    }

    /// Set a flag on the range unless all of it already has it, in which case
    /// clear it.
    fn toggle(
        &mut self,
        selection: Selection,
        get: impl Fn(&TextStyle) -> bool,
        set: impl Fn(&mut TextStyle, bool),
    ) {
        if selection.is_collapsed() {
            let style = self.typing_style_mut(selection);
            let on = !get(style);
            set(style, on);
        } else {
            let range = selection.range();
            let on = !self.document.all_chars(range.clone(), &get);
            self.document.apply_inline(range, |s| set(s, on));
        }
    }

    fn typing_style_mut(&mut self, selection: Selection) -> &mut TextStyle {
        let document = &self.document;
        self.typing_style
            .get_or_insert_with(|| document.style_at(selection.focus))
    }

    fn save_selection(&mut self) {
        if let Some(selection) = self.selection {
            self.saved = Some(selection);
        }
    }

    fn restore_selection(&mut self) {
        if let Some(saved) = self.saved {
            self.selection = Some(saved.clamp(self.document.len()));
        }
    }

    fn current_or_end(&self) -> Selection {
        self.selection
            .unwrap_or_else(|| Selection::caret(self.document.len()))
            .clamp(self.document.len())
    }

    fn emit_change(&mut self) {
        let html = self.html();
        if let Some(on_change) = self.on_change.as_mut() {
            on_change(&html);
        }
    }
}

impl Default for RichTextEditor {
    fn default() -> Self {
        Self::new("")
    }
}

impl std::fmt::Debug for RichTextEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RichTextEditor")
            .field("document", &self.document)
            .field("selection", &self.selection)
            .field("saved", &self.saved)
            .field("focused", &self.focused)
            .finish_non_exhaustive()
    }
}
