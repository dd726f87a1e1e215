//! HTML serialization for editor documents.
//!
//! Output uses the same markup a browser's editing commands produce
//! (`<b>`, `<i>`, `<u>`, `<font>`). Input is parsed leniently: anything outside
//! that vocabulary is skipped but its text is kept. Neither direction
//! sanitizes; callers that render the HTML must do so themselves.

use super::document::{Block, BlockKind, Document, SizeMark, TextStyle};
use super::toolbar::FontSize;

/// Size value browsers use for the intermediate `fontSize` marker.
const PENDING_FONT_SIZE: &str = "7";

/// Serialize `doc`. A document holding a single empty paragraph serializes to
/// the empty string.
pub fn to_html(doc: &Document) -> String {
    if doc.is_empty() {
        return String::new();
    }

    let mut out = String::new();
    for block in doc.blocks() {
        write_block(&mut out, block);
    }
    out
}

fn write_block(out: &mut String, block: &Block) {
    let tag = block.kind.tag();
    out.push('<');
    out.push_str(tag);
    out.push('>');

    if block.is_empty() {
        out.push_str("<br>");
    }
    for run in &block.runs {
        write_run(out, &run.text, &run.style);
    }

    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

fn write_run(out: &mut String, text: &str, style: &TextStyle) {
    let mut closers = Vec::new();

    match style.font_size {
        Some(SizeMark::Pending) => {
            out.push_str(&format!("<font size=\"{}\">", PENDING_FONT_SIZE));
            closers.push("</font>");
        }
        Some(SizeMark::Size(size)) => {
            out.push_str(&format!("<font style=\"font-size: {}px;\">", size.px()));
            closers.push("</font>");
        }
        None => {}
    }
    if let Some(color) = &style.color {
        out.push_str(&format!("<font color=\"{}\">", escape(color)));
        closers.push("</font>");
    }
    for (on, open, close) in [
        (style.bold, "<b>", "</b>"),
        (style.italic, "<i>", "</i>"),
        (style.underline, "<u>", "</u>"),
    ] {
        if on {
            out.push_str(open);
            closers.push(close);
        }
    }

    out.push_str(&escape(text));
    for closer in closers.into_iter().rev() {
        out.push_str(closer);
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
    out
}

// ============================================================
// Parsing
// ============================================================

struct Tag {
    name: String,
    closing: bool,
    attrs: Vec<(String, String)>,
}

impl Tag {
    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Parse an HTML fragment into a document.
pub fn parse(html: &str) -> Document {
    let mut parser = Parser::default();
    let mut rest = html;

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("<!--") {
            rest = after.find("-->").map(|i| &after[i + 3..]).unwrap_or("");
            continue;
        }
        if rest.starts_with('<') {
            if let Some(end) = rest.find('>') {
                if let Some(tag) = parse_tag(&rest[1..end]) {
                    parser.tag(tag);
                }
                rest = &rest[end + 1..];
                continue;
            }
        }
        let next = match rest.strip_prefix('<') {
            Some(after) => after.find('<').map(|i| i + 1).unwrap_or(rest.len()),
            None => rest.find('<').unwrap_or(rest.len()),
        };
        parser.text(&decode_entities(&rest[..next]));
        rest = &rest[next..];
    }

    Document::from_blocks(parser.blocks)
}

struct Parser {
    blocks: Vec<Block>,
    /// Whether the current block was opened by a block tag.
    explicit: bool,
    /// A block tag was closed and nothing has been written since.
    after_block: bool,
    styles: Vec<(String, TextStyle)>,
}

impl Default for Parser {
    fn default() -> Self {
        Self {
            blocks: vec![Block::default()],
            explicit: false,
            after_block: false,
            styles: Vec::new(),
        }
    }
}

impl Parser {
    fn current(&mut self) -> &mut Block {
        let last = self.blocks.len() - 1;
        &mut self.blocks[last]
    }

    fn style(&self) -> TextStyle {
        self.styles
            .last()
            .map(|(_, s)| s.clone())
            .unwrap_or_default()
    }

    fn text(&mut self, text: &str) {
        let text: String = text
            .chars()
            .map(|c| if matches!(c, '\n' | '\r' | '\t') { ' ' } else { c })
            .collect();
        if text.is_empty() {
            return;
        }
        if self.after_block {
            if text.trim().is_empty() {
                return;
            }
            self.blocks.push(Block::default());
            self.explicit = false;
            self.after_block = false;
        }
        let style = self.style();
        self.current().push_text(&text, &style);
    }

    fn tag(&mut self, tag: Tag) {
        if let Some(kind) = block_kind(&tag.name) {
            if tag.closing {
                self.after_block = true;
            } else {
                let current_is_empty = self.current().is_empty();
                if self.explicit || !current_is_empty {
                    self.blocks.push(Block::new(kind));
                } else {
                    self.current().kind = kind;
                }
                self.explicit = true;
                self.after_block = false;
            }
            return;
        }

        match tag.name.as_str() {
            "br" => {
                if !self.current().is_empty() {
                    let kind = self.current().kind;
                    self.blocks.push(Block::new(kind));
                }
            }
            "img" | "hr" | "input" | "meta" | "link" | "wbr" => {}
            _ if tag.closing => {
                if let Some(idx) = self.styles.iter().rposition(|(name, _)| name == &tag.name) {
                    self.styles.truncate(idx);
                }
            }
            _ => {
                let mut style = self.style();
                apply_inline_tag(&tag, &mut style);
                self.styles.push((tag.name, style));
            }
        }
    }
}

fn block_kind(name: &str) -> Option<BlockKind> {
    match name {
        "p" | "div" => Some(BlockKind::Paragraph),
        "h1" => Some(BlockKind::Heading1),
        "h2" => Some(BlockKind::Heading2),
        "h3" | "h4" | "h5" | "h6" => Some(BlockKind::Heading3),
        _ => None,
    }
}

fn apply_inline_tag(tag: &Tag, style: &mut TextStyle) {
    match tag.name.as_str() {
        "b" | "strong" => style.bold = true,
        "i" | "em" => style.italic = true,
        "u" => style.underline = true,
        _ => {}
    }

    if tag.name == "font" {
        if let Some(color) = tag.attr("color") {
            style.color = Some(color.to_string());
        }
        if tag.attr("size") == Some(PENDING_FONT_SIZE) {
            style.font_size = Some(SizeMark::Pending);
        }
    }

    if let Some(css) = tag.attr("style") {
        for declaration in css.split(';') {
            let Some((prop, value)) = declaration.split_once(':') else {
                continue;
            };
            let value = value.trim();
            match prop.trim().to_lowercase().as_str() {
                "font-size" => {
                    let size = value
                        .strip_suffix("px")
                        .and_then(|px| px.trim().parse::<u32>().ok())
                        .and_then(FontSize::from_px);
                    if let Some(size) = size {
                        style.font_size = Some(SizeMark::Size(size));
                    }
                }
                "color" => style.color = Some(value.to_string()),
                "font-weight" if value == "bold" || value == "700" => style.bold = true,
                "font-style" if value == "italic" => style.italic = true,
                _ => {}
            }
        }
    }
}

fn parse_tag(inner: &str) -> Option<Tag> {
    let inner = inner.trim().trim_end_matches('/').trim();
    let (closing, inner) = match inner.strip_prefix('/') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, inner),
    };

    let name_end = inner
        .find(|c: char| c.is_whitespace())
        .unwrap_or(inner.len());
    let name = inner[..name_end].to_lowercase();
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }

    Some(Tag {
        name,
        closing,
        attrs: parse_attrs(&inner[name_end..]),
    })
}

fn parse_attrs(mut rest: &str) -> Vec<(String, String)> {
    let mut attrs = Vec::new();
    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }
        let key_end = rest
            .find(|c: char| c == '=' || c.is_whitespace())
            .unwrap_or(rest.len());
        let key = rest[..key_end].to_lowercase();
        rest = rest[key_end..].trim_start();

        let value = if let Some(after_eq) = rest.strip_prefix('=') {
            let after_eq = after_eq.trim_start();
            match after_eq.chars().next() {
                Some(quote @ ('"' | '\'')) => {
                    let body = &after_eq[1..];
                    let end = body.find(quote).unwrap_or(body.len());
                    rest = body.get(end + 1..).unwrap_or("");
                    body[..end].to_string()
                }
                _ => {
                    let end = after_eq
                        .find(char::is_whitespace)
                        .unwrap_or(after_eq.len());
                    rest = &after_eq[end..];
                    after_eq[..end].to_string()
                }
            }
        } else {
            String::new()
        };

        if !key.is_empty() {
            attrs.push((key, decode_entities(&value)));
        }
    }
    attrs
}

fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let candidate = &rest[amp..];
        match candidate.find(';').filter(|&end| end <= 10) {
            Some(end) => match decode_entity(&candidate[1..end]) {
                Some(c) => {
                    out.push(c);
                    rest = &candidate[end + 1..];
                }
                None => {
                    out.push('&');
                    rest = &candidate[1..];
                }
            },
            None => {
                out.push('&');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let code = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                name.strip_prefix('#')?.parse().ok()?
            };
            char::from_u32(code)
        }
    }
}
