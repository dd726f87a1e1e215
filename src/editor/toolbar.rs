//! Formatting commands offered by the editor toolbar.

use super::document::BlockKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatCommand {
    Bold,
    Italic,
    Underline,
    Heading(HeadingLevel),
    FontSize(FontSize),
    Color(TextColor),
}

/// Options in the heading dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
    Normal,
}

impl HeadingLevel {
    pub fn block_kind(&self) -> BlockKind {
        match self {
            Self::H1 => BlockKind::Heading1,
            Self::H2 => BlockKind::Heading2,
            Self::H3 => BlockKind::Heading3,
            Self::Normal => BlockKind::Paragraph,
        }
    }
}

/// Options in the size dropdown. Sizes are discrete; there is no free-form
/// size input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontSize {
    Small,
    Normal,
    Large,
    ExtraLarge,
}

impl FontSize {
    pub const ALL: [FontSize; 4] = [Self::Small, Self::Normal, Self::Large, Self::ExtraLarge];

    pub fn px(&self) -> u32 {
        match self {
            Self::Small => 12,
            Self::Normal => 16,
            Self::Large => 20,
            Self::ExtraLarge => 24,
        }
    }

    pub fn from_px(px: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.px() == px)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Small => "Small",
            Self::Normal => "Normal",
            Self::Large => "Large",
            Self::ExtraLarge => "Extra Large",
        }
    }
}

/// A swatch from the color picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextColor(&'static str);

impl TextColor {
    pub const PALETTE: [TextColor; 12] = [
        TextColor("#000000"),
        TextColor("#374151"),
        TextColor("#6B7280"),
        TextColor("#DC2626"),
        TextColor("#EA580C"),
        TextColor("#D97706"),
        TextColor("#65A30D"),
        TextColor("#059669"),
        TextColor("#0891B2"),
        TextColor("#2563EB"),
        TextColor("#7C3AED"),
        TextColor("#C026D3"),
    ];

    /// Look up a palette entry by hex code, ignoring case.
    pub fn from_hex(hex: &str) -> Option<Self> {
        Self::PALETTE
            .into_iter()
            .find(|c| c.0.eq_ignore_ascii_case(hex.trim()))
    }

    pub fn hex(&self) -> &'static str {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_sizes_map_to_pixels() {
        assert_eq!(FontSize::Large.px(), 20);
        assert_eq!(FontSize::from_px(12), Some(FontSize::Small));
        assert_eq!(FontSize::from_px(13), None);
    }

    #[test]
    fn palette_lookup_ignores_case() {
        assert_eq!(TextColor::from_hex("#dc2626").map(|c| c.hex()), Some("#DC2626"));
        assert!(TextColor::from_hex("#123456").is_none());
    }
}
