//! Character-granular word wrap and text block measurement.

use crate::font::{Face, Typeface};
use crate::style::Style;

/// Horizontal inset of text inside a background box.
pub const BOX_PAD_X: f32 = 16.0;
/// Vertical inset of text inside a background box.
pub const BOX_PAD_Y: f32 = 8.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub text: String,
    pub width: f32,
    /// Ink height of the line's glyphs.
    pub height: f32,
    /// Vertical distance to the next line (height × line spacing).
    pub advance: f32,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextBlock {
    pub lines: Vec<Line>,
    pub height: f32,
}

/// Break `text` into lines no wider than `max_width`.
///
/// Wrapping happens between any two characters, so long words and numbers
/// split mid-token. A single character wider than `max_width` still gets a
/// line of its own. `\n` always ends a line; empty lines are dropped.
pub fn wrap(text: &str, typeface: &dyn Typeface, face: Face, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    for segment in text.split('\n') {
        let mut current = String::new();
        for ch in segment.chars() {
            let mut candidate = current.clone();
            candidate.push(ch);
            if typeface.measure(&candidate, face).width <= max_width {
                current = candidate;
            } else {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                current.push(ch);
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

/// Wrap and measure `text` under `style`.
///
/// Styles with a background reserve [`BOX_PAD_X`] on each side for wrapping
/// and add [`BOX_PAD_Y`] above and below the text.
pub fn measure(
    text: &str,
    style: &Style,
    typeface: &dyn Typeface,
    max_width: f32,
    line_spacing: f32,
) -> TextBlock {
    let face = style.face();
    let boxed = style.background.is_some();
    let wrap_width = if boxed { max_width - 2.0 * BOX_PAD_X } else { max_width };
    let lines: Vec<Line> = wrap(text, typeface, face, wrap_width)
        .into_iter()
        .map(|text| {
            let extent = typeface.measure(&text, face);
            Line {
                text,
                width: extent.width,
                height: extent.height,
                advance: extent.height * line_spacing,
            }
        })
        .collect();
    let mut height: f32 = lines.iter().map(|line| line.advance).sum();
    if boxed && !lines.is_empty() {
        height += 2.0 * BOX_PAD_Y;
    }
    TextBlock { lines, height }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::BitmapTypeface;
    use crate::style::Role;
    use pretty_assertions::assert_eq;

    const FACE: Face = Face { size: 24.0, bold: false };

    #[test]
    fn wrapped_lines_respect_max_width() {
        let text = "The quick brown fox jumps over the lazy dog 1234567890 times";
        for max_width in [40.0, 100.0, 173.0, 500.0] {
            let lines = wrap(text, &BitmapTypeface, FACE, max_width);
            assert_eq!(lines.concat(), text);
            for line in &lines {
                assert!(BitmapTypeface.measure(line, FACE).width <= max_width, "{line:?} > {max_width}");
            }
        }
    }

    #[test]
    fn long_tokens_split_mid_word() {
        let lines = wrap("123456789012", &BitmapTypeface, FACE, 60.0);
        assert_eq!(lines, vec!["12345", "67890", "12"]);
    }

    #[test]
    fn oversized_glyph_gets_its_own_line() {
        let lines = wrap("abc", &BitmapTypeface, FACE, 5.0);
        assert_eq!(lines, vec!["a", "b", "c"]);
    }

    #[test]
    fn newline_forces_a_break() {
        let lines = wrap("ab\ncd\n\nef", &BitmapTypeface, FACE, 500.0);
        assert_eq!(lines, vec!["ab", "cd", "ef"]);
    }

    #[test]
    fn empty_text_measures_zero() {
        let style = Style::for_role(Role::Paragraph);
        let block = measure("", &style, &BitmapTypeface, 800.0, 1.5);
        assert!(block.lines.is_empty());
        assert_eq!(block.height, 0.0);
    }

    #[test]
    fn height_sums_spaced_lines() {
        let style = Style::for_role(Role::Paragraph);
        // 12px cells: 10 chars per 120px line.
        let block = measure(&"x".repeat(25), &style, &BitmapTypeface, 120.0, 1.5);
        assert_eq!(block.lines.len(), 3);
        assert_eq!(block.height, 3.0 * 14.0 * 1.5);
    }

    #[test]
    fn background_narrows_and_pads() {
        let style = Style::for_role(Role::Paragraph).with_background(image::Rgba([0, 0, 0, 255]));
        let block = measure(&"x".repeat(10), &style, &BitmapTypeface, 120.0, 1.0);
        // 120 - 2 * 16 = 88px leaves room for 7 cells per line.
        assert_eq!(block.lines.len(), 2);
        assert_eq!(block.height, 2.0 * 14.0 + 2.0 * BOX_PAD_Y);
    }
}
