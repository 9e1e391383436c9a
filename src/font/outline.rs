use std::path::Path;

use ab_glyph::{Font, FontRef, FontVec, GlyphId, InvalidFont, PxScale, ScaleFont, point};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;

use super::{Face, TextBox, Typeface};

/// TrueType/OpenType face (plus optional bold face) rasterised with `ab_glyph`.
pub struct OutlineTypeface {
    name: String,
    regular: FontVec,
    bold: Option<FontVec>,
}

impl OutlineTypeface {
    /// Build from raw font bytes. `bold` is a second font buffer and the face
    /// index inside it; an unusable bold face is dropped rather than reported.
    pub fn from_data(
        path: &Path,
        regular: Vec<u8>,
        bold: Option<(Vec<u8>, u32)>,
    ) -> Result<Self, InvalidFont> {
        let regular = FontVec::try_from_vec(regular)?;
        let bold = bold.and_then(|(data, index)| FontVec::try_from_vec_and_index(data, index).ok());
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "outline".to_string());
        Ok(Self {
            name,
            regular,
            bold,
        })
    }

    fn pick(&self, bold: bool) -> &FontVec {
        match (&self.bold, bold) {
            (Some(face), true) => face,
            _ => &self.regular,
        }
    }
}

impl Typeface for OutlineTypeface {
    fn name(&self) -> &str {
        &self.name
    }

    fn measure(&self, text: &str, face: Face) -> TextBox {
        let font = self.pick(face.bold);
        let scaled = font.as_scaled(PxScale::from(face.size));
        let mut caret = 0.0f32;
        let mut previous: Option<GlyphId> = None;
        let mut top = f32::INFINITY;
        let mut bottom = f32::NEG_INFINITY;
        for ch in text.chars().filter(|c| !c.is_control()) {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = previous {
                caret += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(scaled.scale(), point(caret, scaled.ascent()));
            caret += scaled.h_advance(id);
            previous = Some(id);
            if let Some(outlined) = font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                top = top.min(bounds.min.y);
                bottom = bottom.max(bounds.max.y);
            }
        }
        TextBox {
            width: caret,
            height: if bottom > top { bottom - top } else { 0.0 },
        }
    }

    fn draw(&self, canvas: &mut RgbaImage, x: i32, y: i32, text: &str, face: Face, color: Rgba<u8>) {
        let font = self.pick(face.bold);
        draw_text_mut(canvas, color, x, y, PxScale::from(face.size), font, text);
    }

    fn has_true_bold(&self) -> bool {
        self.bold.is_some()
    }
}

pub(super) fn is_font(data: &[u8]) -> bool {
    FontRef::try_from_slice(data).is_ok()
}
