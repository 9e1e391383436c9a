//! Glyph metrics and drawing.
//!
//! Layout only ever talks to a [`Typeface`]; whether the glyphs come from an
//! outline font on disk or the built-in bitmap table is decided once, when
//! the template is resolved.

mod bitmap;
mod outline;

use std::fs;
use std::path::{Path, PathBuf};

use image::{Rgba, RgbaImage};

use crate::observe::{Fallback, Observer};

pub use bitmap::BitmapTypeface;
pub use outline::OutlineTypeface;

/// Size and weight requested for a run of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    pub size: f32,
    pub bold: bool,
}

impl Face {
    pub fn regular(size: f32) -> Self {
        Self { size, bold: false }
    }
}

/// Bounding box of a measured run: advance width and ink height.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextBox {
    pub width: f32,
    pub height: f32,
}

pub trait Typeface: Send + Sync {
    fn name(&self) -> &str;

    fn measure(&self, text: &str, face: Face) -> TextBox;

    /// Draw `text` with its top-left corner at `(x, y)`.
    fn draw(&self, canvas: &mut RgbaImage, x: i32, y: i32, text: &str, face: Face, color: Rgba<u8>);

    /// Whether bold runs use a real bold face rather than synthesized strokes.
    fn has_true_bold(&self) -> bool;
}

const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/System/Library/Fonts/PingFang.ttc",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\msyh.ttc",
    "C:\\Windows\\Fonts\\arial.ttf",
];

const BOLD_FONTS: &[&str] = &[
    "/System/Library/Fonts/PingFang.ttc",
    "/System/Library/Fonts/STHeiti Medium.ttc",
    "/System/Library/Fonts/Microsoft/SimHei.ttf",
    "/usr/share/fonts/truetype/noto/NotoSansCJK-Bold.ttc",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Bold.ttc",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
];

/// Resolve the typeface for a template. Never fails: each missing asset
/// degrades to the next candidate, ending at the built-in bitmap glyphs.
pub fn load_typeface(
    font_path: &Path,
    bold_path: Option<&Path>,
    observer: &dyn Observer,
) -> Box<dyn Typeface> {
    resolve(font_path, bold_path, SYSTEM_FONTS, BOLD_FONTS, observer)
}

fn resolve(
    font_path: &Path,
    bold_path: Option<&Path>,
    system_fonts: &[&str],
    bold_fonts: &[&str],
    observer: &dyn Observer,
) -> Box<dyn Typeface> {
    let regular = match read_font(font_path) {
        Some(found) => Some(found),
        None => {
            observer.fallback(&Fallback::FontUnavailable {
                path: font_path.to_path_buf(),
            });
            system_fonts
                .iter()
                .find_map(|candidate| read_font(Path::new(candidate)))
        }
    };
    let Some((regular_path, regular_data)) = regular else {
        observer.fallback(&Fallback::BuiltinFont);
        return Box::new(BitmapTypeface);
    };

    let bold = bold_path
        .into_iter()
        .map(Path::to_path_buf)
        .chain(bold_fonts.iter().map(PathBuf::from))
        .find_map(|candidate| read_font(&candidate))
        .map(|(_, data)| (data, 0))
        .or_else(|| (collection_faces(&regular_data) > 1).then(|| (regular_data.clone(), 1)));

    match OutlineTypeface::from_data(&regular_path, regular_data, bold) {
        Ok(face) => {
            if !face.has_true_bold() {
                observer.fallback(&Fallback::BoldSynthesized);
            }
            Box::new(face)
        }
        Err(err) => {
            log::debug!("{} is not a usable font: {}", regular_path.display(), err);
            observer.fallback(&Fallback::BuiltinFont);
            Box::new(BitmapTypeface)
        }
    }
}

fn read_font(path: &Path) -> Option<(PathBuf, Vec<u8>)> {
    let data = fs::read(path).ok()?;
    outline::is_font(&data).then(|| (path.to_path_buf(), data))
}

/// Number of faces in a TrueType collection; 1 for a single-face file.
///
/// Face index 1 of a single-face file parses as the regular face again, so
/// it only counts as a bold candidate inside a real collection.
fn collection_faces(data: &[u8]) -> u32 {
    match data {
        [b't', b't', b'c', b'f', _, _, _, _, a, b, c, d, ..] => u32::from_be_bytes([*a, *b, *c, *d]),
        _ => 1,
    }
}
