//! Core library for turning markdown into paginated image cards.

mod color;
mod font;
mod layout;
mod markdown;
mod model;
mod observe;
mod paginate;
mod pipeline;
mod render;
mod segment;
mod style;
mod template;
mod text;

pub use color::{ColorError, parse_hex};
pub use font::{BitmapTypeface, Face, OutlineTypeface, TextBox, Typeface, load_typeface};
pub use layout::{CONTENT_TOP, Context, HEADER_HEIGHT, IMAGE_PLACEHOLDER, node_height};
pub use markdown::parse;
pub use model::{Node, plain_text};
pub use observe::{Fallback, LogObserver, Observer};
pub use paginate::{Page, PageBreakPolicy, paginate};
pub use pipeline::{CardOptions, Pipeline, card_file_name};
pub use render::{Chrome, render_page};
pub use segment::{DEFAULT_MARKER, normalize_newlines, split_segments};
pub use style::{Role, Style};
pub use template::{Margins, Template, TemplateConfig, TemplateError};
pub use text::{Line, TextBlock, wrap};

use std::path::{Path, PathBuf};

use anyhow::Result;

/// Render `text` into PNG cards under `dir` using `template` and default options.
pub fn generate_cards(text: &str, template: &Template, dir: &Path) -> Result<Vec<PathBuf>> {
    Pipeline::new(template, CardOptions::default())
        .with_observer(&LogObserver)
        .write_cards(text, dir)
}
