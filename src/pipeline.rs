//! End-to-end card generation: segments, pages, PNG files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use image::{DynamicImage, RgbaImage};

use crate::layout::Context;
use crate::markdown;
use crate::observe::Observer;
use crate::paginate::{Page, PageBreakPolicy, paginate};
use crate::render::{Chrome, render_page};
use crate::segment::{DEFAULT_MARKER, normalize_newlines, split_segments};
use crate::template::Template;

/// Knobs for one generation run.
#[derive(Debug, Clone, PartialEq)]
pub struct CardOptions {
    /// Explicit page-break marker; empty disables explicit breaks.
    pub marker: String,
    pub policy: PageBreakPolicy,
    /// Directory relative image sources resolve against.
    pub asset_root: PathBuf,
}

impl Default for CardOptions {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            policy: PageBreakPolicy::Height,
            asset_root: PathBuf::from("."),
        }
    }
}

pub struct Pipeline<'a> {
    template: &'a Template,
    options: CardOptions,
    observer: &'a dyn Observer,
}

impl<'a> Pipeline<'a> {
    pub fn new(template: &'a Template, options: CardOptions) -> Self {
        Self {
            template,
            options,
            observer: &(),
        }
    }

    pub fn with_observer(self, observer: &'a dyn Observer) -> Self {
        Self { observer, ..self }
    }

    fn context(&self) -> Context<'_> {
        Context::new(self.template)
            .with_assets(&self.options.asset_root)
            .with_observer(self.observer)
    }

    /// Parse and paginate `text` without drawing anything.
    ///
    /// Each marker-delimited segment is paginated on its own, so a segment
    /// always starts on a fresh page. Segments holding only whitespace yield
    /// no pages.
    pub fn plan(&self, text: &str) -> Vec<Page> {
        let text = normalize_newlines(text);
        let segments = split_segments(&text, &self.options.marker);
        let cx = self.context();
        let pages = match segments.as_slice() {
            [only] => paginate(markdown::parse(only), cx, self.options.policy),
            _ => {
                let count = segments.len();
                let mut pages = Vec::new();
                for (idx, segment) in segments.iter().enumerate() {
                    if segment.trim().is_empty() {
                        log::debug!("skipping empty segment {} of {}", idx + 1, count);
                        continue;
                    }
                    self.observer.segment_started(idx + 1, count);
                    pages.extend(paginate(markdown::parse(segment), cx, self.options.policy));
                }
                pages
            }
        };
        for (idx, page) in pages.iter().enumerate() {
            self.observer.page_closed(idx + 1, page);
        }
        pages
    }

    /// Draw the pages of `pages` lazily, in order. Template artwork is
    /// decoded once, when this is called.
    pub fn render<'p>(&'p self, pages: &'p [Page]) -> impl Iterator<Item = RgbaImage> + 'p {
        let cx = self.context();
        let chrome = Chrome::load(cx);
        pages.iter().map(move |page| render_page(page, cx, &chrome))
    }

    /// Generate `page_01.png`, `page_02.png`, ... under `dir`, creating it if
    /// needed. Returns the written paths in page order.
    pub fn write_cards(&self, text: &str, dir: &Path) -> Result<Vec<PathBuf>> {
        let pages = self.plan(text);
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output directory {}", dir.display()))?;

        let mut written = Vec::with_capacity(pages.len());
        for (idx, image) in self.render(&pages).enumerate() {
            let path = dir.join(card_file_name(idx + 1));
            DynamicImage::ImageRgba8(image)
                .to_rgb8()
                .save(&path)
                .with_context(|| format!("failed to write {}", path.display()))?;
            log::info!("wrote {}", path.display());
            written.push(path);
        }
        Ok(written)
    }
}

/// File name for the 1-based page `number`.
pub fn card_file_name(number: usize) -> String {
    format!("page_{:02}.png", number)
}
