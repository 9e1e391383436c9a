//! Progress and degradation hooks.
//!
//! The pipeline reports what it is doing through an [`Observer`]; nothing in
//! layout or pagination depends on what the observer does with the events.

use std::path::PathBuf;

use crate::paginate::Page;

/// A non-fatal asset failure and the substitute that was used instead.
#[derive(Debug, Clone, PartialEq)]
pub enum Fallback {
    /// The configured font could not be read; a system font is tried next.
    FontUnavailable { path: PathBuf },
    /// No outline font could be loaded; the built-in bitmap glyphs are used.
    BuiltinFont,
    /// No bold face was found; bold runs are overdrawn instead.
    BoldSynthesized,
    IconMissing { path: PathBuf },
    ImageUnavailable { src: String, reason: String },
    BackgroundUnavailable { path: PathBuf, reason: String },
}

pub trait Observer {
    fn segment_started(&self, _index: usize, _count: usize) {}

    fn page_closed(&self, _number: usize, _page: &Page) {}

    fn fallback(&self, _event: &Fallback) {}
}

/// Silent observer.
impl Observer for () {}

/// Forwards events to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl Observer for LogObserver {
    fn segment_started(&self, index: usize, count: usize) {
        log::info!("laying out segment {} of {}", index, count);
    }

    fn page_closed(&self, number: usize, page: &Page) {
        log::info!(
            "page {} closed: {} node(s), {:.0}px of content",
            number,
            page.nodes.len(),
            page.extent
        );
    }

    fn fallback(&self, event: &Fallback) {
        match event {
            Fallback::FontUnavailable { path } => {
                log::warn!("font {} unavailable, trying system fonts", path.display())
            }
            Fallback::BuiltinFont => log::warn!("no outline font found, using built-in bitmap glyphs"),
            Fallback::BoldSynthesized => log::info!("no bold face found, synthesizing bold"),
            Fallback::IconMissing { path } => log::debug!("header icon {} missing", path.display()),
            Fallback::ImageUnavailable { src, reason } => {
                log::warn!("image '{}' unavailable ({}), drawing placeholder", src, reason)
            }
            Fallback::BackgroundUnavailable { path, reason } => log::warn!(
                "background image {} unavailable ({}), using flat color",
                path.display(),
                reason
            ),
        }
    }
}
