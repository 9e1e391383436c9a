//! Per-node layout rules shared by measurement and drawing.
//!
//! [`Layout`] walks the document tree once per pass. The pass is chosen by
//! the [`Surface`] it drives: [`Measure`] discards every drawing call, the
//! raster canvas turns them into pixels. Both passes run the exact same
//! geometry, so a page always draws to the height it was measured at.

use std::path::Path;

use image::{DynamicImage, Rgba};

use crate::color::rgb;
use crate::model::{Node, plain_text};
use crate::observe::{Fallback, Observer};
use crate::style::{Decoration, Role, STRIKE_COLOR, Style};
use crate::template::Template;
use crate::text::{self, BOX_PAD_X, BOX_PAD_Y, TextBlock};

/// Height of the navigation band drawn at the top of every page.
pub const HEADER_HEIGHT: f32 = 100.0;
/// Gap between the navigation band and the first node.
pub const HEADER_GAP: f32 = 30.0;
/// Cursor y where content starts on every page.
pub const CONTENT_TOP: f32 = HEADER_HEIGHT + HEADER_GAP;

const HEADING_GAP: f32 = 18.0;
const BULLET: &str = "• ";
const QUOTE_INSET: f32 = 30.0;
const QUOTE_PADDING: f32 = 24.0;
const QUOTE_MIN_HEIGHT: f32 = 50.0;
const QUOTE_BAR_OFFSET: f32 = 18.0;
const QUOTE_BAR_WIDTH: f32 = 8.0;
const QUOTE_TEXT_OFFSET: f32 = 16.0;
const QUOTE_BAR: Rgba<u8> = rgb(0xff, 0xb3, 0x00);
const RULE_HEIGHT: f32 = 36.0;
const RULE_COLOR: Rgba<u8> = rgb(0xe5, 0xe5, 0xe5);
const CODE_PAD: f32 = 16.0;
const CODE_LINE_GAP: f32 = 8.0;
const INLINE_CODE_PAD: f32 = 6.0;
const CELL_PAD: f32 = 12.0;
const CELL_FILL: Rgba<u8> = rgb(0xfa, 0xfa, 0xfa);
const CELL_BORDER: Rgba<u8> = rgb(0xcc, 0xcc, 0xcc);
const LINE_BREAK_HEIGHT: f32 = 12.0;
pub const IMAGE_PLACEHOLDER: &str = "[image unavailable]";

/// Drawing position within one page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cursor {
    pub x: f32,
    pub y: f32,
}

impl Cursor {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    fn down(self, dy: f32) -> Self {
        Self {
            x: self.x,
            y: self.y + dy,
        }
    }

    fn right(self, dx: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y,
        }
    }
}

/// Axis-aligned rectangle in canvas units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Area {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Area {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Drawing primitives issued by the layout walk. Every method defaults to a
/// no-op so that a measuring surface implements nothing but the flag.
pub trait Surface {
    /// Whether calls on this surface produce visible output.
    const DRAWS: bool;

    fn text(&mut self, _at: Cursor, _text: &str, _style: &Style) {}

    fn rounded_rect(&mut self, _area: Area, _radius: f32, _fill: Rgba<u8>) {}

    fn cell(&mut self, _area: Area, _fill: Rgba<u8>, _border: Rgba<u8>, _thickness: f32) {}

    fn rule(&mut self, _from: Cursor, _to: Cursor, _color: Rgba<u8>, _thickness: f32) {}

    fn bitmap(&mut self, _at: Cursor, _image: &DynamicImage, _width: u32, _height: u32) {}
}

/// Surface for the measuring pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct Measure;

impl Surface for Measure {
    const DRAWS: bool = false;
}

/// Read-only inputs shared by every pass over every page of a run.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    pub template: &'a Template,
    /// Directory relative image sources are resolved against.
    pub assets: &'a Path,
    pub observer: &'a dyn Observer,
}

impl<'a> Context<'a> {
    pub fn new(template: &'a Template) -> Self {
        Self {
            template,
            assets: Path::new("."),
            observer: &(),
        }
    }

    pub fn with_assets(self, assets: &'a Path) -> Self {
        Self { assets, ..self }
    }

    pub fn with_observer(self, observer: &'a dyn Observer) -> Self {
        Self { observer, ..self }
    }

    /// Load an image node's source. Failures are reported only when `report`
    /// is set so that one bad image yields one event, not one per pass.
    fn load_image(&self, src: &str, report: bool) -> Option<DynamicImage> {
        let failure = |reason: String| {
            if report {
                self.observer.fallback(&Fallback::ImageUnavailable {
                    src: src.to_string(),
                    reason,
                });
            }
            None
        };
        if ["http://", "https://", "data:"].iter().any(|scheme| src.starts_with(scheme)) {
            return failure("remote sources are not fetched".to_string());
        }
        match image::open(self.assets.join(src)) {
            Ok(img) if img.width() > 0 && img.height() > 0 => Some(img),
            Ok(_) => failure("image is empty".to_string()),
            Err(err) => failure(err.to_string()),
        }
    }
}

/// Tree walker applying the per-node rules against a [`Surface`].
pub struct Layout<'a, S> {
    cx: Context<'a>,
    surface: S,
}

impl<'a, S: Surface> Layout<'a, S> {
    pub fn new(cx: Context<'a>, surface: S) -> Self {
        Self { cx, surface }
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    /// Lay out `node` with its top-left corner at `at`, returning the height
    /// it occupies. `inherited` is the style of the enclosing context.
    pub fn node(&mut self, node: &Node, at: Cursor, width: f32, inherited: &Style) -> f32 {
        match node {
            Node::Heading { level, children } => {
                let style = Style::for_role(Role::Heading(*level));
                self.text_run(&plain_text(children), &style, at, width) + HEADING_GAP
            }
            Node::Paragraph { children } => {
                self.text_run(&plain_text(children), &Style::for_role(Role::Paragraph), at, width)
            }
            Node::List { items } => {
                let style = Style::for_role(Role::List);
                let mut used = 0.0;
                for item in items {
                    let text = format!("{BULLET}{}", plain_text(item));
                    used += self.text_run(&text, &style, at.down(used), width);
                }
                used
            }
            Node::Blockquote { children } => self.blockquote(children, at, width),
            Node::ThematicBreak => {
                let y = at.y + RULE_HEIGHT / 2.0;
                self.surface.rule(
                    Cursor::new(at.x, y),
                    Cursor::new(at.x + width, y),
                    RULE_COLOR,
                    6.0,
                );
                RULE_HEIGHT
            }
            Node::Code { raw } => self.code_block(raw, at, width),
            Node::InlineCode { raw } => self.inline_code(raw, at),
            Node::Strong { children } => self.text_run(&plain_text(children), &inherited.strong(), at, width),
            Node::Emphasis { children } => {
                self.text_run(&plain_text(children), &inherited.emphasis(), at, width)
            }
            Node::Delete { children } => self.text_run(&plain_text(children), &inherited.deleted(), at, width),
            Node::Link { children, .. } => self.text_run(&plain_text(children), &inherited.linked(), at, width),
            Node::Text { raw } => self.text_run(raw, inherited, at, width),
            Node::LineBreak => LINE_BREAK_HEIGHT,
            Node::Table { rows } => self.table(rows, at),
            Node::Image { src, .. } => self.image(src, at, width),
            Node::Container { children } => {
                let mut used = 0.0;
                for child in children {
                    used += self.node(child, at.down(used), width, inherited);
                }
                used
            }
        }
    }

    fn text_run(&mut self, text: &str, style: &Style, at: Cursor, width: f32) -> f32 {
        let template = self.cx.template;
        let block = text::measure(text, style, template.typeface(), width, template.line_spacing);
        if let Some(fill) = style.background {
            if !block.lines.is_empty() {
                self.surface
                    .rounded_rect(Area::new(at.x, at.y, width, block.height), 12.0, fill);
            }
            self.lines(&block, style, at.right(BOX_PAD_X).down(BOX_PAD_Y));
        } else {
            self.lines(&block, style, at);
        }
        block.height
    }

    fn lines(&mut self, block: &TextBlock, style: &Style, at: Cursor) {
        let mut y = at.y;
        for line in &block.lines {
            let origin = Cursor::new(at.x, y);
            self.surface.text(origin, &line.text, style);
            match style.decoration {
                Decoration::None => {}
                Decoration::Strikethrough => {
                    let mid = origin.down(line.height / 2.0);
                    self.surface.rule(mid, mid.right(line.width), STRIKE_COLOR, 3.0);
                }
                Decoration::Underline => {
                    let base = origin.down(line.height);
                    self.surface.rule(base, base.right(line.width), style.color, 2.0);
                }
            }
            y += line.advance;
        }
    }

    fn blockquote(&mut self, children: &[Node], at: Cursor, width: f32) -> f32 {
        let template = self.cx.template;
        let quote = Style::for_role(Role::Blockquote);
        let text_style = quote.without_background();
        let blocks: Vec<TextBlock> = children
            .iter()
            .map(|child| {
                text::measure(
                    &child.plain_text(),
                    &text_style,
                    template.typeface(),
                    width - QUOTE_INSET,
                    template.line_spacing,
                )
            })
            .collect();
        let text_height: f32 = blocks.iter().map(|block| block.height).sum();
        let height = (text_height + QUOTE_PADDING).max(QUOTE_MIN_HEIGHT);

        let bar_x = at.x - QUOTE_BAR_OFFSET;
        if let Some(fill) = quote.background {
            let left = bar_x + QUOTE_BAR_WIDTH / 2.0;
            self.surface
                .rounded_rect(Area::new(left, at.y, at.x + width - left, height), 16.0, fill);
        }
        self.surface.rule(
            Cursor::new(bar_x, at.y),
            Cursor::new(bar_x, at.y + height),
            QUOTE_BAR,
            QUOTE_BAR_WIDTH,
        );

        let mut origin = at.right(QUOTE_TEXT_OFFSET).down(QUOTE_PADDING / 2.0);
        for block in &blocks {
            self.lines(block, &text_style, origin);
            origin = origin.down(block.height);
        }
        height
    }

    fn code_block(&mut self, raw: &str, at: Cursor, width: f32) -> f32 {
        let style = Style::for_role(Role::Code);
        let template = self.cx.template;
        let typeface = template.typeface();
        let lines: Vec<(&str, f32)> = raw
            .strip_suffix('\n')
            .unwrap_or(raw)
            .split('\n')
            .map(|line| (line, typeface.measure(line, style.face()).height))
            .collect();
        let body: f32 = lines.iter().map(|(_, height)| height + CODE_LINE_GAP).sum();
        let height = body + 2.0 * CODE_PAD;

        if let Some(fill) = style.background {
            self.surface.rounded_rect(
                Area::new(at.x - CODE_PAD, at.y, width + 2.0 * CODE_PAD, height),
                12.0,
                fill,
            );
        }
        let mut origin = at.down(CODE_PAD);
        for (line, line_height) in lines {
            self.surface.text(origin, line, &style);
            origin = origin.down(line_height + CODE_LINE_GAP);
        }
        height
    }

    fn inline_code(&mut self, raw: &str, at: Cursor) -> f32 {
        let style = Style::for_role(Role::Code);
        let template = self.cx.template;
        let extent = template.typeface().measure(raw, style.face());
        let height = extent.height + 2.0 * INLINE_CODE_PAD;
        if let Some(fill) = style.background {
            self.surface.rounded_rect(
                Area::new(at.x, at.y, extent.width + 2.0 * INLINE_CODE_PAD, height),
                6.0,
                fill,
            );
        }
        self.surface
            .text(at.right(INLINE_CODE_PAD).down(INLINE_CODE_PAD), raw, &style);
        height
    }

    fn table(&mut self, rows: &[Vec<Vec<Node>>], at: Cursor) -> f32 {
        let style = Style::for_role(Role::Table);
        let template = self.cx.template;
        let typeface = template.typeface();
        let cells: Vec<Vec<(String, f32, f32)>> = rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| {
                        let text = plain_text(cell);
                        let extent = typeface.measure(&text, style.face());
                        (text, extent.width, extent.height)
                    })
                    .collect()
            })
            .collect();

        let mut columns: Vec<f32> = Vec::new();
        for row in &cells {
            for (idx, (_, cell_width, _)) in row.iter().enumerate() {
                match columns.get_mut(idx) {
                    Some(widest) => *widest = widest.max(*cell_width),
                    None => columns.push(*cell_width),
                }
            }
        }

        let mut y = at.y;
        for row in &cells {
            let mut x = at.x;
            let mut row_height = 0.0f32;
            for (idx, (text, _, text_height)) in row.iter().enumerate() {
                let cell_width = columns[idx] + 2.0 * CELL_PAD;
                let cell_height = text_height + 2.0 * CELL_PAD;
                let origin = Cursor::new(x, y);
                self.surface.cell(
                    Area::new(x, y, cell_width, cell_height),
                    CELL_FILL,
                    CELL_BORDER,
                    2.0,
                );
                self.surface
                    .text(origin.right(CELL_PAD).down(CELL_PAD), text, &style);
                x += cell_width;
                row_height = row_height.max(cell_height);
            }
            y += row_height;
        }
        y - at.y
    }

    fn image(&mut self, src: &str, at: Cursor, width: f32) -> f32 {
        match self.cx.load_image(src, S::DRAWS) {
            Some(img) => {
                let ratio = (width / img.width() as f32).min(1.0);
                let scaled_width = ((img.width() as f32 * ratio) as u32).max(1);
                let scaled_height = ((img.height() as f32 * ratio) as u32).max(1);
                self.surface.bitmap(at, &img, scaled_width, scaled_height);
                scaled_height as f32
            }
            None => self.text_run(IMAGE_PLACEHOLDER, &Style::for_role(Role::Paragraph), at, width),
        }
    }
}

/// Height `node` occupies when laid out at `width` under `inherited`.
pub fn node_height(node: &Node, cx: Context<'_>, width: f32, inherited: &Style) -> f32 {
    let origin = Cursor::new(cx.template.margins.left as f32, CONTENT_TOP);
    Layout::new(cx, Measure).node(node, origin, width, inherited)
}

#[cfg(test)]
mod tests;
