//! Rasterising pages into PNG-ready images.

mod paint;

use image::{DynamicImage, RgbaImage};

use crate::layout::{CONTENT_TOP, Context, Cursor, Layout, Surface};
use crate::observe::Fallback;
use crate::paginate::Page;
use crate::style::{Role, Style};

pub use paint::Canvas;

const ICON_SIZE: u32 = 48;
const HEADER_ROW: f32 = 32.0;
const TITLE_OFFSET: f32 = 60.0;
const ICONS: [&str; 3] = [
    "chevron.left@3x.png",
    "square.and.arrow.up@3x.png",
    "ellipsis.circle@3x.png",
];

/// Template artwork shared by every page: the background image and the
/// header icons, decoded once per run.
pub struct Chrome {
    background: Option<DynamicImage>,
    icons: [Option<DynamicImage>; 3],
}

impl Chrome {
    /// Decode the template's artwork. Anything missing is reported once and
    /// left out of every page.
    pub fn load(cx: Context<'_>) -> Self {
        let template = cx.template;
        let background = template.background_image.as_ref().and_then(|path| {
            image::open(path)
                .map_err(|err| {
                    cx.observer.fallback(&Fallback::BackgroundUnavailable {
                        path: path.clone(),
                        reason: err.to_string(),
                    })
                })
                .ok()
        });
        let icons = ICONS.map(|name| {
            let path = template.icon_dir.join(name);
            image::open(&path)
                .map_err(|_| cx.observer.fallback(&Fallback::IconMissing { path }))
                .ok()
        });
        Self { background, icons }
    }
}

/// Draw one page: background, navigation header, then every node in order.
pub fn render_page(page: &Page, cx: Context<'_>, chrome: &Chrome) -> RgbaImage {
    let template = cx.template;
    let mut canvas = Canvas::new(template.width, template.height, template.background, template.typeface());
    if let Some(img) = &chrome.background {
        canvas.bitmap(Cursor::new(0.0, 0.0), img, template.width, template.height);
    }
    draw_header(&mut canvas, cx, chrome);

    let root = Style::root(template);
    let width = template.content_width();
    let mut layout = Layout::new(cx, canvas);
    let mut cursor = Cursor::new(template.margins.left as f32, CONTENT_TOP);
    for node in &page.nodes {
        let used = layout.node(node, cursor, width, &root);
        cursor = Cursor::new(cursor.x, cursor.y + used);
    }
    layout.into_surface().into_image()
}

fn draw_header(canvas: &mut Canvas<'_>, cx: Context<'_>, chrome: &Chrome) {
    let template = cx.template;
    let left = template.margins.left as f32;
    let right = template.width as f32 - left;
    let positions = [left, right - 120.0, right - 40.0];
    for (icon, x) in chrome.icons.iter().zip(positions) {
        if let Some(icon) = icon {
            canvas.bitmap(Cursor::new(x, HEADER_ROW), icon, ICON_SIZE, ICON_SIZE);
        }
    }
    if !template.header_title.is_empty() {
        canvas.text(
            Cursor::new(left + TITLE_OFFSET, HEADER_ROW),
            &template.header_title,
            &Style::for_role(Role::HeaderTitle),
        );
    }
}
