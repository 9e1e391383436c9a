use image::imageops::{FilterType, overlay};
use image::{DynamicImage, ImageBuffer, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;

use crate::font::Typeface;
use crate::layout::{Area, Cursor, Surface};
use crate::style::Style;

/// Raster surface for one page.
pub struct Canvas<'a> {
    image: RgbaImage,
    typeface: &'a dyn Typeface,
}

impl<'a> Canvas<'a> {
    pub fn new(width: u32, height: u32, fill: Rgba<u8>, typeface: &'a dyn Typeface) -> Self {
        Self {
            image: ImageBuffer::from_pixel(width, height, fill),
            typeface,
        }
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    fn fill(&mut self, x: f32, y: f32, width: f32, height: f32, color: Rgba<u8>) {
        let left = x.round() as i32;
        let top = y.round() as i32;
        let right = (x + width).round() as i32;
        let bottom = (y + height).round() as i32;
        if right <= left || bottom <= top {
            return;
        }
        let rect = Rect::at(left, top).of_size((right - left) as u32, (bottom - top) as u32);
        draw_filled_rect_mut(&mut self.image, rect, color);
    }
}

impl Surface for Canvas<'_> {
    const DRAWS: bool = true;

    fn text(&mut self, at: Cursor, text: &str, style: &Style) {
        let face = style.face();
        let (x, y) = (at.x.round() as i32, at.y.round() as i32);
        self.typeface.draw(&mut self.image, x, y, text, face, style.color);
        if face.bold && !self.typeface.has_true_bold() {
            self.typeface.draw(&mut self.image, x + 1, y, text, face, style.color);
            self.typeface.draw(&mut self.image, x, y + 1, text, face, style.color);
        }
    }

    fn rounded_rect(&mut self, area: Area, radius: f32, fill: Rgba<u8>) {
        let r = radius.min(area.width / 2.0).min(area.height / 2.0).max(0.0);
        if r < 1.0 {
            self.fill(area.x, area.y, area.width, area.height, fill);
            return;
        }
        self.fill(area.x + r, area.y, area.width - 2.0 * r, area.height, fill);
        self.fill(area.x, area.y + r, area.width, area.height - 2.0 * r, fill);
        let radius = r.round() as i32;
        let corners = [
            (area.x + r, area.y + r),
            (area.x + area.width - r - 1.0, area.y + r),
            (area.x + r, area.y + area.height - r - 1.0),
            (area.x + area.width - r - 1.0, area.y + area.height - r - 1.0),
        ];
        for (cx, cy) in corners {
            draw_filled_circle_mut(&mut self.image, (cx.round() as i32, cy.round() as i32), radius, fill);
        }
    }

    fn cell(&mut self, area: Area, fill: Rgba<u8>, border: Rgba<u8>, thickness: f32) {
        let Area {
            x, y, width, height,
        } = area;
        self.fill(x, y, width, height, fill);
        let t = thickness.min(width / 2.0).min(height / 2.0);
        self.fill(x, y, width, t, border);
        self.fill(x, y + height - t, width, t, border);
        self.fill(x, y, t, height, border);
        self.fill(x + width - t, y, t, height, border);
    }

    fn rule(&mut self, from: Cursor, to: Cursor, color: Rgba<u8>, thickness: f32) {
        let half = thickness / 2.0;
        if from.y == to.y {
            let left = from.x.min(to.x);
            self.fill(left, from.y - half, (to.x - from.x).abs(), thickness, color);
        } else if from.x == to.x {
            let top = from.y.min(to.y);
            self.fill(from.x - half, top, thickness, (to.y - from.y).abs(), color);
        } else {
            draw_line_segment_mut(&mut self.image, (from.x, from.y), (to.x, to.y), color);
        }
    }

    fn bitmap(&mut self, at: Cursor, image: &DynamicImage, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        let scaled = if image.width() == width && image.height() == height {
            image.to_rgba8()
        } else {
            image.resize_exact(width, height, FilterType::Triangle).to_rgba8()
        };
        overlay(&mut self.image, &scaled, at.x.round() as i64, at.y.round() as i64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::BitmapTypeface;
    use pretty_assertions::assert_eq;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    fn canvas() -> Canvas<'static> {
        Canvas::new(200, 100, WHITE, &BitmapTypeface)
    }

    #[test]
    fn zero_sized_shapes_are_skipped() {
        let mut canvas = canvas();
        canvas.rounded_rect(Area::new(10.0, 10.0, 0.0, 40.0), 12.0, RED);
        canvas.cell(Area::new(10.0, 10.0, 0.0, 0.0), RED, BLUE, 2.0);
        canvas.bitmap(Cursor::new(0.0, 0.0), &DynamicImage::new_rgba8(4, 4), 0, 3);
        let image = canvas.into_image();
        assert!(image.pixels().all(|px| *px == WHITE));
    }

    #[test]
    fn rounded_rect_leaves_corners_open() {
        let mut canvas = canvas();
        canvas.rounded_rect(Area::new(20.0, 20.0, 100.0, 50.0), 12.0, RED);
        let image = canvas.into_image();
        assert_eq!(*image.get_pixel(70, 45), RED);
        assert_eq!(*image.get_pixel(20, 20), WHITE);
        assert_eq!(*image.get_pixel(20, 45), RED);
    }

    #[test]
    fn cell_draws_border_around_fill() {
        let mut canvas = canvas();
        canvas.cell(Area::new(10.0, 10.0, 40.0, 30.0), RED, BLUE, 2.0);
        let image = canvas.into_image();
        assert_eq!(*image.get_pixel(10, 10), BLUE);
        assert_eq!(*image.get_pixel(49, 39), BLUE);
        assert_eq!(*image.get_pixel(30, 25), RED);
        assert_eq!(*image.get_pixel(50, 25), WHITE);
    }

    #[test]
    fn thick_rules_are_centered_on_the_line() {
        let mut canvas = canvas();
        canvas.rule(Cursor::new(10.0, 50.0), Cursor::new(110.0, 50.0), RED, 6.0);
        canvas.rule(Cursor::new(150.0, 10.0), Cursor::new(150.0, 90.0), BLUE, 8.0);
        let image = canvas.into_image();
        assert_eq!(*image.get_pixel(60, 47), RED);
        assert_eq!(*image.get_pixel(60, 52), RED);
        assert_eq!(*image.get_pixel(60, 54), WHITE);
        assert_eq!(*image.get_pixel(146, 50), BLUE);
        assert_eq!(*image.get_pixel(153, 50), BLUE);
        assert_eq!(*image.get_pixel(155, 50), WHITE);
    }

    #[test]
    fn bitmaps_are_scaled_into_place() {
        let mut canvas = canvas();
        let source = DynamicImage::ImageRgba8(ImageBuffer::from_pixel(8, 8, BLUE));
        canvas.bitmap(Cursor::new(100.0, 20.0), &source, 40, 40);
        let image = canvas.into_image();
        assert_eq!(*image.get_pixel(120, 40), BLUE);
        assert_eq!(*image.get_pixel(99, 40), WHITE);
        assert_eq!(*image.get_pixel(120, 60), WHITE);
    }

    #[test]
    fn bold_text_is_overdrawn_without_a_bold_face() {
        let mut regular = canvas();
        let mut bold = canvas();
        let style = Style::new(12.0, RED);
        regular.text(Cursor::new(5.0, 5.0), "I", &style);
        bold.text(Cursor::new(5.0, 5.0), "I", &Style { bold: true, ..style });
        let count = |image: RgbaImage| image.pixels().filter(|px| **px == RED).count();
        assert!(count(bold.into_image()) > count(regular.into_image()));
    }
}
