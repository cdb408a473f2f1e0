//! RGBA pixel buffer and the drawing primitives the renderer needs.

use crate::math::{Rect, Vector};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const CLEAR: Color = Color::rgba(0, 0, 0, 0);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const GRAY: Color = Color::rgb(192, 192, 192);
    pub const RED: Color = Color::rgb(217, 87, 99);
    pub const GREEN: Color = Color::rgb(153, 229, 80);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);

    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Composite a premultiplied `over` colour on top of `self`.
    #[inline]
    pub fn blend(&mut self, over: Color) {
        let inv = 1.0 - f64::from(over.a) / 255.0;
        self.r = ((f64::from(self.r) * inv) as u8).saturating_add(over.r);
        self.g = ((f64::from(self.g) * inv) as u8).saturating_add(over.g);
        self.b = ((f64::from(self.b) * inv) as u8).saturating_add(over.b);
        self.a = ((f64::from(self.a) * inv) as u8).saturating_add(over.a);
    }

    /// Premultiply by `opacity` (and the colour's own alpha).
    #[inline]
    pub fn with_opacity(self, opacity: f64) -> Color {
        let alpha = (f64::from(self.a) / 255.0 * opacity).clamp(0.0, 1.0);
        Color {
            r: (f64::from(self.r) * alpha) as u8,
            g: (f64::from(self.g) * alpha) as u8,
            b: (f64::from(self.b) * alpha) as u8,
            a: (255.0 * alpha) as u8,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Color>,
}

impl Bitmap {
    pub fn new(width: usize, height: usize, color: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width * height],
        }
    }

    pub fn from_pixels(width: usize, pixels: Vec<Color>) -> Self {
        let height = if width == 0 { 0 } else { pixels.len() / width };
        Self {
            width,
            height,
            pixels,
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Color {
        self.pixels[y * self.width + x]
    }

    /// Writes `color`, ignoring coordinates outside the bitmap.
    #[inline]
    pub fn set(&mut self, x: isize, y: isize, color: Color) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let w = self.width;
        self.pixels[y as usize * w + x as usize] = color;
    }

    /// Texel at normalized coordinates in `[0, 1)`, clamped to the edges.
    #[inline]
    pub fn sample(&self, u: f64, v: f64) -> Color {
        let x = ((u * self.width as f64) as usize).min(self.width.saturating_sub(1));
        let y = ((v * self.height as f64) as usize).min(self.height.saturating_sub(1));
        self.get(x, y)
    }

    #[inline]
    pub fn blend_pixel(&mut self, x: isize, y: isize, color: Color) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        match color.a {
            0 => {}
            255 => self.pixels[idx] = color,
            _ => self.pixels[idx].blend(color),
        }
    }

    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    pub fn fill(&mut self, rect: Rect, color: Color) {
        self.fill_with(rect, |pixel| *pixel = color);
    }

    pub fn fill_blend(&mut self, rect: Rect, color: Color, opacity: f64) {
        let over = color.with_opacity(opacity);
        self.fill_with(rect, |pixel| pixel.blend(over));
    }

    fn fill_with(&mut self, rect: Rect, mut paint: impl FnMut(&mut Color)) {
        let x0 = (rect.min.x.max(0.0)) as usize;
        let y0 = (rect.min.y.max(0.0)) as usize;
        let x1 = (rect.max.x.max(0.0) as usize).min(self.width);
        let y1 = (rect.max.y.max(0.0) as usize).min(self.height);
        for y in y0..y1 {
            let row = y * self.width;
            for pixel in &mut self.pixels[row + x0.min(x1)..row + x1] {
                paint(pixel);
            }
        }
    }

    /// Tints every pixel toward `color`.
    pub fn tint(&mut self, color: Color, opacity: f64) {
        let over = color.with_opacity(opacity);
        if over.a == 0 {
            return;
        }
        for pixel in &mut self.pixels {
            pixel.blend(over);
        }
    }

    /// Draws column `source_x` of `source` scaled to `height`, top at `point`.
    pub fn draw_column(&mut self, source_x: usize, source: &Bitmap, point: Vector, height: f64) {
        if height <= 0.0 || !height.is_finite() || source.height == 0 {
            return;
        }
        let source_x = source_x.min(source.width.saturating_sub(1));
        let start = point.y as isize;
        let end = (point.y + height).ceil() as isize;
        let step_y = source.height as f64 / height;
        let x = point.x as isize;
        for y in start.max(0)..end.min(self.height as isize) {
            let source_y = ((y as f64 - point.y).max(0.0) * step_y) as usize;
            let color = source.get(source_x, source_y.min(source.height - 1));
            self.blend_pixel(x, y, color);
        }
    }

    /// Draws `source` stretched to `size` with its top-left corner at `point`.
    pub fn draw_image(&mut self, source: &Bitmap, point: Vector, size: Vector) {
        if size.x <= 0.0 || source.width == 0 {
            return;
        }
        let start = point.x as isize;
        let end = (point.x + size.x) as isize;
        let step_x = source.width as f64 / size.x;
        for x in start.max(0)..end.min(self.width as isize) {
            let source_x = ((x as f64 - point.x).max(0.0) * step_x) as usize;
            self.draw_column(source_x, source, Vector::new(x as f64, point.y), size.y);
        }
    }

    pub fn draw_line(&mut self, from: Vector, to: Vector, color: Color) {
        self.draw_line_with(from, to, |_| color);
    }

    /// Line whose opacity falls off from `from` to `to`.
    pub fn draw_fade_line(&mut self, from: Vector, to: Vector, color: Color) {
        self.draw_line_with(from, to, |t| color.with_opacity(1.0 - t));
    }

    fn draw_line_with(&mut self, from: Vector, to: Vector, shade: impl Fn(f64) -> Color) {
        let difference = to - from;
        let steps = difference.x.abs().max(difference.y.abs()).ceil();
        if steps < 1.0 {
            self.blend_pixel(from.x as isize, from.y as isize, shade(0.0));
            return;
        }
        let step = difference / steps;
        let mut point = from;
        for i in 0..=steps as usize {
            self.blend_pixel(point.x as isize, point.y as isize, shade(i as f64 / steps));
            point += step;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_column_scales_source() {
        let source = Bitmap::from_pixels(1, vec![Color::RED, Color::BLUE]);
        let mut bitmap = Bitmap::new(1, 4, Color::BLACK);
        bitmap.draw_column(0, &source, Vector::ZERO, 4.0);
        assert_eq!(bitmap.get(0, 0), Color::RED);
        assert_eq!(bitmap.get(0, 1), Color::RED);
        assert_eq!(bitmap.get(0, 2), Color::BLUE);
        assert_eq!(bitmap.get(0, 3), Color::BLUE);
    }

    #[test]
    fn transparent_pixels_are_skipped() {
        let source = Bitmap::from_pixels(1, vec![Color::CLEAR]);
        let mut bitmap = Bitmap::new(1, 1, Color::GREEN);
        bitmap.draw_column(0, &source, Vector::ZERO, 1.0);
        assert_eq!(bitmap.get(0, 0), Color::GREEN);
    }

    #[test]
    fn full_tint_replaces_colour() {
        let mut bitmap = Bitmap::new(2, 2, Color::GREEN);
        bitmap.tint(Color::RED, 1.0);
        assert!(bitmap.pixels.iter().all(|&p| p == Color::RED));
    }

    #[test]
    fn zero_tint_is_noop() {
        let mut bitmap = Bitmap::new(2, 2, Color::GREEN);
        bitmap.tint(Color::RED, 0.0);
        assert!(bitmap.pixels.iter().all(|&p| p == Color::GREEN));
    }

    #[test]
    fn fill_clips_to_bounds() {
        let mut bitmap = Bitmap::new(4, 4, Color::BLACK);
        bitmap.fill(
            Rect::new(Vector::new(-2.0, 2.0), Vector::new(9.0, 9.0)),
            Color::WHITE,
        );
        assert_eq!(bitmap.get(0, 1), Color::BLACK);
        assert_eq!(bitmap.get(3, 3), Color::WHITE);
    }
}
