// ============================================================================
// RASTERIZER
// ============================================================================
//
// Software rendering of a GaugeFrame into an RGBA8 pixel buffer, as used by
// the window host. Angles follow screen conventions: degrees, clockwise from
// +x with y pointing down, the same as SVG rotations.

use std::path::Path;

use bon::Builder;
use rusttype::{point, Font, Scale};

use crate::error::RenderError;
use crate::frame::{GaugeFrame, PlacedText};
use crate::geometry::rotate_point;
use crate::layout::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn as_tuple(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    /// Parses `#rgb`, `#rrggbb` or one of the common CSS color names.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Some(hex) = text.strip_prefix('#') {
            return Self::parse_hex(hex);
        }
        let rgb = match text.to_ascii_lowercase().as_str() {
            "black" => (0, 0, 0),
            "white" => (255, 255, 255),
            "red" => (255, 0, 0),
            "darkred" => (139, 0, 0),
            "green" => (0, 128, 0),
            "darkgreen" => (0, 100, 0),
            "lime" => (0, 255, 0),
            "blue" => (0, 0, 255),
            "navy" => (0, 0, 128),
            "yellow" => (255, 255, 0),
            "gold" => (255, 215, 0),
            "orange" => (255, 165, 0),
            "darkorange" => (255, 140, 0),
            "purple" => (128, 0, 128),
            "gray" | "grey" => (128, 128, 128),
            "lightgray" | "lightgrey" => (211, 211, 211),
            "darkgray" | "darkgrey" => (169, 169, 169),
            "silver" => (192, 192, 192),
            _ => return None,
        };
        Some(Color::new(rgb.0, rgb.1, rgb.2))
    }

    fn parse_hex(hex: &str) -> Option<Self> {
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            3 => {
                let mut it = hex.chars().map(|c| channel(&c.to_string()).map(|v| v * 17));
                Some(Color::new(it.next()??, it.next()??, it.next()??))
            }
            6 => Some(Color::new(
                channel(hex.get(0..2)?)?,
                channel(hex.get(2..4)?)?,
                channel(hex.get(4..6)?)?,
            )),
            _ => None,
        }
    }
}

/// Colors and text size used when rasterizing a frame
#[derive(Debug, Clone, Builder)]
pub struct RasterStyle {
    #[builder(default = Color::new(24, 24, 28))]
    pub background: Color,
    #[builder(default = Color::new(236, 232, 214))]
    pub face: Color,
    #[builder(default = Color::BLACK)]
    pub marker: Color,
    #[builder(default = Color::new(200, 30, 30))]
    pub needle: Color,
    #[builder(default = Color::new(60, 60, 60))]
    pub needle_shadow: Color,
    #[builder(default = Color::new(40, 40, 40))]
    pub pin: Color,
    #[builder(default = Color::new(20, 20, 20))]
    pub text: Color,
    #[builder(default = Color::new(150, 150, 150))]
    pub text_shadow: Color,
    /// Used for arc colors that cannot be parsed
    #[builder(default = Color::new(128, 128, 128))]
    pub fallback_arc: Color,
    #[builder(default = 12.0)]
    pub font_size: f32,
}

impl Default for RasterStyle {
    fn default() -> Self {
        Self::builder().build()
    }
}

pub fn load_font(path: &Path) -> Result<Font<'static>, RenderError> {
    let bytes = std::fs::read(path)?;
    Font::try_from_vec(bytes)
        .ok_or_else(|| RenderError::Font(format!("{} is not a usable font", path.display())))
}

/// `angle` lies on the clockwise sweep starting at `start`
fn angle_within(angle: f64, start: f64, sweep: f64) -> bool {
    if sweep >= 360.0 {
        return true;
    }
    (angle - start).rem_euclid(360.0) <= sweep
}

pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
}

impl<'a> Canvas<'a> {
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        Self {
            frame,
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self, color: Color) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.r, color.g, color.b, 0xff]);
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        let px = self.frame.get(idx..idx + 3)?;
        Some(Color::new(px[0], px[1], px[2]))
    }

    /// Blends `color` over the pixel at (`x`, `y`); out of bounds is a no-op.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Color, alpha: f32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * 4;
        let Some(dst) = self.frame.get_mut(idx..idx + 4) else {
            return;
        };
        let a = alpha.clamp(0.0, 1.0);
        let blend = |src: u8, dst: u8| (src as f32 * a + dst as f32 * (1.0 - a)).round() as u8;
        dst[0] = blend(color.r, dst[0]);
        dst[1] = blend(color.g, dst[1]);
        dst[2] = blend(color.b, dst[2]);
        dst[3] = 0xff;
    }

    /// Spreads one sample over the four nearest pixels
    fn set_subpixel(&mut self, x: f64, y: f64, color: Color, alpha: f32) {
        let (x_floor, y_floor) = (x.floor(), y.floor());
        let (x_frac, y_frac) = (x - x_floor, y - y_floor);
        let samples = [
            (0, 0, (1.0 - x_frac) * (1.0 - y_frac)),
            (1, 0, x_frac * (1.0 - y_frac)),
            (0, 1, (1.0 - x_frac) * y_frac),
            (1, 1, x_frac * y_frac),
        ];
        for (dx, dy, weight) in samples {
            let a = alpha * weight as f32;
            if a > 0.001 {
                self.set_pixel(x_floor as i32 + dx, y_floor as i32 + dy, color, a);
            }
        }
    }

    /// Anti-aliased line; `taper` narrows it toward the end point (0 = none)
    pub fn draw_line(
        &mut self,
        from: Point,
        to: Point,
        thickness: f64,
        taper: f64,
        color: Color,
        alpha: f32,
    ) {
        let pad = thickness.ceil() + 1.0;
        let min_x = (from.x.min(to.x) - pad).floor() as i32;
        let max_x = (from.x.max(to.x) + pad).ceil() as i32;
        let min_y = (from.y.min(to.y) - pad).floor() as i32;
        let max_y = (from.y.max(to.y) + pad).ceil() as i32;
        let (dx, dy) = (to.x - from.x, to.y - from.y);
        let len_sq = dx * dx + dy * dy;

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let (px, py) = (x as f64 - from.x, y as f64 - from.y);
                let t = if len_sq > 0.0 {
                    ((px * dx + py * dy) / len_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let dist = (px - t * dx).hypot(py - t * dy);
                let local = thickness * (1.0 - t * taper);
                let aa = (1.0 - (dist - local / 2.0).clamp(0.0, 1.0)) as f32;
                if aa > 0.01 {
                    self.set_pixel(x, y, color, aa * alpha);
                }
            }
        }
    }

    pub fn fill_circle(&mut self, center: Point, radius: f64, color: Color) {
        let reach = radius.ceil() as i32 + 1;
        let (cx, cy) = (center.x.round() as i32, center.y.round() as i32);
        for y in cy - reach..=cy + reach {
            for x in cx - reach..=cx + reach {
                let dist = (x as f64 - center.x).hypot(y as f64 - center.y);
                let aa = (radius - dist + 0.5).clamp(0.0, 1.0) as f32;
                if aa > 0.0 {
                    self.set_pixel(x, y, color, aa);
                }
            }
        }
    }

    /// Ring section between `inner` and `outer` radius over the given angles
    pub fn fill_band(
        &mut self,
        center: Point,
        inner: f64,
        outer: f64,
        start_degrees: f64,
        sweep_degrees: f64,
        color: Color,
        alpha: f32,
    ) {
        if sweep_degrees <= 0.0 || outer <= 0.0 {
            return;
        }
        let reach = outer.ceil() as i32 + 1;
        let (cx, cy) = (center.x.round() as i32, center.y.round() as i32);
        for y in (cy - reach).max(0)..=(cy + reach).min(self.height as i32 - 1) {
            for x in (cx - reach).max(0)..=(cx + reach).min(self.width as i32 - 1) {
                let (dx, dy) = (x as f64 - center.x, y as f64 - center.y);
                let dist = dx.hypot(dy);
                let edge = (dist - inner).min(outer - dist);
                let aa = (edge + 0.5).clamp(0.0, 1.0) as f32;
                if aa <= 0.0 {
                    continue;
                }
                if angle_within(dy.atan2(dx).to_degrees(), start_degrees, sweep_degrees) {
                    self.set_pixel(x, y, color, aa * alpha);
                }
            }
        }
    }

    /// Text with its baseline centered on `anchor`, rotated around it
    pub fn draw_text(
        &mut self,
        anchor: Point,
        text: &str,
        font: &Font,
        size: f32,
        rotation_degrees: f64,
        color: Color,
    ) {
        let scale = Scale::uniform(size);
        let glyphs: Vec<_> = font.layout(text, scale, point(0.0, 0.0)).collect();
        let Some(last) = glyphs.last() else {
            return;
        };
        let text_width =
            (last.position().x + last.unpositioned().h_metrics().advance_width) as f64;

        for glyph in &glyphs {
            let Some(bb) = glyph.pixel_bounding_box() else {
                continue;
            };
            glyph.draw(|gx, gy, v| {
                if v <= 0.001 {
                    return;
                }
                let local_x = anchor.x + (bb.min.x + gx as i32) as f64 - text_width / 2.0;
                let local_y = anchor.y + (bb.min.y + gy as i32) as f64;
                let (x, y) = rotate_point(local_x, local_y, rotation_degrees, anchor.x, anchor.y);
                self.set_subpixel(x, y, color, v);
            });
        }
    }
}

// ============================================================================
// FRAME RENDERING
// ============================================================================

/// Paints `frame` scaled to fit the canvas. Text is skipped without a font.
pub fn render_frame(canvas: &mut Canvas, frame: &GaugeFrame, style: &RasterStyle, font: Option<&Font>) {
    canvas.clear(style.background);
    if frame.width <= 0.0 || frame.height <= 0.0 {
        return;
    }
    let s = (canvas.width() as f64 / frame.width).min(canvas.height() as f64 / frame.height);
    let at = |p: Point| Point::new(p.x * s, p.y * s);

    if let Some((center, radius, span)) = frame.background {
        canvas.fill_band(
            at(center),
            0.0,
            radius * s,
            -90.0 - span / 2.0,
            span,
            style.face,
            1.0,
        );
    }

    for arc in &frame.arcs {
        let color = Color::parse(&arc.color).unwrap_or_else(|| {
            tracing::debug!(color = %arc.color, "unknown arc color");
            style.fallback_arc
        });
        let center = at(Point::new(arc.rotation_origin_x, arc.rotation_origin_y));
        let half = arc.stroke_width * s / 2.0;
        canvas.fill_band(
            center,
            arc.radius * s - half,
            arc.radius * s + half,
            arc.start_angle(),
            arc.sweep_degrees(),
            color,
            1.0,
        );
    }

    if let Some(font) = font {
        let size = style.font_size * s as f32;
        for text in &frame.marker_texts {
            let anchor = at(text.anchor);
            canvas.draw_text(
                Point::new(anchor.x + 1.0, anchor.y + 1.0),
                &text.text,
                font,
                size,
                text.rotation_degrees,
                style.text_shadow,
            );
            canvas.draw_text(anchor, &text.text, font, size, text.rotation_degrees, style.text);
        }
    }

    for marker in &frame.marker_lines {
        let line = marker.rotated_line();
        canvas.draw_line(
            at(Point::new(line.x1, line.y1)),
            at(Point::new(line.x2, line.y2)),
            s.max(1.0),
            0.0,
            style.marker,
            1.0,
        );
    }

    if let Some(needle) = &frame.needle {
        let [base_left, tip, base_right] = needle.polygon;
        let base = Point::new((base_left.x + base_right.x) / 2.0, base_left.y);
        let thickness = ((base_right.x - base_left.x) * s).max(1.5);
        let rotations = needle
            .pose
            .shadow_rotation_degrees
            .map(|angle| (angle, style.needle_shadow, 0.6))
            .into_iter()
            .chain([(needle.pose.rotation_degrees, style.needle, 1.0)]);
        for (angle, color, alpha) in rotations {
            let (tx, ty) = rotate_point(tip.x, tip.y, angle, needle.pose.origin_x, needle.pose.origin_y);
            canvas.draw_line(at(base), at(Point::new(tx, ty)), thickness, 0.9, color, alpha);
        }
    }

    if let Some(pin) = &frame.pin {
        canvas.fill_circle(at(pin.center), pin.radius * s, style.pin);
    }

    if let Some(font) = font {
        let size = style.font_size * s as f32;
        let texts: Vec<&PlacedText> = frame
            .range_labels
            .iter()
            .chain(&frame.needle_text)
            .chain(&frame.caption)
            .chain(&frame.footer)
            .collect();
        for placed in texts {
            canvas.draw_text(at(placed.anchor), &placed.text, font, size, 0.0, style.text);
        }
    }
}
