//! Software rasterizer: replays a `Scene` onto an RGBA framebuffer.
//!
//! Everything is painted per pixel with 1px distance-based antialiasing.
//! The rasterizer never mutates anything but the framebuffer it is
//! handed, so replaying the same scene on a cleared buffer is
//! pixel-identical.

use std::f64::consts::TAU;

use rusttype::{point, Font, PositionedGlyph, Scale};

use crate::config::Color;
use crate::scene::{DrawCommand, Fill, Scene};

/// Borrowed view of an RGBA8 framebuffer.
pub struct Canvas<'a> {
    pub frame: &'a mut [u8],
    pub width: usize,
    pub height: usize,
}

impl<'a> Canvas<'a> {
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        Self {
            frame,
            width,
            height,
        }
    }

    pub fn clear(&mut self, color: Color) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.r, color.g, color.b, 0xff]);
        }
    }
}

fn set_pixel(canvas: &mut Canvas, x: i32, y: i32, color: Color, alpha: f64) {
    if x < 0 || y < 0 || x as usize >= canvas.width || y as usize >= canvas.height {
        return;
    }
    let idx = (y as usize * canvas.width + x as usize) * 4;
    if idx + 4 > canvas.frame.len() {
        return;
    }
    let a = alpha.clamp(0.0, 1.0);
    let blend = |src: u8, dst: u8| (src as f64 * a + dst as f64 * (1.0 - a)).round() as u8;
    canvas.frame[idx] = blend(color.r, canvas.frame[idx]);
    canvas.frame[idx + 1] = blend(color.g, canvas.frame[idx + 1]);
    canvas.frame[idx + 2] = blend(color.b, canvas.frame[idx + 2]);
    canvas.frame[idx + 3] = 0xff;
}

fn fill_color_at(fill: &Fill, px: f64, py: f64) -> Color {
    match fill {
        Fill::Solid(color) => *color,
        Fill::Radial(g) => {
            let dist = ((px - g.cx).powi(2) + (py - g.cy).powi(2)).sqrt();
            let span = g.r1 - g.r0;
            let t = if span <= 0.0 {
                1.0
            } else {
                (dist - g.r0) / span
            };
            g.start.lerp(g.end, t)
        }
    }
}

/// Normalize to [0, 2π).
fn wrap_angle(angle: f64) -> f64 {
    angle.rem_euclid(TAU)
}

/// Whether `angle` lies on the arc from `start` to `end` (both wrapped,
/// arc may cross the 0 axis).
fn angle_in_arc(angle: f64, start: f64, end: f64) -> bool {
    let (a, s, e) = (wrap_angle(angle), wrap_angle(start), wrap_angle(end));
    if s <= e {
        a >= s && a <= e
    } else {
        a >= s || a <= e
    }
}

fn paint_disc(canvas: &mut Canvas, cx: f64, cy: f64, r: f64, fill: &Fill) {
    let (min_x, max_x) = ((cx - r - 1.0) as i32, (cx + r + 1.0) as i32);
    let (min_y, max_y) = ((cy - r - 1.0) as i32, (cy + r + 1.0) as i32);
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let dist = ((x as f64 - cx).powi(2) + (y as f64 - cy).powi(2)).sqrt();
            let aa = (1.0 - (dist - r)).clamp(0.0, 1.0);
            if aa > 0.0 {
                let color = fill_color_at(fill, x as f64, y as f64);
                set_pixel(canvas, x, y, color, aa);
            }
        }
    }
}

fn paint_rounded_rect(canvas: &mut Canvas, cx: f64, cy: f64, half: f64, corner: f64, fill: &Fill) {
    let (min_x, max_x) = ((cx - half - 1.0) as i32, (cx + half + 1.0) as i32);
    let (min_y, max_y) = ((cy - half - 1.0) as i32, (cy + half + 1.0) as i32);
    let inner = half - corner;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            // Signed distance to the rounded square boundary.
            let dx = ((x as f64 - cx).abs() - inner).max(0.0);
            let dy = ((y as f64 - cy).abs() - inner).max(0.0);
            let dist = (dx * dx + dy * dy).sqrt() - corner;
            let aa = (0.5 - dist).clamp(0.0, 1.0);
            if aa > 0.0 {
                let color = fill_color_at(fill, x as f64, y as f64);
                set_pixel(canvas, x, y, color, aa);
            }
        }
    }
}

fn paint_ring(canvas: &mut Canvas, cx: f64, cy: f64, r: f64, width: f64, color: Color) {
    paint_arc_stroke(canvas, cx, cy, r, 0.0, TAU, width, color);
}

fn paint_arc_stroke(
    canvas: &mut Canvas,
    cx: f64,
    cy: f64,
    r: f64,
    start_angle: f64,
    end_angle: f64,
    width: f64,
    color: Color,
) {
    let full_circle = (end_angle - start_angle).abs() >= TAU - 1e-9;
    let reach = r + width / 2.0 + 1.0;
    let (min_x, max_x) = ((cx - reach) as i32, (cx + reach) as i32);
    let (min_y, max_y) = ((cy - reach) as i32, (cy + reach) as i32);
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let dx = x as f64 - cx;
            let dy = y as f64 - cy;
            let dist = (dx * dx + dy * dy).sqrt();
            if !full_circle && !angle_in_arc(dy.atan2(dx), start_angle, end_angle) {
                continue;
            }
            let aa = (1.0 - ((dist - r).abs() - width / 2.0)).clamp(0.0, 1.0);
            if aa > 0.0 {
                set_pixel(canvas, x, y, color, aa);
            }
        }
    }
}

fn paint_sector(
    canvas: &mut Canvas,
    cx: f64,
    cy: f64,
    r: f64,
    start_angle: f64,
    end_angle: f64,
    color: Color,
) {
    let (min_x, max_x) = ((cx - r - 1.0) as i32, (cx + r + 1.0) as i32);
    let (min_y, max_y) = ((cy - r - 1.0) as i32, (cy + r + 1.0) as i32);
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let dx = x as f64 - cx;
            let dy = y as f64 - cy;
            let dist = (dx * dx + dy * dy).sqrt();
            if dist > r + 1.0 || !angle_in_arc(dy.atan2(dx), start_angle, end_angle) {
                continue;
            }
            let aa = (1.0 - (dist - r)).clamp(0.0, 1.0);
            set_pixel(canvas, x, y, color, aa);
        }
    }
}

fn paint_band(
    canvas: &mut Canvas,
    cx: f64,
    cy: f64,
    r_inner: f64,
    r_outer: f64,
    start_angle: f64,
    end_angle: f64,
    color: Color,
) {
    let reach = r_outer + 1.0;
    let (min_x, max_x) = ((cx - reach) as i32, (cx + reach) as i32);
    let (min_y, max_y) = ((cy - reach) as i32, (cy + reach) as i32);
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let dx = x as f64 - cx;
            let dy = y as f64 - cy;
            let dist = (dx * dx + dy * dy).sqrt();
            if !angle_in_arc(dy.atan2(dx), start_angle, end_angle) {
                continue;
            }
            let outer_aa = (1.0 - (dist - r_outer)).clamp(0.0, 1.0);
            let inner_aa = (1.0 - (r_inner - dist)).clamp(0.0, 1.0);
            let aa = outer_aa.min(inner_aa);
            if aa > 0.0 {
                set_pixel(canvas, x, y, color, aa);
            }
        }
    }
}

fn paint_line(
    canvas: &mut Canvas,
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
    width: f64,
    color: Color,
    tapered: bool,
) {
    let pad = width.ceil() + 1.0;
    let (min_x, max_x) = ((x0.min(x1) - pad) as i32, (x0.max(x1) + pad) as i32);
    let (min_y, max_y) = ((y0.min(y1) - pad) as i32, (y0.max(y1) + pad) as i32);
    let dx = x1 - x0;
    let dy = y1 - y0;
    let len_sq = (dx * dx + dy * dy).max(f64::EPSILON);
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let px = x as f64 - x0;
            let py = y as f64 - y0;
            let t = ((px * dx + py * dy) / len_sq).clamp(0.0, 1.0);
            let lx = x0 + t * dx;
            let ly = y0 + t * dy;
            let dist = ((lx - x as f64).powi(2) + (ly - y as f64).powi(2)).sqrt();
            let local_width = if tapered {
                // Keep 5% at the tip so the point never vanishes.
                width * (1.0 - t * 0.95)
            } else {
                width
            };
            let aa = (1.0 - (dist - local_width / 2.0)).clamp(0.0, 1.0);
            if aa > 0.01 {
                set_pixel(canvas, x, y, color, aa);
            }
        }
    }
}

/// Even-odd point-in-polygon test.
fn point_in_polygon(px: f64, py: f64, points: &[(f64, f64)]) -> bool {
    let mut inside = false;
    let n = points.len();
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = points[i];
        let (xj, yj) = points[j];
        if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Distance from a point to the closest polygon edge.
fn polygon_edge_distance(px: f64, py: f64, points: &[(f64, f64)]) -> f64 {
    let mut best = f64::MAX;
    let n = points.len();
    for i in 0..n {
        let (x0, y0) = points[i];
        let (x1, y1) = points[(i + 1) % n];
        let dx = x1 - x0;
        let dy = y1 - y0;
        let len_sq = (dx * dx + dy * dy).max(f64::EPSILON);
        let t = (((px - x0) * dx + (py - y0) * dy) / len_sq).clamp(0.0, 1.0);
        let lx = x0 + t * dx;
        let ly = y0 + t * dy;
        best = best.min(((lx - px).powi(2) + (ly - py).powi(2)).sqrt());
    }
    best
}

fn paint_polygon(canvas: &mut Canvas, points: &[(f64, f64)], color: Color) {
    if points.len() < 3 {
        return;
    }
    let min_x = points.iter().map(|p| p.0).fold(f64::MAX, f64::min) - 1.0;
    let max_x = points.iter().map(|p| p.0).fold(f64::MIN, f64::max) + 1.0;
    let min_y = points.iter().map(|p| p.1).fold(f64::MAX, f64::min) - 1.0;
    let max_y = points.iter().map(|p| p.1).fold(f64::MIN, f64::max) + 1.0;
    for y in min_y as i32..=max_y as i32 {
        for x in min_x as i32..=max_x as i32 {
            let (px, py) = (x as f64, y as f64);
            let edge = polygon_edge_distance(px, py, points);
            let aa = if point_in_polygon(px, py, points) {
                (0.5 + edge).clamp(0.0, 1.0)
            } else {
                (0.5 - edge).clamp(0.0, 1.0)
            };
            if aa > 0.01 {
                set_pixel(canvas, x, y, color, aa);
            }
        }
    }
}

fn layout_glyphs<'a>(font: &'a Font<'a>, text: &str, size: f32) -> Vec<PositionedGlyph<'a>> {
    let scale = Scale::uniform(size);
    let v_metrics = font.v_metrics(scale);
    font.layout(text, scale, point(0.0, v_metrics.ascent)).collect()
}

fn glyphs_bounds(glyphs: &[PositionedGlyph]) -> (i32, i32, i32, i32) {
    glyphs.iter().filter_map(|g| g.pixel_bounding_box()).fold(
        (i32::MAX, i32::MIN, i32::MAX, i32::MIN),
        |(min_x, max_x, min_y, max_y), bb| {
            (
                min_x.min(bb.min.x),
                max_x.max(bb.max.x),
                min_y.min(bb.min.y),
                max_y.max(bb.max.y),
            )
        },
    )
}

fn paint_text(canvas: &mut Canvas, font: &Font, x: f64, y: f64, text: &str, size: f32, color: Color) {
    let glyphs = layout_glyphs(font, text, size);
    let (min_x, max_x, min_y, max_y) = glyphs_bounds(&glyphs);
    if min_x > max_x {
        return;
    }
    let offset_x = x as i32 - (max_x - min_x) / 2;
    let offset_y = y as i32 - (max_y - min_y) / 2;
    for glyph in &glyphs {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, v| {
                let px = offset_x + gx as i32 + bb.min.x - min_x;
                let py = offset_y + gy as i32 + bb.min.y - min_y;
                set_pixel(canvas, px, py, color, v as f64);
            });
        }
    }
}

/// Bilinear splat for sub-pixel glyph placement.
fn paint_soft_pixel(canvas: &mut Canvas, x: f64, y: f64, color: Color, alpha: f64) {
    let x0 = x.floor() as i32;
    let y0 = y.floor() as i32;
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;
    let samples = [
        (x0, y0, (1.0 - fx) * (1.0 - fy)),
        (x0 + 1, y0, fx * (1.0 - fy)),
        (x0, y0 + 1, (1.0 - fx) * fy),
        (x0 + 1, y0 + 1, fx * fy),
    ];
    for (px, py, weight) in samples {
        let a = alpha * weight;
        if a > 0.001 {
            set_pixel(canvas, px, py, color, a);
        }
    }
}

fn paint_rotated_text(
    canvas: &mut Canvas,
    font: &Font,
    x: f64,
    y: f64,
    text: &str,
    size: f32,
    angle: f64,
    color: Color,
) {
    let glyphs = layout_glyphs(font, text, size);
    let (min_x, max_x, min_y, max_y) = glyphs_bounds(&glyphs);
    if min_x > max_x {
        return;
    }
    let center_x = (min_x + max_x) as f64 / 2.0;
    let center_y = (min_y + max_y) as f64 / 2.0;
    let (sin_a, cos_a) = angle.sin_cos();
    for glyph in &glyphs {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, v| {
                if v < 0.001 {
                    return;
                }
                let local_x = gx as f64 + bb.min.x as f64 - center_x;
                let local_y = gy as f64 + bb.min.y as f64 - center_y;
                let fx = x + local_x * cos_a - local_y * sin_a;
                let fy = y + local_x * sin_a + local_y * cos_a;
                paint_soft_pixel(canvas, fx, fy, color, v as f64);
            });
        }
    }
}

/// Replay a scene, in order, onto the canvas. Text commands are skipped
/// when no font is available.
pub fn render_scene(canvas: &mut Canvas, scene: &Scene, font: Option<&Font>) {
    for command in scene.commands() {
        match command {
            DrawCommand::Clear(color) => canvas.clear(*color),
            DrawCommand::RoundedRect {
                cx,
                cy,
                half,
                corner,
                fill,
            } => paint_rounded_rect(canvas, *cx, *cy, *half, *corner, fill),
            DrawCommand::Disc { cx, cy, r, fill } => paint_disc(canvas, *cx, *cy, *r, fill),
            DrawCommand::Ring {
                cx,
                cy,
                r,
                width,
                color,
            } => paint_ring(canvas, *cx, *cy, *r, *width, *color),
            DrawCommand::ArcStroke {
                cx,
                cy,
                r,
                start_angle,
                end_angle,
                width,
                color,
            } => paint_arc_stroke(canvas, *cx, *cy, *r, *start_angle, *end_angle, *width, *color),
            DrawCommand::Sector {
                cx,
                cy,
                r,
                start_angle,
                end_angle,
                color,
            } => paint_sector(canvas, *cx, *cy, *r, *start_angle, *end_angle, *color),
            DrawCommand::Band {
                cx,
                cy,
                r_inner,
                r_outer,
                start_angle,
                end_angle,
                color,
            } => paint_band(
                canvas,
                *cx,
                *cy,
                *r_inner,
                *r_outer,
                *start_angle,
                *end_angle,
                *color,
            ),
            DrawCommand::Line {
                x0,
                y0,
                x1,
                y1,
                width,
                color,
            } => paint_line(canvas, *x0, *y0, *x1, *y1, *width, *color, false),
            DrawCommand::TaperedLine {
                x0,
                y0,
                x1,
                y1,
                width,
                color,
            } => paint_line(canvas, *x0, *y0, *x1, *y1, *width, *color, true),
            DrawCommand::Polygon { points, color } => paint_polygon(canvas, points, *color),
            DrawCommand::Text {
                x,
                y,
                text,
                size,
                color,
            } => {
                if let Some(font) = font {
                    paint_text(canvas, font, *x, *y, text, *size, *color);
                }
            }
            DrawCommand::RotatedText {
                x,
                y,
                text,
                size,
                angle,
                color,
            } => {
                if let Some(font) = font {
                    paint_rotated_text(canvas, font, *x, *y, text, *size, *angle, *color);
                }
            }
        }
    }
}
