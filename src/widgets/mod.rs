//! Instrument widgets. Each widget is a pure model: it owns its
//! configuration and current value and appends draw commands for one
//! frame. Widgets never touch pixels.

pub mod altimeter;
pub mod compass;
pub mod gauge;

pub use altimeter::Altimeter;
pub use compass::Compass;
pub use gauge::Gauge;

use crate::config::{palette, FaceStyle};
use crate::scene::{DrawCommand, Fill, RadialGradient, Scene};

/// Square screen region an instrument is drawn into. `radius` is half
/// the tile edge minus the outer margin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tile {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
}

impl Tile {
    pub fn new(cx: f64, cy: f64, radius: f64) -> Self {
        Self { cx, cy, radius }
    }
}

/// Fill for a shaded surface: radial gradient from a lifted center
/// toward `base`, or the flat palette color when shading is off or the
/// palette is inverted.
fn shaded_fill(style: FaceStyle, tile: Tile, base: crate::config::Color, r: f64) -> Fill {
    if style.uses_gradient() {
        Fill::Radial(RadialGradient {
            cx: tile.cx,
            cy: tile.cy,
            r0: 0.0,
            r1: r,
            start: base.lerp(palette::BEZEL_SHINE, 0.6),
            end: base,
        })
    } else {
        Fill::Solid(style.flat(base))
    }
}

/// Common instrument case: mounting plate, bezel, face disc, trim rings
/// and the four corner screws. Returns the working face radius all
/// face-relative geometry is measured against.
pub(crate) fn paint_case(scene: &mut Scene, tile: Tile, style: FaceStyle) -> f64 {
    let Tile { cx, cy, radius } = tile;

    // Mounting plate behind the round case.
    scene.push(DrawCommand::RoundedRect {
        cx,
        cy,
        half: radius,
        corner: 0.2 * radius,
        fill: style.trim(palette::WINDOW_BACKGROUND).into(),
    });

    // Bezel and face.
    scene.push(DrawCommand::Disc {
        cx,
        cy,
        r: radius,
        fill: shaded_fill(style, tile, palette::BEZEL, radius),
    });
    let face_r = 0.9 * radius;
    scene.push(DrawCommand::Disc {
        cx,
        cy,
        r: face_r,
        fill: shaded_fill(style, tile, palette::FACE, face_r),
    });

    // Trim rings on the bezel step.
    scene.push(DrawCommand::Ring {
        cx,
        cy,
        r: radius,
        width: 0.015 * radius,
        color: style.trim(palette::OUTER_TRIM),
    });
    scene.push(DrawCommand::Ring {
        cx,
        cy,
        r: face_r,
        width: 0.01 * radius,
        color: style.trim(palette::RING_TRIM),
    });

    paint_screws(scene, tile, style);

    face_r
}

/// Four slotted mounting screws in the plate corners.
fn paint_screws(scene: &mut Scene, tile: Tile, style: FaceStyle) {
    let Tile { cx, cy, radius } = tile;
    let offset = 0.82 * radius;
    let screw_r = 0.07 * radius;
    for (sx, sy) in [
        (cx - offset, cy - offset),
        (cx + offset, cy - offset),
        (cx - offset, cy + offset),
        (cx + offset, cy + offset),
    ] {
        let fill = if style.uses_gradient() {
            Fill::Radial(RadialGradient {
                cx: sx,
                cy: sy,
                r0: 0.0,
                r1: screw_r,
                start: palette::BEZEL_SHINE,
                end: palette::SCREW_SHINE_END,
            })
        } else {
            Fill::Solid(style.flat(palette::BEZEL_SHINE))
        };
        scene.push(DrawCommand::Disc {
            cx: sx,
            cy: sy,
            r: screw_r,
            fill,
        });
        // Cross slot.
        let slot = screw_r * 0.8;
        let slot_color = style.trim(palette::BLACK);
        scene.push(DrawCommand::Line {
            x0: sx - slot,
            y0: sy,
            x1: sx + slot,
            y1: sy,
            width: screw_r * 0.25,
            color: slot_color,
        });
        scene.push(DrawCommand::Line {
            x0: sx,
            y0: sy - slot,
            x1: sx,
            y1: sy + slot,
            width: screw_r * 0.25,
            color: slot_color,
        });
    }
}

/// Needle body as a closed polygon: a slender kite from a short tail
/// through the hub to the tip.
pub(crate) fn hand_polygon(
    cx: f64,
    cy: f64,
    angle: f64,
    length: f64,
    tail: f64,
    half_width: f64,
) -> Vec<(f64, f64)> {
    let dir = (angle.sin(), -angle.cos());
    let perp = (angle.cos(), angle.sin());
    let tip = (cx + length * dir.0, cy + length * dir.1);
    let back = (cx - tail * dir.0, cy - tail * dir.1);
    vec![
        tip,
        (
            cx + half_width * perp.0 + 0.1 * length * dir.0,
            cy + half_width * perp.1 + 0.1 * length * dir.1,
        ),
        (
            back.0 + half_width * perp.0,
            back.1 + half_width * perp.1,
        ),
        (
            back.0 - half_width * perp.0,
            back.1 - half_width * perp.1,
        ),
        (
            cx - half_width * perp.0 + 0.1 * length * dir.0,
            cy - half_width * perp.1 + 0.1 * length * dir.1,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_starts_with_the_mounting_plate() {
        let mut scene = Scene::new();
        let face_r = paint_case(&mut scene, Tile::new(150.0, 150.0, 100.0), FaceStyle::default());
        assert!((face_r - 90.0).abs() < 1e-9);
        assert!(matches!(
            scene.commands()[0],
            DrawCommand::RoundedRect { .. }
        ));
    }

    #[test]
    fn inverted_case_uses_flat_fills() {
        let style = FaceStyle {
            color_inverted: true,
            radial_shading: true,
        };
        let mut scene = Scene::new();
        paint_case(&mut scene, Tile::new(0.0, 0.0, 100.0), style);
        let has_gradient = scene.commands().iter().any(|c| {
            matches!(
                c,
                DrawCommand::Disc {
                    fill: Fill::Radial(_),
                    ..
                }
            )
        });
        assert!(!has_gradient);
    }

    #[test]
    fn hand_polygon_tip_lies_on_the_hand_axis() {
        let poly = hand_polygon(100.0, 100.0, 0.0, 50.0, 10.0, 2.0);
        // Angle 0 points straight up on screen.
        assert!((poly[0].0 - 100.0).abs() < 1e-9);
        assert!((poly[0].1 - 50.0).abs() < 1e-9);
        assert_eq!(poly.len(), 5);
    }
}
