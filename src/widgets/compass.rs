//! Heading indicator: fixed rose, rotating two-tone needle.

use std::f64::consts::PI;

use crate::config::{palette, CompassConfig};
use crate::geometry::hand_point;
use crate::scene::{DrawCommand, Scene};
use crate::widgets::{paint_case, Tile};

const CARDINALS: [(&str, f64); 4] = [("N", 0.0), ("E", 90.0), ("S", 180.0), ("W", 270.0)];

#[derive(Debug, Clone)]
pub struct Compass {
    config: CompassConfig,
    heading: f64,
}

impl Compass {
    pub fn new(config: CompassConfig) -> Self {
        Self {
            config,
            heading: 0.0,
        }
    }

    /// Heading in degrees clockwise from north, wrapped into [0, 360).
    pub fn set_heading(&mut self, degrees: f64) {
        if degrees.is_finite() {
            self.heading = degrees.rem_euclid(360.0);
        }
    }

    pub fn heading(&self) -> f64 {
        self.heading
    }

    pub fn scene_into(&self, scene: &mut Scene, tile: Tile) {
        let style = self.config.style;
        let face_r = paint_case(scene, tile, style);
        let Tile { cx, cy, .. } = tile;
        let fg = style.foreground();

        // Rose ticks every 15 degrees, heavier every 45.
        for deg in (0..360).step_by(15) {
            let angle = deg as f64 * PI / 180.0;
            let (inset, width) = if deg % 45 == 0 {
                (0.12 * face_r, (0.02 * face_r).max(1.5))
            } else {
                (0.06 * face_r, (0.01 * face_r).max(0.8))
            };
            let outer = 0.95 * face_r;
            let (x0, y0) = hand_point(cx, cy, outer, angle);
            let (x1, y1) = hand_point(cx, cy, outer - inset, angle);
            scene.push(DrawCommand::Line {
                x0,
                y0,
                x1,
                y1,
                width,
                color: fg,
            });
        }

        for (letter, deg) in CARDINALS {
            let angle = deg * PI / 180.0;
            let (x, y) = hand_point(cx, cy, 0.68 * face_r, angle);
            scene.push(DrawCommand::Text {
                x,
                y,
                text: letter.to_string(),
                size: (0.18 * face_r) as f32,
                color: fg,
            });
        }

        scene.push(DrawCommand::Text {
            x: cx,
            y: cy + 0.4 * face_r,
            text: format!("{:03.0}", self.heading),
            size: (0.14 * face_r) as f32,
            color: style.trim(palette::GLYPH),
        });

        self.paint_needle(scene, cx, cy, face_r);
    }

    /// Two-tone needle: red north half, contrast south half, pivot cap.
    fn paint_needle(&self, scene: &mut Scene, cx: f64, cy: f64, face_r: f64) {
        let style = self.config.style;
        let angle = self.heading * PI / 180.0;
        let half_width = 0.06 * face_r;
        let perp = (angle.cos(), angle.sin());

        let (tip_x, tip_y) = hand_point(cx, cy, 0.78 * face_r, angle);
        let (tail_x, tail_y) = hand_point(cx, cy, -0.78 * face_r, angle);
        let left = (cx - half_width * perp.0, cy - half_width * perp.1);
        let right = (cx + half_width * perp.0, cy + half_width * perp.1);

        scene.push(DrawCommand::Polygon {
            points: vec![(tip_x, tip_y), right, left],
            color: style.trim(palette::RED),
        });
        scene.push(DrawCommand::Polygon {
            points: vec![(tail_x, tail_y), right, left],
            color: style.contrast(),
        });
        scene.push(DrawCommand::Disc {
            cx,
            cy,
            r: 0.05 * face_r,
            fill: style.foreground().into(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn heading_wraps_modulo_full_turns() {
        let mut compass = Compass::new(CompassConfig::default());
        compass.set_heading(450.0);
        assert_relative_eq!(compass.heading(), 90.0);
        compass.set_heading(-90.0);
        assert_relative_eq!(compass.heading(), 270.0);
    }

    #[test]
    fn non_finite_headings_are_ignored() {
        let mut compass = Compass::new(CompassConfig::default());
        compass.set_heading(123.0);
        compass.set_heading(f64::INFINITY);
        assert_relative_eq!(compass.heading(), 123.0);
    }

    #[test]
    fn rose_shows_all_cardinals() {
        let compass = Compass::new(CompassConfig::default());
        let mut scene = Scene::new();
        compass.scene_into(&mut scene, Tile::new(150.0, 150.0, 100.0));
        for letter in ["N", "E", "S", "W"] {
            assert!(
                scene
                    .commands()
                    .iter()
                    .any(|c| matches!(c, DrawCommand::Text { text, .. } if text == letter)),
                "missing {letter}"
            );
        }
    }

    #[test]
    fn heading_readout_is_three_digits() {
        let mut compass = Compass::new(CompassConfig::default());
        compass.set_heading(7.0);
        let mut scene = Scene::new();
        compass.scene_into(&mut scene, Tile::new(0.0, 0.0, 100.0));
        assert!(scene
            .commands()
            .iter()
            .any(|c| matches!(c, DrawCommand::Text { text, .. } if text == "007")));
    }
}
