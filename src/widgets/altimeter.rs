//! Three-hand altimeter with a six-digit drum readout.
//!
//! Face layout follows the classic sensitive altimeter: 50 ticks, scale
//! numbers 0..9, a striped low-altitude flag, and three concentric
//! hands reading hundreds, thousands and ten-thousands of the selected
//! unit step. Out-of-scale values wrap around the dial like the
//! mechanical original; the readout keeps counting.

use std::f64::consts::{FRAC_PI_2, PI};

use crate::config::{palette, AltimeterConfig, UnitStep};
use crate::geometry::{
    hand_point, polar_point, readout_digits, scale_label_pos, tick_angle, tick_is_major,
    value_hand_angle, DecadeHand, TICK_COUNT,
};
use crate::scene::{DrawCommand, Scene};
use crate::widgets::{hand_polygon, paint_case, Tile};

#[derive(Debug, Clone)]
pub struct Altimeter {
    config: AltimeterConfig,
    value: f64,
}

impl Altimeter {
    pub fn new(config: AltimeterConfig) -> Self {
        Self { config, value: 0.0 }
    }

    /// Current altitude in display units. Any finite value is accepted;
    /// the hands wrap per decade.
    pub fn set_value(&mut self, value: f64) {
        if value.is_finite() {
            self.value = value;
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Append this frame's draw commands. The layer order is fixed:
    /// case, flag, emblem, ticks, scale numbers, labels, readout,
    /// hands, hub.
    pub fn scene_into(&self, scene: &mut Scene, tile: Tile) {
        let style = self.config.style;
        let face_r = paint_case(scene, tile, style);
        let Tile { cx, cy, .. } = tile;

        self.paint_flag(scene, cx, cy, face_r);
        self.paint_emblem(scene, cx, cy, face_r);
        self.paint_ticks(scene, cx, cy, face_r);
        self.paint_scale_numbers(scene, cx, cy, face_r);
        self.paint_labels(scene, cx, cy, face_r);
        self.paint_readout(scene, cx, cy, face_r);
        self.paint_hands(scene, cx, cy, face_r);
    }

    /// Striped sector between scale numbers 9 and 0, the low-altitude
    /// warning flag of a sensitive altimeter.
    fn paint_flag(&self, scene: &mut Scene, cx: f64, cy: f64, face_r: f64) {
        let style = self.config.style;
        let stripes = 6;
        // Scale number 9 sits at pi/2 + 9*pi/5 + pi, number 0 one fifth
        // of a turn later.
        let start = FRAC_PI_2 + 9.0 * PI / 5.0 + PI;
        let end = start + PI / 5.0;
        let span = (end - start) / stripes as f64;
        for i in 0..stripes {
            let color = if i % 2 == 0 {
                style.foreground()
            } else {
                style.contrast()
            };
            scene.push(DrawCommand::Band {
                cx,
                cy,
                r_inner: 0.52 * face_r,
                r_outer: 0.65 * face_r,
                start_angle: start + i as f64 * span,
                end_angle: start + (i + 1) as f64 * span,
                color,
            });
        }
    }

    /// Wing emblem on the lower face: two arcs joined at the ends, with
    /// hatch strokes between them.
    fn paint_emblem(&self, scene: &mut Scene, cx: f64, cy: f64, face_r: f64) {
        let color = self.config.style.trim(palette::GLYPH);
        let (start, end) = (PI / 3.0, 2.0 * PI / 3.0);
        let (r_outer, r_inner) = (0.55 * face_r, 0.2 * face_r);
        let width = (0.012 * face_r).max(1.0);
        for r in [r_outer, r_inner] {
            scene.push(DrawCommand::ArcStroke {
                cx,
                cy,
                r,
                start_angle: start,
                end_angle: end,
                width,
                color,
            });
        }
        for angle in [start, end] {
            let (x0, y0) = polar_point(cx, cy, r_inner, angle);
            let (x1, y1) = polar_point(cx, cy, r_outer, angle);
            scene.push(DrawCommand::Line {
                x0,
                y0,
                x1,
                y1,
                width,
                color,
            });
        }
        let hatches = 7;
        for i in 0..hatches {
            let angle = start + (i as f64 + 0.5) * (end - start) / hatches as f64;
            let (x0, y0) = polar_point(cx, cy, r_inner, angle);
            let (x1, y1) = polar_point(cx, cy, r_outer, angle);
            scene.push(DrawCommand::Line {
                x0,
                y0,
                x1,
                y1,
                width: width / 2.0,
                color,
            });
        }
    }

    fn paint_ticks(&self, scene: &mut Scene, cx: f64, cy: f64, face_r: f64) {
        let color = self.config.style.foreground();
        let outer = face_r - 0.03 * face_r;
        let major_width = (0.02 * face_r).max(1.5);
        for i in 0..TICK_COUNT {
            let angle = tick_angle(i);
            let (inset, width) = if tick_is_major(i) {
                (0.12 * face_r, major_width)
            } else {
                (0.06 * face_r, major_width / 2.0)
            };
            let (x0, y0) = polar_point(cx, cy, outer, angle);
            let (x1, y1) = polar_point(cx, cy, outer - inset, angle);
            scene.push(DrawCommand::Line {
                x0,
                y0,
                x1,
                y1,
                width,
                color,
            });
        }
    }

    fn paint_scale_numbers(&self, scene: &mut Scene, cx: f64, cy: f64, face_r: f64) {
        let color = self.config.style.foreground();
        for i in 0..10 {
            let (x, y) = scale_label_pos(cx, cy, face_r, i);
            scene.push(DrawCommand::Text {
                x,
                y,
                text: i.to_string(),
                size: (0.18 * face_r) as f32,
                color,
            });
        }
    }

    /// Face title plus the two tilted labels flanking it: the decade
    /// selector digits on the left, the unit word on the right. Wider
    /// selector digits slide further out so the baseline stays clear of
    /// the title.
    fn paint_labels(&self, scene: &mut Scene, cx: f64, cy: f64, face_r: f64) {
        let color = self.config.style.trim(palette::GLYPH);
        let unit = if self.config.unit_is_feet {
            "FEET"
        } else {
            "METERS"
        };
        scene.push(DrawCommand::Text {
            x: cx,
            y: cy - 0.28 * face_r,
            text: "ALTITUDE".to_string(),
            size: (0.1 * face_r) as f32,
            color,
        });
        let step_offset = match self.config.unit_step {
            UnitStep::One => 0.29,
            UnitStep::Ten => 0.31,
            UnitStep::Hundred => 0.33,
        };
        scene.push(DrawCommand::RotatedText {
            x: cx - step_offset * face_r,
            y: cy - 0.12 * face_r,
            text: self.config.unit_step.label().to_string(),
            size: (0.08 * face_r) as f32,
            angle: -PI / 10.0,
            color,
        });
        scene.push(DrawCommand::RotatedText {
            x: cx + 0.29 * face_r,
            y: cy - 0.12 * face_r,
            text: unit.to_string(),
            size: (0.08 * face_r) as f32,
            angle: PI / 10.0,
            color,
        });
    }

    /// Six digit boxes above the hub, most significant digit first.
    fn paint_readout(&self, scene: &mut Scene, cx: f64, cy: f64, face_r: f64) {
        let style = self.config.style;
        let digits = readout_digits(self.value);
        let box_w = 0.145 * face_r;
        let box_h = 0.18 * face_r;
        let row_y = cy - 0.455 * face_r;
        for (i, digit) in digits.iter().enumerate() {
            let box_x = cx + (i as f64 - 2.5) * box_w;
            scene.push(DrawCommand::RoundedRect {
                cx: box_x,
                cy: row_y,
                half: box_w / 2.0,
                corner: 0.01 * face_r,
                fill: style.trim(palette::READOUT_TRIM).into(),
            });
            scene.push(DrawCommand::RoundedRect {
                cx: box_x,
                cy: row_y,
                half: box_w / 2.0 - 1.0,
                corner: 0.01 * face_r,
                fill: style.trim(palette::BLACK).into(),
            });
            scene.push(DrawCommand::Text {
                x: box_x,
                y: row_y,
                text: digit.to_string(),
                size: (box_h * 0.8) as f32,
                color: style.trim(palette::GLYPH),
            });
        }
    }

    /// Hands painted coarse to fine so the fast hundreds hand stays on
    /// top, then the hub.
    fn paint_hands(&self, scene: &mut Scene, cx: f64, cy: f64, face_r: f64) {
        let style = self.config.style;
        let step = self.config.unit_step;
        let fg = style.foreground();

        // Ten-thousands: thin full-length pointer with a hollow tip
        // marker. On the coarser steps it carries a counterweight disc
        // behind the hub.
        let angle = value_hand_angle(self.value, step, DecadeHand::TenThousands);
        let (tip_x, tip_y) = hand_point(cx, cy, 0.93 * face_r, angle);
        scene.push(DrawCommand::Line {
            x0: cx,
            y0: cy,
            x1: tip_x,
            y1: tip_y,
            width: (0.015 * face_r).max(1.0),
            color: fg,
        });
        scene.push(DrawCommand::Polygon {
            points: tip_marker(cx, cy, angle, face_r),
            color: fg,
        });
        if step != UnitStep::One {
            let (weight_x, weight_y) = hand_point(cx, cy, -0.2 * face_r, angle);
            scene.push(DrawCommand::Disc {
                cx: weight_x,
                cy: weight_y,
                r: 0.045 * face_r,
                fill: fg.into(),
            });
        }

        // Thousands: short wide hand.
        let angle = value_hand_angle(self.value, step, DecadeHand::Thousands);
        scene.push(DrawCommand::Polygon {
            points: hand_polygon(cx, cy, angle, 0.6 * face_r, 0.12 * face_r, 0.045 * face_r),
            color: fg,
        });

        // Hundreds: long slender hand on top.
        let angle = value_hand_angle(self.value, step, DecadeHand::Hundreds);
        scene.push(DrawCommand::Polygon {
            points: hand_polygon(cx, cy, angle, 0.85 * face_r, 0.15 * face_r, 0.025 * face_r),
            color: fg,
        });

        scene.push(DrawCommand::Disc {
            cx,
            cy,
            r: 0.06 * face_r,
            fill: fg.into(),
        });
        scene.push(DrawCommand::Disc {
            cx,
            cy,
            r: 0.025 * face_r,
            fill: style.contrast().into(),
        });
    }
}

/// Inverted-V marker at the outer end of the ten-thousands hand.
fn tip_marker(cx: f64, cy: f64, angle: f64, face_r: f64) -> Vec<(f64, f64)> {
    let (bx, by) = hand_point(cx, cy, 0.86 * face_r, angle);
    let (tx, ty) = hand_point(cx, cy, 0.93 * face_r, angle);
    let perp = (angle.cos(), angle.sin());
    let half = 0.04 * face_r;
    vec![
        (tx + half * perp.0, ty + half * perp.1),
        (tx - half * perp.0, ty - half * perp.1),
        (bx, by),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FaceStyle, UnitStep};

    fn tile() -> Tile {
        Tile::new(150.0, 150.0, 100.0)
    }

    fn scene_for(value: f64) -> Scene {
        let mut altimeter = Altimeter::new(AltimeterConfig::default());
        altimeter.set_value(value);
        let mut scene = Scene::new();
        altimeter.scene_into(&mut scene, tile());
        scene
    }

    #[test]
    fn scene_is_deterministic() {
        assert_eq!(scene_for(1234.5), scene_for(1234.5));
    }

    #[test]
    fn scene_layers_in_fixed_order() {
        let scene = scene_for(0.0);
        // Plate first, hub dot last.
        assert!(matches!(
            scene.commands()[0],
            DrawCommand::RoundedRect { .. }
        ));
        assert!(matches!(
            scene.commands().last(),
            Some(DrawCommand::Disc { .. })
        ));
    }

    #[test]
    fn readout_shows_six_digit_boxes() {
        let scene = scene_for(1234.5);
        let digit_texts: Vec<&str> = scene
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } if text.len() == 1 && text.chars().all(|ch| ch.is_ascii_digit()) => {
                    Some(text.as_str())
                }
                _ => None,
            })
            .collect();
        // 10 scale numbers plus 6 readout digits.
        assert_eq!(digit_texts.len(), 16);
        assert_eq!(&digit_texts[10..], ["0", "0", "1", "2", "3", "4"]);
    }

    #[test]
    fn non_finite_values_are_ignored() {
        let mut altimeter = Altimeter::new(AltimeterConfig::default());
        altimeter.set_value(500.0);
        altimeter.set_value(f64::NAN);
        assert_eq!(altimeter.value(), 500.0);
    }

    #[test]
    fn meters_config_changes_the_unit_label() {
        let config = AltimeterConfig::builder()
            .unit_is_feet(false)
            .unit_step(UnitStep::Ten)
            .style(FaceStyle::default())
            .build();
        let altimeter = Altimeter::new(config);
        let mut scene = Scene::new();
        altimeter.scene_into(&mut scene, tile());
        for label in ["METERS", "10"] {
            assert!(
                scene.commands().iter().any(|c| {
                    matches!(c, DrawCommand::RotatedText { text, .. } if text == label)
                }),
                "missing {label}"
            );
        }
    }

    fn rotated_label(scene: &Scene, label: &str) -> (f64, f64) {
        scene
            .commands()
            .iter()
            .find_map(|c| match c {
                DrawCommand::RotatedText { x, angle, text, .. } if text == label => {
                    Some((*x, *angle))
                }
                _ => None,
            })
            .unwrap_or_else(|| panic!("missing rotated label {label}"))
    }

    #[test]
    fn flanking_labels_tilt_toward_the_title() {
        let scene = scene_for(0.0);
        let (step_x, step_angle) = rotated_label(&scene, "100");
        let (unit_x, unit_angle) = rotated_label(&scene, "FEET");
        assert!(step_angle < 0.0 && unit_angle > 0.0);
        assert!((step_angle + unit_angle).abs() < 1e-12);
        assert!(step_x < 150.0 && unit_x > 150.0);
    }

    #[test]
    fn wider_selector_digits_sit_further_out() {
        // face_r is 90 for the test tile: step 100 at -0.33r, step 1 at
        // -0.29r.
        let (hundred_x, _) = rotated_label(&scene_for(0.0), "100");
        assert!((hundred_x - (150.0 - 0.33 * 90.0)).abs() < 1e-9);
        let config = AltimeterConfig::builder().unit_step(UnitStep::One).build();
        let altimeter = Altimeter::new(config);
        let mut scene = Scene::new();
        altimeter.scene_into(&mut scene, tile());
        let (one_x, _) = rotated_label(&scene, "1");
        assert!((one_x - (150.0 - 0.29 * 90.0)).abs() < 1e-9);
    }

    fn has_disc_at(scene: &Scene, x: f64, y: f64) -> bool {
        scene.commands().iter().any(|c| {
            matches!(c, DrawCommand::Disc { cx, cy, .. }
                if (cx - x).abs() < 1e-9 && (cy - y).abs() < 1e-9)
        })
    }

    #[test]
    fn coarse_steps_add_a_counterweight_to_the_outer_hand() {
        // At value 0 the hand points straight up, so the counterweight
        // hangs straight down at 0.2 of the face radius.
        let scene = scene_for(0.0);
        assert!(has_disc_at(&scene, 150.0, 150.0 + 0.2 * 90.0));

        let config = AltimeterConfig::builder().unit_step(UnitStep::One).build();
        let altimeter = Altimeter::new(config);
        let mut scene = Scene::new();
        altimeter.scene_into(&mut scene, tile());
        assert!(!has_disc_at(&scene, 150.0, 150.0 + 0.2 * 90.0));
    }
}
