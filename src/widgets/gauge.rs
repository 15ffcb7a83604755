//! Round single-needle gauge with optional colored strips.

use crate::config::{palette, GaugeConfig};
use crate::geometry::{
    gauge_angle, polar_point, zone_arcs, zone_for, Zone, GAUGE_ARC_SPAN, GAUGE_START_ANGLE,
};
use crate::scene::{DrawCommand, Scene};
use crate::widgets::{paint_case, Tile};

#[derive(Debug, Clone)]
pub struct Gauge {
    config: GaugeConfig,
    value: f64,
}

impl Gauge {
    pub fn new(config: GaugeConfig) -> Self {
        let value = config.range.0;
        Self { config, value }
    }

    /// Needle target. Values outside the range pin to the scale ends.
    pub fn set_value(&mut self, value: f64) {
        if value.is_finite() {
            self.value = value;
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Strip band the current value falls in, when strips are set.
    pub fn zone(&self) -> Option<Zone> {
        self.config
            .strips
            .as_ref()
            .and_then(|s| zone_for(s, self.config.range, self.value))
    }

    pub fn scene_into(&self, scene: &mut Scene, tile: Tile) {
        let style = self.config.style;
        let face_r = paint_case(scene, tile, style);
        let Tile { cx, cy, .. } = tile;
        let fg = style.foreground();

        // Colored strips under the scale.
        if let Some(strips) = &self.config.strips {
            for arc in zone_arcs(strips, self.config.range) {
                scene.push(DrawCommand::Band {
                    cx,
                    cy,
                    r_inner: 0.76 * face_r,
                    r_outer: 0.84 * face_r,
                    start_angle: arc.start_angle,
                    end_angle: arc.end_angle,
                    color: arc.color,
                });
            }
        }

        // Dial arc.
        scene.push(DrawCommand::ArcStroke {
            cx,
            cy,
            r: 0.85 * face_r,
            start_angle: GAUGE_START_ANGLE,
            end_angle: GAUGE_START_ANGLE + GAUGE_ARC_SPAN,
            width: (0.02 * face_r).max(1.5),
            color: fg,
        });

        self.paint_ticks(scene, cx, cy, face_r);

        // Name above the hub, unit below.
        let label_color = style.trim(palette::GLYPH);
        if !self.config.name.is_empty() {
            scene.push(DrawCommand::Text {
                x: cx,
                y: cy - 0.35 * face_r,
                text: self.config.name.clone(),
                size: (0.12 * face_r) as f32,
                color: label_color,
            });
        }
        if !self.config.unit_label.is_empty() {
            scene.push(DrawCommand::Text {
                x: cx,
                y: cy + 0.35 * face_r,
                text: self.config.unit_label.clone(),
                size: (0.1 * face_r) as f32,
                color: label_color,
            });
        }

        self.paint_needle(scene, cx, cy, face_r);
    }

    fn paint_ticks(&self, scene: &mut Scene, cx: f64, cy: f64, face_r: f64) {
        let fg = self.config.style.foreground();
        let (start, end) = self.config.range;
        let sub_step = self.config.sub_step.max(f64::EPSILON);
        let count = ((end - start) / sub_step).round() as usize;
        let outer = 0.84 * face_r;
        for i in 0..=count {
            let value = start + i as f64 * sub_step;
            let angle = gauge_angle(value, self.config.range);
            let offset = (value - start) / self.config.drawing_step.max(f64::EPSILON);
            let is_major = (offset - offset.round()).abs() < 1e-6;
            let (inset, width) = if is_major {
                (0.1 * face_r, (0.02 * face_r).max(1.5))
            } else {
                (0.05 * face_r, (0.01 * face_r).max(0.8))
            };
            let (x0, y0) = polar_point(cx, cy, outer, angle);
            let (x1, y1) = polar_point(cx, cy, outer - inset, angle);
            scene.push(DrawCommand::Line {
                x0,
                y0,
                x1,
                y1,
                width,
                color: fg,
            });
            if is_major {
                let (lx, ly) = polar_point(cx, cy, outer - 0.22 * face_r, angle);
                scene.push(DrawCommand::Text {
                    x: lx,
                    y: ly,
                    text: format!("{}", value.round() as i64),
                    size: (0.12 * face_r) as f32,
                    color: fg,
                });
            }
        }
    }

    fn paint_needle(&self, scene: &mut Scene, cx: f64, cy: f64, face_r: f64) {
        let style = self.config.style;
        let fg = style.foreground();
        let angle = gauge_angle(self.value, self.config.range);
        let (tip_x, tip_y) = polar_point(cx, cy, 0.78 * face_r, angle);
        let (back_x, back_y) = polar_point(cx, cy, -0.15 * face_r, angle);
        scene.push(DrawCommand::TaperedLine {
            x0: cx,
            y0: cy,
            x1: tip_x,
            y1: tip_y,
            width: (0.04 * face_r).max(2.0),
            color: fg,
        });
        scene.push(DrawCommand::Line {
            x0: cx,
            y0: cy,
            x1: back_x,
            y1: back_y,
            width: (0.04 * face_r).max(2.0),
            color: fg,
        });
        scene.push(DrawCommand::Disc {
            cx,
            cy,
            r: 0.06 * face_r,
            fill: fg.into(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StripThresholds;
    use approx::assert_relative_eq;

    fn battery_gauge() -> Gauge {
        let config = GaugeConfig::builder()
            .name("BATTERY".to_string())
            .unit_label("V".to_string())
            .range((0.0, 12.0))
            .drawing_step(2.0)
            .sub_step(1.0)
            .strips(StripThresholds::new(0.0, 8.0, 10.0).unwrap())
            .build();
        Gauge::new(config)
    }

    #[test]
    fn needle_spans_the_dial_arc() {
        let mut gauge = battery_gauge();
        gauge.set_value(0.0);
        assert_relative_eq!(
            gauge_angle(gauge.value(), (0.0, 12.0)),
            GAUGE_START_ANGLE
        );
        gauge.set_value(12.0);
        assert_relative_eq!(
            gauge_angle(gauge.value(), (0.0, 12.0)),
            GAUGE_START_ANGLE + GAUGE_ARC_SPAN
        );
    }

    #[test]
    fn strip_bands_appear_in_the_scene() {
        let gauge = battery_gauge();
        let mut scene = Scene::new();
        gauge.scene_into(&mut scene, Tile::new(150.0, 150.0, 100.0));
        let bands = scene
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Band { .. }))
            .count();
        assert_eq!(bands, 3);
    }

    #[test]
    fn zone_follows_the_value() {
        let mut gauge = battery_gauge();
        gauge.set_value(5.0);
        assert_eq!(gauge.zone(), Some(Zone::Red));
        gauge.set_value(9.0);
        assert_eq!(gauge.zone(), Some(Zone::Yellow));
        gauge.set_value(11.5);
        assert_eq!(gauge.zone(), Some(Zone::Green));
    }

    #[test]
    fn new_gauge_rests_at_the_range_start() {
        assert_eq!(battery_gauge().value(), 0.0);
    }
}
