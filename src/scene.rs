//! Retained-mode scene: widgets append `DrawCommand`s in paint order and
//! the rasterizer replays them. Insertion order is the layering contract;
//! later commands occlude earlier ones.

use crate::config::Color;

/// Radial gradient between two circles, cairo-pattern style.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadialGradient {
    pub cx: f64,
    pub cy: f64,
    pub r0: f64,
    pub r1: f64,
    pub start: Color,
    pub end: Color,
}

/// Fill source for area commands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Fill {
    Solid(Color),
    Radial(RadialGradient),
}

impl From<Color> for Fill {
    fn from(color: Color) -> Self {
        Fill::Solid(color)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    /// Square with rounded corners, centered on (cx, cy).
    RoundedRect {
        cx: f64,
        cy: f64,
        half: f64,
        corner: f64,
        fill: Fill,
    },
    Disc {
        cx: f64,
        cy: f64,
        r: f64,
        fill: Fill,
    },
    /// Stroked circle of the given stroke width.
    Ring {
        cx: f64,
        cy: f64,
        r: f64,
        width: f64,
        color: Color,
    },
    /// Stroked arc between two angles (standard screen polar angles).
    ArcStroke {
        cx: f64,
        cy: f64,
        r: f64,
        start_angle: f64,
        end_angle: f64,
        width: f64,
        color: Color,
    },
    /// Filled pie wedge.
    Sector {
        cx: f64,
        cy: f64,
        r: f64,
        start_angle: f64,
        end_angle: f64,
        color: Color,
    },
    /// Filled annular band between two radii and two angles.
    Band {
        cx: f64,
        cy: f64,
        r_inner: f64,
        r_outer: f64,
        start_angle: f64,
        end_angle: f64,
        color: Color,
    },
    Line {
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        width: f64,
        color: Color,
    },
    /// Line whose width tapers toward the far end (gauge needles).
    TaperedLine {
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        width: f64,
        color: Color,
    },
    /// Filled convex polygon (hand bodies).
    Polygon {
        points: Vec<(f64, f64)>,
        color: Color,
    },
    /// Text centered on (x, y).
    Text {
        x: f64,
        y: f64,
        text: String,
        size: f32,
        color: Color,
    },
    /// Text centered on (x, y), rotated around its own center.
    RotatedText {
        x: f64,
        y: f64,
        text: String,
        size: f32,
        angle: f64,
        color: Color,
    },
}

/// Ordered command list for one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::palette;

    #[test]
    fn commands_replay_in_insertion_order() {
        let mut scene = Scene::new();
        scene.push(DrawCommand::Clear(palette::BLACK));
        scene.push(DrawCommand::Disc {
            cx: 1.0,
            cy: 2.0,
            r: 3.0,
            fill: palette::WHITE.into(),
        });
        assert_eq!(scene.commands().len(), 2);
        assert!(matches!(scene.commands()[0], DrawCommand::Clear(_)));
        assert!(matches!(scene.commands()[1], DrawCommand::Disc { .. }));
    }
}
