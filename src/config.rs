//! Instrument configuration: palette, face style, unit selection.
//!
//! Every widget takes its configuration once at construction (builder
//! structs with defaults) and treats it as immutable afterwards.

use bon::Builder;
use thiserror::Error;

/// Color representation for gauge elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn grey(level: u8) -> Self {
        Self::new(level, level, level)
    }

    pub const fn as_tuple(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    /// Channel-wise complement, used by the inverted palette.
    pub const fn complement(self) -> Self {
        Self::new(255 - self.r, 255 - self.g, 255 - self.b)
    }

    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Self::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

/// Palette constants recovered from the reference instrument faces
/// (grey intensities 0.05 / 0.1 / 0.2 / 0.4 / 0.7 on the cairo scale).
pub mod palette {
    use super::Color;

    pub const BEZEL: Color = Color::grey(26);
    pub const FACE: Color = Color::grey(13);
    pub const INVERTED: Color = Color::grey(179);
    pub const BEZEL_SHINE: Color = Color::grey(51);
    pub const FACE_SHINE: Color = Color::grey(179);
    pub const SCREW_SHINE_END: Color = Color::grey(38);
    pub const WINDOW_BACKGROUND: Color = Color::grey(102);
    pub const READOUT_TRIM: Color = Color::grey(204);
    pub const GLYPH: Color = Color::grey(230);
    pub const OUTER_TRIM: Color = Color::new(153, 128, 128);
    pub const RING_TRIM: Color = Color::grey(153);
    pub const WHITE: Color = Color::grey(255);
    pub const BLACK: Color = Color::grey(0);
    pub const RED: Color = Color::new(255, 0, 0);
    pub const YELLOW: Color = Color::new(255, 212, 0);
    pub const GREEN: Color = Color::new(0, 160, 0);
}

/// Shared face appearance: light/dark palette swap plus the choice
/// between flat fills and radial-gradient shading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder)]
pub struct FaceStyle {
    #[builder(default = false)]
    pub color_inverted: bool,
    #[builder(default = true)]
    pub radial_shading: bool,
}

impl Default for FaceStyle {
    fn default() -> Self {
        Self {
            color_inverted: false,
            radial_shading: true,
        }
    }
}

impl FaceStyle {
    /// The asymmetric 4-way fill selection inherited from the reference
    /// design: the gradient is used only when shading is on AND the
    /// palette is not inverted; every other combination is a flat fill.
    pub fn uses_gradient(&self) -> bool {
        self.radial_shading && !self.color_inverted
    }

    /// Flat fill color for a surface whose normal-palette color is `base`.
    pub fn flat(&self, base: Color) -> Color {
        if self.color_inverted {
            palette::INVERTED
        } else {
            base
        }
    }

    /// Foreground for ticks, hands and face text: white on the dark
    /// palette, black on the inverted one.
    pub fn foreground(&self) -> Color {
        if self.color_inverted {
            palette::BLACK
        } else {
            palette::WHITE
        }
    }

    /// Opposite of `foreground`, for counterweights and hub wedges.
    pub fn contrast(&self) -> Color {
        self.foreground().complement()
    }

    /// Trim and secondary text colors invert channel-wise.
    pub fn trim(&self, base: Color) -> Color {
        if self.color_inverted {
            base.complement()
        } else {
            base
        }
    }
}

/// Errors surfaced at configuration time instead of being silently
/// defaulted away.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("unit step must be 1, 10 or 100 (got {0})")]
    InvalidStep(i64),
    #[error("strip thresholds must satisfy red <= yellow <= green (got {red} / {yellow} / {green})")]
    StripOrder { red: f64, yellow: f64, green: f64 },
    #[error("gauge range is empty ({start}..{end})")]
    EmptyRange { start: f64, end: f64 },
    #[error("gauge tick steps must be positive (drawing_step {drawing_step}, sub_step {sub_step})")]
    NonPositiveTickStep { drawing_step: f64, sub_step: f64 },
}

/// Which decade the altimeter's outer hand represents. A full sweep of
/// the outer hand covers 10 × step × 1000 internal units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnitStep {
    One,
    Ten,
    #[default]
    Hundred,
}

impl UnitStep {
    pub fn from_value(value: i64) -> Result<Self, ConfigError> {
        match value {
            1 => Ok(Self::One),
            10 => Ok(Self::Ten),
            100 => Ok(Self::Hundred),
            other => Err(ConfigError::InvalidStep(other)),
        }
    }

    pub fn value(&self) -> i64 {
        match self {
            Self::One => 1,
            Self::Ten => 10,
            Self::Hundred => 100,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::One => "1",
            Self::Ten => "10",
            Self::Hundred => "100",
        }
    }

    /// Decimal shift applied to the digit indices the hands read:
    /// step 100 reads the raw decomposition, smaller steps slide the
    /// window down one or two decades.
    pub fn decade_shift(&self) -> usize {
        match self {
            Self::One => 2,
            Self::Ten => 1,
            Self::Hundred => 0,
        }
    }
}

/// Altimeter widget configuration.
#[derive(Debug, Clone, Builder)]
pub struct AltimeterConfig {
    #[builder(default)]
    pub style: FaceStyle,
    #[builder(default = true)]
    pub unit_is_feet: bool,
    #[builder(default)]
    pub unit_step: UnitStep,
}

impl Default for AltimeterConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Colored strip thresholds for a gauge face, in the fixed
/// red < yellow < green order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StripThresholds {
    pub red_start: f64,
    pub yellow_start: f64,
    pub green_start: f64,
}

impl StripThresholds {
    pub fn new(red_start: f64, yellow_start: f64, green_start: f64) -> Result<Self, ConfigError> {
        if red_start <= yellow_start && yellow_start <= green_start {
            Ok(Self {
                red_start,
                yellow_start,
                green_start,
            })
        } else {
            Err(ConfigError::StripOrder {
                red: red_start,
                yellow: yellow_start,
                green: green_start,
            })
        }
    }
}

/// Round gauge configuration (velocity, battery voltage, ...).
#[derive(Debug, Clone, Builder)]
pub struct GaugeConfig {
    #[builder(default)]
    pub style: FaceStyle,
    #[builder(default = "".to_string())]
    pub name: String,
    #[builder(default = "".to_string())]
    pub unit_label: String,
    #[builder(default = (0.0, 100.0))]
    pub range: (f64, f64),
    /// Value distance between numbered major ticks.
    #[builder(default = 20.0)]
    pub drawing_step: f64,
    /// Value distance between minor ticks.
    #[builder(default = 5.0)]
    pub sub_step: f64,
    pub strips: Option<StripThresholds>,
}

impl GaugeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (start, end) = self.range;
        if start >= end {
            return Err(ConfigError::EmptyRange { start, end });
        }
        // A non-positive step would make the tick loop unbounded.
        if !(self.drawing_step > 0.0) || !(self.sub_step > 0.0) {
            return Err(ConfigError::NonPositiveTickStep {
                drawing_step: self.drawing_step,
                sub_step: self.sub_step,
            });
        }
        Ok(())
    }
}

impl Default for GaugeConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Compass configuration: only the shared face style for now.
#[derive(Debug, Clone, Default, Builder)]
pub struct CompassConfig {
    #[builder(default)]
    pub style: FaceStyle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn altimeter_defaults_match_reference() {
        let config = AltimeterConfig::default();
        assert!(config.unit_is_feet);
        assert_eq!(config.unit_step, UnitStep::Hundred);
        assert!(!config.style.color_inverted);
        assert!(config.style.radial_shading);
    }

    #[test]
    fn unit_step_rejects_unknown_decades() {
        assert_eq!(UnitStep::from_value(10), Ok(UnitStep::Ten));
        assert_eq!(UnitStep::from_value(7), Err(ConfigError::InvalidStep(7)));
        assert_eq!(UnitStep::from_value(1000), Err(ConfigError::InvalidStep(1000)));
    }

    #[test]
    fn gradient_only_without_inversion() {
        let truth_table = [
            (true, true, false),
            (true, false, true),
            (false, true, false),
            (false, false, false),
        ];
        for (radial, inverted, expect) in truth_table {
            let style = FaceStyle {
                color_inverted: inverted,
                radial_shading: radial,
            };
            assert_eq!(style.uses_gradient(), expect, "radial={radial} inverted={inverted}");
        }
    }

    #[test]
    fn non_positive_tick_steps_fail_validation() {
        let config = GaugeConfig::builder()
            .range((0.0, 100.0))
            .drawing_step(0.0)
            .sub_step(0.0)
            .build();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositiveTickStep { .. })
        ));
        let config = GaugeConfig::builder().sub_step(-1.0).build();
        assert!(config.validate().is_err());
        assert!(GaugeConfig::default().validate().is_ok());
    }

    #[test]
    fn strip_thresholds_must_be_ordered() {
        assert!(StripThresholds::new(0.0, 8.0, 10.0).is_ok());
        assert!(matches!(
            StripThresholds::new(0.0, 12.0, 10.0),
            Err(ConfigError::StripOrder { .. })
        ));
    }

    #[test]
    fn inverted_style_swaps_foreground() {
        let normal = FaceStyle::default();
        let inverted = FaceStyle {
            color_inverted: true,
            ..FaceStyle::default()
        };
        assert_eq!(normal.foreground(), palette::WHITE);
        assert_eq!(inverted.foreground(), palette::BLACK);
        assert_eq!(inverted.flat(palette::BEZEL), palette::INVERTED);
    }
}
