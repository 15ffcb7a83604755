//! Geometry mapper: pure transforms from an instrument value plus
//! configuration to drawable quantities (hand angles, digits, tick and
//! label placement, colored zone arcs).
//!
//! Nothing in here touches a surface. All functions are total over
//! finite floats: out-of-scale values wrap modulo one hand revolution
//! instead of failing, matching a mechanical multi-hand dial.

use std::f64::consts::{FRAC_PI_2, PI};

use crate::config::{Color, StripThresholds, UnitStep, palette};

/// Number of decimal digits kept from the scaled value. Three of them
/// are thousandths, so nine digits cover values up to one million units.
pub const DIGIT_COUNT: usize = 9;

/// Ticks around a full instrument face.
pub const TICK_COUNT: usize = 50;

/// Angular weight of one unit of the most significant digit a hand
/// reads: one tenth of a revolution.
const DECADE_WEIGHT: f64 = 2.0 * PI / 10.0;

/// Decimal digits of `trunc(value * 1000)`, least significant first.
///
/// Thousandths are retained so the fine hands move between integer
/// values. Negative inputs are decomposed by magnitude (the sign is the
/// caller's problem, see the readout); non-finite and out-of-range
/// inputs saturate through the `f64 -> i64` cast and stay defined.
pub fn decompose_digits(value: f64) -> [u8; DIGIT_COUNT] {
    let scaled = (value * 1000.0).trunc() as i64;
    let mut magnitude = scaled.unsigned_abs();
    let mut digits = [0u8; DIGIT_COUNT];
    for digit in digits.iter_mut() {
        *digit = (magnitude % 10) as u8;
        magnitude /= 10;
    }
    digits
}

/// Rotation of a decade hand whose most significant digit sits at index
/// `msd` of the decomposition, measured clockwise from 12 o'clock.
///
/// Weighted sum `Σ (2π/10) · 10⁻ⁱ · digit[msd − i]`: the coarse digit
/// positions the hand on one of ten sectors and each finer digit sweeps
/// it a tenth further, so the angle is continuous across digit carries
/// by construction (no branches, no rounding of the carry).
pub fn hand_angle(digits: &[u8; DIGIT_COUNT], msd: usize) -> f64 {
    let mut angle = 0.0;
    let mut weight = DECADE_WEIGHT;
    for i in 0..=msd.min(4) {
        angle += weight * digits[msd - i] as f64;
        weight /= 10.0;
    }
    angle
}

/// Hand angle for a raw value: decomposition plus the decade window
/// selected by the unit step.
pub fn value_hand_angle(value: f64, step: UnitStep, hand: DecadeHand) -> f64 {
    let digits = decompose_digits(value);
    hand_angle(&digits, hand.msd(step))
}

/// The three hands of a multi-hand dial, outermost decade first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecadeHand {
    TenThousands,
    Thousands,
    Hundreds,
}

impl DecadeHand {
    /// Most significant digit index this hand reads, after applying the
    /// unit-step decade shift.
    pub fn msd(&self, step: UnitStep) -> usize {
        let base = match self {
            Self::TenThousands => 7,
            Self::Thousands => 6,
            Self::Hundreds => 5,
        };
        base - step.decade_shift()
    }
}

/// Angle of tick `index` on the 50-tick face, measured in standard
/// screen coordinates (0 along +x, growing clockwise on screen).
pub fn tick_angle(index: usize) -> f64 {
    FRAC_PI_2 + index as f64 * PI / (TICK_COUNT as f64 / 2.0)
}

/// Major ticks (every 5th) are inset deeper and drawn at full width.
pub fn tick_is_major(index: usize) -> bool {
    index % 5 == 0
}

/// Point on a hand at `angle` (clockwise from 12 o'clock) and distance
/// `length` from the center. The vertical reference axis is why the
/// basis is `(sin, -cos)` rather than `(cos, sin)`.
pub fn hand_point(cx: f64, cy: f64, length: f64, angle: f64) -> (f64, f64) {
    (cx + length * angle.sin(), cy - length * angle.cos())
}

/// Point at `angle` in standard screen polar coordinates, used for
/// ticks and scale labels.
pub fn polar_point(cx: f64, cy: f64, length: f64, angle: f64) -> (f64, f64) {
    (cx + length * angle.cos(), cy + length * angle.sin())
}

/// Face position of scale number `i` (0..=9): evenly spaced starting at
/// 12 o'clock, nudged so the glyph lands centered between ticks.
pub fn scale_label_pos(cx: f64, cy: f64, radius: f64, i: usize) -> (f64, f64) {
    let angle = FRAC_PI_2 + i as f64 * PI / 5.0 + PI;
    let inset = 0.225 * radius;
    let (x, y) = polar_point(cx, cy, radius - inset, angle);
    (x - 0.065 * radius, y + 0.07 * radius)
}

/// The most significant six digits of the scaled value, most
/// significant first: the digital read-out boxes.
///
/// `1234.5` scales to `1234500`, decomposes to nine digits and reads
/// back as `0 0 1 2 3 4`.
pub fn readout_digits(value: f64) -> [u8; 6] {
    let digits = decompose_digits(value);
    let mut out = [0u8; 6];
    for (slot, out_digit) in out.iter_mut().enumerate() {
        *out_digit = digits[DIGIT_COUNT - 1 - slot];
    }
    out
}

/// One colored band on a gauge face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneArc {
    pub start_angle: f64,
    pub end_angle: f64,
    pub color: Color,
}

/// Strip band identity, in evaluation priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Red,
    Yellow,
    Green,
}

impl Zone {
    pub fn color(&self) -> Color {
        match self {
            Self::Red => palette::RED,
            Self::Yellow => palette::YELLOW,
            Self::Green => palette::GREEN,
        }
    }
}

/// Normalized [0,1] position of `value` within `range`, clamped.
pub fn normalize(value: f64, range: (f64, f64)) -> f64 {
    let span = range.1 - range.0;
    if span <= 0.0 {
        return 0.0;
    }
    ((value - range.0) / span).clamp(0.0, 1.0)
}

/// Gauge dial sweep: three quarters of a turn starting at the lower
/// left (6 o'clock in screen angles), the classic analog gauge arc.
pub const GAUGE_START_ANGLE: f64 = FRAC_PI_2 + PI / 4.0;
pub const GAUGE_ARC_SPAN: f64 = PI * 1.5;

/// Angle on the gauge arc for a value within `range`.
pub fn gauge_angle(value: f64, range: (f64, f64)) -> f64 {
    GAUGE_START_ANGLE + GAUGE_ARC_SPAN * normalize(value, range)
}

/// Map strip thresholds onto angular bands over the gauge arc, in the
/// fixed red < yellow < green order. Each band runs from its own start
/// threshold to the next one (green runs to the end of the range).
pub fn zone_arcs(strips: &StripThresholds, range: (f64, f64)) -> Vec<ZoneArc> {
    let bounds = [
        (Zone::Red, strips.red_start, strips.yellow_start),
        (Zone::Yellow, strips.yellow_start, strips.green_start),
        (Zone::Green, strips.green_start, range.1),
    ];
    bounds
        .iter()
        .filter(|(_, start, end)| end > start)
        .map(|(zone, start, end)| ZoneArc {
            start_angle: gauge_angle(*start, range),
            end_angle: gauge_angle(*end, range),
            color: zone.color(),
        })
        .collect()
}

/// Which band a probe value falls in, evaluated in the fixed priority
/// order: the first band whose interval contains the value wins.
pub fn zone_for(strips: &StripThresholds, range: (f64, f64), value: f64) -> Option<Zone> {
    let bounds = [
        (Zone::Red, strips.red_start, strips.yellow_start),
        (Zone::Yellow, strips.yellow_start, strips.green_start),
        (Zone::Green, strips.green_start, range.1 + f64::EPSILON),
    ];
    bounds
        .iter()
        .find(|(_, start, end)| value >= *start && value < *end)
        .map(|(zone, _, _)| *zone)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use std::f64::consts::TAU;

    #[test]
    fn digit_decomposition_round_trips() {
        for value in [0.0, 123.456, 1234.5, 999999.999, 0.001] {
            let digits = decompose_digits(value);
            let rebuilt: i64 = digits
                .iter()
                .enumerate()
                .map(|(k, d)| *d as i64 * 10i64.pow(k as u32))
                .sum();
            assert_eq!(rebuilt, (value * 1000.0).trunc() as i64, "value {value}");
        }
    }

    #[test]
    fn digit_decomposition_example() {
        // 123.456 -> 123456 -> LSB-first 6,5,4,3,2,1,0,0,0
        assert_eq!(decompose_digits(123.456), [6, 5, 4, 3, 2, 1, 0, 0, 0]);
    }

    #[test]
    fn negative_values_decompose_by_magnitude() {
        assert_eq!(decompose_digits(-123.456), decompose_digits(123.456));
    }

    #[test]
    fn non_finite_values_stay_defined() {
        decompose_digits(f64::NAN);
        decompose_digits(f64::INFINITY);
        decompose_digits(f64::MAX);
    }

    #[test]
    fn hand_angle_is_continuous_across_carry() {
        // 999.9995 -> 1000.0005 rolls digits 9,9,9 over to 0,0,0 while
        // the composed angle moves by the same small amount.
        let step = UnitStep::Hundred;
        let below = value_hand_angle(999.999, step, DecadeHand::Thousands);
        let above = value_hand_angle(1000.0, step, DecadeHand::Thousands);
        // One thousandth of a unit is (2π/10) / 10^4 on this hand.
        assert_abs_diff_eq!(above - below, DECADE_WEIGHT / 10_000.0, epsilon = 1e-9);
    }

    #[test]
    fn hand_angle_matches_weighted_sum() {
        // altitude 1234.5, step 100: thousands hand reads digits 6..=2
        // of 1234500 = (1,2,3,4,5 from MSD of the window).
        let digits = decompose_digits(1234.5);
        let angle = hand_angle(&digits, 6);
        let expected = DECADE_WEIGHT
            * (1.0 + 2.0 / 10.0 + 3.0 / 100.0 + 4.0 / 1000.0 + 5.0 / 10_000.0);
        assert_relative_eq!(angle, expected, epsilon = 1e-12);
    }

    #[test]
    fn hand_angle_wraps_per_decade() {
        // Ten full units of the outer decade is one revolution.
        let step = UnitStep::Hundred;
        let a = value_hand_angle(0.0, step, DecadeHand::TenThousands);
        let b = value_hand_angle(100_000.0, step, DecadeHand::TenThousands);
        assert_abs_diff_eq!((b - a) % TAU, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn unit_step_shifts_hand_window() {
        assert_eq!(DecadeHand::TenThousands.msd(UnitStep::Hundred), 7);
        assert_eq!(DecadeHand::TenThousands.msd(UnitStep::Ten), 6);
        assert_eq!(DecadeHand::TenThousands.msd(UnitStep::One), 5);
        assert_eq!(DecadeHand::Hundreds.msd(UnitStep::One), 3);
    }

    #[test]
    fn ticks_partition_the_circle() {
        for i in 0..TICK_COUNT {
            let expected = FRAC_PI_2 + i as f64 * TAU / TICK_COUNT as f64;
            assert_relative_eq!(tick_angle(i), expected, epsilon = 1e-12);
        }
        // Sector 0 and sector 25 are diametrically opposite.
        let delta = (tick_angle(25) - tick_angle(0)).rem_euclid(TAU);
        assert_abs_diff_eq!(delta, PI, epsilon = 1e-12);
    }

    #[test]
    fn readout_scenario() {
        assert_eq!(readout_digits(1234.5), [0, 0, 1, 2, 3, 4]);
        assert_eq!(readout_digits(0.0), [0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn zone_priority_prefers_first_matching_band() {
        let strips = StripThresholds::new(0.0, 8.0, 10.0).unwrap();
        let range = (0.0, 12.0);
        assert_eq!(zone_for(&strips, range, 9.0), Some(Zone::Yellow));
        assert_eq!(zone_for(&strips, range, 5.0), Some(Zone::Red));
        assert_eq!(zone_for(&strips, range, 11.0), Some(Zone::Green));
        assert_eq!(zone_for(&strips, range, -1.0), None);
    }

    #[test]
    fn zone_arcs_cover_the_configured_bands() {
        let strips = StripThresholds::new(0.0, 8.0, 10.0).unwrap();
        let range = (0.0, 12.0);
        let arcs = zone_arcs(&strips, range);
        assert_eq!(arcs.len(), 3);
        assert_relative_eq!(arcs[0].start_angle, GAUGE_START_ANGLE);
        assert_relative_eq!(arcs[2].end_angle, GAUGE_START_ANGLE + GAUGE_ARC_SPAN);
        assert_eq!(arcs[1].color, palette::YELLOW);
    }

    #[test]
    fn degenerate_strips_produce_no_empty_bands() {
        // red and yellow share a start: the red band is empty and dropped.
        let strips = StripThresholds::new(8.0, 8.0, 10.0).unwrap();
        let arcs = zone_arcs(&strips, (0.0, 12.0));
        assert_eq!(arcs.len(), 2);
    }

    #[test]
    fn hand_point_uses_vertical_reference() {
        let (x, y) = hand_point(100.0, 100.0, 10.0, 0.0);
        assert_relative_eq!(x, 100.0);
        assert_relative_eq!(y, 90.0);
        let (x, y) = hand_point(100.0, 100.0, 10.0, FRAC_PI_2);
        assert_relative_eq!(x, 110.0);
        assert_abs_diff_eq!(y, 100.0, epsilon = 1e-9);
    }
}
