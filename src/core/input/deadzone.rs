//=========================================================================
// Dead Zones
//=========================================================================
//
// Pure normalization of raw analog samples.
//
// Single axis:  raw ──clamp?──> cutoff(dead_zone, policy) ──> value
// Dual axis:    raw ──per-axis cutoff──> unit-disc clamp?──> radial cutoff
//
// The order of the dual-axis pipeline is part of the contract.
//
//=========================================================================

//=== External Dependencies ===============================================

use kurbo::Vec2;

//=== DeadZoneCutoff ======================================================

/// How values just outside the dead zone are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeadZoneCutoff {
    /// Rescale so the dead-zone edge maps to 0 and 1 still maps to 1.
    #[default]
    Scaled,

    /// Zero inside the dead zone, untouched outside it.
    ///
    /// The jump at the dead-zone edge is intended.
    Shear,
}

//=== AxisConsideration ===================================================

/// Which side of an axis counts as "active" when an axis drives a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AxisConsideration {
    /// Active when `value > threshold`.
    #[default]
    Positive,

    /// Active when `value < -threshold`.
    Negative,

    /// Active when `|value| > threshold`.
    Absolute,
}

impl AxisConsideration {
    /// Tests a raw axis value against `threshold`.
    pub fn test(self, value: f64, threshold: f64) -> bool {
        match self {
            Self::Positive => value > threshold,
            Self::Negative => value < -threshold,
            Self::Absolute => value.abs() > threshold,
        }
    }
}

//=== Single Axis =========================================================

/// Applies a dead zone to one axis sample.
///
/// With `clamp_normalized`, samples beyond ±1 return their sign.
///
/// ```
/// use aetheric_input::core::input::deadzone::{cutoff_axis, DeadZoneCutoff};
///
/// assert_eq!(cutoff_axis(0.1, 0.2, DeadZoneCutoff::Shear, false), 0.0);
/// assert_eq!(cutoff_axis(0.3, 0.2, DeadZoneCutoff::Shear, false), 0.3);
/// assert_eq!(cutoff_axis(1.0, 0.2, DeadZoneCutoff::Scaled, true), 1.0);
/// ```
pub fn cutoff_axis(value: f64, dead_zone: f64, cutoff: DeadZoneCutoff, clamp_normalized: bool) -> f64 {
    if clamp_normalized && value.abs() > 1.0 {
        return value.signum();
    }

    let magnitude = value.abs();
    if magnitude < dead_zone {
        return 0.0;
    }

    match cutoff {
        DeadZoneCutoff::Shear => value,
        DeadZoneCutoff::Scaled => rescale(value.signum(), magnitude, dead_zone),
    }
}

//=== Dual Axis ===========================================================

/// Applies per-axis then radial dead zones to a 2D sample.
///
/// Steps, in order:
/// 1. per-axis [`cutoff_axis`] with `axis_dead_zone` / `axis_cutoff`
/// 2. clamp to the unit disc when `clamp_normalized`
/// 3. radial cutoff on the magnitude (skipped when `radial_dead_zone <= 0`)
pub fn cutoff_dual_axis(
    value: Vec2,
    axis_dead_zone: f64,
    axis_cutoff: DeadZoneCutoff,
    radial_dead_zone: f64,
    radial_cutoff: DeadZoneCutoff,
    clamp_normalized: bool,
) -> Vec2 {
    let mut v = Vec2::new(
        cutoff_axis(value.x, axis_dead_zone, axis_cutoff, clamp_normalized),
        cutoff_axis(value.y, axis_dead_zone, axis_cutoff, clamp_normalized),
    );

    if clamp_normalized {
        let len = v.hypot();
        if len > 1.0 {
            v /= len;
        }
    }

    if radial_dead_zone > 0.0 {
        v = cutoff_radial(v, radial_dead_zone, radial_cutoff);
    }

    v
}

/// Applies a dead zone to the magnitude of `value`, keeping its direction.
pub fn cutoff_radial(value: Vec2, dead_zone: f64, cutoff: DeadZoneCutoff) -> Vec2 {
    let magnitude = value.hypot();
    if magnitude < dead_zone || magnitude == 0.0 {
        return Vec2::ZERO;
    }

    match cutoff {
        DeadZoneCutoff::Shear => value,
        DeadZoneCutoff::Scaled => {
            let direction = value / magnitude;
            direction * rescale(1.0, magnitude, dead_zone)
        }
    }
}

//--- Internal Helpers ----------------------------------------------------

fn rescale(sign: f64, magnitude: f64, dead_zone: f64) -> f64 {
    // A dead zone of 1 or more leaves nothing to rescale into.
    if dead_zone >= 1.0 {
        return if magnitude > dead_zone { sign } else { 0.0 };
    }
    sign * (magnitude - dead_zone) / (1.0 - dead_zone)
}

//=========================================================================
// Unit Tests
//=========================================================================
