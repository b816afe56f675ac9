//=========================================================================
// Axis Signatures
//=========================================================================
//
// Analog signatures: one axis or a pair, each run through dead zones.
//
// Architecture:
//   source() -> f64  ──invert?──> cutoff_axis ─────────> value
//   source() -> Vec2 ──invert?──> cutoff_dual_axis ────> value
//
// Axes carry level, not edges, so both phases simply resample.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use kurbo::Vec2;

//=== Internal Dependencies ===============================================

use super::{AxisSignature, DualAxisSignature, InputSignature};
use crate::core::frame::FrameContext;
use crate::core::input::deadzone::{cutoff_axis, cutoff_dual_axis, DeadZoneCutoff};

//=== Settings ============================================================

/// Processing applied to a single axis sample.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AxisSettings {
    pub dead_zone: f64,
    pub cutoff: DeadZoneCutoff,
    pub invert: bool,
    pub clamp_normalized: bool,
}

impl AxisSettings {
    /// Applies inversion then the dead zone to a raw sample.
    pub fn apply(&self, raw: f64) -> f64 {
        let raw = if self.invert { -raw } else { raw };
        cutoff_axis(raw, self.dead_zone, self.cutoff, self.clamp_normalized)
    }
}

impl Default for AxisSettings {
    fn default() -> Self {
        Self {
            dead_zone: 0.15,
            cutoff: DeadZoneCutoff::Scaled,
            invert: false,
            clamp_normalized: true,
        }
    }
}

/// Processing applied to a two-axis sample.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DualAxisSettings {
    pub axis_dead_zone: f64,
    pub axis_cutoff: DeadZoneCutoff,
    pub radial_dead_zone: f64,
    pub radial_cutoff: DeadZoneCutoff,
    pub invert_x: bool,
    pub invert_y: bool,
    pub clamp_normalized: bool,
}

impl DualAxisSettings {
    pub fn apply(&self, raw: Vec2) -> Vec2 {
        let raw = Vec2::new(
            if self.invert_x { -raw.x } else { raw.x },
            if self.invert_y { -raw.y } else { raw.y },
        );
        cutoff_dual_axis(
            raw,
            self.axis_dead_zone,
            self.axis_cutoff,
            self.radial_dead_zone,
            self.radial_cutoff,
            self.clamp_normalized,
        )
    }
}

impl Default for DualAxisSettings {
    fn default() -> Self {
        Self {
            axis_dead_zone: 0.0,
            axis_cutoff: DeadZoneCutoff::Scaled,
            radial_dead_zone: 0.15,
            radial_cutoff: DeadZoneCutoff::Scaled,
            invert_x: false,
            invert_y: false,
            clamp_normalized: true,
        }
    }
}

//=== DelegatedAxisSignature ==============================================

/// Single axis driven by a float source.
pub struct DelegatedAxisSignature {
    id: String,
    precedence: f32,
    source: Box<dyn Fn() -> f64>,
    settings: AxisSettings,
    value: f64,
}

impl DelegatedAxisSignature {
    pub fn new(id: impl Into<String>, source: impl Fn() -> f64 + 'static) -> Self {
        Self {
            id: id.into(),
            precedence: 0.0,
            source: Box::new(source),
            settings: AxisSettings::default(),
            value: 0.0,
        }
    }

    pub fn with_settings(mut self, settings: AxisSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_precedence(mut self, precedence: f32) -> Self {
        self.precedence = precedence;
        self
    }

    pub fn settings(&self) -> &AxisSettings {
        &self.settings
    }
}

impl InputSignature for DelegatedAxisSignature {
    fn id(&self) -> &str {
        &self.id
    }

    fn precedence(&self) -> f32 {
        self.precedence
    }

    fn update(&mut self, _ctx: &FrameContext) {
        self.value = self.settings.apply((self.source)());
    }

    fn reset(&mut self) {
        self.value = 0.0;
    }

    fn as_axis(&self) -> Option<&dyn AxisSignature> {
        Some(self)
    }
}

impl AxisSignature for DelegatedAxisSignature {
    fn value(&self) -> f64 {
        self.value
    }
}

impl fmt::Debug for DelegatedAxisSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelegatedAxisSignature")
            .field("id", &self.id)
            .field("settings", &self.settings)
            .field("value", &self.value)
            .finish()
    }
}

//=== DelegatedDualAxisSignature ==========================================

/// Two-axis input (stick) driven by a vector source.
pub struct DelegatedDualAxisSignature {
    id: String,
    precedence: f32,
    source: Box<dyn Fn() -> Vec2>,
    settings: DualAxisSettings,
    value: Vec2,
}

impl DelegatedDualAxisSignature {
    pub fn new(id: impl Into<String>, source: impl Fn() -> Vec2 + 'static) -> Self {
        Self {
            id: id.into(),
            precedence: 0.0,
            source: Box::new(source),
            settings: DualAxisSettings::default(),
            value: Vec2::ZERO,
        }
    }

    /// Builds the vector source from two independent axis sources.
    pub fn from_axes(
        id: impl Into<String>,
        x: impl Fn() -> f64 + 'static,
        y: impl Fn() -> f64 + 'static,
    ) -> Self {
        Self::new(id, move || Vec2::new(x(), y()))
    }

    pub fn with_settings(mut self, settings: DualAxisSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_precedence(mut self, precedence: f32) -> Self {
        self.precedence = precedence;
        self
    }

    pub fn settings(&self) -> &DualAxisSettings {
        &self.settings
    }
}

impl InputSignature for DelegatedDualAxisSignature {
    fn id(&self) -> &str {
        &self.id
    }

    fn precedence(&self) -> f32 {
        self.precedence
    }

    fn update(&mut self, _ctx: &FrameContext) {
        self.value = self.settings.apply((self.source)());
    }

    fn reset(&mut self) {
        self.value = Vec2::ZERO;
    }

    fn as_dual_axis(&self) -> Option<&dyn DualAxisSignature> {
        Some(self)
    }
}

impl DualAxisSignature for DelegatedDualAxisSignature {
    fn value(&self) -> Vec2 {
        self.value
    }
}

impl fmt::Debug for DelegatedDualAxisSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelegatedDualAxisSignature")
            .field("id", &self.id)
            .field("settings", &self.settings)
            .field("value", &self.value)
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
