//! Unit inference for bare thickness and width values.
//!
//! Drawings rarely declare a trustworthy unit, so by default every value is
//! judged by magnitude alone: anything under `meter_threshold` is taken as
//! meters, anything else as millimeters already. `UnitPolicy::Declared`
//! switches to the document's header units when they are known.

use crate::model::Units;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnitPolicy {
    #[default]
    Magnitude,
    Declared,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitConfig {
    pub policy: UnitPolicy,
    /// Values below this are meters, values at or above are millimeters.
    pub meter_threshold: f64,
    /// A segment longer than this is assumed to be drawn in millimeters.
    pub millimeter_length_threshold: f64,
}

impl Default for UnitConfig {
    fn default() -> Self {
        Self {
            policy: UnitPolicy::Magnitude,
            meter_threshold: 50.0,
            millimeter_length_threshold: 500.0,
        }
    }
}

/// Resolves unit guesses for one document. Cheap to copy; holds no state
/// beyond the configuration and the declared units.
#[derive(Debug, Clone, Copy)]
pub struct UnitResolver<'a> {
    cfg: &'a UnitConfig,
    declared: Units,
}

impl<'a> UnitResolver<'a> {
    pub fn new(cfg: &'a UnitConfig, declared: Units) -> Self {
        Self { cfg, declared }
    }

    /// Millimeters per drawing unit, when the policy allows trusting the header.
    fn declared_mm_per_unit(&self) -> Option<f64> {
        if self.cfg.policy != UnitPolicy::Declared {
            return None;
        }
        match self.declared {
            Units::Millimeters => Some(1.0),
            Units::Centimeters => Some(10.0),
            Units::Meters => Some(1000.0),
            Units::Inches => Some(25.4),
            Units::Unknown => None,
        }
    }

    /// Normalizes a drawing-unit length to millimeters.
    pub fn to_millimeters(&self, value: f64) -> f64 {
        if let Some(mm) = self.declared_mm_per_unit() {
            return value * mm;
        }
        if value < self.cfg.meter_threshold {
            value * 1000.0
        } else {
            value
        }
    }

    /// Converts an assumed thickness in meters into drawing units, guessing the
    /// drawing scale from the length of the segment it belongs to.
    pub fn thickness_in_drawing_units(&self, meters: f64, segment_length: f64) -> f64 {
        if let Some(mm) = self.declared_mm_per_unit() {
            return meters * 1000.0 / mm;
        }
        if segment_length > self.cfg.millimeter_length_threshold {
            meters * 1000.0
        } else {
            meters
        }
    }

    /// Width in meters for an opening whose block x-scale is `raw`.
    ///
    /// Under the magnitude policy a value above `meter_threshold` is divided
    /// down from millimeters, and only an unconverted value below `min_width`
    /// falls back to `fallback`. Declared units convert first and then apply
    /// the same minimum.
    pub fn opening_width(&self, raw: f64, min_width: f64, fallback: f64) -> f64 {
        if let Some(mm) = self.declared_mm_per_unit() {
            let meters = raw * mm / 1000.0;
            return if meters < min_width { fallback } else { meters };
        }
        if raw > self.cfg.meter_threshold {
            raw / 1000.0
        } else if raw < min_width {
            fallback
        } else {
            raw
        }
    }
}
