//! The rotation dial: a clamped scalar angle driven by horizontal drags.
//!
//! # Calibration
//!
//! A horizontal drag of `calibration_px` points turns the dial by 90 degrees.
//! Dragging right turns counter-clockwise (negative angle):
//!
//! ```text
//! delta_angle = -drag_dx * (π/2 / calibration_px)
//! ```

use crate::error::{ensure_finite, Result};
use crate::geometry::clamp;
use crate::GesturePhase;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

/// Default calibration: 145 points of drag per quarter turn.
pub const DEFAULT_CALIBRATION_PX: f64 = 145.0;

/// Change notification emitted whenever the dial value is set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DialChange {
    /// The stored (clamped) value in radians.
    pub value: f64,
    /// Whether the presentation layer should animate to the new value.
    pub animated: bool,
}

/// Rotation dial state.
///
/// Invariant: `min <= value <= max`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationDial {
    value: f64,
    min: f64,
    max: f64,
    calibration_px: f64,
    continuous: bool,
}

impl Default for RotationDial {
    fn default() -> Self {
        Self::new(FRAC_PI_4)
    }
}

impl RotationDial {
    /// A dial centered on zero with a symmetric `±limit` range.
    pub fn new(limit: f64) -> Self {
        let limit = limit.abs();
        Self {
            value: 0.0,
            min: -limit,
            max: limit,
            calibration_px: DEFAULT_CALIBRATION_PX,
            continuous: true,
        }
    }

    pub fn with_calibration(mut self, calibration_px: f64) -> Self {
        self.calibration_px = calibration_px;
        self
    }

    pub fn with_continuous(mut self, continuous: bool) -> Self {
        self.continuous = continuous;
        self
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn is_continuous(&self) -> bool {
        self.continuous
    }

    /// Clamp `angle` into range and store it.
    ///
    /// Non-finite angles are ignored; the notification then carries the
    /// unchanged value.
    pub fn set_value(&mut self, angle: f64, animated: bool) -> DialChange {
        if angle.is_finite() {
            self.value = clamp(angle, self.min, self.max);
        } else {
            log::warn!("Ignoring non-finite dial value {}", angle);
        }
        DialChange {
            value: self.value,
            animated,
        }
    }

    /// Turn the dial by a horizontal drag distance.
    pub fn apply_delta(&mut self, drag_dx: f64) -> DialChange {
        let delta = -drag_dx * (FRAC_PI_2 / self.calibration_px);
        self.set_value(self.value + delta, false)
    }

    /// Route a drag event. Non-continuous dials only react when the gesture
    /// ends.
    pub fn drag(&mut self, phase: GesturePhase, drag_dx: f64) -> Option<DialChange> {
        if !self.continuous && phase != GesturePhase::Ended {
            return None;
        }
        Some(self.apply_delta(drag_dx))
    }

    /// Lower bound. The current value is pulled up if it falls below.
    pub fn set_min(&mut self, min: f64) -> Result<Option<DialChange>> {
        self.min = ensure_finite(min, "dial range")?;
        Ok(self.reclamp())
    }

    /// Upper bound. The current value is pulled down if it rises above.
    pub fn set_max(&mut self, max: f64) -> Result<Option<DialChange>> {
        self.max = ensure_finite(max, "dial range")?;
        Ok(self.reclamp())
    }

    /// Replace both bounds; inverted bounds are swapped. Non-finite bounds
    /// are rejected and the range is left as it was.
    pub fn set_range(&mut self, min: f64, max: f64) -> Result<Option<DialChange>> {
        let min = ensure_finite(min, "dial range")?;
        let max = ensure_finite(max, "dial range")?;
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        self.min = min;
        self.max = max;
        Ok(self.reclamp())
    }

    fn reclamp(&mut self) -> Option<DialChange> {
        if self.value < self.min || self.value > self.max {
            Some(self.set_value(self.value, false))
        } else {
            None
        }
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
