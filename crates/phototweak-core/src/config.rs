//! Editor configuration.
//!
//! Every tunable constant of the editor lives here so hosts can override them
//! from a plain object (see the WASM bindings) while missing fields fall back
//! to the defaults.

use crate::error::{GeometryError, Result};
use crate::geometry::Vector2;
use serde::{Deserialize, Serialize};

/// Most guide lines per axis a config may ask for.
pub const MAX_GUIDE_LINES: u32 = 16;

/// Tunables for one edit session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Smallest allowed crop side, in editor points.
    pub min_side_length: f64,
    /// Width of the touch band inside the crop edges that grabs a handle.
    pub activity_border_width: f64,
    /// Dial range in degrees on each side of zero.
    pub rotation_limit_degrees: f64,
    /// Horizontal drag distance that turns the dial by 90 degrees.
    pub dial_calibration_px: f64,
    /// Apply dial drags continuously rather than only when the gesture ends.
    pub dial_continuous: bool,
    /// Fraction of the editor width/height available to the crop frame.
    pub max_content_ratio: Vector2,
    /// Space reserved above the content area.
    pub header_height: f64,
    /// Delay between the last crop drag and the automatic settle.
    pub settle_delay_ms: f64,
    /// Upper zoom bound. The effective ceiling never drops below the
    /// coverage minimum.
    pub max_zoom_scale: f64,
    /// Guide lines drawn inside the crop frame on each axis, at most
    /// [`MAX_GUIDE_LINES`].
    pub guide_line_count: u32,
    /// Tolerance for "this ratio is already selected".
    pub ratio_tolerance: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            min_side_length: 60.0,
            activity_border_width: 30.0,
            rotation_limit_degrees: 45.0,
            dial_calibration_px: 145.0,
            dial_continuous: true,
            max_content_ratio: Vector2::new(0.9, 0.7),
            header_height: 60.0,
            settle_delay_ms: 2000.0,
            max_zoom_scale: 1.0,
            guide_line_count: 2,
            ratio_tolerance: 1e-5,
        }
    }
}

impl EditorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dial range in radians.
    pub fn rotation_limit(&self) -> f64 {
        self.rotation_limit_degrees.to_radians()
    }

    /// Check every value for range and finiteness.
    pub fn validate(&self) -> Result<()> {
        fn positive(value: f64, name: &str) -> Result<()> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(GeometryError::InvalidConfig(format!(
                    "{} must be positive, got {}",
                    name, value
                )))
            }
        }
        fn non_negative(value: f64, name: &str) -> Result<()> {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(GeometryError::InvalidConfig(format!(
                    "{} must not be negative, got {}",
                    name, value
                )))
            }
        }

        positive(self.min_side_length, "min_side_length")?;
        non_negative(self.activity_border_width, "activity_border_width")?;
        non_negative(self.rotation_limit_degrees, "rotation_limit_degrees")?;
        positive(self.dial_calibration_px, "dial_calibration_px")?;
        positive(self.max_content_ratio.dx, "max_content_ratio.dx")?;
        positive(self.max_content_ratio.dy, "max_content_ratio.dy")?;
        non_negative(self.header_height, "header_height")?;
        non_negative(self.settle_delay_ms, "settle_delay_ms")?;
        positive(self.max_zoom_scale, "max_zoom_scale")?;
        non_negative(self.ratio_tolerance, "ratio_tolerance")?;

        if self.max_content_ratio.dx > 1.0 || self.max_content_ratio.dy > 1.0 {
            return Err(GeometryError::InvalidConfig(
                "max_content_ratio components must not exceed 1".to_string(),
            ));
        }
        if self.guide_line_count > MAX_GUIDE_LINES {
            return Err(GeometryError::InvalidConfig(format!(
                "guide_line_count must be at most {}, got {}",
                MAX_GUIDE_LINES, self.guide_line_count
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(EditorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rotation_limit_radians() {
        let config = EditorConfig::new();
        assert!((config.rotation_limit() - std::f64::consts::FRAC_PI_4).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_zero_min_side() {
        let mut config = EditorConfig::default();
        config.min_side_length = 0.0;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, GeometryError::InvalidConfig(ref m) if m.contains("min_side_length")));
    }

    #[test]
    fn test_guide_line_count_is_bounded() {
        let mut config = EditorConfig::default();
        config.guide_line_count = MAX_GUIDE_LINES;
        assert!(config.validate().is_ok());

        config.guide_line_count = u32::MAX;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, GeometryError::InvalidConfig(ref m) if m.contains("guide_line_count")));
    }

    #[test]
    fn test_rejects_nan() {
        let mut config = EditorConfig::default();
        config.header_height = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_oversized_content_ratio() {
        let mut config = EditorConfig::default();
        config.max_content_ratio = Vector2::new(1.2, 0.7);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config: EditorConfig =
            serde_json::from_str(r#"{ "min_side_length": 80.0, "dial_continuous": false }"#)
                .unwrap();
        assert_eq!(config.min_side_length, 80.0);
        assert!(!config.dial_continuous);
        assert_eq!(config.header_height, 60.0);
        assert_eq!(config.guide_line_count, 2);
    }
}
