//! Editor preferences and length units.
//!
//! Preferences are plain serde structs so that a host application can keep
//! them in a TOML document next to its other settings. Every field has a
//! default, so partial documents are accepted.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const INCH_TO_CM: f64 = 2.54;

/// Length unit used for magnetism steps and for clamping numeric entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    Millimeter,
    #[default]
    Centimeter,
    Meter,
    Inch,
}

impl LengthUnit {
    /// Smallest length (in centimeters) a user can enter in this unit.
    #[must_use]
    pub fn minimum_length(self) -> f64 {
        match self {
            Self::Millimeter | Self::Centimeter | Self::Meter => 0.1,
            Self::Inch => INCH_TO_CM / 8.0,
        }
    }

    /// Largest length (in centimeters) a user can enter in this unit.
    #[must_use]
    pub fn maximum_length(self) -> f64 {
        match self {
            Self::Millimeter | Self::Centimeter | Self::Meter => 100_000.0,
            Self::Inch => 3_280.0 * 12.0 * INCH_TO_CM,
        }
    }

    /// Largest wall thickness accepted by precise edition.
    #[must_use]
    pub fn maximum_thickness(self) -> f64 {
        self.maximum_length() / 10.0
    }

    /// Clamps `length` into `[minimum_length, maximum_length]`.
    ///
    /// Non-finite values are coerced to the minimum.
    #[must_use]
    pub fn clamp_length(self, length: f64) -> f64 {
        if length.is_finite() {
            length.clamp(self.minimum_length(), self.maximum_length())
        } else {
            self.minimum_length()
        }
    }

    /// Returns `length` rounded to the step of this unit that best matches
    /// `max_delta`, the largest change the user would not notice.
    ///
    /// A positive length that would round to zero is returned unchanged.
    #[must_use]
    pub fn magnetized_length(self, length: f64, max_delta: f64) -> f64 {
        let magnetized = match self {
            Self::Millimeter | Self::Centimeter | Self::Meter => {
                let precision = if max_delta > 100.0 {
                    100.0
                } else if max_delta > 10.0 {
                    10.0
                } else if max_delta > 5.0 {
                    5.0
                } else if max_delta > 1.0 {
                    1.0
                } else if max_delta > 0.5 {
                    0.5
                } else {
                    0.1
                };
                (length / precision).round() * precision
            }
            Self::Inch => {
                let max_delta = max_delta / INCH_TO_CM;
                let precision = if max_delta > 6.0 {
                    6.0
                } else if max_delta > 3.0 {
                    3.0
                } else if max_delta > 1.0 {
                    1.0
                } else if max_delta > 0.5 {
                    0.5
                } else if max_delta > 0.25 {
                    0.25
                } else {
                    0.125
                };
                (length / INCH_TO_CM / precision).round() * precision * INCH_TO_CM
            }
        };
        if magnetized == 0.0 && length > 0.0 {
            length
        } else {
            magnetized
        }
    }
}

/// User preferences consulted by the controller and its states.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub unit: LengthUnit,
    pub magnetism_enabled: bool,
    pub new_wall_thickness: f64,
    pub new_wall_height: f64,
    pub new_wall_baseboard_thickness: f64,
    pub new_wall_baseboard_height: f64,
    pub new_floor_thickness: f64,
    pub new_room_floor_visible: bool,
    pub new_room_ceiling_visible: bool,
    pub new_polyline_thickness: f64,
    pub new_dimension_line_offset: f64,
    pub new_label_text: String,
    /// Tolerance in pixels used for magnetism and hit testing.
    pub pixel_margin: f64,
    /// Tolerance in pixels around resize and rotation indicators.
    pub indicator_pixel_margin: f64,
    /// Tolerance in pixels around free wall ends.
    pub wall_ends_pixel_margin: f64,
    /// Number of angle steps on a full turn, 24 giving 15° steps.
    pub angle_step_count: u32,
    /// Delay between two point commits considered as a double input.
    pub double_click_delay_ms: u64,
    /// Margin in centimeters used to look for walls and pieces around a moved piece.
    pub furniture_magnetism_margin: f64,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            unit: LengthUnit::Centimeter,
            magnetism_enabled: true,
            new_wall_thickness: 7.5,
            new_wall_height: 250.0,
            new_wall_baseboard_thickness: 1.0,
            new_wall_baseboard_height: 7.0,
            new_floor_thickness: 12.0,
            new_room_floor_visible: true,
            new_room_ceiling_visible: true,
            new_polyline_thickness: 1.0,
            new_dimension_line_offset: 20.0,
            new_label_text: "Label".to_owned(),
            pixel_margin: 4.0,
            indicator_pixel_margin: 5.0,
            wall_ends_pixel_margin: 2.0,
            angle_step_count: 24,
            double_click_delay_ms: 300,
            furniture_magnetism_margin: 20.0,
        }
    }
}

impl Preferences {
    /// Parses and validates preferences stored as TOML.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed documents and
    /// `ConfigError::Invalid` when a value is out of its legal range.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let preferences: Self = toml::from_str(text)?;
        preferences.validate()?;
        Ok(preferences)
    }

    /// Checks that every numeric preference is usable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("new_wall_thickness", self.new_wall_thickness),
            ("new_wall_height", self.new_wall_height),
            ("new_floor_thickness", self.new_floor_thickness),
            ("new_polyline_thickness", self.new_polyline_thickness),
            ("pixel_margin", self.pixel_margin),
            ("indicator_pixel_margin", self.indicator_pixel_margin),
            ("wall_ends_pixel_margin", self.wall_ends_pixel_margin),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if self.new_wall_baseboard_thickness < 0.0 || self.new_wall_baseboard_height < 0.0 {
            return Err(ConfigError::Invalid(
                "baseboard dimensions can't be negative".to_owned(),
            ));
        }
        if self.angle_step_count < 4 {
            return Err(ConfigError::Invalid(format!(
                "angle_step_count must be at least 4, got {}",
                self.angle_step_count
            )));
        }
        Ok(())
    }

    /// Angle step in radians derived from `angle_step_count`.
    #[must_use]
    pub fn angle_step(&self) -> f64 {
        std::f64::consts::TAU / f64::from(self.angle_step_count)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn magnetized_centimeter_lengths() {
        let unit = LengthUnit::Centimeter;
        assert!((unit.magnetized_length(401.3, 4.0) - 401.0).abs() < 1e-9);
        assert!((unit.magnetized_length(401.3, 12.0) - 400.0).abs() < 1e-9);
        assert!((unit.magnetized_length(0.3, 4.0) - 0.3).abs() < 1e-9);
    }

    #[test]
    fn magnetized_inch_lengths() {
        let unit = LengthUnit::Inch;
        let length = unit.magnetized_length(30.0, 4.0);
        // 4 cm ≈ 1.57 in, so one-inch steps.
        assert!((length / INCH_TO_CM - 12.0).abs() < 1e-9);
    }

    #[test]
    fn clamp_coerces_non_finite_values() {
        let unit = LengthUnit::Centimeter;
        assert!((unit.clamp_length(f64::NAN) - 0.1).abs() < 1e-12);
        assert!((unit.clamp_length(-5.0) - 0.1).abs() < 1e-12);
        assert!((unit.clamp_length(1e9) - 100_000.0).abs() < 1e-9);
    }

    #[test]
    fn partial_toml_document_uses_defaults() {
        let preferences = Preferences::from_toml_str(
            "unit = \"inch\"\nmagnetism_enabled = false\nangle_step_count = 8\n",
        )
        .unwrap();
        assert_eq!(preferences.unit, LengthUnit::Inch);
        assert!(!preferences.magnetism_enabled);
        assert_eq!(preferences.angle_step_count, 8);
        assert!((preferences.new_wall_thickness - 7.5).abs() < 1e-12);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(Preferences::from_toml_str("new_wall_thickness = 0.0").is_err());
        assert!(Preferences::from_toml_str("angle_step_count = 2").is_err());
        assert!(Preferences::from_toml_str("unit = 12").is_err());
    }
}
