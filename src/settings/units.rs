//! Measurement units for box dimensions
//!
//! Dimensions are entered in millimeters, centimeters or inches and converted
//! into world units before geometry is built. One world unit corresponds to
//! 100 mm, so a typical retail box (200x300x50 mm) lands at a comfortable
//! size for the default camera distance.

/// Measurement unit for user-facing dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Unit {
    #[default]
    Millimeters,
    Centimeters,
    Inches,
}

impl Unit {
    pub const ALL: [Unit; 3] = [Unit::Millimeters, Unit::Centimeters, Unit::Inches];

    /// World units per one unit of this measurement
    pub fn scale(self) -> f32 {
        match self {
            Unit::Millimeters => 0.01,
            Unit::Centimeters => 0.1,
            Unit::Inches => 0.254,
        }
    }

    /// Short symbol shown next to dimension inputs and in export file names
    pub fn symbol(self) -> &'static str {
        match self {
            Unit::Millimeters => "mm",
            Unit::Centimeters => "cm",
            Unit::Inches => "in",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Unit::Millimeters => "Millimeters",
            Unit::Centimeters => "Centimeters",
            Unit::Inches => "Inches",
        }
    }

    /// Converts a dimension in this unit into world units
    pub fn to_world(self, value: f32) -> f32 {
        value * self.scale()
    }

    /// Converts a world-unit length back into this unit
    pub fn from_world(self, value: f32) -> f32 {
        value / self.scale()
    }
}

/// Converts a dimension between units, rounding to one decimal place
/// in the target unit so input fields stay readable.
pub fn convert(value: f32, from: Unit, to: Unit) -> f32 {
    if from == to {
        return value;
    }
    round_decimal(value * from.scale() / to.scale())
}

fn round_decimal(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_world_scale_round_trip() {
        for unit in Unit::ALL {
            assert_relative_eq!(unit.from_world(unit.to_world(135.0)), 135.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_conversion_round_trip_within_rounding() {
        // mm -> cm -> mm reproduces the original dimension within the
        // one-decimal rounding of the coarser unit (0.1 cm = 1 mm).
        for value in [1.0, 50.0, 135.0, 190.0, 200.0, 300.0, 500.0] {
            let cm = convert(value, Unit::Millimeters, Unit::Centimeters);
            let back = convert(cm, Unit::Centimeters, Unit::Millimeters);
            assert!((back - value).abs() <= 1.0, "{value} mm -> {cm} cm -> {back} mm");
        }
    }

    #[test]
    fn test_conversion_exact_for_preset_values() {
        assert_relative_eq!(convert(200.0, Unit::Millimeters, Unit::Centimeters), 20.0);
        assert_relative_eq!(convert(135.0, Unit::Millimeters, Unit::Centimeters), 13.5);
        assert_relative_eq!(convert(13.5, Unit::Centimeters, Unit::Millimeters), 135.0);
    }

    #[test]
    fn test_conversion_same_unit_is_identity() {
        assert_relative_eq!(convert(42.3, Unit::Inches, Unit::Inches), 42.3);
    }

    #[test]
    fn test_inch_scale() {
        // 1 inch = 25.4 mm, so both must land on the same world length.
        assert_relative_eq!(
            Unit::Inches.to_world(1.0),
            Unit::Millimeters.to_world(25.4),
            epsilon = 1e-5
        );
    }
}
