//! Entry form state and numeric coercion of its text fields.

use crate::workout::{ActivityInput, Field, ValidationError, WorkoutInput, WorkoutType};
use once_cell::sync::Lazy;
use regex::Regex;

// Numeric literal grammar accepted by a browser's unary `+`
static DECIMAL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(Infinity|(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?)$").unwrap()
});
static RADIX_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^0([xX][0-9a-fA-F]+|[oO][0-7]+|[bB][01]+)$").unwrap());

/// Coerce field text to a number the way an HTML form value is coerced.
///
/// Blank text becomes `0.0`; anything that is not a numeric literal becomes NaN.
///
/// # Examples
/// ```
/// use mapty::form::parse_number;
/// assert_eq!(parse_number(" 5.5 "), 5.5);
/// assert_eq!(parse_number(""), 0.0);
/// assert_eq!(parse_number("0x10"), 16.0);
/// assert!(parse_number("5km").is_nan());
/// ```
pub fn parse_number(input: &str) -> f64 {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    if DECIMAL_REGEX.is_match(trimmed) {
        let unsigned = trimmed.trim_start_matches(['+', '-']);
        let magnitude = if unsigned == "Infinity" {
            f64::INFINITY
        } else {
            unsigned.parse::<f64>().unwrap_or(f64::NAN)
        };
        return if trimmed.starts_with('-') { -magnitude } else { magnitude };
    }

    if RADIX_REGEX.is_match(trimmed) {
        let radix = match trimmed.as_bytes()[1] {
            b'x' | b'X' => 16,
            b'o' | b'O' => 8,
            _ => 2,
        };
        return trimmed[2..]
            .chars()
            .filter_map(|c| c.to_digit(radix))
            .fold(0.0, |acc, digit| acc * radix as f64 + digit as f64);
    }

    f64::NAN
}

/// Current contents of the entry form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkoutForm {
    kind: WorkoutType,
    distance: String,
    duration: String,
    cadence: String,
    elevation_gain: String,
}

impl WorkoutForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(&self) -> WorkoutType {
        self.kind
    }

    /// Switch the workout type. The visible variant row follows the type.
    pub fn set_kind(&mut self, kind: WorkoutType) {
        self.kind = kind;
    }

    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::Distance => &self.distance,
            Field::Duration => &self.duration,
            Field::Cadence => &self.cadence,
            Field::ElevationGain => &self.elevation_gain,
        }
    }

    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::Distance => self.distance = value,
            Field::Duration => self.duration = value,
            Field::Cadence => self.cadence = value,
            Field::ElevationGain => self.elevation_gain = value,
        }
    }

    /// The variant field shown for the current type.
    pub fn variant_field(&self) -> Field {
        match self.kind {
            WorkoutType::Running => Field::Cadence,
            WorkoutType::Cycling => Field::ElevationGain,
        }
    }

    /// Empty every input. The selected type is kept.
    pub fn clear(&mut self) {
        self.distance.clear();
        self.duration.clear();
        self.cadence.clear();
        self.elevation_gain.clear();
    }

    /// Coerce the visible fields and check them against the rules for the
    /// selected type.
    pub fn validate(&self) -> Result<WorkoutInput, ValidationError> {
        let distance = parse_number(&self.distance);
        let duration = parse_number(&self.duration);
        let variant = parse_number(self.field(self.variant_field()));

        let activity = match self.kind {
            WorkoutType::Running => ActivityInput::Running { cadence: variant },
            WorkoutType::Cycling => ActivityInput::Cycling {
                elevation_gain: variant,
            },
        };
        WorkoutInput::new(distance, duration, activity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(kind: WorkoutType, distance: &str, duration: &str, variant: &str) -> WorkoutForm {
        let mut form = WorkoutForm::new();
        form.set_kind(kind);
        form.set_field(Field::Distance, distance);
        form.set_field(Field::Duration, duration);
        form.set_field(form.variant_field(), variant);
        form
    }

    #[test]
    fn parses_decimal_literals() {
        assert_eq!(parse_number("5"), 5.0);
        assert_eq!(parse_number("  12.5\n"), 12.5);
        assert_eq!(parse_number("-3"), -3.0);
        assert_eq!(parse_number("+7"), 7.0);
        assert_eq!(parse_number(".5"), 0.5);
        assert_eq!(parse_number("5."), 5.0);
        assert_eq!(parse_number("1e3"), 1000.0);
        assert_eq!(parse_number("2.5E-1"), 0.25);
        assert_eq!(parse_number("-Infinity"), f64::NEG_INFINITY);
    }

    #[test]
    fn parses_radix_literals() {
        assert_eq!(parse_number("0xff"), 255.0);
        assert_eq!(parse_number("0o17"), 15.0);
        assert_eq!(parse_number("0b101"), 5.0);
        assert!(parse_number("-0x10").is_nan());
    }

    #[test]
    fn blank_is_zero_and_garbage_is_nan() {
        assert_eq!(parse_number(""), 0.0);
        assert_eq!(parse_number("   "), 0.0);
        for input in ["abc", "5 km", "1,5", "inf", "NaN", "--1", "1e", "."] {
            assert!(parse_number(input).is_nan(), "{input:?} should be NaN");
        }
    }

    #[test]
    fn running_form_requires_positive_values() {
        assert!(form(WorkoutType::Running, "5", "30", "150").validate().is_ok());
        assert_eq!(
            form(WorkoutType::Running, "0", "30", "150").validate(),
            Err(ValidationError::NotPositive(Field::Distance))
        );
        assert_eq!(
            form(WorkoutType::Running, "five", "30", "150").validate(),
            Err(ValidationError::NotANumber(Field::Distance))
        );
        assert_eq!(
            form(WorkoutType::Running, "5", "30", "").validate(),
            Err(ValidationError::NotPositive(Field::Cadence))
        );
    }

    #[test]
    fn cycling_form_accepts_negative_elevation() {
        let input = form(WorkoutType::Cycling, "20", "60", "-3").validate().unwrap();
        assert_eq!(
            input.activity(),
            ActivityInput::Cycling { elevation_gain: -3.0 }
        );
        assert_eq!(
            form(WorkoutType::Cycling, "20", "-1", "0").validate(),
            Err(ValidationError::NotPositive(Field::Duration))
        );
    }

    #[test]
    fn only_visible_variant_is_read() {
        let mut f = form(WorkoutType::Running, "5", "30", "150");
        f.set_field(Field::ElevationGain, "not a number");
        assert!(f.validate().is_ok());

        f.set_kind(WorkoutType::Cycling);
        assert_eq!(
            f.validate(),
            Err(ValidationError::NotANumber(Field::ElevationGain))
        );
    }

    #[test]
    fn clear_keeps_selected_type() {
        let mut f = form(WorkoutType::Cycling, "20", "60", "100");
        f.clear();
        assert_eq!(f.kind(), WorkoutType::Cycling);
        assert_eq!(f.field(Field::Distance), "");
        assert_eq!(f.field(Field::ElevationGain), "");
    }
}
