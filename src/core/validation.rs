use crate::error::{Bounds, TimelineError, TimelineResult};

/// Rejects `NaN`. Infinities are accepted here; callers that need finite
/// values use the size/position validators.
pub fn validate_number(name: &str, value: f64) -> TimelineResult<f64> {
    if value.is_nan() {
        return Err(TimelineError::NotANumber {
            name: name.to_owned(),
            value,
        });
    }
    Ok(value)
}

pub fn validate_size(name: &str, value: f64, bounds: Bounds) -> TimelineResult<f64> {
    if !value.is_finite() {
        return Err(TimelineError::NotASize {
            name: name.to_owned(),
            value,
        });
    }
    if !bounds.contains(value) {
        return Err(TimelineError::SizeRange {
            name: name.to_owned(),
            value,
            bounds,
        });
    }
    Ok(value)
}

pub fn validate_position(name: &str, value: f64, bounds: Bounds) -> TimelineResult<f64> {
    if !value.is_finite() {
        return Err(TimelineError::NotAPosition {
            name: name.to_owned(),
            value,
        });
    }
    if !bounds.contains(value) {
        return Err(TimelineError::PositionRange {
            name: name.to_owned(),
            value,
            bounds,
        });
    }
    Ok(value)
}

/// Validates a strict `min < max` interval of finite positions.
pub fn validate_interval(name: &str, min: f64, max: f64) -> TimelineResult<(f64, f64)> {
    let unbounded = Bounds::inclusive(f64::NEG_INFINITY, f64::INFINITY);
    validate_position(&format!("{name}.min"), min, unbounded)?;
    validate_position(&format!("{name}.max"), max, unbounded)?;
    if min >= max {
        return Err(TimelineError::IntervalExtrema {
            name: name.to_owned(),
            min,
            max,
        });
    }
    Ok((min, max))
}

/// Matches `value` against a fixed option table.
pub fn parse_string_option<T: Copy>(
    name: &str,
    value: &str,
    table: &[(&'static str, T)],
    options: &'static [&'static str],
) -> TimelineResult<T> {
    let needle = value.trim();
    table
        .iter()
        .find(|(label, _)| label.eq_ignore_ascii_case(needle))
        .map(|(_, option)| *option)
        .ok_or_else(|| TimelineError::UnknownStringOption {
            name: name.to_owned(),
            value: value.to_owned(),
            options,
        })
}

#[cfg(test)]
mod tests {
    use super::{validate_interval, validate_number, validate_position, validate_size};
    use crate::error::{Bounds, TimelineError};

    #[test]
    fn nan_is_not_a_number_but_infinity_is() {
        assert!(matches!(
            validate_number("x", f64::NAN),
            Err(TimelineError::NotANumber { .. })
        ));
        assert!(validate_number("x", f64::INFINITY).is_ok());
    }

    #[test]
    fn size_validation_separates_type_and_range_errors() {
        assert!(matches!(
            validate_size("size", f64::INFINITY, Bounds::non_negative()),
            Err(TimelineError::NotASize { .. })
        ));
        assert!(matches!(
            validate_size("size", -1.0, Bounds::non_negative()),
            Err(TimelineError::SizeRange { .. })
        ));
        assert!(matches!(
            validate_size("size", 0.0, Bounds::positive()),
            Err(TimelineError::SizeRange { .. })
        ));
        assert_eq!(
            validate_size("size", 0.0, Bounds::non_negative()).expect("valid"),
            0.0
        );
    }

    #[test]
    fn position_validation_respects_exclusive_bounds() {
        let bounds = Bounds {
            min: 0.0,
            max: 10.0,
            min_inclusive: true,
            max_inclusive: false,
        };
        assert!(validate_position("pos", 0.0, bounds).is_ok());
        assert!(matches!(
            validate_position("pos", 10.0, bounds),
            Err(TimelineError::PositionRange { .. })
        ));
    }

    #[test]
    fn interval_requires_strict_ordering() {
        assert!(matches!(
            validate_interval("window", 5.0, 5.0),
            Err(TimelineError::IntervalExtrema { .. })
        ));
        assert_eq!(
            validate_interval("window", 1.0, 2.0).expect("valid"),
            (1.0, 2.0)
        );
    }

    #[test]
    fn bounds_render_with_interval_notation() {
        assert_eq!(Bounds::non_negative().to_string(), "[0, inf)");
        assert_eq!(Bounds::positive().to_string(), "(0, inf)");
        assert_eq!(Bounds::inclusive(1.0, 2.0).to_string(), "[1, 2]");
    }
}
