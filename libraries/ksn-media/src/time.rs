//! Elapsed/duration display formatting

/// Format a seconds value as `M:SS`.
///
/// `None`, NaN, negative and infinite input all render as `0:00`.
/// Fractions are truncated, minutes are not capped.
pub fn format_time(seconds: Option<f64>) -> String {
    let whole = match seconds {
        Some(value) if value.is_finite() && value > 0.0 => value.floor() as u64,
        _ => 0,
    };

    format!("{}:{:02}", whole / 60, whole % 60)
}

/// Duration usable for arithmetic: known, finite and non-zero
pub(crate) fn usable_duration(duration: Option<f64>) -> Option<f64> {
    duration.filter(|d| d.is_finite() && *d > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallbacks_render_zero() {
        assert_eq!(format_time(None), "0:00");
        assert_eq!(format_time(Some(f64::NAN)), "0:00");
        assert_eq!(format_time(Some(-3.0)), "0:00");
        assert_eq!(format_time(Some(f64::INFINITY)), "0:00");
    }

    #[test]
    fn pads_seconds() {
        assert_eq!(format_time(Some(0.0)), "0:00");
        assert_eq!(format_time(Some(7.9)), "0:07");
        assert_eq!(format_time(Some(59.0)), "0:59");
        assert_eq!(format_time(Some(60.0)), "1:00");
        assert_eq!(format_time(Some(125.0)), "2:05");
    }

    #[test]
    fn minutes_grow_past_an_hour() {
        assert_eq!(format_time(Some(3725.0)), "62:05");
    }

    #[test]
    fn usable_duration_rejects_unknown_values() {
        assert_eq!(usable_duration(None), None);
        assert_eq!(usable_duration(Some(0.0)), None);
        assert_eq!(usable_duration(Some(f64::NAN)), None);
        assert_eq!(usable_duration(Some(f64::INFINITY)), None);
        assert_eq!(usable_duration(Some(12.5)), Some(12.5));
    }
}
