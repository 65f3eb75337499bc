//! Progress percentage computation.

use crate::constants::dialog::PROGRESS_LABEL_SUFFIX;
use crate::error::AppError;

/// Clamps an absolute percentage into `0..=100`.
pub fn clamp_percent(percent: i64) -> u8 {
    percent.clamp(0, 100) as u8
}

/// `floor(100 * current / total)`, clamped.
///
/// # Errors
/// * `AppError::DivisionByZero` - `total` is zero
pub fn ratio_percent(current: u64, total: u64) -> Result<u8, AppError> {
    if total == 0 {
        return Err(AppError::DivisionByZero);
    }
    // u128 keeps 100 * current from overflowing
    let percent = (current as u128 * 100) / total as u128;
    Ok(percent.min(100) as u8)
}

/// Visible label of the progress bar, e.g. `"42 Complete"`
pub fn progress_label(percent: u8) -> String {
    format!("{percent} {PROGRESS_LABEL_SUFFIX}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_percent() {
        assert_eq!(clamp_percent(-5), 0);
        assert_eq!(clamp_percent(0), 0);
        assert_eq!(clamp_percent(57), 57);
        assert_eq!(clamp_percent(100), 100);
        assert_eq!(clamp_percent(250), 100);
        assert_eq!(clamp_percent(i64::MIN), 0);
    }

    #[test]
    fn test_ratio_percent_floors() {
        assert_eq!(ratio_percent(1, 3).unwrap(), 33);
        assert_eq!(ratio_percent(2, 3).unwrap(), 66);
        assert_eq!(ratio_percent(3, 3).unwrap(), 100);
        assert_eq!(ratio_percent(0, 7).unwrap(), 0);
    }

    #[test]
    fn test_ratio_percent_matches_absolute_form() {
        for total in 1..=40u64 {
            for current in 0..=total {
                let expected = clamp_percent((100 * current / total) as i64);
                assert_eq!(ratio_percent(current, total).unwrap(), expected);
            }
        }
    }

    #[test]
    fn test_ratio_percent_over_total_is_clamped() {
        assert_eq!(ratio_percent(15, 10).unwrap(), 100);
        assert_eq!(ratio_percent(u64::MAX, 1).unwrap(), 100);
    }

    #[test]
    fn test_ratio_percent_zero_total() {
        assert!(matches!(ratio_percent(5, 0), Err(AppError::DivisionByZero)));
        assert!(matches!(ratio_percent(0, 0), Err(AppError::DivisionByZero)));
    }

    #[test]
    fn test_progress_label_format() {
        assert_eq!(progress_label(0), "0 Complete");
        assert_eq!(progress_label(42), "42 Complete");
        assert_eq!(progress_label(100), "100 Complete");
    }
}
