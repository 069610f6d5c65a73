use crate::errors::AppError;

/// Min and max over the samples that carry a finite elevation.
///
/// Absent samples stay where they are in the caller's array; they are only
/// skipped here. An area with no valid sample at all is an error.
pub fn elevation_range(samples: &[Option<f64>]) -> Result<(f64, f64), AppError> {
    samples
        .iter()
        .flatten()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            None => Some((v, v)),
        })
        .ok_or(AppError::EmptyData)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_and_max_over_valid_samples() {
        let samples = [Some(120.5), Some(-3.0), Some(2450.0), Some(0.0)];
        assert_eq!(elevation_range(&samples).unwrap(), (-3.0, 2450.0));
    }

    #[test]
    fn absent_and_non_finite_samples_are_skipped() {
        let samples = [None, Some(f64::NAN), Some(15.0), None, Some(7.0), Some(f64::INFINITY)];
        assert_eq!(elevation_range(&samples).unwrap(), (7.0, 15.0));
    }

    #[test]
    fn single_valid_sample() {
        assert_eq!(elevation_range(&[None, Some(42.0)]).unwrap(), (42.0, 42.0));
    }

    #[test]
    fn no_valid_samples_is_empty_data() {
        assert!(matches!(elevation_range(&[None, None]), Err(AppError::EmptyData)));
        assert!(matches!(elevation_range(&[]), Err(AppError::EmptyData)));
    }
}
