use crate::errors::AppError;
use validator::ValidationError;

pub const MAX_SIZE_KM: f64 = 200.0;
pub const MIN_GRID: u32 = 2;
pub const MAX_GRID: u32 = 50;

pub fn validate_size_field(size: impl std::borrow::Borrow<f64>) -> Result<(), ValidationError> {
    let size = size.borrow();
    if !size.is_finite() || *size <= 0.0 || *size > MAX_SIZE_KM {
        return Err(ValidationError::new("size"));
    }
    Ok(())
}

pub fn validate_grid(grid: u32) -> Result<(), AppError> {
    if !(MIN_GRID..=MAX_GRID).contains(&grid) {
        return Err(AppError::Validation(format!(
            "grid must be between {MIN_GRID} and {MAX_GRID}"
        )));
    }
    Ok(())
}

pub fn validate_coordinates(lat: f64, lon: f64) -> Result<(), AppError> {
    if !lat.is_finite() || !lon.is_finite() {
        return Err(AppError::Validation(
            "Coordinates must be finite numbers".to_string(),
        ));
    }
    if !(-90.0..=90.0).contains(&lat) {
        return Err(AppError::Validation(
            "Latitude must be between -90 and 90".to_string(),
        ));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(AppError::Validation(
            "Longitude must be between -180 and 180".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_bounds() {
        assert!(validate_size_field(&10.0).is_ok());
        assert!(validate_size_field(&MAX_SIZE_KM).is_ok());
        assert!(validate_size_field(&0.0).is_err());
        assert!(validate_size_field(&-5.0).is_err());
        assert!(validate_size_field(&200.5).is_err());
        assert!(validate_size_field(&f64::NAN).is_err());
    }

    #[test]
    fn grid_bounds() {
        assert!(validate_grid(2).is_ok());
        assert!(validate_grid(40).is_ok());
        assert!(validate_grid(1).is_err());
        assert!(validate_grid(MAX_GRID + 1).is_err());
    }

    #[test]
    fn coordinate_bounds() {
        assert!(validate_coordinates(36.0544, -112.1401).is_ok());
        assert!(validate_coordinates(90.0, 180.0).is_ok());
        assert!(validate_coordinates(90.1, 0.0).is_err());
        assert!(validate_coordinates(0.0, -180.5).is_err());
        assert!(validate_coordinates(f64::NAN, 0.0).is_err());
    }
}
