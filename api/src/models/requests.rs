use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use crate::config::DEFAULT_SIZE_KM;

/// Query string of the terrain endpoint.
///
/// Either `q` or the `lat`/`lon` pair locates the area; when both are given
/// `q` takes precedence.
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TerrainQuery {
    /// Free-text place name, geocoded to the area centre.
    #[validate(length(max = 200, message = "q must be at most 200 characters"))]
    pub q: Option<String>,
    /// Centre latitude in decimal degrees.
    pub lat: Option<f64>,
    /// Centre longitude in decimal degrees.
    pub lon: Option<f64>,
    /// Side length of the square area in kilometres (default: 10, max: 200).
    #[serde(default = "default_size")]
    #[validate(custom(function = "crate::validation::validate_size_field"))]
    pub size: f64,
    /// Samples per side (2..=50). Defaults to the deployment's configured grid.
    /// Bounds are checked by the handler once the default is applied.
    pub grid: Option<u32>,
}

fn default_size() -> f64 {
    DEFAULT_SIZE_KM
}

impl TerrainQuery {
    /// The trimmed text query, if one was supplied and is not blank.
    pub fn text(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::web::Query;

    fn parse(qs: &str) -> TerrainQuery {
        Query::<TerrainQuery>::from_query(qs).unwrap().into_inner()
    }

    #[test]
    fn defaults_applied() {
        let q = parse("q=Grand%20Canyon");
        assert_eq!(q.size, DEFAULT_SIZE_KM);
        assert_eq!(q.grid, None);
        assert_eq!(q.text(), Some("Grand Canyon"));
        assert!(q.validate().is_ok());
    }

    #[test]
    fn blank_text_counts_as_absent() {
        assert_eq!(parse("q=%20%20").text(), None);
        assert_eq!(parse("q=").text(), None);
    }

    #[test]
    fn out_of_range_parameters_fail_validation() {
        assert!(parse("lat=1&lon=2&size=0").validate().is_err());
        assert!(parse("lat=1&lon=2&size=500").validate().is_err());
        assert!(parse("lat=1&lon=2&size=20&grid=40").validate().is_ok());
    }

    #[test]
    fn non_numeric_coordinates_do_not_parse() {
        assert!(Query::<TerrainQuery>::from_query("lat=abc&lon=1").is_err());
        assert!(Query::<TerrainQuery>::from_query("lat=1&lon=2&grid=2.5").is_err());
    }
}
