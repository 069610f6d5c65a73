/// Kilometres spanned by one degree of latitude.
pub const KM_PER_DEG: f64 = 111.0;

/// A sample location in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

/// Generate the `grid × grid` sample lattice centred on a point.
///
/// Rows are emitted outer, columns inner:
///   row i = 0 is the northern edge, rows advance southward
///   col j = 0 is the western edge, columns advance eastward
///
/// The row offset is therefore `0.5 - i / (grid - 1)`, the negation of the
/// column offset, so that the top row carries the largest latitude.
///
/// The longitude span is widened by `1 / cos(lat)` so cells stay roughly
/// square on the ground. Close to the poles that factor diverges; callers get
/// whatever the trigonometry yields.
///
/// Returns `None` when `grid < 2` (the spacing `1 / (grid - 1)` is undefined).
pub fn generate(center_lat: f64, center_lon: f64, size_km: f64, grid: u32) -> Option<Vec<Coordinate>> {
    if grid < 2 {
        return None;
    }

    let lat_span = size_km / KM_PER_DEG;
    let lon_span = size_km / (KM_PER_DEG * center_lat.to_radians().cos());
    let last = f64::from(grid - 1);

    let mut points = Vec::with_capacity((grid * grid) as usize);
    for i in 0..grid {
        let lat = center_lat + (0.5 - f64::from(i) / last) * lat_span;
        for j in 0..grid {
            let lon = center_lon + (f64::from(j) / last - 0.5) * lon_span;
            points.push(Coordinate { lat, lon });
        }
    }

    Some(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn count_is_grid_squared() {
        for grid in [2, 3, 20, 30, 40] {
            let points = generate(36.0544, -112.1401, 20.0, grid).unwrap();
            assert_eq!(points.len(), (grid * grid) as usize);
        }
    }

    #[test]
    fn degenerate_grid_rejected() {
        assert!(generate(0.0, 0.0, 10.0, 1).is_none());
        assert!(generate(0.0, 0.0, 10.0, 0).is_none());
    }

    #[test]
    fn row_major_north_to_south_west_to_east() {
        let grid = 4;
        let points = generate(10.0, 20.0, 11.1, grid).unwrap();
        let at = |i: usize, j: usize| points[i * grid as usize + j];

        for i in 0..grid as usize {
            // Within a row the latitude is constant and longitude increases.
            for j in 1..grid as usize {
                assert!((at(i, j).lat - at(i, 0).lat).abs() < EPS);
                assert!(at(i, j).lon > at(i, j - 1).lon);
            }
        }
        for i in 1..grid as usize {
            assert!(at(i, 0).lat < at(i - 1, 0).lat);
        }
    }

    #[test]
    fn corners_span_the_requested_area() {
        let points = generate(0.0, 0.0, 111.0, 2).unwrap();
        assert!((points[0].lat - 0.5).abs() < EPS);
        assert!((points[0].lon + 0.5).abs() < EPS);
        assert!((points[3].lat + 0.5).abs() < EPS);
        assert!((points[3].lon - 0.5).abs() < EPS);
    }

    #[test]
    fn longitude_span_widens_with_latitude() {
        let equator = generate(0.0, 0.0, 10.0, 2).unwrap();
        let north = generate(60.0, 0.0, 10.0, 2).unwrap();
        let width = |p: &[Coordinate]| p[1].lon - p[0].lon;
        // cos(60°) = 0.5, so the span doubles.
        assert!((width(&north) - 2.0 * width(&equator)).abs() < 1e-6);
    }

    #[test]
    fn odd_grid_hits_the_centre() {
        let points = generate(36.0544, -112.1401, 20.0, 3).unwrap();
        assert!((points[4].lat - 36.0544).abs() < EPS);
        assert!((points[4].lon + 112.1401).abs() < EPS);
    }
}
