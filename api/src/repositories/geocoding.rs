use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::errors::AppError;
use crate::validation::validate_coordinates;

/// One geocoding hit, already parsed into numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub lat: f64,
    pub lon: f64,
    pub display_name: String,
}

/// Where a request is centred.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
    pub name: String,
}

/// How the caller identified the area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationQuery<'a> {
    Text(&'a str),
    Coordinates { lat: f64, lon: f64 },
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Candidates for a free-text place name, best match first.
    async fn search(&self, query: &str) -> Result<Vec<Place>, AppError>;
}

#[derive(Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
    display_name: String,
}

/// Client for a Nominatim-compatible `/search` endpoint.
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl Geocoder for NominatimGeocoder {
    async fn search(&self, query: &str) -> Result<Vec<Place>, AppError> {
        let resp = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::Upstream(format!("geocoding returned HTTP {}", status.as_u16())));
        }

        let hits: Vec<SearchHit> = resp
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("malformed geocoding response: {}", e.without_url())))?;

        // Only the best match is used; later candidates are never parsed.
        hits.into_iter()
            .take(1)
            .map(|hit| {
                let lat = parse_degrees(&hit.lat)?;
                let lon = parse_degrees(&hit.lon)?;
                Ok(Place { lat, lon, display_name: hit.display_name })
            })
            .collect()
    }
}

fn parse_degrees(raw: &str) -> Result<f64, AppError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| AppError::Upstream(format!("geocoding returned non-numeric coordinate '{raw}'")))
}

/// Turn a location query into a centre point and display name.
///
/// Text queries use the first candidate only. Explicit coordinates pass
/// through with a synthesized name.
pub async fn resolve(geocoder: &dyn Geocoder, query: LocationQuery<'_>) -> Result<Location, AppError> {
    match query {
        LocationQuery::Text(text) => {
            let place = geocoder
                .search(text)
                .await?
                .into_iter()
                .next()
                .ok_or_else(|| AppError::NotFound("Location not found".to_string()))?;
            validate_coordinates(place.lat, place.lon).map_err(|err| match err {
                AppError::Validation(msg) => AppError::Upstream(format!("geocoding returned bad centre: {msg}")),
                other => other,
            })?;
            Ok(Location {
                lat: place.lat,
                lon: place.lon,
                name: place.display_name,
            })
        }
        LocationQuery::Coordinates { lat, lon } => {
            validate_coordinates(lat, lon)?;
            Ok(Location { lat, lon, name: coordinate_name(lat, lon) })
        }
    }
}

pub fn coordinate_name(lat: f64, lon: f64) -> String {
    format!("{lat:.4}, {lon:.4}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn geocoder(server: &MockServer) -> NominatimGeocoder {
        NominatimGeocoder::new(Client::new(), &server.uri())
    }

    #[tokio::test]
    async fn first_candidate_wins() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "Grand Canyon"))
            .and(query_param("format", "json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"lat": "36.0544", "lon": "-112.1401", "display_name": "Grand Canyon, Arizona"},
                {"lat": "1.0", "lon": "2.0", "display_name": "Somewhere else"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let location = resolve(&geocoder(&server), LocationQuery::Text("Grand Canyon")).await.unwrap();
        assert_eq!(location.lat, 36.0544);
        assert_eq!(location.lon, -112.1401);
        assert_eq!(location.name, "Grand Canyon, Arizona");
    }

    #[tokio::test]
    async fn zero_candidates_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let err = resolve(&geocoder(&server), LocationQuery::Text("Nowhere at all")).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref msg) if msg == "Location not found"));
    }

    #[tokio::test]
    async fn non_success_status_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = resolve(&geocoder(&server), LocationQuery::Text("Paris")).await.unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
    }

    #[tokio::test]
    async fn malformed_candidate_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"lat": "north", "lon": "2.0", "display_name": "Broken"}
            ])))
            .mount(&server)
            .await;

        let err = resolve(&geocoder(&server), LocationQuery::Text("Broken")).await.unwrap_err();
        assert!(matches!(err, AppError::Upstream(_)));
    }

    #[tokio::test]
    async fn malformed_later_candidate_is_ignored() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"lat": "46.8523", "lon": "-121.7603", "display_name": "Mount Rainier"},
                {"lat": "", "lon": "east", "display_name": "Broken"}
            ])))
            .mount(&server)
            .await;

        let location = resolve(&geocoder(&server), LocationQuery::Text("Mount Rainier")).await.unwrap();
        assert_eq!(location.lat, 46.8523);
        assert_eq!(location.name, "Mount Rainier");
    }

    #[tokio::test]
    async fn out_of_range_candidate_is_upstream_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"lat": "95.0", "lon": "10.0", "display_name": "Beyond the pole"}
            ])))
            .mount(&server)
            .await;

        let err = resolve(&geocoder(&server), LocationQuery::Text("Beyond")).await.unwrap_err();
        assert!(matches!(err, AppError::Upstream(ref msg) if msg.contains("Latitude")), "{err}");
    }

    #[tokio::test]
    async fn explicit_coordinates_skip_the_geocoder() {
        // No mocks mounted: any request would fail with 404 → Upstream.
        let server = MockServer::start().await;
        let location = resolve(
            &geocoder(&server),
            LocationQuery::Coordinates { lat: 36.0544, lon: -112.1401 },
        )
        .await
        .unwrap();

        assert_eq!(location.name, "36.0544, -112.1401");
        assert!(server.received_requests().await.unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn out_of_range_coordinates_are_rejected() {
        let server = MockServer::start().await;
        let err = resolve(&geocoder(&server), LocationQuery::Coordinates { lat: 95.0, lon: 0.0 })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
