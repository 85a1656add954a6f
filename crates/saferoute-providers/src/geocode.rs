//! Forward geocoding via the OpenRouteService (Pelias) search API.

use saferoute_core::{Coordinate, GeocodeError, Geocoder};
use serde::Deserialize;

use crate::client::{describe_transport_error, OrsClient};

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    features: Vec<GeocodeFeature>,
}

#[derive(Debug, Deserialize)]
struct GeocodeFeature {
    geometry: PointGeometry,
    #[serde(default)]
    properties: Option<FeatureProperties>,
}

#[derive(Debug, Deserialize)]
struct PointGeometry {
    /// GeoJSON order: [lon, lat]
    coordinates: [f64; 2],
}

#[derive(Debug, Deserialize)]
struct FeatureProperties {
    #[serde(default)]
    label: Option<String>,
}

/// Resolves place text to the top-ranked match.
#[derive(Debug, Clone)]
pub struct OrsGeocoder {
    client: OrsClient,
}

impl OrsGeocoder {
    pub fn new(client: OrsClient) -> Self {
        Self { client }
    }
}

impl Geocoder for OrsGeocoder {
    async fn resolve(&self, place: &str) -> Result<Coordinate, GeocodeError> {
        let url = self.client.url("/geocode/search");
        let mut query = vec![("text", place), ("size", "1")];
        if !self.client.api_key.is_empty() {
            query.push(("api_key", self.client.api_key.as_str()));
        }

        let response = self
            .client
            .client
            .get(&url)
            .header("Accept", "application/json")
            .query(&query)
            .send()
            .await
            .map_err(|err| GeocodeError::ServiceUnavailable(describe_transport_error(&err)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| GeocodeError::ServiceUnavailable(describe_transport_error(&err)))?;

        if !status.is_success() {
            tracing::warn!("Geocode request for '{}' failed: {} {}", place, status, body);
            return Err(GeocodeError::ServiceUnavailable(format!(
                "geocoder returned {}",
                status
            )));
        }

        parse_geocode_response(place, &body)
    }
}

pub(crate) fn parse_geocode_response(place: &str, body: &str) -> Result<Coordinate, GeocodeError> {
    let payload: GeocodeResponse = serde_json::from_str(body).map_err(|err| {
        GeocodeError::ServiceUnavailable(format!("unparseable geocoder response: {}", err))
    })?;

    let Some(feature) = payload.features.into_iter().next() else {
        return Err(GeocodeError::NoMatchFound(place.to_string()));
    };

    let [lon, lat] = feature.geometry.coordinates;
    let coordinate = Coordinate::new(lat, lon).map_err(|err| {
        GeocodeError::ServiceUnavailable(format!("geocoder returned invalid coordinate: {}", err))
    })?;

    let label = feature
        .properties
        .and_then(|props| props.label)
        .unwrap_or_default();
    tracing::debug!("Geocoded '{}' -> {} {}", place, coordinate, label);

    Ok(coordinate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support::{closed_port_url, serve_once};
    use crate::client::OrsConfig;

    const THRISSUR: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [76.2144, 10.5276]},
                "properties": {"label": "Thrissur, KL, India"}
            },
            {
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [76.0, 10.0]},
                "properties": {"label": "Somewhere else"}
            }
        ]
    }"#;

    #[test]
    fn takes_top_ranked_feature() {
        let coordinate = parse_geocode_response("Thrissur", THRISSUR).unwrap();
        assert_eq!(coordinate, Coordinate::new(10.5276, 76.2144).unwrap());
    }

    #[test]
    fn zero_features_is_no_match() {
        let body = r#"{"type": "FeatureCollection", "features": []}"#;
        assert_eq!(
            parse_geocode_response("zzzqqqnowhere", body),
            Err(GeocodeError::NoMatchFound("zzzqqqnowhere".to_string()))
        );
    }

    #[test]
    fn garbage_body_is_service_error() {
        assert!(matches!(
            parse_geocode_response("x", "<html>bad gateway</html>"),
            Err(GeocodeError::ServiceUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn resolves_over_http() {
        let (base_url, server) = serve_once(200, THRISSUR).await;
        let client = OrsClient::new(OrsConfig::new("test-key").with_base_url(base_url)).unwrap();
        let geocoder = OrsGeocoder::new(client);

        let coordinate = geocoder.resolve("Thrissur").await.unwrap();
        assert_eq!(coordinate.lat(), 10.5276);

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /geocode/search?"));
        assert!(request.contains("text=Thrissur"));
        assert!(request.contains("size=1"));
        assert!(request.contains("api_key=test-key"));
    }

    #[tokio::test]
    async fn server_error_is_service_unavailable() {
        let (base_url, _server) = serve_once(503, r#"{"error": "down"}"#).await;
        let client = OrsClient::new(OrsConfig::new("k").with_base_url(base_url)).unwrap();

        let result = OrsGeocoder::new(client).resolve("Thrissur").await;
        assert!(matches!(result, Err(GeocodeError::ServiceUnavailable(_))));
    }

    #[tokio::test]
    async fn connection_refused_is_service_unavailable() {
        let client =
            OrsClient::new(OrsConfig::new("k").with_base_url(closed_port_url().await)).unwrap();

        let result = OrsGeocoder::new(client).resolve("Thrissur").await;
        assert!(matches!(result, Err(GeocodeError::ServiceUnavailable(_))));
    }
}
