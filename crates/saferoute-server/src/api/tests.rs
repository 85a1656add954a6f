use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use saferoute_core::{
    Coordinate, GeocodeError, Geocoder, HazardIndexOptions, HazardZone, HazardZoneIndex,
    PlannerConfig, PoliceStation, Route, RouteProvider, RouteProviderError, SafeRoutePlanner,
    Severity,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::{api, state::AppState};

struct StubGeocoder;

impl Geocoder for StubGeocoder {
    async fn resolve(&self, place: &str) -> Result<Coordinate, GeocodeError> {
        match place {
            "Thrissur" => Ok(Coordinate::new(10.52, 76.22).unwrap()),
            other => Err(GeocodeError::NoMatchFound(other.to_string())),
        }
    }
}

/// Straight line through the midpoint; fails for anything in the southern hemisphere.
struct StubProvider;

impl RouteProvider for StubProvider {
    async fn fetch_route(
        &self,
        start: Coordinate,
        end: Coordinate,
    ) -> Result<Route, RouteProviderError> {
        if start.lat() < 0.0 {
            return Err(RouteProviderError::ServiceUnavailable("stub outage".to_string()));
        }
        let mid = Coordinate::new(
            (start.lat() + end.lat()) / 2.0,
            (start.lon() + end.lon()) / 2.0,
        )
        .unwrap();
        Ok(Route::new(vec![start, mid, end]))
    }
}

fn setup_app_with_stations(stations: Vec<PoliceStation>) -> (axum::Router, Arc<AppState>) {
    let hazards = Arc::new(
        HazardZoneIndex::new(
            vec![HazardZone::new(
                Coordinate::new(10.55, 76.25).unwrap(),
                500.0,
                Severity::High,
            )
            .with_id("flood-1")],
            HazardIndexOptions::default(),
        )
        .unwrap(),
    );
    let planner = SafeRoutePlanner::new(StubGeocoder, StubProvider, hazards.clone()).with_config(
        PlannerConfig {
            perturbation_seed: Some(7),
            ..PlannerConfig::default()
        },
    );
    let state = Arc::new(AppState::new(Arc::new(planner), hazards, stations));
    let app = api::routes().with_state(state.clone());
    (app, state)
}

fn setup_app() -> (axum::Router, Arc<AppState>) {
    setup_app_with_stations(saferoute_core::stations::builtin_stations())
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse json")
}

fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn plans_safe_route_from_place_and_coordinate() {
    let (app, _state) = setup_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/v1/routes/plan",
            json!({ "start": { "lat": 10.50, "lon": 76.20 }, "end": "Thrissur" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["status"], "safe");
    assert_eq!(body["attempts"], 1);
    let points = body["route"]["points"].as_array().expect("route points");
    assert_eq!(points.len(), 3);
    assert_eq!(points[2]["lat"], 10.52);
    assert!(body.get("message").is_none());
}

#[tokio::test]
async fn route_through_hazard_is_unsafe_after_all_attempts() {
    let (app, _state) = setup_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/v1/routes/plan",
            json!({
                "start": { "lat": 10.54, "lon": 76.24 },
                "end": { "latitude": 10.56, "longitude": 76.26 }
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["status"], "unsafe");
    assert_eq!(body["attempts"], 5);
    assert!(body.get("route").is_none());
    assert!(body["message"].as_str().unwrap().contains("5 attempts"));
}

#[tokio::test]
async fn unknown_place_is_geocoding_failure() {
    let (app, _state) = setup_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/v1/routes/plan",
            json!({ "start": "zzzqqqnowhere", "end": "Thrissur" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = read_json(response).await;
    assert_eq!(body["status"], "geocoding_failed");
    assert_eq!(body["attempts"], 0);
    assert!(body["message"].as_str().unwrap().contains("start"));
}

#[tokio::test]
async fn malformed_plan_body_is_bad_request() {
    let (app, _state) = setup_app();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/routes/plan",
            json!({ "start": { "lat": 120, "lon": 76 }, "end": "Thrissur" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("start"));

    let response = app
        .oneshot(json_request("POST", "/v1/routes/plan", json!({ "start": "Thrissur" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn provider_outage_is_bad_gateway() {
    let (app, _state) = setup_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/v1/routes/plan",
            json!({ "start": { "lat": -10.0, "lon": 76.0 }, "end": "Thrissur" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body = read_json(response).await;
    assert_eq!(body["status"], "route_provider_failed");
    assert_eq!(body["attempts"], 1);
}

#[tokio::test]
async fn lists_and_checks_hazards() {
    let (app, _state) = setup_app();

    let response = app.clone().oneshot(get_request("/v1/hazards")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["severity"], "high");

    let response = app
        .clone()
        .oneshot(get_request("/v1/hazards/check?lat=10.551&lon=76.25"))
        .await
        .unwrap();
    let body = read_json(response).await;
    assert_eq!(body["inside_hazard"], true);
    assert_eq!(body["zones"][0]["id"], "flood-1");

    let response = app
        .clone()
        .oneshot(get_request("/v1/hazards/check?lat=10.0&lon=76.0"))
        .await
        .unwrap();
    let body = read_json(response).await;
    assert_eq!(body["inside_hazard"], false);
    assert!(body["zones"].as_array().unwrap().is_empty());

    let response = app
        .oneshot(get_request("/v1/hazards/check?lat=95.0&lon=76.0"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn finds_nearest_police_station() {
    let (app, _state) = setup_app();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/police/nearest",
            json!({ "latitude": 10.47, "longitude": 76.24 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["name"], "Ollur Police Station");
    let distance = body["distance"].as_str().unwrap();
    assert!(distance.ends_with(" km"));
    assert_eq!(distance.split('.').nth(1).unwrap().len(), "xx km".len());

    let response = app
        .oneshot(json_request(
            "POST",
            "/v1/police/nearest",
            json!({ "latitude": 10.47 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn no_police_stations_is_not_found() {
    let (app, _state) = setup_app_with_stations(Vec::new());

    let response = app
        .oneshot(json_request(
            "POST",
            "/v1/police/nearest",
            json!({ "latitude": 10.47, "longitude": 76.24 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn incident_lifecycle() {
    let (app, state) = setup_app();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/v1/incidents",
            json!({
                "userId": "alice",
                "incidentType": "Flood",
                "description": "Road under water",
                "location": { "latitude": 10.5276, "longitude": 76.2144 },
                "severity": "red"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = read_json(response).await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["severity"], "high");
    assert_eq!(created["upvotes"], 0);

    let response = app.clone().oneshot(get_request("/v1/incidents")).await.unwrap();
    let listed = read_json(response).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let vote_uri = format!("/v1/incidents/{}/vote", id);
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &vote_uri,
            json!({ "userId": "bob", "voteType": "upvote" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["upvotes"], 1);

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            &vote_uri,
            json!({ "userId": "bob", "voteType": "downvote" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let delete_uri = format!("/v1/incidents/{}", id);
    let response = app
        .clone()
        .oneshot(json_request("DELETE", &delete_uri, json!({ "userId": "bob" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(json_request("DELETE", &delete_uri, json!({ "userId": "alice" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(state.incidents().is_empty());

    let response = app
        .oneshot(json_request(
            "POST",
            &vote_uri,
            json!({ "userId": "carol", "voteType": "upvote" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn rejects_incident_without_reporter() {
    let (app, _state) = setup_app();

    let response = app
        .oneshot(json_request(
            "POST",
            "/v1/incidents",
            json!({
                "userId": " ",
                "incidentType": "Fire",
                "location": { "lat": 10.5, "lon": 76.2 }
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
