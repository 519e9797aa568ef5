//! Integration tests for the simulation API endpoints.
//!
//! Tests use Axum's `Router` directly via `tower::ServiceExt` without
//! starting a TCP server. The population raster is an in-memory grid and
//! external lookups are disabled or pointed at a local listener, so no
//! network access is needed.

#![allow(clippy::unwrap_used, clippy::float_cmp)]

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use meteocraft_exposure::{GeoTransform, InMemoryRaster, RasterInfo};
use meteocraft_sbdb::presets::Preset;
use meteocraft_sbdb::{AsteroidLookup, PresetCatalog, SbdbClient, ScenarioResolver};
use meteocraft_server::router::build_router;
use meteocraft_server::state::AppState;
use serde_json::{Value, json};
use tower::ServiceExt;

const NODATA: f64 = -9999.0;

/// 200 x 200 cells of 0.01 degrees over [-1, 1] x [-1, 1], 10 people each.
fn test_raster() -> InMemoryRaster {
    let info = RasterInfo {
        width: 200,
        height: 200,
        transform: GeoTransform {
            origin_lon: -1.0,
            origin_lat: 1.0,
            cell_width: 0.01,
            cell_height: 0.01,
        },
        nodata: Some(NODATA),
    };
    InMemoryRaster::new(info, vec![10.0; 40_000]).unwrap()
}

fn make_state_with(presets: PresetCatalog, static_dir: &Path) -> Arc<AppState> {
    make_state_with_lookup(presets, AsteroidLookup::Disabled, static_dir)
}

fn make_state_with_lookup(
    presets: PresetCatalog,
    lookup: AsteroidLookup,
    static_dir: &Path,
) -> Arc<AppState> {
    let resolver = ScenarioResolver::new(presets, lookup);
    Arc::new(AppState::new(resolver, Arc::new(test_raster()), static_dir).unwrap())
}

fn make_test_state() -> Arc<AppState> {
    make_state_with(PresetCatalog::default(), Path::new("static"))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn simulate_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/simulate")
        .header("content-type", "application/json")
        .body(Body::from(body.to_owned()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn assert_close(value: &Value, expected: f64) {
    let actual = value.as_f64().unwrap();
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

// =========================================================================
// POST /simulate -- client errors
// =========================================================================

#[tokio::test]
async fn missing_lat_returns_exact_payload() {
    let app = build_router(make_test_state());
    let resp = app
        .oneshot(simulate_request(r#"{"lon": -74.08}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(resp.into_body()).await;
    assert_eq!(json, json!({"error": "Faltan latitud o longitud"}));
}

#[tokio::test]
async fn null_lon_returns_exact_payload() {
    let app = build_router(make_test_state());
    let resp = app
        .oneshot(simulate_request(r#"{"lat": 4.6, "lon": null}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(resp.into_body()).await;
    assert_eq!(json, json!({"error": "Faltan latitud o longitud"}));
}

#[tokio::test]
async fn empty_object_returns_exact_payload() {
    let app = build_router(make_test_state());
    let resp = app.oneshot(simulate_request("{}")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(resp.into_body()).await;
    assert_eq!(json["error"], "Faltan latitud o longitud");
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let app = build_router(make_test_state());
    let resp = app
        .oneshot(simulate_request(r#"{"lat": "north", "lon": 1.0}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(resp.into_body()).await;
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn out_of_range_coordinates_are_bad_request() {
    let app = build_router(make_test_state());
    let resp = app
        .oneshot(simulate_request(r#"{"lat": 91.0, "lon": 0.0}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(resp.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("latitude"));
}

// =========================================================================
// POST /simulate -- success
// =========================================================================

#[tokio::test]
async fn default_asteroid_uses_preset_values() {
    let app = build_router(make_test_state());
    let resp = app
        .oneshot(simulate_request(r#"{"lat": 0.0, "lon": 0.0}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_to_json(resp.into_body()).await;
    assert_close(&json["diameter_m"], 800.0);
    assert_close(&json["energy_megatons"], 21_600.0);
    assert_close(&json["crater_diameter_km"], 51.895_421_705_667_694);
    assert_close(&json["shockwave_radius_km"], 97.473_365_505_868_34);
    assert_close(&json["earthquake_magnitude"], 7.500_550_436_096_801);
    assert_close(&json["thermal_radius_km"], 440.908_153_700_972_1);
    // A 220 km footprint covers the whole 2 x 2 degree grid.
    assert_eq!(json["population_density"], 400_000);
}

#[tokio::test]
async fn failed_lookup_uses_fallback_values() {
    let app = build_router(make_test_state());
    let resp = app
        .oneshot(simulate_request(
            r#"{"lat": 0.0, "lon": 0.0, "asteroid_name": "Apophis"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_to_json(resp.into_body()).await;
    assert_close(&json["diameter_m"], 500.0);
    assert_close(&json["energy_megatons"], 1000.0);
    assert_close(&json["shockwave_radius_km"], 35.0);
    assert_close(&json["crater_diameter_km"], 21.020_480_926_670_5);
    assert_close(&json["earthquake_magnitude"], 6.606_466_422_825_677);
    assert_close(&json["thermal_radius_km"], 94.868_329_805_051_37);

    // ~47 km radius disk: about 5 700 cells of 10 people.
    let population = json["population_density"].as_u64().unwrap();
    assert!((55_000..=60_000).contains(&population), "got {population}");
}

#[tokio::test]
async fn timed_out_lookup_uses_fallback_values() {
    // Connections queue in the backlog but nothing ever answers.
    let silent = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/sbdb.api", silent.local_addr().unwrap());
    let client = SbdbClient::new(url, Duration::from_millis(200)).unwrap();
    let state = make_state_with_lookup(
        PresetCatalog::default(),
        AsteroidLookup::Sbdb(client),
        Path::new("static"),
    );

    let resp = build_router(state)
        .oneshot(simulate_request(
            r#"{"lat": 0.0, "lon": 0.0, "asteroid_name": "Apophis"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_to_json(resp.into_body()).await;
    assert_close(&json["diameter_m"], 500.0);
    assert_close(&json["energy_megatons"], 1000.0);
    assert_close(&json["thermal_radius_km"], 94.868_329_805_051_37);
    drop(silent);
}

#[tokio::test]
async fn polar_impacts_are_answered() {
    for body in [
        r#"{"lat": 90.0, "lon": 0.0}"#,
        r#"{"lat": -90.0, "lon": 180.0, "asteroid_name": "Apophis"}"#,
    ] {
        let resp = build_router(make_test_state())
            .oneshot(simulate_request(body))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK, "{body}");
        let json = body_to_json(resp.into_body()).await;
        assert_eq!(json["population_density"], 0);
    }
}

#[tokio::test]
async fn blank_name_means_default_asteroid() {
    let app = build_router(make_test_state());
    let resp = app
        .oneshot(simulate_request(
            r#"{"lat": 0.0, "lon": 0.0, "asteroid_name": "  "}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_to_json(resp.into_body()).await;
    assert_close(&json["energy_megatons"], 21_600.0);
}

#[tokio::test]
async fn impact_outside_raster_exposes_nobody() {
    let app = build_router(make_test_state());
    let resp = app
        .oneshot(simulate_request(r#"{"lat": -30.0, "lon": -140.0}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_to_json(resp.into_body()).await;
    assert_eq!(json["population_density"], 0);
}

#[tokio::test]
async fn identical_requests_give_identical_responses() {
    let state = make_test_state();
    let body = r#"{"lat": 0.25, "lon": -0.4, "asteroid_name": "Bennu"}"#;

    let first = build_router(Arc::clone(&state))
        .oneshot(simulate_request(body))
        .await
        .unwrap();
    let second = build_router(state)
        .oneshot(simulate_request(body))
        .await
        .unwrap();

    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(
        body_to_json(first.into_body()).await,
        body_to_json(second.into_body()).await
    );
}

#[tokio::test]
async fn response_has_exactly_the_documented_fields() {
    let app = build_router(make_test_state());
    let resp = app
        .oneshot(simulate_request(r#"{"lat": 0.5, "lon": 0.5}"#))
        .await
        .unwrap();

    let json = body_to_json(resp.into_body()).await;
    let mut keys: Vec<&str> = json
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        vec![
            "crater_diameter_km",
            "diameter_m",
            "earthquake_magnitude",
            "energy_megatons",
            "population_density",
            "shockwave_radius_km",
            "thermal_radius_km",
        ]
    );
}

#[tokio::test]
async fn unparseable_scenario_is_unprocessable() {
    let broken = Preset {
        name: "Broken",
        diameter: "unknown km",
        impact_velocity: "15 km/s",
        impact_probability: 0.0,
        energy_megatons: 10.0,
        mass_kg: 0.0,
        candidate_impact_dates: &[],
    };
    let state = make_state_with(PresetCatalog::new(vec![broken]), Path::new("static"));
    let resp = build_router(state)
        .oneshot(simulate_request(
            r#"{"lat": 0.0, "lon": 0.0, "asteroid_name": "Broken"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_to_json(resp.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("diameter"));
}

// =========================================================================
// Pages, scenario and static assets
// =========================================================================

#[tokio::test]
async fn index_returns_html() {
    let app = build_router(make_test_state());
    let resp = app.oneshot(get("/")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_to_string(resp.into_body()).await;
    assert!(html.contains("Meteocraft"));
    assert!(html.contains("/meteorito"));
}

#[tokio::test]
async fn simulator_page_shows_placeholders() {
    let app = build_router(make_test_state());
    let resp = app.oneshot(get("/meteorito")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_to_string(resp.into_body()).await;
    assert!(html.contains("No disponible"));
    assert!(html.contains("Impactor 2025"));
    assert!(html.contains("/static/simulator.js"));
}

#[tokio::test]
async fn scenario_endpoint_reports_source() {
    let state = make_test_state();

    let resp = build_router(Arc::clone(&state))
        .oneshot(get("/api/scenario"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_to_json(resp.into_body()).await;
    assert_eq!(json["asteroid_name"], "Impactor 2025");
    assert_eq!(json["source"], "preset");
    assert_eq!(json["candidate_impact_dates"], json!(["2025-10-04", "2025-10-06"]));

    let resp = build_router(state)
        .oneshot(get("/api/scenario?asteroid_name=Bennu"))
        .await
        .unwrap();
    let json = body_to_json(resp.into_body()).await;
    assert_eq!(json["asteroid_name"], "Bennu");
    assert_eq!(json["source"], "fallback");
    assert_eq!(json["diameter"], ".5 km");
}

#[tokio::test]
async fn static_assets_are_served() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("simulator.js"), "console.log('ok');").unwrap();
    let state = make_state_with(PresetCatalog::default(), dir.path());

    let resp = build_router(Arc::clone(&state))
        .oneshot(get("/static/simulator.js"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_to_string(resp.into_body()).await, "console.log('ok');");

    let resp = build_router(state)
        .oneshot(get("/static/missing.js"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = build_router(make_test_state());
    let resp = app.oneshot(get("/api/unknown")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
