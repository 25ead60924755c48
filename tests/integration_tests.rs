//! End-to-end tests: the HTTP app, the HTTP backend and the search session

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use chrono::{TimeDelta, Utc};
use tower::ServiceExt;

use parkspot::api::AppState;
use parkspot::search::{Completion, HttpSearchBackend, SearchPhase};
use parkspot::{
    MapView, MockSearchService, ParkingError, ResultView, SearchSession, SearchSettings, SortKey,
    UserSpaces, from_geojson,
};

fn state(seed: u64) -> AppState {
    AppState::new(MockSearchService::with_seed(SearchSettings::instant(), seed))
}

async fn spawn_server(seed: u64) -> String {
    let app = parkspot::web::build_app(state(seed), "does-not-exist");
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn test_search_endpoint_decodes_to_spaces() {
    let app = parkspot::web::build_app(state(1), "does-not-exist");
    let body = serde_json::json!({
        "location": "Street",
        "startTime": Utc::now(),
        "endTime": Utc::now() + TimeDelta::hours(4),
    });
    let request = Request::post("/api/parking/search")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::ORIGIN, "http://localhost:5173")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    let spaces = from_geojson(&value).unwrap();
    assert!((3..=5).contains(&spaces.len()));
    assert!(spaces.iter().all(|s| s.matches_keyword("street")));
}

#[tokio::test]
async fn test_unknown_path_falls_through_to_static_files() {
    let app = parkspot::web::build_app(state(1), "does-not-exist");
    let request = Request::get("/index.html").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_session_over_http() {
    let base_url = spawn_server(8).await;
    let backend = HttpSearchBackend::new(base_url).unwrap();

    let mut session = SearchSession::default();
    session.query_mut().set_location("Angel");
    let completion = session.submit(&backend).await.unwrap();

    assert_eq!(completion, Completion::Applied);
    assert_eq!(session.phase(), SearchPhase::ResultsShown);
    assert_eq!(session.results().len(), 1);
    assert_eq!(session.results()[0].name, "Angel Central Car Park");
}

#[tokio::test]
async fn test_unreachable_backend_keeps_session_usable() {
    let backend = HttpSearchBackend::new("http://127.0.0.1:9").unwrap();
    let mut session = SearchSession::default();
    session.query_mut().set_location("London");

    let err = session.submit(&backend).await.unwrap_err();
    assert!(matches!(err, ParkingError::Search { .. }));
    assert_eq!(session.error(), Some("Failed to fetch parking spaces"));
    assert_eq!(session.phase(), SearchPhase::Idle);
}

#[tokio::test]
async fn test_search_to_map_to_reservation() {
    let service = MockSearchService::with_seed(SearchSettings::instant(), 21);
    let mut session = SearchSession::default();
    session.query_mut().set_location("London");
    session.submit(&service).await.unwrap();

    let mut view = ResultView::new();
    view.set_sort(SortKey::Cheapest);
    let listed = session.view_results(&view);
    let prices: Vec<f64> = listed.iter().map(|s| s.price).collect();
    assert!(prices.windows(2).all(|w| w[0] <= w[1]));

    let mut map = MapView::new(&Default::default(), parkspot::mock::dataset::parking_spaces());
    map.on_search_results(session.results());
    assert_eq!(map.display_points().len(), session.results().len());
    map.fly_to_space(&listed[0]);
    assert_eq!(map.view_state().zoom, 16.0);

    let mut user = UserSpaces::with_delay(std::time::Duration::ZERO);
    user.reserve(listed[0].clone()).await;
    assert!(user.is_reserved(&listed[0].id));
    assert!(user.save(listed[0].clone()));
    assert!(!user.save(listed[0].clone()));

    session.clear();
    map.on_search_cleared();
    assert!(session.results().is_empty());
    assert_eq!(map.display_points().len(), 20);
}
