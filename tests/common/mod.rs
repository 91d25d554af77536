//! Local stand-in for the eBird API used by the integration tests

#![allow(dead_code)]

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri};
use lifers::config::{ApiConfig, LifersConfig};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const TEST_TOKEN: &str = "test-token";

/// Canned responses keyed by request path, plus a log of requests
#[derive(Default)]
pub struct MockEbird {
    routes: HashMap<String, (u16, String)>,
    requests: Mutex<Vec<String>>,
    tokens: Mutex<Vec<Option<String>>>,
}

impl MockEbird {
    /// Paths with query strings, in arrival order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn tokens(&self) -> Vec<Option<String>> {
        self.tokens.lock().unwrap().clone()
    }

    pub fn count_matching(&self, prefix: &str) -> usize {
        self.requests()
            .iter()
            .filter(|request| request.starts_with(prefix))
            .count()
    }
}

async fn respond(
    State(mock): State<Arc<MockEbird>>,
    uri: Uri,
    headers: HeaderMap,
) -> (StatusCode, String) {
    let path_and_query = uri
        .path_and_query()
        .map(|pq| pq.to_string())
        .unwrap_or_else(|| uri.path().to_string());
    mock.requests.lock().unwrap().push(path_and_query);

    let token = headers
        .get("X-eBirdApiToken")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    mock.tokens.lock().unwrap().push(token.clone());

    if token.as_deref() != Some(TEST_TOKEN) {
        return (StatusCode::FORBIDDEN, String::new());
    }

    match mock.routes.get(uri.path()) {
        Some((status, body)) => (
            StatusCode::from_u16(*status).unwrap(),
            body.clone(),
        ),
        None => (StatusCode::NOT_FOUND, String::new()),
    }
}

/// Start a mock server answering `routes` as `(path, status, body)`
///
/// Returns the base URL (ending in `/v2`) and the shared mock state.
pub async fn spawn_mock(routes: &[(&str, u16, &str)]) -> (String, Arc<MockEbird>) {
    let mock = Arc::new(MockEbird {
        routes: routes
            .iter()
            .map(|(path, status, body)| (format!("/v2{}", path), (*status, body.to_string())))
            .collect(),
        ..Default::default()
    });

    let app = Router::new().fallback(respond).with_state(mock.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/v2", addr), mock)
}

pub fn api_config(base_url: &str) -> ApiConfig {
    ApiConfig {
        base_url: base_url.to_string(),
        token: Some(TEST_TOKEN.to_string()),
        timeout_secs: 5,
        ..ApiConfig::default()
    }
}

pub fn lifers_config(base_url: &str) -> LifersConfig {
    LifersConfig::default()
        .with_base_url(base_url)
        .with_token(TEST_TOKEN)
        .with_max_concurrent_requests(4)
}

/// JSON observation as the eBird API returns it
pub fn observation_json(
    species_code: &str,
    com_name: &str,
    loc_name: &str,
    lat: f64,
    lng: f64,
) -> String {
    format!(
        r#"{{"speciesCode":"{}","comName":"{}","sciName":"{} sci","locId":"L{}","locName":"{}","obsDt":"2023-08-20 08:00","howMany":1,"lat":{},"lng":{},"obsValid":true,"obsReviewed":false,"locationPrivate":false,"subId":"S1"}}"#,
        species_code,
        com_name,
        com_name,
        loc_name.len(),
        loc_name,
        lat,
        lng
    )
}

pub fn json_array(items: &[String]) -> String {
    format!("[{}]", items.join(","))
}
