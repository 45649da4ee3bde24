//! In-process stand-in for the StratoPipe backend used by the unit tests.
//!
//! Every request is recorded; responses come from a fixed route table keyed
//! by method and path (query strings are ignored for matching).

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::extract::{Request, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Router;
use parking_lot::Mutex;

use crate::client::ApiClient;
use crate::config::ClientConfig;
use crate::credentials::{CredentialProvider, MemoryCredentials};
use crate::models::StoredImage;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("request body is not JSON")
    }
}

#[derive(Debug, Clone)]
pub struct MockRoute {
    method: Method,
    path: String,
    status: StatusCode,
    body: String,
    headers: Vec<(String, String)>,
}

impl MockRoute {
    pub fn new(method: Method, path: &str, status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            method,
            path: path.to_string(),
            status,
            body: body.into(),
            headers: Vec::new(),
        }
    }

    pub fn json(method: Method, path: &str, body: serde_json::Value) -> Self {
        Self::new(method, path, StatusCode::OK, body.to_string())
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

struct MockState {
    routes: Vec<MockRoute>,
    requests: Mutex<Vec<RecordedRequest>>,
}

pub struct MockServer {
    pub origin: String,
    state: Arc<MockState>,
}

impl MockServer {
    pub async fn start(routes: Vec<MockRoute>) -> Self {
        let state = Arc::new(MockState {
            routes,
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new().fallback(handle).with_state(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind mock server");
        let addr = listener.local_addr().expect("mock server has no address");
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            origin: format!("http://{}", addr),
            state,
        }
    }

    pub fn base_url(&self) -> String {
        format!("{}/api/", self.origin)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().clone()
    }

    pub fn hits(&self, path: &str) -> usize {
        self.state
            .requests
            .lock()
            .iter()
            .filter(|r| r.path == path)
            .count()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests().pop().expect("no request recorded")
    }

    /// Client against this server with in-memory credentials
    pub fn client(&self, credentials: Arc<dyn CredentialProvider>) -> ApiClient {
        ApiClient::builder(ClientConfig::default().with_base_url(self.base_url()))
            .credentials(credentials)
            .build()
            .expect("failed to build client")
    }

    pub fn anonymous_client(&self) -> ApiClient {
        self.client(Arc::new(MemoryCredentials::new()))
    }
}

async fn handle(State(state): State<Arc<MockState>>, request: Request) -> Response {
    let (parts, body) = request.into_parts();
    let body = to_bytes(body, usize::MAX).await.unwrap_or_default();
    let path = parts.uri.path().to_string();

    state.requests.lock().push(RecordedRequest {
        method: parts.method.clone(),
        path: path.clone(),
        query: parts.uri.query().map(str::to_string),
        headers: parts.headers.clone(),
        body: body.to_vec(),
    });

    let route = state
        .routes
        .iter()
        .find(|r| r.method == parts.method && r.path == path);

    match route {
        Some(route) => {
            let mut builder = Response::builder()
                .status(route.status)
                .header("content-type", "application/json");
            for (name, value) in &route.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            builder
                .body(Body::from(route.body.clone()))
                .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
        }
        None => (StatusCode::NOT_FOUND, r#"{"detail": "Not found."}"#).into_response(),
    }
}

pub fn stored_image(id: i64, name: &str, categories: &str) -> StoredImage {
    StoredImage {
        id,
        name: name.to_string(),
        description: String::new(),
        categories: categories.to_string(),
        ai_enhanced: false,
        is_rendered: true,
        created_at: "2024-05-01T10:00:00Z".to_string(),
        updated_at: "2024-05-01T10:00:00Z".to_string(),
        image_url: format!("/media/images/{}.png", id),
        thumbnail_url: format!("/media/images/{}_thumb.png", id),
    }
}
