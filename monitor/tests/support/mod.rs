//! Local HTTP stub for exercising the real clients.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::{
    Router,
    body::Bytes,
    extract::State,
    http::{Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};

#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub body: String,
}

#[derive(Clone, Debug)]
pub struct StubResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl StubResponse {
    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "text/plain; charset=utf-8",
            body: body.as_bytes().to_vec(),
        }
    }

    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "application/json",
            body: body.as_bytes().to_vec(),
        }
    }
}

type Route = Arc<dyn Fn(&str) -> StubResponse + Send + Sync>;

#[derive(Clone)]
struct StubState {
    route: Route,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

pub struct Stub {
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl Stub {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

/// Answers every request with `route(path)` until the test ends.
pub async fn spawn_stub<F>(route: F) -> Stub
where
    F: Fn(&str) -> StubResponse + Send + Sync + 'static,
{
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = StubState {
        route: Arc::new(route),
        requests: Arc::clone(&requests),
    };

    let app = Router::new().fallback(respond).with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Stub {
        base_url: format!("http://{addr}"),
        requests,
    }
}

/// Records the request before answering so callers observe it once their call returns.
async fn respond(
    State(state): State<StubState>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    let resp = (state.route)(&path);

    state.requests.lock().unwrap().push(RecordedRequest {
        method: method.to_string(),
        path,
        body: String::from_utf8_lossy(&body).to_string(),
    });

    let status = StatusCode::from_u16(resp.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, [(header::CONTENT_TYPE, resp.content_type)], resp.body).into_response()
}
