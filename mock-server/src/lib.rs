use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Path, RawQuery, State},
    http::{HeaderMap, Method, StatusCode},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Response envelope: `code` 0 means success and `data` holds the payload.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Envelope {
    pub code: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Envelope {
    pub fn ok(data: Value) -> Self {
        Self {
            code: 0,
            data: Some(data),
        }
    }
}

/// What `/echo` saw of the request.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub headers: BTreeMap<String, Vec<String>>,
    pub query: Option<String>,
    pub body: String,
}

/// Number of requests served, excluding `/hits` itself.
pub type Hits = Arc<AtomicU64>;

pub fn app() -> Router {
    let hits: Hits = Arc::new(AtomicU64::new(0));
    Router::new()
        .route("/stock", get(stock))
        .route("/session-expired", get(session_expired))
        .route("/no-access", get(no_access))
        .route("/malformed", get(malformed))
        .route("/fragment", get(fragment))
        .route("/internal-error", any(internal_error))
        .route("/empty", get(empty))
        .route("/blank", get(blank))
        .route("/padded/{bytes}", get(padded))
        .route("/envelope/{code}", get(envelope))
        .route("/echo", any(echo))
        .route("/hits", get(hit_count))
        .with_state(hits)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn count(hits: &Hits) {
    hits.fetch_add(1, Ordering::SeqCst);
}

async fn stock(State(hits): State<Hits>) -> Json<Envelope> {
    count(&hits);
    Json(Envelope::ok(json!({
        "id": "42",
        "symbol": "ACME",
        "price": "12.50"
    })))
}

async fn session_expired(State(hits): State<Hits>) -> Json<Envelope> {
    count(&hits);
    Json(Envelope {
        code: -2,
        data: Some(json!({})),
    })
}

async fn no_access(State(hits): State<Hits>) -> Json<Envelope> {
    count(&hits);
    Json(Envelope {
        code: -3,
        data: None,
    })
}

async fn malformed(State(hits): State<Hits>) -> (StatusCode, &'static str) {
    count(&hits);
    (StatusCode::OK, "{\"code\": 0, \"data\": ")
}

async fn fragment(State(hits): State<Hits>) -> Json<Value> {
    count(&hits);
    Json(json!("not an object"))
}

async fn internal_error(State(hits): State<Hits>) -> StatusCode {
    count(&hits);
    tracing::debug!("answering 500 with no body");
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn empty(State(hits): State<Hits>) -> StatusCode {
    count(&hits);
    StatusCode::NO_CONTENT
}

async fn blank(State(hits): State<Hits>) -> (StatusCode, &'static str) {
    count(&hits);
    (StatusCode::OK, "")
}

/// Success envelope whose `data.pad` string is `bytes` long.
async fn padded(State(hits): State<Hits>, Path(bytes): Path<usize>) -> Json<Envelope> {
    count(&hits);
    Json(Envelope::ok(json!({ "pad": "x".repeat(bytes) })))
}

async fn envelope(State(hits): State<Hits>, Path(code): Path<i64>) -> Json<Envelope> {
    count(&hits);
    Json(Envelope {
        code,
        data: Some(json!({})),
    })
}

async fn echo(
    State(hits): State<Hits>,
    method: Method,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
    body: String,
) -> Json<Envelope> {
    count(&hits);
    let mut seen: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in &headers {
        seen.entry(name.as_str().to_string())
            .or_default()
            .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
    }
    let echo = Echo {
        method: method.as_str().to_string(),
        headers: seen,
        query,
        body,
    };
    Json(Envelope::ok(json!(echo)))
}

async fn hit_count(State(hits): State<Hits>) -> Json<Envelope> {
    Json(Envelope::ok(json!({ "hits": hits.load(Ordering::SeqCst) })))
}
