use std::{collections::BTreeMap, convert::Infallible, sync::Arc};

use axum::{
    body::Body,
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use bytes::Bytes;
use futures::{stream, StreamExt};
use serde_json::Value;
use tokio::{net::TcpListener, sync::RwLock};

/// Every JSON body posted to `/api/Values`, in arrival order.
pub type Db = Arc<RwLock<Vec<Value>>>;

pub const VALUES: [&str; 2] = ["a", "b"];

pub fn app() -> Router {
    app_with_db(Db::default())
}

pub fn app_with_db(db: Db) -> Router {
    let api = Router::new()
        .route("/Values", get(list_values).post(post_value))
        .route("/received", get(list_received))
        .route("/echo", axum::routing::post(echo))
        .route("/headers", get(echo_headers))
        .route("/empty", get(no_content))
        .route("/blank", get(blank))
        .route("/null", get(null))
        .route("/bom", get(bom))
        .route("/garbage", get(garbage))
        .route("/fail", get(fail))
        .route("/fail-large", get(fail_large))
        .route("/stall", get(stall));
    Router::new().nest("/api", api).with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, app()).await
}

pub async fn serve(listener: TcpListener, app: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, app).await
}

async fn list_values() -> Json<[&'static str; 2]> {
    Json(VALUES)
}

async fn post_value(State(db): State<Db>, Json(input): Json<Value>) -> Json<[&'static str; 2]> {
    tracing::info!(%input, "value received");
    db.write().await.push(input);
    Json(VALUES)
}

async fn list_received(State(db): State<Db>) -> Json<Vec<Value>> {
    Json(db.read().await.clone())
}

async fn echo(Json(input): Json<Value>) -> Json<Value> {
    Json(input)
}

async fn echo_headers(headers: HeaderMap) -> Json<BTreeMap<String, String>> {
    let map = headers
        .iter()
        .filter_map(|(name, value)| Some((name.to_string(), value.to_str().ok()?.to_string())))
        .collect();
    Json(map)
}

async fn no_content() -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn blank() -> impl IntoResponse {
    ([(CONTENT_TYPE, "application/json")], "")
}

async fn null() -> Json<Value> {
    Json(Value::Null)
}

async fn bom() -> impl IntoResponse {
    ([(CONTENT_TYPE, "application/json")], "\u{feff}[\"a\",\"b\"]")
}

async fn garbage() -> impl IntoResponse {
    ([(CONTENT_TYPE, "application/json")], "not json")
}

async fn fail() -> impl IntoResponse {
    (StatusCode::INTERNAL_SERVER_ERROR, "boom")
}

/// 500 with a 64 KiB body.
async fn fail_large() -> impl IntoResponse {
    (StatusCode::INTERNAL_SERVER_ERROR, "x".repeat(64 * 1024))
}

/// Sends the response headers and the first half of a JSON array, then
/// never finishes the body.
async fn stall() -> Response {
    let first = stream::once(async { Ok::<_, Infallible>(Bytes::from_static(b"[\"a\",")) });
    let body = Body::from_stream(first.chain(stream::pending()));
    ([(CONTENT_TYPE, "application/json")], body).into_response()
}
