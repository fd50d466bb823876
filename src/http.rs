//! REST surface over [`CatalogService`].
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET`    | `/api/items` | List all items |
//! | `POST`   | `/api/items` | Create an item |
//! | `GET`    | `/api/items/stats` | Aggregate statistics |
//! | `GET`    | `/api/items/search?query=&limit=` | Substring search |
//! | `GET`    | `/api/items/search/ai?query=&limit=` | AI-ranked search |
//! | `GET`    | `/api/items/recommendations?limit=` | Suggested new items |
//! | `GET`    | `/api/items/category/{category}` | Exact category filter |
//! | `GET`    | `/api/items/tag/{tag}` | Exact tag filter |
//! | `GET`    | `/api/items/{id}` | Fetch one item |
//! | `PUT`    | `/api/items/{id}` | Partial update |
//! | `DELETE` | `/api/items/{id}` | Delete |
//! | `GET`    | `/api/items/{id}/insights` | Generate and store insights |
//! | `GET`    | `/api/items/{id}/sentiment` | Analyze and store sentiment |
//! | `GET`    | `/api/items/{id}/test-cases` | Draft API test cases |
//! | `GET`    | `/health` | Liveness |
//! | `GET`    | `/api` | Service description |
//!
//! # Envelope
//!
//! ```json
//! { "success": true, "data": ..., "count": 3 }
//! { "success": false, "error": "Not Found", "message": "Item not found" }
//! ```

use std::any::Any;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderValue, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tower_http::catch_panic::{CatchPanicLayer, ResponseForPanic};
use tower_http::cors::{self, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use uuid::Uuid;

use crate::SERVICE_NAME;
use crate::catalog::{ItemPatch, NewItem};
use crate::config::Config;
use crate::error::CatalogError;
use crate::service::CatalogService;
use crate::validation::{
    parse_item_id, validate_new_item, validate_patch, validate_recommendation_limit,
    validate_search,
};

/// Shared state passed to every handler.
#[derive(Clone)]
struct AppState {
    service: CatalogService,
    config: Arc<Config>,
}

// ============================================================================
// Server
// ============================================================================

/// Bind to `config.bind` and serve until Ctrl-C.
pub async fn run_http_server(
    config: Config,
    service: CatalogService,
) -> Result<(), Box<dyn std::error::Error>> {
    let bind_addr = config.bind.clone();
    let app = router(config, service);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("HTTP server listening on http://{bind_addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {e}");
    }
}

/// Build the application router.
pub fn router(config: Config, service: CatalogService) -> Router {
    let cors = cors_layer(&config);
    let panics = CatchPanicLayer::custom(PanicEnvelope {
        expose_details: config.expose_error_details(),
    });
    let state = AppState {
        service,
        config: Arc::new(config),
    };

    Router::new()
        .route("/api/items", get(list_items).post(create_item))
        .route("/api/items/stats", get(get_stats))
        .route("/api/items/search", get(search_items))
        .route("/api/items/search/ai", get(smart_search))
        .route("/api/items/recommendations", get(get_recommendations))
        .route("/api/items/category/{category}", get(items_by_category))
        .route("/api/items/tag/{tag}", get(items_by_tag))
        .route(
            "/api/items/{id}",
            get(get_item).put(update_item).delete(delete_item),
        )
        .route("/api/items/{id}/insights", get(generate_insights))
        .route("/api/items/{id}/sentiment", get(analyze_sentiment))
        .route("/api/items/{id}/test-cases", get(generate_test_cases))
        .route("/health", get(health))
        .route("/api", get(api_info))
        .fallback(not_found_route)
        .layer(panics)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let origin = match &config.allowed_origins {
        Some(origins) => AllowOrigin::list(
            origins
                .iter()
                .filter_map(|o| HeaderValue::from_str(o).ok())
                .collect::<Vec<_>>(),
        ),
        None => AllowOrigin::from(cors::Any),
    };
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

// ============================================================================
// Envelope & errors
// ============================================================================

#[derive(Serialize)]
struct Envelope<T: Serialize> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    count: Option<usize>,
}

fn ok<T: Serialize>(data: T) -> Json<Envelope<T>> {
    Json(Envelope {
        success: true,
        data: Some(data),
        message: None,
        count: None,
    })
}

fn ok_list<T: Serialize>(data: Vec<T>) -> Json<Envelope<Vec<T>>> {
    let count = data.len();
    Json(Envelope {
        success: true,
        data: Some(data),
        message: None,
        count: Some(count),
    })
}

fn ok_with_message<T: Serialize>(data: T, message: &str) -> Json<Envelope<T>> {
    Json(Envelope {
        success: true,
        data: Some(data),
        message: Some(message.to_string()),
        count: None,
    })
}

/// Error that renders as a failure envelope.
#[derive(Debug)]
enum ApiError {
    NotFound,
    BadRequest {
        error: &'static str,
        details: Vec<String>,
    },
    Internal {
        detail: Option<String>,
    },
}

impl ApiError {
    fn from_catalog(err: CatalogError, error: &'static str) -> Self {
        let CatalogError::Validation(details) = err;
        Self::BadRequest { error, details }
    }

    fn internal(msg: String, expose_details: bool) -> Self {
        error!("Internal error: {msg}");
        Self::Internal {
            detail: expose_details.then_some(msg),
        }
    }

    fn bad_request(error: &'static str, detail: String) -> Self {
        Self::BadRequest {
            error,
            details: vec![detail],
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::NotFound => (
                StatusCode::NOT_FOUND,
                json!({"success": false, "error": "Not Found", "message": "Item not found"}),
            ),
            Self::BadRequest { error, details } => (
                StatusCode::BAD_REQUEST,
                json!({"success": false, "error": error, "details": details}),
            ),
            Self::Internal { detail } => {
                let mut body = json!({
                    "success": false,
                    "error": "Internal Server Error",
                    "message": "Something went wrong",
                });
                if let Some(detail) = detail {
                    body["details"] = Value::String(detail);
                }
                (StatusCode::INTERNAL_SERVER_ERROR, body)
            }
        };
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

/// Renders a handler panic as an internal-error envelope.
#[derive(Debug, Clone, Copy)]
struct PanicEnvelope {
    expose_details: bool,
}

impl ResponseForPanic for PanicEnvelope {
    type ResponseBody = axum::body::Body;

    fn response_for_panic(
        &mut self,
        panic: Box<dyn Any + Send + 'static>,
    ) -> axum::http::Response<Self::ResponseBody> {
        let msg = if let Some(s) = panic.downcast_ref::<String>() {
            s.clone()
        } else if let Some(s) = panic.downcast_ref::<&str>() {
            s.to_string()
        } else {
            "handler panicked".to_string()
        };
        ApiError::internal(msg, self.expose_details).into_response()
    }
}

fn item_id(raw: &str) -> ApiResult<Uuid> {
    parse_item_id(raw).map_err(|e| ApiError::from_catalog(e, "Invalid item ID format"))
}

// ============================================================================
// Catalog handlers
// ============================================================================

#[derive(Debug, Deserialize)]
struct SearchParams {
    query: Option<String>,
    limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct LimitParams {
    limit: Option<usize>,
}

async fn list_items(State(state): State<AppState>) -> impl IntoResponse {
    ok_list(state.service.get_all().await)
}

async fn get_item(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Response> {
    let id = item_id(&id)?;
    let item = state.service.get_by_id(&id).await.ok_or(ApiError::NotFound)?;
    Ok(ok(item).into_response())
}

async fn create_item(
    State(state): State<AppState>,
    payload: Result<Json<NewItem>, JsonRejection>,
) -> ApiResult<Response> {
    let Json(fields) =
        payload.map_err(|e| ApiError::bad_request("Validation failed", e.body_text()))?;
    validate_new_item(&fields).map_err(|e| ApiError::from_catalog(e, "Validation failed"))?;

    let item = state.service.create(fields).await;
    Ok((
        StatusCode::CREATED,
        ok_with_message(item, "Item created successfully"),
    )
        .into_response())
}

async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ItemPatch>, JsonRejection>,
) -> ApiResult<Response> {
    let id = item_id(&id)?;
    let Json(patch) =
        payload.map_err(|e| ApiError::bad_request("Validation failed", e.body_text()))?;
    validate_patch(&patch).map_err(|e| ApiError::from_catalog(e, "Validation failed"))?;

    let item = state
        .service
        .update(&id, patch)
        .await
        .ok_or(ApiError::NotFound)?;
    Ok(ok_with_message(item, "Item updated successfully").into_response())
}

async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let id = item_id(&id)?;
    let item = state.service.remove(&id).await.ok_or(ApiError::NotFound)?;
    Ok(ok_with_message(item, "Item deleted").into_response())
}

async fn get_stats(State(state): State<AppState>) -> impl IntoResponse {
    ok(state.service.get_stats().await)
}

async fn search_items(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> ApiResult<Response> {
    let Query(params) =
        params.map_err(|e| ApiError::bad_request("Search validation failed", e.body_text()))?;
    let (query, limit) = validate_search(params.query.as_deref(), params.limit)
        .map_err(|e| ApiError::from_catalog(e, "Search validation failed"))?;

    let mut items = state.service.search(&query).await;
    items.truncate(limit);
    Ok(ok_list(items).into_response())
}

async fn items_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> impl IntoResponse {
    ok_list(state.service.get_by_category(&category).await)
}

async fn items_by_tag(State(state): State<AppState>, Path(tag): Path<String>) -> impl IntoResponse {
    ok_list(state.service.get_by_tag(&tag).await)
}

// ============================================================================
// Augmentation handlers
// ============================================================================

async fn smart_search(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> ApiResult<Response> {
    let Query(params) =
        params.map_err(|e| ApiError::bad_request("Search validation failed", e.body_text()))?;
    let (query, limit) = validate_search(params.query.as_deref(), params.limit)
        .map_err(|e| ApiError::from_catalog(e, "Search validation failed"))?;

    let outcome = state.service.smart_search(&query, limit).await;
    let count = outcome.count;
    Ok(Json(Envelope {
        success: true,
        data: Some(outcome),
        message: None,
        count: Some(count),
    })
    .into_response())
}

async fn get_recommendations(
    State(state): State<AppState>,
    params: Result<Query<LimitParams>, QueryRejection>,
) -> ApiResult<Response> {
    let Query(params) =
        params.map_err(|e| ApiError::bad_request("Validation failed", e.body_text()))?;
    let limit = validate_recommendation_limit(params.limit)
        .map_err(|e| ApiError::from_catalog(e, "Validation failed"))?;

    Ok(ok_list(state.service.get_recommendations(limit).await).into_response())
}

async fn generate_insights(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let id = item_id(&id)?;
    let outcome = state
        .service
        .generate_insights(&id)
        .await
        .ok_or(ApiError::NotFound)?;
    Ok(ok(outcome).into_response())
}

async fn analyze_sentiment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let id = item_id(&id)?;
    let outcome = state
        .service
        .analyze_sentiment(&id)
        .await
        .ok_or(ApiError::NotFound)?;
    Ok(ok(outcome).into_response())
}

async fn generate_test_cases(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let id = item_id(&id)?;
    let set = state
        .service
        .generate_test_cases(&id)
        .await
        .ok_or(ApiError::NotFound)?;
    Ok(ok(set).into_response())
}

// ============================================================================
// Service endpoints
// ============================================================================

const ENDPOINTS: &[&str] = &[
    "GET /api/items",
    "GET /api/items/:id",
    "POST /api/items",
    "PUT /api/items/:id",
    "DELETE /api/items/:id",
    "GET /api/items/:id/insights",
    "GET /api/items/:id/sentiment",
    "GET /api/items/:id/test-cases",
    "GET /api/items/search",
    "GET /api/items/search/ai",
    "GET /api/items/recommendations",
    "GET /api/items/stats",
    "GET /health",
    "GET /api",
];

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "environment": state.config.environment,
        "ai": if state.service.gateway().is_live() { "live" } else { "fallback" },
    }))
}

async fn api_info() -> impl IntoResponse {
    Json(json!({
        "name": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "description": "AI-augmented item catalog API",
        "endpoints": {
            "items": "/api/items",
            "health": "/health",
        },
        "features": [
            "CRUD operations for items",
            "AI-powered insights generation",
            "Smart search with semantic understanding",
            "Sentiment analysis",
            "Automated test case generation",
            "Item recommendations",
        ],
    }))
}

async fn not_found_route(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "error": "Not Found",
            "message": format!("Route {uri} not found"),
            "availableEndpoints": ENDPOINTS,
        })),
    )
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::augment::{AugmentationGateway, fallback_insights};
    use crate::catalog::CatalogStore;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;

    fn app() -> Router {
        router(
            Config::default(),
            CatalogService::new(CatalogStore::new(), AugmentationGateway::unconfigured()),
        )
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(builder.body(body).expect("request"))
            .await
            .expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    async fn create(app: &Router, body: Value) -> Value {
        let (status, json) = send(app, "POST", "/api/items", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        json["data"].clone()
    }

    #[tokio::test]
    async fn test_crud_lifecycle() {
        let app = app();
        let item = create(&app, json!({"name": "Test Item", "description": "desc"})).await;
        let id = item["id"].as_str().unwrap().to_string();
        assert_eq!(item["category"], "General");
        assert_eq!(item["tags"], json!([]));
        assert!(item["aiInsights"].is_null());

        let (status, json) = send(&app, "GET", &format!("/api/items/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["name"], "Test Item");

        let (status, json) = send(
            &app,
            "PUT",
            &format!("/api/items/{id}"),
            Some(json!({"name": "Renamed"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["name"], "Renamed");
        assert_eq!(json["data"]["description"], "desc");

        let (status, json) = send(&app, "GET", "/api/items", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["count"], 1);

        let (status, json) = send(&app, "DELETE", &format!("/api/items/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "Item deleted");

        let (status, _) = send(&app, "DELETE", &format!("/api/items/{id}"), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_without_name_is_400() {
        let app = app();
        let (status, json) = send(
            &app,
            "POST",
            "/api/items",
            Some(json!({"description": "missing name field"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Validation failed");
        assert_eq!(json["details"], json!(["Name is required"]));
    }

    #[tokio::test]
    async fn test_create_with_empty_name_is_400() {
        let app = app();
        let (status, json) =
            send(&app, "POST", "/api/items", Some(json!({"name": ""}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["details"], json!(["Name cannot be empty"]));
    }

    #[tokio::test]
    async fn test_malformed_json_is_400() {
        let app = app();
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/items")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{not json"))
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_item_is_404() {
        let app = app();
        let bogus = Uuid::new_v4();
        for (method, path) in [
            ("GET", format!("/api/items/{bogus}")),
            ("DELETE", format!("/api/items/{bogus}")),
            ("GET", format!("/api/items/{bogus}/insights")),
            ("GET", format!("/api/items/{bogus}/sentiment")),
            ("GET", format!("/api/items/{bogus}/test-cases")),
        ] {
            let (status, json) = send(&app, method, &path, None).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{method} {path}");
            assert_eq!(json["message"], "Item not found");
        }

        let (status, _) = send(
            &app,
            "PUT",
            &format!("/api/items/{bogus}"),
            Some(json!({"name": "Should Fail"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_id_is_400() {
        let app = app();
        let (status, json) = send(&app, "GET", "/api/items/not-a-uuid", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Invalid item ID format");
    }

    #[tokio::test]
    async fn test_insights_persisted() {
        let app = app();
        let item = create(&app, json!({"name": "Test Item", "description": "desc"})).await;
        let id = item["id"].as_str().unwrap().to_string();

        let (status, json) = send(&app, "GET", &format!("/api/items/{id}/insights"), None).await;
        assert_eq!(status, StatusCode::OK);
        let expected = serde_json::to_value(fallback_insights()).unwrap();
        assert_eq!(json["data"]["insights"], expected);

        let (_, json) = send(&app, "GET", &format!("/api/items/{id}"), None).await;
        assert_eq!(json["data"]["aiInsights"], expected);
    }

    #[tokio::test]
    async fn test_search_and_filters() {
        let app = app();
        create(&app, json!({"name": "Red Apple", "category": "Fruit", "tags": ["red"]})).await;
        create(&app, json!({"name": "Banana", "category": "Fruit"})).await;
        create(&app, json!({"name": "Carrot", "tags": ["red"]})).await;

        let (status, json) = send(&app, "GET", "/api/items/search?query=apple", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["count"], 1);

        let (_, json) = send(&app, "GET", "/api/items/category/Fruit", None).await;
        assert_eq!(json["count"], 2);

        let (_, json) = send(&app, "GET", "/api/items/tag/red", None).await;
        assert_eq!(json["count"], 2);

        let (status, json) = send(&app, "GET", "/api/items/search/ai?query=an&limit=1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["count"], 1);
        assert_eq!(json["data"]["query"], "an");
    }

    #[tokio::test]
    async fn test_search_requires_query() {
        let app = app();
        let (status, json) = send(&app, "GET", "/api/items/search", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Search validation failed");

        let (status, _) = send(&app, "GET", "/api/items/search/ai?query=x&limit=abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_recommendations_and_stats() {
        let app = app();
        let (status, json) = send(&app, "GET", "/api/items/recommendations?limit=3", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["count"], 3);
        assert_eq!(json["data"][0]["category"], "Technology");

        create(&app, json!({"name": "a"})).await;
        create(&app, json!({"name": "b", "tags": ["x"]})).await;
        create(&app, json!({"name": "c", "tags": ["x", "y"]})).await;
        let (_, json) = send(&app, "GET", "/api/items/stats", None).await;
        assert_eq!(json["data"]["total"], 3);
        assert_eq!(json["data"]["categories"], 1);
        assert_eq!(json["data"]["averageTagsPerItem"], "1.00");
    }

    #[tokio::test]
    async fn test_health_and_unknown_route() {
        let app = app();
        let (status, json) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["ai"], "fallback");

        let (status, json) = send(&app, "GET", "/nope", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["message"], "Route /nope not found");
    }

    async fn panicking_app(expose_details: bool) -> (StatusCode, Value) {
        async fn boom() -> &'static str {
            panic!("store invariant broken")
        }
        let app = Router::new()
            .route("/boom", get(boom))
            .layer(CatchPanicLayer::custom(PanicEnvelope { expose_details }));
        send(&app, "GET", "/boom", None).await
    }

    #[tokio::test]
    async fn test_panic_renders_internal_error() {
        let (status, json) = panicking_app(true).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "Internal Server Error");
        assert_eq!(json["details"], "store invariant broken");
    }

    #[tokio::test]
    async fn test_panic_detail_hidden_in_production() {
        let (status, json) = panicking_app(false).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(json.get("details").is_none());
    }
}
