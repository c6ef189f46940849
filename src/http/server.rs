//! HTTP server setup and dispatch.
//!
//! # Responsibilities
//! - Create the Axum router with a single fallback handler
//! - Wire up middleware (CORS, request ID, tracing, panic capture)
//! - Buffer the body, bind the request, execute it, write the reply
//! - Record per-request metrics under the bound route's name
//!
//! # Design Decisions
//! - Axum does no routing; the [`RouteBinder`] is the only route table
//! - Body limit enforced while buffering; over-limit bodies get 413, other
//!   body stream failures get 400
//! - The request timeout bounds only bound-request execution and answers
//!   with the 502 envelope; the backend client's own timeouts fire first
//! - Panics inside a request become the generic 500 envelope

use std::any::Any;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    Json, Router,
};
use http_body_util::LengthLimitError;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::backend::{CommandEngine, CommandProxy};
use crate::config::GatewayConfig;
use crate::error::{ApiError, ApiResult};
use crate::http::request::{decode_input, request_id, UuidRequestId};
use crate::observability::metrics;
use crate::requests::default_registry;
use crate::routing::{BindOutcome, ExecutionContext, Registry, RegistryError, RouteBinder};

/// Application state injected into the handler.
#[derive(Clone)]
pub struct AppState {
    pub binder: RouteBinder,
    pub ctx: ExecutionContext,
    pub max_body_bytes: usize,
    pub request_timeout: Duration,
}

/// HTTP front of the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a server over the full route table.
    pub fn new(config: GatewayConfig, engine: Arc<dyn CommandEngine>) -> Result<Self, RegistryError> {
        let registry = default_registry()?;
        Ok(Self::with_registry(config, engine, registry))
    }

    /// Create a server over a caller-supplied registry.
    pub fn with_registry(
        config: GatewayConfig,
        engine: Arc<dyn CommandEngine>,
        registry: Registry,
    ) -> Self {
        tracing::info!(routes = registry.len(), "Route registry built");

        let state = AppState {
            binder: RouteBinder::new(Arc::new(registry)),
            ctx: ExecutionContext {
                proxy: CommandProxy::new(engine),
                service_name: config.service.name.clone(),
            },
            max_body_bytes: config.listener.max_body_bytes,
            request_timeout: Duration::from_secs(config.timeouts.request_secs),
        };

        let router = Self::build_router(state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(AnyOrigin)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE]);

        Router::new()
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(CatchPanicLayer::custom(panic_response))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
            .layer(cors)
    }

    /// The router, for driving the service without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            service = %self.config.service.name,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("HTTP server draining");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Every request lands here.
async fn dispatch_handler(State(state): State<AppState>, request: Request) -> Response {
    let start = Instant::now();
    let (parts, body) = request.into_parts();
    let request_id = request_id(&parts.headers).to_string();
    let method = parts.method.as_str().to_string();
    let path = parts.uri.path().to_string();

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        "Dispatching request"
    );

    if parts.method == Method::OPTIONS {
        metrics::record_request(&method, "options", StatusCode::OK.as_u16(), start);
        return StatusCode::OK.into_response();
    }

    let bytes = match buffer_body(body, state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Request body rejected");
            return finish(&method, "none", start, Err(e));
        }
    };
    let input = decode_input(&parts.uri, &parts.headers, &bytes);

    let (route, result) = match state.binder.resolve(&method, &path, &input) {
        Ok(BindOutcome::Bound(bound)) => {
            let route = bound.route_name();
            let execution = tokio::time::timeout(state.request_timeout, bound.execute(&state.ctx));
            let result = match execution.await {
                Ok(result) => result.map(|response| response.to_wire()),
                Err(_) => {
                    tracing::error!(
                        request_id = %request_id,
                        route = route,
                        timeout_secs = state.request_timeout.as_secs(),
                        "Request timed out waiting for backend"
                    );
                    Err(ApiError::Transport)
                }
            };
            (route, result)
        }
        Ok(BindOutcome::MethodNotAllowed(allowed)) => {
            ("none", Err(ApiError::MethodNotAllowed { allowed }))
        }
        Ok(BindOutcome::NotFound) => ("none", Err(ApiError::NotFound)),
        Err(e) => ("invalid", Err(e)),
    };

    if let Err(e) = &result {
        if e.is_validation() {
            tracing::info!(request_id = %request_id, path = %path, error = %e, "Request rejected");
        } else {
            tracing::warn!(request_id = %request_id, path = %path, status = e.status().as_u16(), error = %e, "Request failed");
        }
    }

    finish(&method, route, start, result)
}

/// Buffer the body up to `limit` bytes.
async fn buffer_body(body: Body, limit: usize) -> ApiResult<axum::body::Bytes> {
    axum::body::to_bytes(body, limit).await.map_err(body_error)
}

fn body_error(err: axum::Error) -> ApiError {
    if err.into_inner().is::<LengthLimitError>() {
        ApiError::PayloadTooLarge
    } else {
        ApiError::BadRequest("Invalid request body".to_string())
    }
}

fn finish(
    method: &str,
    route: &str,
    start: Instant,
    result: ApiResult<serde_json::Value>,
) -> Response {
    let response = match result {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(e) => e.into_response(),
    };
    metrics::record_request(method, route, response.status().as_u16(), start);
    response
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    ApiError::Internal(format!("handler panicked: {detail}")).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{CommandParams, EngineError, EngineReply};
    use async_trait::async_trait;
    use serde_json::{json, Map, Value};
    use tower::ServiceExt;

    #[derive(Debug)]
    struct HelloEngine;

    #[async_trait]
    impl CommandEngine for HelloEngine {
        async fn execute(
            &self,
            command: &str,
            params: &CommandParams,
        ) -> Result<EngineReply, EngineError> {
            let mut headers = Map::new();
            headers.insert("command".into(), Value::String(command.to_string()));
            headers.insert(
                "message".into(),
                Value::String(format!("Hello, {}!", params.get("name").unwrap_or("?"))),
            );
            Ok(EngineReply::ok(headers))
        }
    }

    fn server() -> HttpServer {
        let mut config = GatewayConfig::default();
        config.service.name = "unit-gateway".into();
        config.listener.max_body_bytes = 64;
        HttpServer::new(config, Arc::new(HelloEngine)).unwrap()
    }

    #[derive(Debug)]
    struct SlowEngine;

    #[async_trait]
    impl CommandEngine for SlowEngine {
        async fn execute(&self, _: &str, _: &CommandParams) -> Result<EngineReply, EngineError> {
            tokio::time::sleep(Duration::from_secs(3)).await;
            Ok(EngineReply::ok(Map::new()))
        }
    }

    async fn send(method: &str, uri: &str, body: Body) -> (StatusCode, Value) {
        send_to(&server(), method, uri, body).await
    }

    async fn send_to(server: &HttpServer, method: &str, uri: &str, body: Body) -> (StatusCode, Value) {
        let request = axum::http::Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .unwrap();
        let response = server.router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_status_is_local() {
        let (status, body) = send("GET", "/api/status", Body::empty()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "unit-gateway");
    }

    #[tokio::test]
    async fn test_hello_reaches_engine() {
        let (status, body) = send("GET", "/api/hello?name=Ada", Body::empty()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Hello, Ada!");
        assert_eq!(body["plugin_name"], "");
    }

    #[tokio::test]
    async fn test_routing_failures() {
        let (status, body) = send("GET", "/api/unknown", Body::empty()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"error": "Endpoint not found"}));

        let (status, body) = send("PATCH", "/api/status", Body::empty()).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["allowed"], json!(["GET"]));
    }

    #[tokio::test]
    async fn test_validation_failure() {
        let (status, body) = send("GET", "/api/messages?limit=500", Body::empty()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Invalid parameter: limit"}));
    }

    #[tokio::test]
    async fn test_body_limit() {
        let big = format!(r#"{{"name":"{}"}}"#, "x".repeat(200));
        let (status, body) = send("POST", "/api/messages", Body::from(big)).await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body, json!({"error": "Request body too large"}));
    }

    #[tokio::test]
    async fn test_plain_options_ok() {
        let (status, body) = send("OPTIONS", "/api/polls/1", Body::empty()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, Value::Null);
    }

    #[test]
    fn test_panic_response_is_generic() {
        let response = panic_response(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_slow_backend_answers_with_json_502() {
        let mut config = GatewayConfig::default();
        config.timeouts.request_secs = 1;
        config.backend.read_timeout_secs = 60;
        let server = HttpServer::new(config, Arc::new(SlowEngine)).unwrap();

        let (status, body) = send_to(&server, "GET", "/api/hello", Body::empty()).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body, json!({"error": "Error connecting to backend"}));
    }

    #[tokio::test]
    async fn test_body_errors_classified() {
        let err = buffer_body(Body::from("x".repeat(32)), 8).await.unwrap_err();
        assert_eq!(err, ApiError::PayloadTooLarge);

        let err = body_error(axum::Error::new(std::io::Error::other("connection reset")));
        assert_eq!(err, ApiError::BadRequest("Invalid request body".into()));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
