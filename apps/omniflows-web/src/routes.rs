use crate::handlers;
use crate::AppState;
use axum::{
    http::{HeaderName, HeaderValue},
    routing::get,
    Router,
};
use omniflows_env::{response_headers, DerivedFlags};
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

pub fn router(state: AppState) -> Router {
    let flags = state.env.flags;

    let app = Router::new()
        .route("/api/health", get(handlers::health::health_check))
        .route("/api/config", get(handlers::public_config::public_config))
        .with_state(state);

    with_deployment_headers(app, flags).layer(TraceLayer::new_for_http())
}

fn with_deployment_headers(mut app: Router, flags: DerivedFlags) -> Router {
    for &(name, value) in response_headers(flags) {
        app = app.layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        ));
    }
    app
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::{IntrospectionError, MemoryUsage, ProcessProbe, SysinfoProbe};
    use axum::{
        body::{to_bytes, Body},
        http::{Method, Request, StatusCode},
        response::Response,
    };
    use omniflows_env::ResolvedEnv;
    use serde_json::Value;
    use std::sync::Arc;
    use std::time::Instant;
    use tower::ServiceExt;

    struct NoMemory;

    impl ProcessProbe for NoMemory {
        fn uptime(&self) -> Result<f64, IntrospectionError> {
            Ok(3.0)
        }

        fn memory(&self) -> Result<MemoryUsage, IntrospectionError> {
            Err(IntrospectionError::Unavailable(
                "memory statistics unavailable".to_string(),
            ))
        }
    }

    fn env_for(app_env: Option<&str>) -> Arc<ResolvedEnv> {
        let app_env = app_env.map(str::to_string);
        Arc::new(ResolvedEnv::from_lookup(move |key| {
            if key == "NEXT_PUBLIC_APP_ENV" {
                app_env.clone()
            } else {
                None
            }
        }))
    }

    fn app(app_env: Option<&str>, probe: Arc<dyn ProcessProbe>) -> Router {
        router(AppState::new(env_for(app_env), probe))
    }

    fn live_probe() -> Arc<dyn ProcessProbe> {
        Arc::new(SysinfoProbe::new(Instant::now()))
    }

    async fn get(app: Router, uri: &str) -> Response {
        app.oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_is_ok_under_normal_conditions() {
        let response = get(app(None, live_probe()), "/api/health").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["environment"], "local");
        assert_eq!(body["version"], "dev");
        let timestamp = body["timestamp"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
        assert!(body["uptime"].as_f64().unwrap() >= 0.0);
        assert!(body["memory"]["rss"].is_u64());
    }

    #[tokio::test]
    async fn probe_failure_returns_service_unavailable() {
        let response = get(app(Some("production"), Arc::new(NoMemory)), "/api/health").await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = json_body(response).await;
        assert_eq!(body["status"], "unhealthy");
        assert_eq!(body["environment"], "production");
        assert_eq!(body["error"], "memory statistics unavailable");
        let keys: Vec<&str> = body.as_object().unwrap().keys().map(String::as_str).collect();
        for absent in ["version", "uptime", "memory"] {
            assert!(!keys.contains(&absent), "{absent} present in {keys:?}");
        }
    }

    #[tokio::test]
    async fn production_responses_carry_security_headers() {
        let response = get(app(Some("production"), live_probe()), "/api/health").await;
        let headers = response.headers();

        assert_eq!(headers["x-frame-options"], "DENY");
        assert_eq!(headers["x-content-type-options"], "nosniff");
        assert_eq!(headers["referrer-policy"], "origin-when-cross-origin");
        assert!(headers.get("x-environment").is_none());
    }

    #[tokio::test]
    async fn failing_health_still_gets_security_headers() {
        let response = get(app(Some("production"), Arc::new(NoMemory)), "/api/health").await;
        assert_eq!(response.headers()["x-frame-options"], "DENY");
    }

    #[tokio::test]
    async fn development_responses_are_tagged() {
        let response = get(app(Some("development"), live_probe()), "/api/config").await;
        let headers = response.headers();

        assert_eq!(headers["x-environment"], "development");
        assert!(headers.get("x-frame-options").is_none());
    }

    #[tokio::test]
    async fn local_responses_have_no_deployment_headers() {
        let response = get(app(None, live_probe()), "/api/config").await;
        let headers = response.headers();

        assert!(headers.get("x-environment").is_none());
        assert!(headers.get("x-frame-options").is_none());
    }

    #[tokio::test]
    async fn production_config_enables_analytics() {
        let response = get(app(Some("production"), live_probe()), "/api/config").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["features"]["analytics"], true);
        assert_eq!(body["features"]["mockApi"], false);
        assert_eq!(body["api"]["timeoutMs"], 10000);
        assert_eq!(body["images"]["domains"], serde_json::json!(["images.omniflows.com"]));
    }

    #[tokio::test]
    async fn health_only_answers_get() {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/health")
            .body(Body::empty())
            .unwrap();
        let response = app(None, live_probe()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
