//! HTTP surface
//!
//! - `GET  /health`
//! - `POST /api/council/query`
//! - `GET  /api/council/query/:record_id`
//!
//! Every route sits behind the CORS policy from `[server] cors_origins`.

mod cors;
pub mod error;
mod handlers;

pub use cors::cors_layer;
pub use error::{ApiError, ErrorBody};

use axum::Router;
use axum::routing::{get, post};
use council_application::CouncilService;
use std::sync::Arc;

/// Service name reported by `/health`
pub const SERVICE_NAME: &str = "Mindly Chairman's Council";

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<CouncilService>,
    /// `*` or explicit origins
    pub cors_origins: Vec<String>,
}

impl AppState {
    /// State allowing any browser origin
    pub fn new(service: Arc<CouncilService>) -> Self {
        Self {
            service,
            cors_origins: vec![cors::ANY_ORIGIN.to_string()],
        }
    }

    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = origins;
        self
    }
}

pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.cors_origins);
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/council/query", post(handlers::query_council))
        .route("/api/council/query/:record_id", get(handlers::get_query))
        .with_state(state)
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use council_application::{
        AuthParams, CallError, CouncilParams, ManualClock, ModelBackend, QueryStore,
        RegistryError, StoreError, StoredQuery, TenantConfig, TenantRegistry,
    };
    use council_domain::{CouncilMember, CouncilResult, ModelId, RoleTable};
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;
    use tower::ServiceExt;

    /// Answers for every model except those listed as failing
    struct StubBackend {
        failing: Vec<&'static str>,
    }

    #[async_trait]
    impl ModelBackend for StubBackend {
        async fn call(
            &self,
            model: &ModelId,
            _system_prompt: &str,
            _user_message: &str,
            _timeout: Duration,
        ) -> Result<String, CallError> {
            if self.failing.contains(&model.as_str()) {
                return Err(CallError::Status {
                    status: 500,
                    body: "internal error".to_string(),
                });
            }
            Ok(format!("{model} says hello"))
        }
    }

    struct StubRegistry(HashMap<String, TenantConfig>);

    #[async_trait]
    impl TenantRegistry for StubRegistry {
        async fn get_tenant_config(
            &self,
            tenant_id: &str,
        ) -> Result<Option<TenantConfig>, RegistryError> {
            Ok(self.0.get(tenant_id).cloned())
        }
    }

    #[derive(Default)]
    struct StubStore(Mutex<Vec<StoredQuery>>);

    #[async_trait]
    impl QueryStore for StubStore {
        async fn save_query(
            &self,
            query: &str,
            result: &CouncilResult,
            domain: &str,
            tenant_id: &str,
        ) -> Result<String, StoreError> {
            let mut records = self.0.lock().unwrap();
            let record_id = format!("rec-{}", records.len());
            records.push(StoredQuery {
                record_id: record_id.clone(),
                tenant_id: tenant_id.to_string(),
                domain: domain.to_string(),
                query: query.to_string(),
                result: result.clone(),
                created_at: result.timestamp,
            });
            Ok(record_id)
        }

        async fn get_query(
            &self,
            record_id: &str,
            tenant_id: &str,
        ) -> Result<Option<StoredQuery>, StoreError> {
            Ok(self
                .0
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.record_id == record_id && r.tenant_id == tenant_id)
                .cloned())
        }
    }

    fn members() -> Vec<CouncilMember> {
        ["clinical", "patient", "business", "innovation"]
            .iter()
            .map(|id| CouncilMember::new(*id, format!("x/{id}").as_str(), format!("{id} advisor"), "p"))
            .collect()
    }

    fn state_with(failing: Vec<&'static str>, roles: RoleTable) -> (AppState, Arc<StubStore>) {
        let registry = StubRegistry(HashMap::from([
            (
                "mercy".to_string(),
                TenantConfig::new("Mercy Clinic", "psychiatry").with_user("boss", "healthcare_admin"),
            ),
            ("lakeside".to_string(), TenantConfig::new("Lakeside", "primary care")),
        ]));
        let store = Arc::new(StubStore::default());
        let service = CouncilService::new(
            Arc::new(StubBackend { failing }),
            Arc::new(registry),
            members(),
            roles,
            CouncilParams::default(),
            &AuthParams::default(),
        )
        .with_clock(Arc::new(ManualClock::new()))
        .with_store(store.clone());
        (AppState::new(Arc::new(service)), store)
    }

    fn app_with(failing: Vec<&'static str>, roles: RoleTable) -> (Router, Arc<StubStore>) {
        let (state, store) = state_with(failing, roles);
        (router(state), store)
    }

    fn app_with_origins(origins: &[&str]) -> Router {
        let (state, _) = state_with(vec![], RoleTable::builtin());
        router(state.with_cors_origins(origins.iter().map(|o| o.to_string()).collect()))
    }

    fn preflight(origin: &str) -> Request<Body> {
        Request::builder()
            .method("OPTIONS")
            .uri("/api/council/query")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization,content-type")
            .body(Body::empty())
            .unwrap()
    }

    fn app() -> Router {
        app_with(vec![], RoleTable::builtin()).0
    }

    fn post_query(auth: Option<&str>, body: &str) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/council/query")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(auth) = auth {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn json_body(resp: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    const CLINICIAN: &str = "Bearer sk-chairmancouncil-mercy-drsmith";

    #[tokio::test]
    async fn test_health() {
        let resp = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let v = json_body(resp).await;
        assert_eq!(v["status"], "healthy");
        assert_eq!(v["service"], "Mindly Chairman's Council");
        assert!(v["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_query_with_one_failing_member() {
        let (app, _) = app_with(vec!["x/business"], RoleTable::builtin());
        let resp = app
            .oneshot(post_query(Some(CLINICIAN), r#"{"query": "patient reports insomnia"}"#))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let v = json_body(resp).await;
        assert_eq!(v["stage"], "stage_1_complete");
        assert_eq!(v["query"], "patient reports insomnia");
        let opinions = v["council_opinions"].as_object().unwrap();
        assert_eq!(opinions.len(), 4);
        assert_eq!(opinions["clinical"]["response"], "x/clinical says hello");
        assert_eq!(opinions["clinical"]["role"], "clinical advisor");
        assert!(opinions["business"]["error"].as_str().unwrap().contains("HTTP 500"));
        assert!(v.get("chairman_synthesis").is_none());
    }

    #[tokio::test]
    async fn test_header_without_bearer_scheme() {
        let resp = app()
            .oneshot(post_query(Some("sk-chairmancouncil-mercy-drsmith"), r#"{"query": "q"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_credential_is_401() {
        let resp = app()
            .oneshot(post_query(None, r#"{"query": "q"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));
        assert_eq!(json_body(resp).await["error"], "missing_credential");
    }

    #[tokio::test]
    async fn test_unknown_tenant_is_401() {
        let resp = app()
            .oneshot(post_query(
                Some("Bearer sk-chairmancouncil-acme-jdoe"),
                r#"{"query": "q"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let v = json_body(resp).await;
        assert_eq!(v["error"], "unknown_tenant");
        assert_eq!(v["detail"], "Unknown tenant: acme");
    }

    #[tokio::test]
    async fn test_malformed_credential_is_401() {
        let resp = app()
            .oneshot(post_query(Some("Bearer not-a-council-key"), r#"{"query": "q"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(resp).await["error"], "malformed_credential");
    }

    #[tokio::test]
    async fn test_admin_without_query_permission_is_403() {
        let resp = app()
            .oneshot(post_query(
                Some("Bearer sk-chairmancouncil-mercy-boss"),
                r#"{"query": "q"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert_eq!(json_body(resp).await["error"], "permission_denied");
    }

    #[tokio::test]
    async fn test_empty_query_is_400() {
        let resp = app()
            .oneshot(post_query(Some(CLINICIAN), r#"{"query": ""}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let v = json_body(resp).await;
        assert_eq!(v["error"], "validation_error");
        assert_eq!(v["detail"], "Query is required");
    }

    #[tokio::test]
    async fn test_invalid_json_body() {
        let resp = app()
            .oneshot(post_query(Some(CLINICIAN), "{not json"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(resp).await["error"], "invalid_body");

        let resp = app().oneshot(post_query(None, "{not json")).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_all_members_failing_is_503() {
        let (app, _) = app_with(
            vec!["x/clinical", "x/patient", "x/business", "x/innovation"],
            RoleTable::builtin(),
        );
        let resp = app
            .oneshot(post_query(Some(CLINICIAN), r#"{"query": "q"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json_body(resp).await["error"], "council_unavailable");
    }

    #[tokio::test]
    async fn test_rate_limit_is_429() {
        let (app, _) = app_with(vec![], RoleTable::builtin().with_rate_limit("clinician", 2));
        for _ in 0..2 {
            let resp = app
                .clone()
                .oneshot(post_query(Some(CLINICIAN), r#"{"query": "q"}"#))
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::OK);
        }
        let resp = app
            .oneshot(post_query(Some(CLINICIAN), r#"{"query": "q"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(resp.headers()[header::RETRY_AFTER], "60");
    }

    #[tokio::test]
    async fn test_synthesis_requested_in_body() {
        let resp = app()
            .oneshot(post_query(Some(CLINICIAN), r#"{"query": "q", "synthesize": true}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let v = json_body(resp).await;
        assert_eq!(v["stage"], "stage_2_complete");
        assert_eq!(
            v["chairman_synthesis"]["recommendation"],
            "google/gemini-2.0-flash says hello"
        );
    }

    #[tokio::test]
    async fn test_stored_record_is_tenant_scoped() {
        let (app, store) = app_with(vec![], RoleTable::builtin());
        let resp = app
            .clone()
            .oneshot(post_query(Some(CLINICIAN), r#"{"query": "q"}"#))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        tokio::time::timeout(Duration::from_secs(2), async {
            while store.0.lock().unwrap().is_empty() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();

        let get = |auth: &str| {
            Request::builder()
                .uri("/api/council/query/rec-0")
                .header(header::AUTHORIZATION, auth)
                .body(Body::empty())
                .unwrap()
        };

        let resp = app.clone().oneshot(get(CLINICIAN)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let v = json_body(resp).await;
        assert_eq!(v["tenant_id"], "mercy");
        assert_eq!(v["result"]["stage"], "stage_1_complete");

        let resp = app
            .oneshot(get("Bearer sk-chairmancouncil-lakeside-nurse"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(resp).await["error"], "not_found");
    }

    #[tokio::test]
    async fn test_preflight_allows_any_origin_by_default() {
        let resp = app().oneshot(preflight("http://localhost:3000")).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
        let methods = resp.headers()[header::ACCESS_CONTROL_ALLOW_METHODS]
            .to_str()
            .unwrap()
            .to_string();
        assert_eq!(methods, "*");
    }

    #[tokio::test]
    async fn test_cors_header_on_simple_request() {
        let mut request = post_query(Some(CLINICIAN), r#"{"query": "q"}"#);
        request
            .headers_mut()
            .insert(header::ORIGIN, "http://localhost:3000".parse().unwrap());
        let resp = app().oneshot(request).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn test_configured_origins_only() {
        let app = app_with_origins(&["http://localhost:3000"]);

        let allowed = app
            .clone()
            .oneshot(preflight("http://localhost:3000"))
            .await
            .unwrap();
        assert_eq!(
            allowed.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:3000"
        );

        let other = app.oneshot(preflight("https://evil.example")).await.unwrap();
        assert!(
            !other
                .headers()
                .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        );
    }

    #[tokio::test]
    async fn test_context_review_in_response() {
        let resp = app()
            .oneshot(post_query(
                Some(CLINICIAN),
                r#"{"query": "q", "context": {"date_of_birth": "1970-01-01", "symptoms": "x"}}"#,
            ))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let v = json_body(resp).await;
        assert_eq!(v["context_review"]["specialty"], "psychiatry");
        assert_eq!(v["context_review"]["phi_fields"][0], "date_of_birth");
        assert!(!v.to_string().contains("1970-01-01"));
    }
}
