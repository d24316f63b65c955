pub mod health;
pub mod pages;
pub mod sessions;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // HTML surface
        .route("/", get(pages::handle_index))
        .route("/sessions/:id", get(pages::handle_page))
        .route("/sessions/:id/analyze", post(pages::handle_analyze_form))
        // JSON API
        .route("/api/v1/sessions", post(sessions::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(sessions::handle_get_session).delete(sessions::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:id/analyze",
            post(sessions::handle_analyze),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::build_router;
    use crate::analysis_client::{AnalysisError, Analyzer, MALFORMED_REPORT};
    use crate::config::Config;
    use crate::report::{parse_report, MatchReport};
    use crate::state::AppState;

    /// Replays the behavior of the analysis service for a given CV text.
    #[derive(Default)]
    struct ScriptedAnalyzer {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Analyzer for ScriptedAnalyzer {
        async fn analyze(&self, cv_text: &str, _jd: &str) -> Result<MatchReport, AnalysisError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match cv_text {
                "server down" => Err(AnalysisError::Server {
                    status: 500,
                    detail: Some("model unavailable".to_string()),
                }),
                "malformed" => Err(AnalysisError::MalformedReport(
                    "missing field 'skills_analysis'".to_string(),
                )),
                _ => Ok(parse_report(&json!({
                    "metrics": {"Overall Match": "80", "Skills Match": "75"},
                    "skills_analysis": {
                        "Matching Skills": ["Python", "Go"],
                        "Missing Skills": ["Kubernetes"],
                        "Additional Skills": []
                    }
                }))
                .unwrap()),
            }
        }
    }

    fn app() -> (Router, Arc<ScriptedAnalyzer>) {
        let analyzer = Arc::new(ScriptedAnalyzer::default());
        let state = AppState::new(
            Config::for_api_url("http://localhost:8000"),
            analyzer.clone(),
        );
        (build_router(state), analyzer)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    fn json_post(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn create_session(app: &Router) -> String {
        let (status, body) = send(app, json_post("/api/v1/sessions", json!({}))).await;
        assert_eq!(status, StatusCode::CREATED);
        body["session_id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_new_session_is_idle() {
        let (app, _) = app();
        let id = create_session(&app).await;

        let request = Request::get(format!("/api/v1/sessions/{id}"))
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"], "idle");
        assert_eq!(body["report"], Value::Null);
        assert_eq!(body["can_submit"], false);
    }

    #[tokio::test]
    async fn test_successful_analysis_returns_chart_series() {
        let (app, _) = app();
        let id = create_session(&app).await;

        let (status, body) = send(
            &app,
            json_post(
                &format!("/api/v1/sessions/{id}/analyze"),
                json!({"cv_text": "Python, Go", "job_description": "Go engineer"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"], "succeeded");
        assert_eq!(
            body["view"]["chart"],
            json!([
                {"label": "Overall Match", "value": 80},
                {"label": "Skills Match", "value": 75}
            ])
        );
        assert_eq!(body["report"]["metrics"]["Overall Match"], "80");
        assert_eq!(
            body["view"]["suggestions"][1],
            "Highlight your expertise in: Python, Go"
        );
    }

    #[tokio::test]
    async fn test_empty_cv_is_rejected_without_network_call() {
        let (app, analyzer) = app();
        let id = create_session(&app).await;

        let (status, body) = send(
            &app,
            json_post(
                &format!("/api/v1/sessions/{id}/analyze"),
                json!({"cv_text": "", "job_description": "Go engineer"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(analyzer.calls.load(Ordering::SeqCst), 0);

        let request = Request::get(format!("/api/v1/sessions/{id}"))
            .body(Body::empty())
            .unwrap();
        let (_, body) = send(&app, request).await;
        assert_eq!(body["state"], "idle");
    }

    #[tokio::test]
    async fn test_server_error_detail_reaches_session() {
        let (app, _) = app();
        let id = create_session(&app).await;

        let (status, body) = send(
            &app,
            json_post(
                &format!("/api/v1/sessions/{id}/analyze"),
                json!({"cv_text": "server down", "job_description": "Go engineer"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"], "failed");
        assert_eq!(body["error"], "model unavailable");
        assert_eq!(body["cv_text"], "server down");
    }

    #[tokio::test]
    async fn test_malformed_report_shows_generic_message() {
        let (app, _) = app();
        let id = create_session(&app).await;

        let (_, body) = send(
            &app,
            json_post(
                &format!("/api/v1/sessions/{id}/analyze"),
                json!({"cv_text": "malformed", "job_description": "Go engineer"}),
            ),
        )
        .await;

        assert_eq!(body["state"], "failed");
        assert_eq!(body["error"], MALFORMED_REPORT);
        assert_eq!(body["report"], Value::Null);
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let (app, _) = app();
        let request = Request::get(format!("/api/v1/sessions/{}", uuid::Uuid::new_v4()))
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&app, request).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_delete_session() {
        let (app, _) = app();
        let id = create_session(&app).await;

        let delete = || {
            Request::delete(format!("/api/v1/sessions/{id}"))
                .body(Body::empty())
                .unwrap()
        };
        assert_eq!(send(&app, delete()).await.0, StatusCode::NO_CONTENT);
        assert_eq!(send(&app, delete()).await.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_index_redirects_to_new_session_page() {
        let (app, _) = app();
        let response = app
            .clone()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers()[header::LOCATION].to_str().unwrap();
        assert!(location.starts_with("/sessions/"));

        let page = app
            .oneshot(Request::get(location).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(page.status(), StatusCode::OK);
        let html = to_bytes(page.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&html).contains("Analyze Match"));
    }

    #[tokio::test]
    async fn test_form_submit_redirects_and_renders_report() {
        let (app, _) = app();
        let id = create_session(&app).await;

        let form = Request::post(format!("/sessions/{id}/analyze"))
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("cv_text=Python%2C+Go&job_description=Go+engineer"))
            .unwrap();
        let response = app.clone().oneshot(form).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let page = app
            .oneshot(
                Request::get(format!("/sessions/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let html = to_bytes(page.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8_lossy(&html);
        assert!(html.contains("Match Overview"));
        assert!(html.contains("Consider adding Kubernetes skills"));
        assert!(html.contains("Python, Go</textarea>"));
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = app();
        let (status, body) = send(
            &app,
            Request::get("/health").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["analysis_api"], "http://localhost:8000");
    }
}
