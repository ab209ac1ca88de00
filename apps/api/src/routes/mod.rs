pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::jobs::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/jobs/search", post(handlers::handle_search))
        .route("/api/v1/jobs/similar", post(handlers::handle_similar))
        .route("/api/v1/jobs/match", post(handlers::handle_match))
        .route(
            "/api/v1/jobs/match/upload",
            post(handlers::handle_match_upload),
        )
        .route("/api/v1/jobs/report", post(handlers::handle_report))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::nlp::hashed::HashedModel;
    use crate::pipeline::tests::{FakeScraper, FakeSearch};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use std::path::PathBuf;
    use std::sync::Arc;
    use tower::ServiceExt;

    const LEVER: &str = "https://jobs.lever.co/acme/1";
    const GREENHOUSE: &str = "https://boards.greenhouse.io/acme/2";

    fn app(search: FakeSearch, scraper: FakeScraper) -> Router {
        let config = Config {
            job_boards: vec!["jobs.lever.co".to_string(), "greenhouse.io".to_string()],
            resume_path: PathBuf::from("/nonexistent/resume.pdf"),
            ..Config::default()
        };
        let model = Arc::new(HashedModel);
        build_router(AppState::new(
            config,
            model,
            Arc::new(search),
            Arc::new(scraper),
        ))
    }

    fn idle_app() -> Router {
        app(FakeSearch::default(), FakeScraper::default())
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn postings_json() -> Value {
        json!([
            {"url": LEVER, "title": "Rust Engineer", "description": "Build backend services in Rust"},
            {"url": GREENHOUSE, "title": "Rust Engineer", "description": "Build backend services in Rust"},
            {"url": "https://jobs.jobvite.com/acme/3", "title": "Chef", "description": "Cook pasta for hungry guests"}
        ])
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = send(idle_app(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "jobscout");
        assert_eq!(body["model"], "hashed-trigram");
    }

    #[tokio::test]
    async fn test_search_returns_postings_and_summary() {
        let search = FakeSearch::default()
            .with("jobs.lever.co", &[LEVER])
            .with("greenhouse.io", &[GREENHOUSE]);
        let scraper = FakeScraper::default()
            .with(LEVER, None, "Rust services")
            .with(GREENHOUSE, Some("1999-01-01"), "Rust services");

        let (status, body) = send(
            app(search, scraper),
            post_json("/api/v1/jobs/search", json!({"job_title": "Rust Engineer"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let postings = body["postings"].as_array().unwrap();
        assert_eq!(postings.len(), 1);
        assert_eq!(postings[0]["source_url"], LEVER);
        assert_eq!(body["summary"]["stale"], 1);
        assert_eq!(body["summary"]["boards_queried"], 2);
    }

    #[tokio::test]
    async fn test_search_rejects_blank_title() {
        let (status, body) = send(
            idle_app(),
            post_json("/api/v1/jobs/search", json!({"job_title": "   "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_search_all_boards_failing_is_bad_gateway() {
        let search = FakeSearch::default()
            .failing("jobs.lever.co")
            .failing("greenhouse.io");
        let (status, body) = send(
            app(search, FakeScraper::default()),
            post_json("/api/v1/jobs/search", json!({"job_title": "Rust Engineer"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"]["code"], "UPSTREAM_ERROR");
    }

    #[tokio::test]
    async fn test_similar_ranks_and_excludes_reference() {
        let (status, body) = send(
            idle_app(),
            post_json(
                "/api/v1/jobs/similar",
                json!({"reference_url": LEVER, "postings": postings_json(), "threshold": 0.99}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reference_url"], LEVER);
        let matches = body["matches"].as_array().unwrap();
        assert_eq!(matches[0]["posting"]["source_url"], GREENHOUSE);
        assert_eq!(matches[0]["rank"], 1);
        assert!(matches
            .iter()
            .all(|m| m["posting"]["source_url"] != LEVER));
    }

    #[tokio::test]
    async fn test_similar_unknown_reference_is_not_found() {
        let (status, _) = send(
            idle_app(),
            post_json(
                "/api/v1/jobs/similar",
                json!({"reference_url": "https://nowhere/1", "postings": postings_json()}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_similar_rejects_out_of_range_threshold() {
        let (status, _) = send(
            idle_app(),
            post_json(
                "/api/v1/jobs/similar",
                json!({"reference_url": LEVER, "postings": postings_json(), "threshold": 1.5}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_posting_without_url_is_rejected() {
        let (status, body) = send(
            idle_app(),
            post_json(
                "/api/v1/jobs/match",
                json!({"resume_text": "Rust", "postings": [{"url": "", "description": "Rust"}]}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "UNPROCESSABLE_ENTITY");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .contains("source URL must not be empty"));
    }

    #[tokio::test]
    async fn test_malformed_json_uses_error_body() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/v1/jobs/search")
            .header("content-type", "application/json")
            .body(Body::from("{\"job_title\": "))
            .unwrap();
        let (status, body) = send(idle_app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_match_upload_posting_without_url_is_unprocessable() {
        let request = multipart_request(&[
            ("resume", Some("cv.txt"), "Rust developer"),
            ("postings", None, r#"[{"url": "", "description": "Rust"}]"#),
        ]);
        let (status, body) = send(idle_app(), request).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "UNPROCESSABLE_ENTITY");
    }

    #[tokio::test]
    async fn test_match_scores_postings() {
        let (status, body) = send(
            idle_app(),
            post_json(
                "/api/v1/jobs/match",
                json!({"resume_text": "Rust developer building backend services", "postings": postings_json()}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["diagnostic"].is_null());
        let matches = body["matches"].as_array().unwrap();
        assert_eq!(matches.len(), 3);
        let scores: Vec<f64> = matches
            .iter()
            .map(|m| m["match_percentage"].as_f64().unwrap())
            .collect();
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
        assert!(scores.iter().all(|s| (0.0..=100.0).contains(s)));
    }

    #[tokio::test]
    async fn test_match_empty_resume_reports_diagnostic() {
        let (status, body) = send(
            idle_app(),
            post_json(
                "/api/v1/jobs/match",
                json!({"resume_text": "  ", "postings": postings_json()}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["diagnostic"], "empty_resume_text");
        assert!(body["matches"].as_array().unwrap().is_empty());
    }

    fn multipart_request(parts: &[(&str, Option<&str>, &str)]) -> Request<Body> {
        let mut body = String::new();
        for (name, file_name, content) in parts {
            body.push_str("--BOUNDARY\r\n");
            match file_name {
                Some(file_name) => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: text/plain\r\n\r\n"
                )),
                None => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{name}\"\r\n\r\n"
                )),
            }
            body.push_str(content);
            body.push_str("\r\n");
        }
        body.push_str("--BOUNDARY--\r\n");

        Request::builder()
            .method("POST")
            .uri("/api/v1/jobs/match/upload")
            .header("content-type", "multipart/form-data; boundary=BOUNDARY")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_match_upload_text_resume() {
        let postings = postings_json().to_string();
        let request = multipart_request(&[
            ("resume", Some("cv.txt"), "Rust developer building backend services"),
            ("postings", None, postings.as_str()),
        ]);
        let (status, body) = send(idle_app(), request).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["diagnostic"].is_null());
        assert_eq!(body["matches"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_match_upload_requires_postings_part() {
        let request = multipart_request(&[("resume", Some("cv.txt"), "Rust developer")]);
        let (status, _) = send(idle_app(), request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_report_dedups_ranks_and_matches() {
        let search = FakeSearch::default()
            .with("jobs.lever.co", &[LEVER])
            .with("greenhouse.io", &[GREENHOUSE]);
        let scraper = FakeScraper::default()
            .with(LEVER, None, "Build backend services in Rust")
            .with(GREENHOUSE, None, "Build backend services in Rust");

        let (status, body) = send(
            app(search, scraper),
            post_json(
                "/api/v1/jobs/report",
                json!({"job_title": "Rust Engineer", "resume_text": "Rust backend developer"}),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["summary"]["admitted"], 2);
        assert_eq!(body["duplicates_removed"], 1);
        assert_eq!(body["postings"].as_array().unwrap().len(), 1);
        assert_eq!(body["similar"]["reference_url"], LEVER);
        assert!(body["similar"]["matches"].as_array().unwrap().is_empty());
        assert_eq!(body["resume"]["matches"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_report_without_resume_falls_back_to_configured_file() {
        let search = FakeSearch::default().with("jobs.lever.co", &[LEVER]);
        let scraper = FakeScraper::default().with(LEVER, None, "Rust services");

        let (status, body) = send(
            app(search, scraper),
            post_json("/api/v1/jobs/report", json!({"job_title": "Rust Engineer"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["resume"]["diagnostic"], "resume_unreadable");
    }
}
