pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::generation::handlers as generation;
use crate::render::handlers as render;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Generation API
        .route(
            "/api/v1/reports/generate",
            post(generation::handle_generate),
        )
        .route("/api/v1/reports/demo", get(generation::handle_demo))
        // Render API
        .route("/api/v1/reports/pdf", post(render::handle_pdf))
        .route("/api/v1/reports/preview", post(render::handle_preview))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::{test_config, Config};
    use crate::generation::sections::SectionKind;
    use crate::llm_client::LlmError;
    use crate::testing::{sample_full_report, sample_input, MockCompletion, MockPdf, MOCK_PDF_BYTES};

    struct Harness {
        llm: Arc<MockCompletion>,
        pdf: Arc<MockPdf>,
        router: Router,
    }

    fn harness_with(llm: MockCompletion, pdf: MockPdf, config: Config) -> Harness {
        let llm = Arc::new(llm);
        let pdf = Arc::new(pdf);
        let state = AppState {
            llm: llm.clone(),
            pdf: pdf.clone(),
            config,
        };
        Harness {
            llm,
            pdf,
            router: build_router(state),
        }
    }

    fn harness(llm: MockCompletion) -> Harness {
        harness_with(llm, MockPdf::default(), test_config())
    }

    async fn post_json(router: &Router, uri: &str, body: Value) -> Response {
        router
            .clone()
            .oneshot(
                Request::post(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    async fn body_json(response: Response) -> Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    // ── Generation ──────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_blank_name_is_rejected_without_provider_call() {
        let h = harness(MockCompletion::well_formed());
        let mut input = sample_input();
        input.student_info.name = String::new();

        let response = post_json(&h.router, "/api/v1/reports/generate", json!({ "input": input })).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["error"].as_str().unwrap().contains("请填写学生姓名"));
        assert_eq!(h.llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_valid_input_returns_full_document() {
        let h = harness(MockCompletion::well_formed());

        let response = post_json(
            &h.router,
            "/api/v1/reports/generate",
            json!({ "input": sample_input() }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], true);

        let generated = body["data"]["generated"].as_object().unwrap();
        let mut keys: Vec<_> = generated.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(
            keys,
            vec![
                "careerAdvice",
                "careerMatches",
                "developmentPaths",
                "educationProjects",
                "familyCooperationAdvice",
                "personalityAnalysis",
                "summary",
                "supplyChainProjects",
                "timeline",
            ]
        );
        let generated_at = body["data"]["generatedAt"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(generated_at).is_ok());
        assert_eq!(h.llm.calls(), 7);
    }

    #[tokio::test]
    async fn test_single_section_failure_returns_500_without_data() {
        let h = harness(MockCompletion::well_formed().failing(
            SectionKind::EducationProjects,
            LlmError::Api {
                status: 502,
                message: "bad gateway".into(),
            },
        ));

        let response = post_json(
            &h.router,
            "/api/v1/reports/generate",
            json!({ "input": sample_input() }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert!(body.get("data").is_none());
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_shape_drift_returns_500() {
        let h = harness(
            MockCompletion::well_formed()
                .responding(SectionKind::PersonalityAnalysis, r#"{"type": "INTJ"}"#),
        );

        let response = post_json(
            &h.router,
            "/api/v1/reports/generate",
            json!({ "input": sample_input() }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["code"], "SHAPE_DRIFT");
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("personalityAnalysis section"));
    }

    #[tokio::test]
    async fn test_missing_credential_is_500_before_provider_call() {
        let config = Config {
            deepseek_api_key: None,
            ..test_config()
        };
        let h = harness_with(MockCompletion::well_formed(), MockPdf::default(), config);

        let response = post_json(
            &h.router,
            "/api/v1/reports/generate",
            json!({ "input": sample_input() }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["code"], "MISSING_CREDENTIAL");
        assert_eq!(h.llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_caller_key_is_forwarded() {
        let h = harness(MockCompletion::well_formed());

        let response = post_json(
            &h.router,
            "/api/v1/reports/generate",
            json!({ "input": sample_input(), "apiKey": "sk-caller" }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(h.llm.credentials().iter().all(|c| c == "sk-caller"));
    }

    #[tokio::test]
    async fn test_rejected_key_is_400() {
        let h = harness(MockCompletion::well_formed().failing(
            SectionKind::Timeline,
            LlmError::Api {
                status: 401,
                message: "Authentication Fails".into(),
            },
        ));

        let response = post_json(
            &h.router,
            "/api/v1/reports/generate",
            json!({ "input": sample_input(), "apiKey": "sk-wrong" }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "CREDENTIAL_ERROR");
    }

    #[tokio::test]
    async fn test_missing_input_is_400() {
        let h = harness(MockCompletion::well_formed());
        let response = post_json(&h.router, "/api/v1/reports/generate", json!({})).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "请填写学生基础信息");
    }

    #[tokio::test]
    async fn test_unknown_grade_is_400() {
        let h = harness(MockCompletion::well_formed());
        let mut input = serde_json::to_value(sample_input()).unwrap();
        input["studentInfo"]["grade"] = json!("研一");

        let response = post_json(&h.router, "/api/v1/reports/generate", json!({ "input": input })).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
        assert_eq!(h.llm.calls(), 0);
    }

    #[tokio::test]
    async fn test_demo_needs_no_credential() {
        let config = Config {
            deepseek_api_key: None,
            ..test_config()
        };
        let h = harness_with(MockCompletion::well_formed(), MockPdf::default(), config);

        let response = h
            .router
            .clone()
            .oneshot(Request::get("/api/v1/reports/demo").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["data"]["input"]["studentInfo"]["name"], "张明轩");
        assert_eq!(h.llm.calls(), 0);
    }

    // ── Render ──────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_pdf_endpoint_returns_attachment() {
        let h = harness(MockCompletion::well_formed());

        let response = post_json(
            &h.router,
            "/api/v1/reports/pdf",
            json!({ "reportData": sample_full_report() }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment; filename*=UTF-8''"));
        let encoded_name = urlencoding::encode("张明轩-高二-生涯定制报告-").into_owned();
        assert!(disposition.contains(&encoded_name));
        assert_eq!(body_bytes(response).await, MOCK_PDF_BYTES);
        assert_eq!(h.pdf.rendered().len(), 1);
    }

    #[tokio::test]
    async fn test_pdf_drops_unknown_category_items() {
        let h = harness(MockCompletion::well_formed());
        let mut report = serde_json::to_value(sample_full_report()).unwrap();
        let project = |name: &str, category: &str| {
            json!({
                "name": name,
                "tuitionRange": "10万",
                "advantages": ["a"],
                "disadvantages": ["b"],
                "recommendIndex": 3,
                "consultingFeeRange": "1万",
                "category": category
            })
        };
        report["generated"]["educationProjects"] = json!([
            project("升学项目甲", "升学类"),
            project("背景项目乙", "背景提升类"),
            project("兜底项目丙", "兜底类"),
            project("神秘项目丁", "神秘类"),
        ]);

        let response = post_json(&h.router, "/api/v1/reports/pdf", json!({ "reportData": report })).await;
        assert_eq!(response.status(), StatusCode::OK);

        let rendered = h.pdf.rendered();
        let html = &rendered[0];
        let detail = html.split("<section class=\"page").nth(7).unwrap();
        assert_eq!(detail.matches("class=\"category-block\"").count(), 3);
        for block in detail.split("class=\"category-block\"").skip(1) {
            assert_eq!(block.matches("class=\"card project-detail\"").count(), 1);
        }
        assert!(!detail.contains("神秘项目丁"));
    }

    #[tokio::test]
    async fn test_pdf_failure_is_500() {
        let h = harness_with(MockCompletion::well_formed(), MockPdf::failing(), test_config());

        let response = post_json(
            &h.router,
            "/api/v1/reports/pdf",
            json!({ "reportData": sample_full_report() }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["code"], "PDF_ERROR");
    }

    #[tokio::test]
    async fn test_pdf_without_report_is_400() {
        let h = harness(MockCompletion::well_formed());
        let response = post_json(&h.router, "/api/v1/reports/pdf", json!({})).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "请提供报告数据");
        assert!(h.pdf.rendered().is_empty());
    }

    #[tokio::test]
    async fn test_preview_returns_html() {
        let h = harness(MockCompletion::well_formed());

        let response = post_json(
            &h.router,
            "/api/v1/reports/preview",
            json!({ "reportData": sample_full_report() }),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
        assert!(content_type.starts_with("text/html"));
        let html = String::from_utf8(body_bytes(response).await).unwrap();
        assert!(html.contains("张明轩 - 生涯定制报告"));
        assert!(h.pdf.rendered().is_empty());
    }

    #[tokio::test]
    async fn test_health() {
        let h = harness(MockCompletion::well_formed());
        let response = h
            .router
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "career-report-api");
    }
}
