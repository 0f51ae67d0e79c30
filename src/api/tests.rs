#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        response::IntoResponse,
        Router,
    };
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::util::ServiceExt;

    use crate::api::admin::ADMIN_PASSWORD_HEADER;
    use crate::api::router;
    use crate::auth::SharedSecretAuthenticator;
    use crate::domain::prediction::PredictionCatalog;
    use crate::error::AppError;
    use crate::report::XLSX_CONTENT_TYPE;
    use crate::service::{HoroscopeService, DEFAULT_RECENT_LIMIT};
    use crate::state::AppState;
    use crate::store::{MemoryPredictionLog, StoreError};

    const PASSWORD: &str = "cheers2026";

    fn setup_app() -> Router {
        let service = HoroscopeService::new(
            Arc::new(MemoryPredictionLog::new()),
            PredictionCatalog::default(),
            Arc::new(SharedSecretAuthenticator::new(PASSWORD)),
            DEFAULT_RECENT_LIMIT,
        );
        router(AppState {
            service: Arc::new(service),
        })
    }

    fn submit(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/predictions")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn admin(uri: &str, password: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(password) = password {
            builder = builder.header(ADMIN_PASSWORD_HEADER, password);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_create_prediction() {
        let app = setup_app();

        let response = app
            .clone()
            .oneshot(submit(json!({ "name": "Ada", "dob": "2000-06-15", "beer_score": 4 })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = json_body(response).await;
        assert_eq!(body["metrics"]["dob"], "15/06/2000");
        assert_eq!(body["metrics"]["western"], "Gemini");
        assert_eq!(body["metrics"]["chinese"], "Dragon");
        assert_eq!(body["metrics"]["beer_score"], 4);
        assert_eq!(body["success"], "2026 will open new doors. Enjoy the rise, like a cold Asahi Super Dry.");
        assert_eq!(body["love"], "Love will feel warm in 2026, soft like bubbles in a Sapporo Classic.");
        assert_eq!(body["visitor_count"], 1);

        // Score defaults to 3 when omitted.
        let response = app
            .oneshot(submit(json!({ "name": "Bob", "dob": "1990-03-20" })))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body["metrics"]["beer_score"], 3);
        assert_eq!(body["metrics"]["western"], "Pisces");
        assert_eq!(body["visitor_message"], "You are the 2nd person to check their beer destiny!");
    }

    #[tokio::test]
    async fn test_empty_name_is_rejected_without_write() {
        let app = setup_app();

        let response = app
            .clone()
            .oneshot(submit(json!({ "name": "", "dob": "2000-06-15", "beer_score": 4 })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "invalid_input");
        assert_eq!(body["error"]["message"], "Please enter your name!");

        let response = app.oneshot(admin("/api/admin/recent", Some(PASSWORD))).await.unwrap();
        let body = json_body(response).await;
        assert_eq!(body["total"], 0);
        assert_eq!(body["summary"]["top_western"], Value::Null);
    }

    #[tokio::test]
    async fn test_malformed_form_gets_json_error() {
        let app = setup_app();

        for body in [
            json!({ "name": "Ada", "dob": "15/06/2000", "beer_score": 4 }),
            json!({ "dob": "2000-06-15", "beer_score": 4 }),
            json!({ "name": "Ada", "dob": "2000-06-15", "beer_score": 300 }),
            json!({ "name": "Ada", "dob": "2000-06-15", "beer_score": -1 }),
        ] {
            let response = app.clone().oneshot(submit(body.clone())).await.unwrap();
            assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY, "{body}");
            let error = json_body(response).await;
            assert_eq!(error["error"]["code"], "invalid_input", "{body}");
            assert!(error["error"]["message"].as_str().is_some_and(|m| !m.is_empty()), "{body}");
        }

        let not_json = Request::builder()
            .method("POST")
            .uri("/api/predictions")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("name=Ada"))
            .unwrap();
        let response = app.clone().oneshot(not_json).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json_body(response).await["error"]["code"], "invalid_input");

        let response = app.oneshot(admin("/api/admin/recent", Some(PASSWORD))).await.unwrap();
        assert_eq!(json_body(response).await["total"], 0);
    }

    #[tokio::test]
    async fn test_poisoned_store_maps_to_storage_code() {
        let response = AppError::Storage(StoreError::Poisoned("memory".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(response).await["error"]["code"], "storage");

        let response = AppError::Storage(StoreError::Read {
            location: "predictions_log.csv".to_string(),
            reason: "bad header".to_string(),
        })
        .into_response();
        assert_eq!(json_body(response).await["error"]["code"], "storage_unreadable");
    }

    #[tokio::test]
    async fn test_admin_recent_gate() {
        let app = setup_app();
        app.clone()
            .oneshot(submit(json!({ "name": "Ada", "dob": "2000-06-15", "beer_score": 4 })))
            .await
            .unwrap();

        let response = app.clone().oneshot(admin("/api/admin/recent", None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app.clone().oneshot(admin("/api/admin/recent", Some(""))).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = app.clone().oneshot(admin("/api/admin/recent", Some("beer"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(json_body(response).await["error"]["code"], "forbidden");

        let response = app.oneshot(admin("/api/admin/recent", Some(PASSWORD))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["recent"][0]["user_name"], "Ada");
        assert_eq!(body["recent"][0]["western"], "Gemini");
        assert_eq!(body["summary"]["top_beer_score"], 4);
    }

    #[tokio::test]
    async fn test_export_download() {
        let app = setup_app();

        let response = app.clone().oneshot(admin("/api/admin/export", Some("beer"))).await.unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app.oneshot(admin("/api/admin/export", Some(PASSWORD))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], XLSX_CONTENT_TYPE);

        let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
        assert!(disposition.starts_with("attachment; filename=\"predictions_summary_"), "{disposition}");
        assert!(disposition.ends_with(".xlsx\""), "{disposition}");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(body.starts_with(b"PK"));
    }

    #[tokio::test]
    async fn test_health() {
        let response = setup_app()
            .oneshot(Request::builder().uri("/_health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["version"], env!("CARGO_PKG_VERSION"));
    }
}
