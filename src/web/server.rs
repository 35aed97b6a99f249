use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::api::ephemeris as ephemeris_handlers;
use super::api::lookup as lookup_handlers;
use super::api_doc::ApiDoc;
use super::state::AppState;
use super::ui::handlers as ui_handlers;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // UI routes
        .route("/", get(ui_handlers::index))
        .route("/ephemeris", get(ui_handlers::ephemeris))
        // JSON API
        .route("/api/ephemeris", get(ephemeris_handlers::get_ephemeris))
        .route("/api/tle/{query}", get(lookup_handlers::get_tle))
        .route("/api/geocode", get(lookup_handlers::geocode))
        .route("/api/timezone", get(lookup_handlers::timezone))
        // Static files
        .nest_service("/static", ServeDir::new("src/web/static"))
        // OpenAPI / Swagger
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run_server(state: AppState) -> std::io::Result<()> {
    let bind_addr = state.config.web.bind.clone();
    let app = router(state);

    log::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::web::Config;

    fn app() -> Router {
        router(AppState::new(Config::default()).unwrap())
    }

    async fn get(uri: &str) -> (StatusCode, String) {
        let response = app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn api_rejects_missing_location() {
        let (status, body) =
            get("/api/ephemeris?constellation=OneWeb&date=2024-07-04&start=21:00&end=21:30").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["error"], "validation_failed");
        assert!(json["message"]
            .as_str()
            .unwrap()
            .contains("latitude and longitude"));
    }

    #[tokio::test]
    async fn api_rejects_unknown_constellation() {
        let (status, body) = get(
            "/api/ephemeris?constellation=Iridium&lat=10&lon=20&date=2024-07-04&start=21:00&end=21:30",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("Unknown constellation"));
    }

    #[tokio::test]
    async fn api_rejects_malformed_time() {
        let (status, body) = get(
            "/api/ephemeris?constellation=OneWeb&lat=10&lon=20&date=2024-07-04&start=9pm&end=21:30",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("9pm"));
    }

    #[tokio::test]
    async fn results_page_shows_incomplete_form_message() {
        let (status, body) = get("/ephemeris?constellation=OneWeb").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Please fill in all fields"));
    }

    #[tokio::test]
    async fn index_lists_constellations_and_custom_option() {
        let (status, body) = get("/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("OneWeb"));
        assert!(body.contains("Custom Satellite"));
    }

    #[tokio::test]
    async fn timezone_endpoint_uses_boundaries() {
        let (status, body) = get("/api/timezone?lat=40.4168&lon=-3.7038").await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["name"], "Europe/Madrid");
        assert_eq!(json["diagnostics"].as_array().unwrap().len(), 0);
    }
}
