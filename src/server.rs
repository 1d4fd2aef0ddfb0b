use crate::{
    config::{Config, DEFAULT_CORS_ORIGIN},
    design::DesignService,
    error::DesignError,
    models::DesignRequest,
};
use actix_web::{
    error,
    http::{header, Method},
    middleware::DefaultHeaders,
    web, App, HttpRequest, HttpResponse, HttpServer,
};
use serde_json::json;

const MAX_BODY_BYTES: usize = 16 * 1024;

pub async fn generate_design(
    service: web::Data<DesignService>,
    body: web::Json<DesignRequest>,
) -> Result<HttpResponse, DesignError> {
    let request = body.into_inner();
    let result = service.design(&request).await?;
    Ok(HttpResponse::Ok().json(result))
}

pub async fn health(service: web::Data<DesignService>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "provider": service.provider(),
        "configured": service.is_configured(),
    }))
}

async fn preflight() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

async fn fallback(req: HttpRequest) -> HttpResponse {
    if req.method() == Method::OPTIONS {
        preflight().await
    } else {
        HttpResponse::NotFound().json(json!({ "error": "Not found" }))
    }
}

pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(MAX_BODY_BYTES)
        .error_handler(|err, _req| {
            log::warn!("Invalid request body: {}", err);
            let response = HttpResponse::BadRequest().json(json!({ "error": "Invalid request body" }));
            error::InternalError::from_response(err, response).into()
        })
}

/// CORS headers for the single allowed front-end origin.
pub fn cors_headers(origin: &str) -> DefaultHeaders {
    let origin = if header::HeaderValue::from_str(origin).is_ok() {
        origin.to_string()
    } else {
        log::warn!("Invalid CORS origin '{}', using {}", origin, DEFAULT_CORS_ORIGIN);
        DEFAULT_CORS_ORIGIN.to_string()
    };

    DefaultHeaders::new()
        .add((header::ACCESS_CONTROL_ALLOW_ORIGIN, origin))
        .add((header::ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, OPTIONS"))
        .add((header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"))
        .add((header::ACCESS_CONTROL_ALLOW_CREDENTIALS, "true"))
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/design").service(
            web::resource("/generate")
                .route(web::post().to(generate_design))
                .route(web::method(Method::OPTIONS).to(preflight)),
        ),
    )
    .service(
        web::resource("/health")
            .route(web::get().to(health))
            .route(web::method(Method::OPTIONS).to(preflight)),
    )
    .default_service(web::to(fallback));
}

pub async fn run(config: Config, service: DesignService) -> std::io::Result<()> {
    let data = web::Data::new(service);
    let origin = config.cors_origin.clone();

    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .app_data(json_config())
            .wrap(cors_headers(&origin))
            .configure(routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GenerationConfig;
    use crate::design::testing::*;
    use crate::design::ImageRequestOrchestrator;
    use actix_web::{http::StatusCode, test};
    use std::sync::Arc;

    fn service(generator: Arc<RecordingGenerator>) -> DesignService {
        DesignService::new(ImageRequestOrchestrator::new(
            generator,
            &GenerationConfig::default(),
        ))
    }

    fn form() -> serde_json::Value {
        json!({
            "plotLength": "30",
            "plotWidth": "40",
            "facing": "North",
            "floors": 1,
            "bedrooms": 2,
            "style": "Modern",
            "vastu": "Tamil Nadu"
        })
    }

    macro_rules! app {
        ($service:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($service))
                    .app_data(json_config())
                    .wrap(cors_headers("http://localhost:3000"))
                    .configure(routes),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_generate_returns_three_slots() {
        let generator = Arc::new(RecordingGenerator::new().failing_on(EXTERIOR_MARKER));
        let app = app!(service(generator.clone()));

        let req = test::TestRequest::post()
            .uri("/api/design/generate")
            .set_json(form())
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:3000"
        );
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["floor2D"], "data:image/png;base64,cG5nIQ==");
        assert_eq!(body["floor3D"], "data:image/png;base64,cG5nIQ==");
        assert!(body["exterior"].is_null());
        assert_eq!(generator.calls(), 3);
    }

    #[actix_web::test]
    async fn test_missing_dimension_is_bad_request() {
        let generator = Arc::new(RecordingGenerator::new());
        let app = app!(service(generator.clone()));

        let mut body = form();
        body["plotWidth"] = json!("");
        let req = test::TestRequest::post()
            .uri("/api/design/generate")
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": "Plot length and width are required" }));
        assert_eq!(generator.calls(), 0);
    }

    #[actix_web::test]
    async fn test_unconfigured_generator_is_server_error() {
        let app = app!(DesignService::unconfigured("OPENAI_API_KEY missing"));

        let req = test::TestRequest::post()
            .uri("/api/design/generate")
            .set_json(form())
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": "AI generation failed" }));
    }

    #[actix_web::test]
    async fn test_malformed_body_is_bad_request() {
        let app = app!(service(Arc::new(RecordingGenerator::new())));

        let req = test::TestRequest::post()
            .uri("/api/design/generate")
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .set_payload("{\"plotLength\": [30]")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Invalid request body");
    }

    #[actix_web::test]
    async fn test_health_and_preflight() {
        let app = app!(service(Arc::new(RecordingGenerator::new())));

        let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["provider"], "fake");
        assert_eq!(body["configured"], true);

        let preflight = test::TestRequest::default()
            .method(Method::OPTIONS)
            .uri("/api/design/generate")
            .to_request();
        let resp = test::call_service(&app, preflight).await;
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert!(resp.headers().contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
    }

    #[actix_web::test]
    async fn test_preflight_answered_on_every_route() {
        let app = app!(service(Arc::new(RecordingGenerator::new())));

        for uri in ["/health", "/api/design/generate", "/api/unknown"] {
            let req = test::TestRequest::default()
                .method(Method::OPTIONS)
                .uri(uri)
                .insert_header((header::ORIGIN, "http://localhost:3000"))
                .to_request();
            let resp = test::call_service(&app, req).await;

            assert_eq!(resp.status(), StatusCode::NO_CONTENT, "{}", uri);
            assert_eq!(
                resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
                "http://localhost:3000"
            );
        }
    }

    #[actix_web::test]
    async fn test_panicking_slot_still_returns_partial_design() {
        let generator = Arc::new(RecordingGenerator::new().panicking_on(FLOOR_3D_MARKER));
        let app = app!(service(generator.clone()));

        let req = test::TestRequest::post()
            .uri("/api/design/generate")
            .set_json(form())
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["floor3D"].is_null());
        assert_eq!(body["floor2D"], "data:image/png;base64,cG5nIQ==");
        assert_eq!(body["exterior"], "data:image/png;base64,cG5nIQ==");
        assert_eq!(generator.calls(), 3);
    }
}
