use actix_web::{HttpResponse, Responder, web};
use chrono::Utc;
use serde_json::json;
use tracing::error;

use crate::store::Store;

/// Health check. Static response, no database interaction.
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is up", body = Object, example = json!({
            "status": "OK",
            "timestamp": "2024-01-05T09:00:00Z",
            "version": "0.1.0"
        }))
    ),
    tag = "Status"
)]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "OK",
        "timestamp": Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// API connectivity test. Issues a trivial query against the database.
#[utoipa::path(
    get,
    path = "/api/test",
    responses(
        (status = 200, description = "API and database reachable", body = Object, example = json!({
            "message": "API is working",
            "database": "connected"
        })),
        (status = 500, description = "Database unreachable")
    ),
    tag = "Status"
)]
pub async fn test(store: web::Data<Store>) -> impl Responder {
    match store.ping().await {
        Ok(()) => HttpResponse::Ok().json(json!({
            "message": "API is working",
            "database": "connected"
        })),
        Err(e) => {
            error!(error = %e, "Connectivity test failed");
            HttpResponse::InternalServerError().json(json!({
                "message": "API is working",
                "database": "disconnected"
            }))
        }
    }
}

/// Database status check
#[utoipa::path(
    get,
    path = "/api/db-status",
    responses(
        (status = 200, description = "Database connected", body = Object, example = json!({
            "connected": true
        })),
        (status = 500, description = "Database disconnected", body = Object, example = json!({
            "connected": false
        }))
    ),
    tag = "Status"
)]
pub async fn db_status(store: web::Data<Store>) -> impl Responder {
    match store.ping().await {
        Ok(()) => HttpResponse::Ok().json(json!({ "connected": true })),
        Err(e) => {
            error!(error = %e, "Database status check failed");
            HttpResponse::InternalServerError().json(json!({ "connected": false }))
        }
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test, web};

    #[actix_web::test]
    async fn health_reports_status_and_version() {
        let app = test::init_service(
            App::new().route("/api/health", web::get().to(super::health)),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "OK");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        assert!(body["timestamp"].is_string());
    }
}
