use crate::api::{attendance, status};
use actix_web::web;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(web::resource("/health").route(web::get().to(status::health)))
            .service(web::resource("/test").route(web::get().to(status::test)))
            .service(web::resource("/db-status").route(web::get().to(status::db_status)))
            .service(
                web::scope("/attendance")
                    // /attendance
                    .service(
                        web::resource("")
                            .route(web::get().to(attendance::list_attendance))
                            .route(web::post().to(attendance::create_attendance)),
                    )
                    // /attendance/filter
                    .service(
                        web::resource("/filter").route(web::get().to(attendance::filter_attendance)),
                    )
                    // /attendance/{id}
                    .service(
                        web::resource("/{id}").route(web::delete().to(attendance::delete_attendance)),
                    ),
            ),
    );
}

#[cfg(test)]
mod tests {
    use actix_web::{App, http::StatusCode, test};

    // Routes that touch no storage can be exercised without a Store in
    // app data; handlers that do need it are covered by their own tests.
    #[actix_web::test]
    async fn health_route_is_mounted_under_api() {
        let app = test::init_service(App::new().configure(super::configure)).await;

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn unknown_route_is_404() {
        let app = test::init_service(App::new().configure(super::configure)).await;

        let req = test::TestRequest::get().uri("/api/nope").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
