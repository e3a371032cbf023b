use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

use crate::middleware::AuthGate;
use crate::modules;

/// 健康检查（无需认证）
/// GET /api/health
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "OK",
        "message": "Hospital Finance API is running"
    }))
}

/// 配置全局路由
///
/// `/api/health` 与 `/api/auth/*` 在认证门卫之外，
/// 其余记录/聚合路由统一挂在带 AuthGate 的内层 scope 下。
pub fn configure_global_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health))
            .configure(crate::auth::routes::configure_routes)
            .service(
                web::scope("")
                    .wrap(AuthGate)
                    .configure(modules::patients::configure_routes)
                    .configure(modules::departments::configure_routes)
                    .configure(modules::transactions::configure_routes)
                    .configure(modules::expenses::configure_routes)
                    .configure(modules::dashboard::configure_routes),
            ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};

    use crate::auth::jwt::issue_token;
    use crate::db::{initialize_database, memory_pool};

    async fn full_app() -> impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    > {
        let pool = memory_pool().await.expect("pool");
        initialize_database(&pool).await.expect("init");
        test::init_service(
            App::new()
                .app_data(web::Data::new(pool))
                .configure(configure_global_routes),
        )
        .await
    }

    #[actix_web::test]
    async fn test_health_without_token() {
        let app = full_app().await;

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "OK");
    }

    #[actix_web::test]
    async fn test_record_routes_require_token() {
        let app = full_app().await;

        for uri in [
            "/api/patients",
            "/api/departments",
            "/api/transactions",
            "/api/expenses",
            "/api/dashboard/summary",
        ] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = match test::try_call_service(&app, req).await {
                Ok(resp) => resp,
                Err(err) => actix_web::dev::ServiceResponse::new(
                    test::TestRequest::default().to_http_request(),
                    actix_web::HttpResponse::from_error(err),
                ),
            };
            assert_eq!(resp.status(), 401, "uri {} should be gated", uri);
        }
    }

    #[actix_web::test]
    async fn test_any_valid_credential_authorizes_any_operation() {
        let app = full_app().await;

        // 普通 user 角色同样可以访问所有端点（角色只存储，不判定）
        let token = issue_token(42, "clerk", "user").expect("token");
        let req = test::TestRequest::get()
            .uri("/api/dashboard/summary")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
    }

    #[actix_web::test]
    async fn test_auth_routes_outside_gate() {
        let app = full_app().await;

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({"username": "admin", "password": "admin123"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
    }
}
