use actix_web::{web, HttpResponse};
use serde_json::json;
use sqlx::{Pool, Sqlite};

use crate::error::{AppError, AppResult};
use crate::modules::patients::models::{Patient, PatientPayload};

/// 按 id 重查患者（写后回读）
async fn fetch_patient(pool: &Pool<Sqlite>, id: i64) -> AppResult<Patient> {
    sqlx::query_as::<_, Patient>("SELECT * FROM patients WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::not_found("Patient"))
}

/// 患者列表，按创建时间倒序
/// GET /api/patients
pub async fn list_patients(pool: web::Data<Pool<Sqlite>>) -> AppResult<HttpResponse> {
    let rows = sqlx::query_as::<_, Patient>("SELECT * FROM patients ORDER BY created_at DESC")
        .fetch_all(pool.get_ref())
        .await?;
    Ok(HttpResponse::Ok().json(rows))
}

/// GET /api/patients/{id}
pub async fn get_patient(
    pool: web::Data<Pool<Sqlite>>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let patient = fetch_patient(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(patient))
}

/// POST /api/patients
pub async fn create_patient(
    pool: web::Data<Pool<Sqlite>>,
    payload: web::Json<PatientPayload>,
) -> AppResult<HttpResponse> {
    payload.validate()?;

    let result = sqlx::query(
        "INSERT INTO patients (name, admission_date, discharge_date, phone, address) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&payload.name)
    .bind(&payload.admission_date)
    .bind(payload.discharge_date())
    .bind(payload.phone())
    .bind(payload.address())
    .execute(pool.get_ref())
    .await?;

    let patient = fetch_patient(pool.get_ref(), result.last_insert_rowid()).await?;
    Ok(HttpResponse::Created().json(patient))
}

/// PUT /api/patients/{id}
pub async fn update_patient(
    pool: web::Data<Pool<Sqlite>>,
    path: web::Path<i64>,
    payload: web::Json<PatientPayload>,
) -> AppResult<HttpResponse> {
    payload.validate()?;
    let id = path.into_inner();

    let result = sqlx::query(
        "UPDATE patients SET name = ?, admission_date = ?, discharge_date = ?, phone = ?, address = ? WHERE id = ?",
    )
    .bind(&payload.name)
    .bind(&payload.admission_date)
    .bind(payload.discharge_date())
    .bind(payload.phone())
    .bind(payload.address())
    .bind(id)
    .execute(pool.get_ref())
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Patient"));
    }

    let patient = fetch_patient(pool.get_ref(), id).await?;
    Ok(HttpResponse::Ok().json(patient))
}

/// DELETE /api/patients/{id}
pub async fn delete_patient(
    pool: web::Data<Pool<Sqlite>>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let result = sqlx::query("DELETE FROM patients WHERE id = ?")
        .bind(path.into_inner())
        .execute(pool.get_ref())
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Patient"));
    }
    Ok(HttpResponse::Ok().json(json!({ "message": "Patient deleted successfully" })))
}

/// 注册患者路由
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/patients", web::get().to(list_patients))
        .route("/patients", web::post().to(create_patient))
        .route("/patients/{id}", web::get().to(get_patient))
        .route("/patients/{id}", web::put().to(update_patient))
        .route("/patients/{id}", web::delete().to(delete_patient));
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};

    use crate::db::{initialize_database, memory_pool};

    async fn test_app() -> (
        impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
        Pool<Sqlite>,
    ) {
        let pool = memory_pool().await.expect("pool");
        initialize_database(&pool).await.expect("init");
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(pool.clone()))
                .configure(configure_routes),
        )
        .await;
        (app, pool)
    }

    #[actix_web::test]
    async fn test_create_then_get_roundtrip() {
        let (app, _pool) = test_app().await;

        let req = test::TestRequest::post()
            .uri("/patients")
            .set_json(json!({
                "name": "Alice Park",
                "admission_date": "2024-03-01",
                "phone": "555-0199",
                "address": "12 Elm St"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 201);
        let created: serde_json::Value = test::read_body_json(resp).await;
        assert!(created["id"].is_i64());
        assert_eq!(created["name"], "Alice Park");
        assert_eq!(created["discharge_date"], serde_json::Value::Null);

        let id = created["id"].as_i64().unwrap();
        let req = test::TestRequest::get()
            .uri(&format!("/patients/{}", id))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let fetched: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(fetched["name"], created["name"]);
        assert_eq!(fetched["admission_date"], created["admission_date"]);
    }

    #[actix_web::test]
    async fn test_list_ordered_by_created_at_desc() {
        let (app, _pool) = test_app().await;

        let req = test::TestRequest::get().uri("/patients").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let rows: Vec<serde_json::Value> = test::read_body_json(resp).await;
        // 种子数据有三名患者
        assert_eq!(rows.len(), 3);
    }

    #[actix_web::test]
    async fn test_create_without_admission_date_rejected() {
        let (app, _pool) = test_app().await;

        let req = test::TestRequest::post()
            .uri("/patients")
            .set_json(json!({"name": "No Date"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["errors"][0]["field"], "admission_date");
    }

    #[actix_web::test]
    async fn test_update_unknown_id_not_found() {
        let (app, pool) = test_app().await;

        let req = test::TestRequest::put()
            .uri("/patients/9999")
            .set_json(json!({"name": "Ghost", "admission_date": "2024-03-01"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);

        // 未找到时不应产生任何写入
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM patients")
            .fetch_one(&pool)
            .await
            .expect("count");
        assert_eq!(count, 3);
    }

    #[actix_web::test]
    async fn test_delete_unknown_id_not_found() {
        let (app, _pool) = test_app().await;

        let req = test::TestRequest::delete()
            .uri("/patients/9999")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
    }

    #[actix_web::test]
    async fn test_delete_existing_patient() {
        let (app, _pool) = test_app().await;

        let req = test::TestRequest::delete().uri("/patients/1").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Patient deleted successfully");
    }
}
