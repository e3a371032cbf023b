use actix_web::{web, HttpResponse};
use serde_json::json;
use sqlx::{Pool, Sqlite};

use crate::error::{AppError, AppResult};
use crate::modules::transactions::models::{Transaction, TransactionPayload};

const SELECT_WITH_PATIENT: &str = r#"
    SELECT t.*, p.name as patient_name
    FROM transactions t
    LEFT JOIN patients p ON t.patient_id = p.id
"#;

/// 按 id 重查流水（写后回读，带患者姓名）
async fn fetch_transaction(pool: &Pool<Sqlite>, id: i64) -> AppResult<Transaction> {
    let query = format!("{} WHERE t.id = ?", SELECT_WITH_PATIENT);
    sqlx::query_as::<_, Transaction>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::not_found("Transaction"))
}

/// 流水列表，按日期倒序、创建时间倒序
/// GET /api/transactions
pub async fn list_transactions(pool: web::Data<Pool<Sqlite>>) -> AppResult<HttpResponse> {
    let query = format!("{} ORDER BY t.date DESC, t.created_at DESC", SELECT_WITH_PATIENT);
    let rows = sqlx::query_as::<_, Transaction>(&query)
        .fetch_all(pool.get_ref())
        .await?;
    Ok(HttpResponse::Ok().json(rows))
}

/// GET /api/transactions/{id}
pub async fn get_transaction(
    pool: web::Data<Pool<Sqlite>>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let row = fetch_transaction(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(row))
}

/// 某患者的全部流水
/// GET /api/transactions/patient/{patientId}
pub async fn list_by_patient(
    pool: web::Data<Pool<Sqlite>>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let rows = sqlx::query_as::<_, Transaction>(
        r#"
        SELECT t.*, p.name as patient_name
        FROM transactions t
        LEFT JOIN patients p ON t.patient_id = p.id
        WHERE t.patient_id = ?
        ORDER BY t.date DESC
        "#,
    )
    .bind(path.into_inner())
    .fetch_all(pool.get_ref())
    .await?;
    Ok(HttpResponse::Ok().json(rows))
}

/// POST /api/transactions
pub async fn create_transaction(
    pool: web::Data<Pool<Sqlite>>,
    payload: web::Json<TransactionPayload>,
) -> AppResult<HttpResponse> {
    payload.validate()?;
    let patient_id = payload.patient_id()?;

    let result = sqlx::query(
        "INSERT INTO transactions (patient_id, amount, type, description, date) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(patient_id)
    .bind(payload.amount)
    .bind(&payload.r#type)
    .bind(payload.description())
    .bind(&payload.date)
    .execute(pool.get_ref())
    .await?;

    let row = fetch_transaction(pool.get_ref(), result.last_insert_rowid()).await?;
    Ok(HttpResponse::Created().json(row))
}

/// PUT /api/transactions/{id}
pub async fn update_transaction(
    pool: web::Data<Pool<Sqlite>>,
    path: web::Path<i64>,
    payload: web::Json<TransactionPayload>,
) -> AppResult<HttpResponse> {
    payload.validate()?;
    let patient_id = payload.patient_id()?;
    let id = path.into_inner();

    let result = sqlx::query(
        "UPDATE transactions SET patient_id = ?, amount = ?, type = ?, description = ?, date = ? WHERE id = ?",
    )
    .bind(patient_id)
    .bind(payload.amount)
    .bind(&payload.r#type)
    .bind(payload.description())
    .bind(&payload.date)
    .bind(id)
    .execute(pool.get_ref())
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Transaction"));
    }

    let row = fetch_transaction(pool.get_ref(), id).await?;
    Ok(HttpResponse::Ok().json(row))
}

/// DELETE /api/transactions/{id}
pub async fn delete_transaction(
    pool: web::Data<Pool<Sqlite>>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let result = sqlx::query("DELETE FROM transactions WHERE id = ?")
        .bind(path.into_inner())
        .execute(pool.get_ref())
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Transaction"));
    }
    Ok(HttpResponse::Ok().json(json!({ "message": "Transaction deleted successfully" })))
}

/// 注册流水路由
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/transactions", web::get().to(list_transactions))
        .route("/transactions", web::post().to(create_transaction))
        .route(
            "/transactions/patient/{patientId}",
            web::get().to(list_by_patient),
        )
        .route("/transactions/{id}", web::get().to(get_transaction))
        .route("/transactions/{id}", web::put().to(update_transaction))
        .route("/transactions/{id}", web::delete().to(delete_transaction));
}
