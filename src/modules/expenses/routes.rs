use actix_web::{web, HttpResponse};
use serde_json::json;
use sqlx::{Pool, Sqlite};

use crate::error::{AppError, AppResult};
use crate::modules::expenses::models::{Expense, ExpensePayload};

const SELECT_WITH_DEPARTMENT: &str = r#"
    SELECT e.*, d.name as department_name
    FROM expenses e
    LEFT JOIN departments d ON e.department_id = d.id
"#;

/// 按 id 重查支出（写后回读，带科室名称）
async fn fetch_expense(pool: &Pool<Sqlite>, id: i64) -> AppResult<Expense> {
    let query = format!("{} WHERE e.id = ?", SELECT_WITH_DEPARTMENT);
    sqlx::query_as::<_, Expense>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::not_found("Expense"))
}

/// 支出列表，按日期倒序、创建时间倒序
/// GET /api/expenses
pub async fn list_expenses(pool: web::Data<Pool<Sqlite>>) -> AppResult<HttpResponse> {
    let query = format!(
        "{} ORDER BY e.date DESC, e.created_at DESC",
        SELECT_WITH_DEPARTMENT
    );
    let rows = sqlx::query_as::<_, Expense>(&query)
        .fetch_all(pool.get_ref())
        .await?;
    Ok(HttpResponse::Ok().json(rows))
}

/// GET /api/expenses/{id}
pub async fn get_expense(
    pool: web::Data<Pool<Sqlite>>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let row = fetch_expense(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(row))
}

/// 某科室的全部支出
/// GET /api/expenses/department/{departmentId}
pub async fn list_by_department(
    pool: web::Data<Pool<Sqlite>>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let rows = sqlx::query_as::<_, Expense>(
        r#"
        SELECT e.*, d.name as department_name
        FROM expenses e
        LEFT JOIN departments d ON e.department_id = d.id
        WHERE e.department_id = ?
        ORDER BY e.date DESC
        "#,
    )
    .bind(path.into_inner())
    .fetch_all(pool.get_ref())
    .await?;
    Ok(HttpResponse::Ok().json(rows))
}

/// POST /api/expenses
pub async fn create_expense(
    pool: web::Data<Pool<Sqlite>>,
    payload: web::Json<ExpensePayload>,
) -> AppResult<HttpResponse> {
    payload.validate()?;
    let department_id = payload.department_id()?;

    let result = sqlx::query(
        "INSERT INTO expenses (department_id, amount, description, date) VALUES (?, ?, ?, ?)",
    )
    .bind(department_id)
    .bind(payload.amount)
    .bind(payload.description())
    .bind(&payload.date)
    .execute(pool.get_ref())
    .await?;

    let row = fetch_expense(pool.get_ref(), result.last_insert_rowid()).await?;
    Ok(HttpResponse::Created().json(row))
}

/// PUT /api/expenses/{id}
pub async fn update_expense(
    pool: web::Data<Pool<Sqlite>>,
    path: web::Path<i64>,
    payload: web::Json<ExpensePayload>,
) -> AppResult<HttpResponse> {
    payload.validate()?;
    let department_id = payload.department_id()?;
    let id = path.into_inner();

    let result = sqlx::query(
        "UPDATE expenses SET department_id = ?, amount = ?, description = ?, date = ? WHERE id = ?",
    )
    .bind(department_id)
    .bind(payload.amount)
    .bind(payload.description())
    .bind(&payload.date)
    .bind(id)
    .execute(pool.get_ref())
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Expense"));
    }

    let row = fetch_expense(pool.get_ref(), id).await?;
    Ok(HttpResponse::Ok().json(row))
}

/// DELETE /api/expenses/{id}
pub async fn delete_expense(
    pool: web::Data<Pool<Sqlite>>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let result = sqlx::query("DELETE FROM expenses WHERE id = ?")
        .bind(path.into_inner())
        .execute(pool.get_ref())
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Expense"));
    }
    Ok(HttpResponse::Ok().json(json!({ "message": "Expense deleted successfully" })))
}

/// 注册支出路由
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/expenses", web::get().to(list_expenses))
        .route("/expenses", web::post().to(create_expense))
        .route(
            "/expenses/department/{departmentId}",
            web::get().to(list_by_department),
        )
        .route("/expenses/{id}", web::get().to(get_expense))
        .route("/expenses/{id}", web::put().to(update_expense))
        .route("/expenses/{id}", web::delete().to(delete_expense));
}
