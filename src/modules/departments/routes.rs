use actix_web::{web, HttpResponse};
use serde_json::json;
use sqlx::{Pool, Sqlite};

use crate::error::{AppError, AppResult};
use crate::modules::departments::models::{Department, DepartmentPayload, DepartmentSummary};

async fn fetch_department(pool: &Pool<Sqlite>, id: i64) -> AppResult<Department> {
    sqlx::query_as::<_, Department>("SELECT * FROM departments WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::not_found("Department"))
}

/// 科室列表，按名称升序
/// GET /api/departments
pub async fn list_departments(pool: web::Data<Pool<Sqlite>>) -> AppResult<HttpResponse> {
    let rows = sqlx::query_as::<_, Department>("SELECT * FROM departments ORDER BY name")
        .fetch_all(pool.get_ref())
        .await?;
    Ok(HttpResponse::Ok().json(rows))
}

/// GET /api/departments/{id}
pub async fn get_department(
    pool: web::Data<Pool<Sqlite>>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let department = fetch_department(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(department))
}

/// 科室支出汇总：总支出与剩余预算
/// GET /api/departments/{id}/summary
pub async fn department_summary(
    pool: web::Data<Pool<Sqlite>>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let summary = sqlx::query_as::<_, DepartmentSummary>(
        r#"
        SELECT
            d.id,
            d.name,
            d.budget,
            d.created_at,
            COALESCE(SUM(e.amount), 0.0) as total_expenses,
            (d.budget - COALESCE(SUM(e.amount), 0.0)) as remaining_budget
        FROM departments d
        LEFT JOIN expenses e ON d.id = e.department_id
        WHERE d.id = ?
        GROUP BY d.id
        "#,
    )
    .bind(path.into_inner())
    .fetch_optional(pool.get_ref())
    .await?
    .ok_or_else(|| AppError::not_found("Department"))?;

    Ok(HttpResponse::Ok().json(summary))
}

/// POST /api/departments
pub async fn create_department(
    pool: web::Data<Pool<Sqlite>>,
    payload: web::Json<DepartmentPayload>,
) -> AppResult<HttpResponse> {
    payload.validate()?;

    let result = sqlx::query("INSERT INTO departments (name, budget) VALUES (?, ?)")
        .bind(&payload.name)
        .bind(payload.budget)
        .execute(pool.get_ref())
        .await?;

    let department = fetch_department(pool.get_ref(), result.last_insert_rowid()).await?;
    Ok(HttpResponse::Created().json(department))
}

/// PUT /api/departments/{id}
pub async fn update_department(
    pool: web::Data<Pool<Sqlite>>,
    path: web::Path<i64>,
    payload: web::Json<DepartmentPayload>,
) -> AppResult<HttpResponse> {
    payload.validate()?;
    let id = path.into_inner();

    let result = sqlx::query("UPDATE departments SET name = ?, budget = ? WHERE id = ?")
        .bind(&payload.name)
        .bind(payload.budget)
        .bind(id)
        .execute(pool.get_ref())
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Department"));
    }

    let department = fetch_department(pool.get_ref(), id).await?;
    Ok(HttpResponse::Ok().json(department))
}

/// 删除科室。不级联、不置空：引用它的支出保持悬挂引用。
/// DELETE /api/departments/{id}
pub async fn delete_department(
    pool: web::Data<Pool<Sqlite>>,
    path: web::Path<i64>,
) -> AppResult<HttpResponse> {
    let result = sqlx::query("DELETE FROM departments WHERE id = ?")
        .bind(path.into_inner())
        .execute(pool.get_ref())
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Department"));
    }
    Ok(HttpResponse::Ok().json(json!({ "message": "Department deleted successfully" })))
}

/// 注册科室路由
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/departments", web::get().to(list_departments))
        .route("/departments", web::post().to(create_department))
        .route("/departments/{id}", web::get().to(get_department))
        .route("/departments/{id}/summary", web::get().to(department_summary))
        .route("/departments/{id}", web::put().to(update_department))
        .route("/departments/{id}", web::delete().to(delete_department));
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
    async fn test_list_ordered_by_name() {
        let (app, _pool) = test_app().await;

        let req = test::TestRequest::get().uri("/departments").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let rows: Vec<serde_json::Value> = test::read_body_json(resp).await;
        let names: Vec<&str> = rows.iter().map(|r| r["name"].as_str().unwrap()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[actix_web::test]
    async fn test_create_negative_budget_rejected() {
        let (app, _pool) = test_app().await;

        let req = test::TestRequest::post()
            .uri("/departments")
            .set_json(json!({"name": "Oncology", "budget": -100}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["errors"][0]["field"], "budget");
    }

    #[actix_web::test]
    async fn test_summary_includes_expense_totals() {
        let (app, pool) = test_app().await;

        // 对 1 号科室记两笔支出
        for amount in [100.0, 250.0] {
            sqlx::query(
                "INSERT INTO expenses (department_id, amount, description, date) VALUES (1, ?, 'supplies', '2024-02-01')",
            )
            .bind(amount)
            .execute(&pool)
            .await
            .expect("insert");
        }

        let req = test::TestRequest::get()
            .uri("/departments/1/summary")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["total_expenses"], 350.0);
        let budget = body["budget"].as_f64().unwrap();
        assert_eq!(body["remaining_budget"].as_f64().unwrap(), budget - 350.0);
    }

    #[actix_web::test]
    async fn test_summary_unknown_department_not_found() {
        let (app, _pool) = test_app().await;

        let req = test::TestRequest::get()
            .uri("/departments/9999/summary")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);
    }

    #[actix_web::test]
    async fn test_delete_leaves_expense_dangling() {
        let (app, pool) = test_app().await;

        sqlx::query(
            "INSERT INTO expenses (department_id, amount, description, date) VALUES (1, 50, 'gauze', '2024-02-01')",
        )
        .execute(&pool)
        .await
        .expect("insert");

        let req = test::TestRequest::delete()
            .uri("/departments/1")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        // 支出仍指向已删除的科室 id，不被级联删除也不置空
        let (dept_id,): (Option<i64>,) =
            sqlx::query_as("SELECT department_id FROM expenses LIMIT 1")
                .fetch_one(&pool)
                .await
                .expect("fetch");
        assert_eq!(dept_id, Some(1));
    }
}
