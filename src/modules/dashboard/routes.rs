use actix_web::{web, HttpResponse};
use sqlx::{Pool, Sqlite};

use crate::error::AppResult;
use crate::modules::dashboard::models::{
    DashboardSummary, DepartmentBudget, MonthlyExpense, MonthlyRevenue,
};
use crate::modules::expenses::models::Expense;
use crate::modules::transactions::models::Transaction;

async fn scalar_i64(pool: &Pool<Sqlite>, query: &str) -> AppResult<i64> {
    let (v,): (i64,) = sqlx::query_as(query).fetch_one(pool).await?;
    Ok(v)
}

async fn scalar_f64(pool: &Pool<Sqlite>, query: &str) -> AppResult<f64> {
    let (v,): (f64,) = sqlx::query_as(query).fetch_one(pool).await?;
    Ok(v)
}

/// 仪表盘总览：全表聚合，按请求即时计算，不做缓存
/// GET /api/dashboard/summary
pub async fn summary(pool: web::Data<Pool<Sqlite>>) -> AppResult<HttpResponse> {
    let pool = pool.get_ref();

    let total_patients = scalar_i64(pool, "SELECT COUNT(*) FROM patients").await?;
    let active_patients = scalar_i64(
        pool,
        "SELECT COUNT(*) FROM patients WHERE discharge_date IS NULL",
    )
    .await?;
    let total_revenue = scalar_f64(
        pool,
        "SELECT COALESCE(SUM(amount), 0.0) FROM transactions WHERE type = 'payment'",
    )
    .await?;
    let total_charges = scalar_f64(
        pool,
        "SELECT COALESCE(SUM(amount), 0.0) FROM transactions WHERE type = 'charge'",
    )
    .await?;
    let total_expenses = scalar_f64(pool, "SELECT COALESCE(SUM(amount), 0.0) FROM expenses").await?;
    let total_departments = scalar_i64(pool, "SELECT COUNT(*) FROM departments").await?;
    let total_budget =
        scalar_f64(pool, "SELECT COALESCE(SUM(budget), 0.0) FROM departments").await?;

    let summary = DashboardSummary {
        total_patients,
        active_patients,
        total_revenue,
        total_charges,
        total_expenses,
        net_revenue: total_revenue - total_charges,
        remaining_budget: total_budget - total_expenses,
        total_departments,
        total_budget,
    };
    Ok(HttpResponse::Ok().json(summary))
}

/// 最近十笔流水，按创建时间倒序，带患者姓名
/// GET /api/dashboard/recent-transactions
pub async fn recent_transactions(pool: web::Data<Pool<Sqlite>>) -> AppResult<HttpResponse> {
    let rows = sqlx::query_as::<_, Transaction>(
        r#"
        SELECT t.*, p.name as patient_name
        FROM transactions t
        LEFT JOIN patients p ON t.patient_id = p.id
        ORDER BY t.created_at DESC
        LIMIT 10
        "#,
    )
    .fetch_all(pool.get_ref())
    .await?;
    Ok(HttpResponse::Ok().json(rows))
}

/// 最近十笔支出，按创建时间倒序，带科室名称
/// GET /api/dashboard/recent-expenses
pub async fn recent_expenses(pool: web::Data<Pool<Sqlite>>) -> AppResult<HttpResponse> {
    let rows = sqlx::query_as::<_, Expense>(
        r#"
        SELECT e.*, d.name as department_name
        FROM expenses e
        LEFT JOIN departments d ON e.department_id = d.id
        ORDER BY e.created_at DESC
        LIMIT 10
        "#,
    )
    .fetch_all(pool.get_ref())
    .await?;
    Ok(HttpResponse::Ok().json(rows))
}

/// 科室预算占用：LEFT JOIN 保证零支出科室也出现（spent=0），
/// 按占用率倒序。预算为 0 时占用率按 0 报告。
/// GET /api/dashboard/department-budgets
pub async fn department_budgets(pool: web::Data<Pool<Sqlite>>) -> AppResult<HttpResponse> {
    let rows = sqlx::query_as::<_, DepartmentBudget>(
        r#"
        SELECT
            d.id,
            d.name,
            d.budget,
            COALESCE(SUM(e.amount), 0.0) as spent,
            (d.budget - COALESCE(SUM(e.amount), 0.0)) as remaining,
            CASE
                WHEN d.budget > 0
                THEN ROUND((COALESCE(SUM(e.amount), 0.0) / d.budget * 100), 2)
                ELSE 0.0
            END as utilization_percentage
        FROM departments d
        LEFT JOIN expenses e ON d.id = e.department_id
        GROUP BY d.id, d.name, d.budget
        ORDER BY utilization_percentage DESC
        "#,
    )
    .fetch_all(pool.get_ref())
    .await?;
    Ok(HttpResponse::Ok().json(rows))
}

/// 月度营收趋势：滚动12个月，按自然月分组，升序；
/// 无流水的月份不补零、不出现。
/// GET /api/dashboard/monthly-revenue
pub async fn monthly_revenue(pool: web::Data<Pool<Sqlite>>) -> AppResult<HttpResponse> {
    let rows = sqlx::query_as::<_, MonthlyRevenue>(
        r#"
        SELECT
            strftime('%Y-%m', date) as month,
            SUM(CASE WHEN type = 'payment' THEN amount ELSE 0.0 END) as revenue,
            SUM(CASE WHEN type = 'charge' THEN amount ELSE 0.0 END) as charges
        FROM transactions
        WHERE date >= date('now', '-12 months')
        GROUP BY strftime('%Y-%m', date)
        ORDER BY month
        "#,
    )
    .fetch_all(pool.get_ref())
    .await?;
    Ok(HttpResponse::Ok().json(rows))
}

/// 月度支出趋势，口径同上
/// GET /api/dashboard/monthly-expenses
pub async fn monthly_expenses(pool: web::Data<Pool<Sqlite>>) -> AppResult<HttpResponse> {
    let rows = sqlx::query_as::<_, MonthlyExpense>(
        r#"
        SELECT
            strftime('%Y-%m', date) as month,
            SUM(amount) as expenses
        FROM expenses
        WHERE date >= date('now', '-12 months')
        GROUP BY strftime('%Y-%m', date)
        ORDER BY month
        "#,
    )
    .fetch_all(pool.get_ref())
    .await?;
    Ok(HttpResponse::Ok().json(rows))
}

/// 注册仪表盘路由
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/dashboard/summary", web::get().to(summary))
        .route(
            "/dashboard/recent-transactions",
            web::get().to(recent_transactions),
        )
        .route(
            "/dashboard/recent-expenses",
            web::get().to(recent_expenses),
        )
        .route(
            "/dashboard/department-budgets",
            web::get().to(department_budgets),
        )
        .route("/dashboard/monthly-revenue", web::get().to(monthly_revenue))
        .route(
            "/dashboard/monthly-expenses",
            web::get().to(monthly_expenses),
        );
}
