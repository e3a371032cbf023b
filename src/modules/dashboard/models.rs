use serde::Serialize;

/// 仪表盘总览
/// Dashboard summary
///
/// netRevenue = Σpayments − Σcharges；
/// remainingBudget = totalBudget − totalExpenses（全局口径，不逐科室取下限）。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_patients: i64,
    pub active_patients: i64,
    pub total_revenue: f64,
    pub total_charges: f64,
    pub total_expenses: f64,
    pub net_revenue: f64,
    pub remaining_budget: f64,
    pub total_departments: i64,
    pub total_budget: f64,
}

/// 科室预算占用行
/// Department budget utilization row
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct DepartmentBudget {
    pub id: i64,
    pub name: String,
    pub budget: f64,
    pub spent: f64,
    pub remaining: f64,
    pub utilization_percentage: f64,
}

/// 月度营收行（滚动12个月，无流水的月份不出现）
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MonthlyRevenue {
    pub month: String,
    pub revenue: f64,
    pub charges: f64,
}

/// 月度支出行
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MonthlyExpense {
    pub month: String,
    pub expenses: f64,
}
