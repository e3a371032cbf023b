use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// 统一的 HTTP API 客户端（展示层通过它访问全部服务）
/// Uniform HTTP API client used by the presentation layer
pub struct ApiClient {
    base_url: String,
    token: Option<String>,
    http: reqwest::Client,
}

/// 一次仪表盘视图所需的全部聚合结果
pub struct DashboardView {
    pub summary: Value,
    pub recent_transactions: Vec<Value>,
    pub recent_expenses: Vec<Value>,
    pub department_budgets: Vec<Value>,
    pub monthly_revenue: Vec<Value>,
    pub monthly_expenses: Vec<Value>,
}

impl ApiClient {
    pub fn new<T: Into<String>>(base_url: T) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            http: reqwest::Client::new(),
        }
    }

    /// 登录并保存凭证
    pub async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        let resp = self
            .http
            .post(format!("{}/api/auth/login", self.base_url))
            .json(&serde_json::json!({ "username": username, "password": password }))
            .send()
            .await
            .context("登录请求失败")?;

        if !resp.status().is_success() {
            return Err(anyhow!("登录失败: HTTP {}", resp.status()));
        }
        let body: Value = resp.json().await.context("解析登录响应失败")?;
        let token = body["token"]
            .as_str()
            .ok_or_else(|| anyhow!("登录响应缺少 token"))?;
        self.token = Some(token.to_string());
        Ok(())
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let mut req = self.http.get(format!("{}{}", self.base_url, path));
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        let resp = req.send().await.with_context(|| format!("请求 {} 失败", path))?;
        if !resp.status().is_success() {
            return Err(anyhow!("{} 返回 HTTP {}", path, resp.status()));
        }
        resp.json::<T>()
            .await
            .with_context(|| format!("解析 {} 响应失败", path))
    }

    /// 并发拉取六个聚合端点；任一失败则整个视图失败
    /// Fetch all six aggregation endpoints concurrently;
    /// one failure aborts the whole view.
    pub async fn fetch_dashboard(&self) -> Result<DashboardView> {
        let (
            summary,
            recent_transactions,
            recent_expenses,
            department_budgets,
            monthly_revenue,
            monthly_expenses,
        ) = futures_util::try_join!(
            self.get_json::<Value>("/api/dashboard/summary"),
            self.get_json::<Vec<Value>>("/api/dashboard/recent-transactions"),
            self.get_json::<Vec<Value>>("/api/dashboard/recent-expenses"),
            self.get_json::<Vec<Value>>("/api/dashboard/department-budgets"),
            self.get_json::<Vec<Value>>("/api/dashboard/monthly-revenue"),
            self.get_json::<Vec<Value>>("/api/dashboard/monthly-expenses"),
        )?;

        Ok(DashboardView {
            summary,
            recent_transactions,
            recent_expenses,
            department_budgets,
            monthly_revenue,
            monthly_expenses,
        })
    }
}

/// 悬挂/缺失的关联显示为 "General"
/// Dangling/absent join targets render as "General"
fn display_name(value: &Value, key: &str) -> String {
    value[key]
        .as_str()
        .map(|s| s.to_string())
        .unwrap_or_else(|| "General".to_string())
}

/// 渲染仪表盘视图到终端
pub fn render_dashboard(view: &DashboardView) {
    let s = &view.summary;
    println!("仪表盘总览 / Dashboard Summary");
    println!("==============================");
    println!("患者总数: {}（在院 {}）", s["totalPatients"], s["activePatients"]);
    println!(
        "营收: {} − 账单 {} = 净营收 {}",
        s["totalRevenue"], s["totalCharges"], s["netRevenue"]
    );
    println!(
        "预算: {}，支出: {}，剩余: {}",
        s["totalBudget"], s["totalExpenses"], s["remainingBudget"]
    );
    println!();

    println!("科室预算占用 / Department Budgets");
    for row in &view.department_budgets {
        println!(
            "  {} - 预算 {} 已用 {} 剩余 {}（{}%）",
            row["name"], row["budget"], row["spent"], row["remaining"],
            row["utilization_percentage"]
        );
    }
    println!();

    println!("最近流水 / Recent Transactions");
    for row in &view.recent_transactions {
        println!(
            "  [{}] {} {} - {}",
            row["date"].as_str().unwrap_or(""),
            row["type"].as_str().unwrap_or(""),
            row["amount"],
            display_name(row, "patient_name")
        );
    }
    println!();

    println!("最近支出 / Recent Expenses");
    for row in &view.recent_expenses {
        println!(
            "  [{}] {} - {}",
            row["date"].as_str().unwrap_or(""),
            row["amount"],
            display_name(row, "department_name")
        );
    }
    println!();

    println!("月度营收 / Monthly Revenue");
    for row in &view.monthly_revenue {
        println!(
            "  {}: 营收 {} 账单 {}",
            row["month"].as_str().unwrap_or(""),
            row["revenue"],
            row["charges"]
        );
    }
    println!();

    println!("月度支出 / Monthly Expenses");
    for row in &view.monthly_expenses {
        println!(
            "  {}: {}",
            row["month"].as_str().unwrap_or(""),
            row["expenses"]
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_display_name_falls_back_to_general() {
        let with_name = json!({"department_name": "Emergency"});
        assert_eq!(display_name(&with_name, "department_name"), "Emergency");

        // 悬挂引用：join 字段为 null
        let dangling = json!({"department_name": null});
        assert_eq!(display_name(&dangling, "department_name"), "General");

        let absent = json!({});
        assert_eq!(display_name(&absent, "department_name"), "General");
    }
}
