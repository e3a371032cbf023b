use sqlx::{Pool, Sqlite};
use tracing::info;

use crate::auth::password::hash_password;
use crate::error::AppResult;

/// 初始化数据库：建表 + 种子数据
/// Initialize the database: create tables + seed rows
///
/// 幂等：建表使用 IF NOT EXISTS，种子插入以数据存在性为条件，
/// 可在每次启动前安全地重复执行。
pub async fn initialize_database(pool: &Pool<Sqlite>) -> AppResult<()> {
    create_tables(pool).await?;
    seed_data(pool).await?;
    info!("Database initialized successfully");
    Ok(())
}

async fn create_tables(pool: &Pool<Sqlite>) -> AppResult<()> {
    // 用户表
    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            username TEXT UNIQUE NOT NULL,
            password TEXT NOT NULL,
            role TEXT NOT NULL DEFAULT 'user',
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )"#,
    )
    .execute(pool)
    .await?;

    // 科室表
    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS departments (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            budget REAL NOT NULL DEFAULT 0,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )"#,
    )
    .execute(pool)
    .await?;

    // 患者表
    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS patients (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            admission_date DATE,
            discharge_date DATE,
            phone TEXT,
            address TEXT,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )"#,
    )
    .execute(pool)
    .await?;

    // 收费/付款流水表；patient_id 为弱引用，删除患者不级联
    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS transactions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            patient_id INTEGER,
            amount REAL NOT NULL,
            type TEXT NOT NULL,
            description TEXT,
            date DATE NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            FOREIGN KEY (patient_id) REFERENCES patients (id)
        )"#,
    )
    .execute(pool)
    .await?;

    // 科室支出表；department_id 为弱引用
    sqlx::query(
        r#"CREATE TABLE IF NOT EXISTS expenses (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            department_id INTEGER,
            amount REAL NOT NULL,
            description TEXT,
            date DATE NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            FOREIGN KEY (department_id) REFERENCES departments (id)
        )"#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn seed_data(pool: &Pool<Sqlite>) -> AppResult<()> {
    // 默认管理员：username 唯一约束保证幂等
    let admin_exists: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM users WHERE username = ?")
            .bind("admin")
            .fetch_optional(pool)
            .await?;
    if admin_exists.is_none() {
        let hashed = hash_password("admin123")?;
        sqlx::query("INSERT OR IGNORE INTO users (username, password, role) VALUES (?, ?, ?)")
            .bind("admin")
            .bind(hashed)
            .bind("admin")
            .execute(pool)
            .await?;
    }

    // 示例科室：仅在空表时插入，避免重启后重复
    let (dept_count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM departments")
        .fetch_one(pool)
        .await?;
    if dept_count == 0 {
        let departments: [(&str, f64); 5] = [
            ("Emergency", 50000.0),
            ("Cardiology", 75000.0),
            ("Pediatrics", 40000.0),
            ("Surgery", 100000.0),
            ("Radiology", 60000.0),
        ];
        for (name, budget) in departments {
            sqlx::query("INSERT INTO departments (name, budget) VALUES (?, ?)")
                .bind(name)
                .bind(budget)
                .execute(pool)
                .await?;
        }
    }

    // 示例患者
    let (patient_count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM patients")
        .fetch_one(pool)
        .await?;
    if patient_count == 0 {
        let patients: [(&str, &str, Option<&str>, &str, &str); 3] = [
            ("John Doe", "2024-01-15", Some("2024-01-20"), "555-0101", "123 Main St"),
            ("Jane Smith", "2024-01-18", None, "555-0102", "456 Oak Ave"),
            ("Bob Johnson", "2024-01-20", Some("2024-01-25"), "555-0103", "789 Pine Rd"),
        ];
        for (name, admission, discharge, phone, address) in patients {
            sqlx::query(
                "INSERT INTO patients (name, admission_date, discharge_date, phone, address) VALUES (?, ?, ?, ?, ?)",
            )
            .bind(name)
            .bind(admission)
            .bind(discharge)
            .bind(phone)
            .bind(address)
            .execute(pool)
            .await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connection::memory_pool;

    #[actix_web::test]
    async fn test_initialize_is_idempotent() {
        let pool = memory_pool().await.expect("pool");
        initialize_database(&pool).await.expect("first init");
        initialize_database(&pool).await.expect("second init");

        let (dept_count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM departments")
            .fetch_one(&pool)
            .await
            .expect("count");
        assert_eq!(dept_count, 5);

        let (admin_count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM users WHERE username = 'admin'")
                .fetch_one(&pool)
                .await
                .expect("count");
        assert_eq!(admin_count, 1);
    }

    #[actix_web::test]
    async fn test_seed_patients_present() {
        let pool = memory_pool().await.expect("pool");
        initialize_database(&pool).await.expect("init");

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM patients")
            .fetch_one(&pool)
            .await
            .expect("count");
        assert_eq!(count, 3);
    }
}
