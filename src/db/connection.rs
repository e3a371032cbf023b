use std::str::FromStr;
use std::time::Duration;
use tokio::sync::RwLock;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};

use crate::comm::config::get_global_config_manager;
use crate::error::{AppError, AppResult};

lazy_static::lazy_static! {
    static ref POOL: RwLock<Option<Pool<Sqlite>>> = RwLock::new(None);
}

/// 获取全局 SQLite 连接池（自动懒加载）
/// Get the global SQLite pool (lazy init)
pub async fn get_pool() -> AppResult<Pool<Sqlite>> {
    if let Some(p) = POOL.read().await.clone() {
        return Ok(p);
    }
    let pool = build_pool().await?;
    let mut guard = POOL.write().await;
    if let Some(p) = guard.clone() {
        return Ok(p);
    }
    *guard = Some(pool.clone());
    Ok(pool)
}

/// 根据配置构建连接池 / Build pool from configuration
///
/// 读取配置键 / Reads config keys:
/// - `database.path`（默认 hospital.db）
/// - `database.maxOpen`（默认 10）
async fn build_pool() -> AppResult<Pool<Sqlite>> {
    let mgr = get_global_config_manager().map_err(|e| {
        AppError::Config(crate::comm::config::ConfigError::InitializationError {
            message: e.to_string(),
        })
    })?;
    let path: String = mgr.get_or("database.path", "hospital.db".to_string());
    let max_open: u32 = mgr
        .get("database.maxOpen")
        .map(|v: i64| v as u32)
        .unwrap_or(10);

    let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", path))
        .map_err(AppError::Database)?
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_open)
        .acquire_timeout(Duration::from_secs(3))
        .connect_with(options)
        .await
        .map_err(AppError::Database)?;
    Ok(pool)
}

/// 构建内存数据库连接池（测试用）
/// Build an in-memory pool (tests)
///
/// 单连接：SQLite 的 `:memory:` 对每个连接都是独立库，
/// 多连接会看到互相不同的数据。
pub async fn memory_pool() -> AppResult<Pool<Sqlite>> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .map_err(AppError::Database)?;
    Ok(pool)
}
