use actix_web::{middleware::Logger, web, App, HttpServer};
use tracing::info;

use crate::comm::config::get_global_config_manager;
use crate::db;
use crate::error::{AppError, AppResult};
use crate::route_registry::configure_global_routes;

/// 应用配置结构体
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            workers: None,
        }
    }
}

/// 应用启动器
pub struct AppBootstrap {
    config: Option<AppConfig>,
}

impl AppBootstrap {
    /// 创建新的应用启动器
    pub fn new() -> Self {
        Self { config: None }
    }

    /// 设置配置
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// 运行应用服务器
    ///
    /// 生命周期：配置 -> 日志 -> 数据库初始化（幂等）-> 监听。
    /// 数据库初始化在绑定端口之前完成，接受请求时 schema 一定就绪。
    pub async fn run(self) -> AppResult<()> {
        let config = self.config.clone().unwrap_or_default();

        let config_manager = get_global_config_manager().map_err(|e| {
            AppError::Config(crate::comm::config::ConfigError::InitializationError {
                message: e.to_string(),
            })
        })?;
        crate::comm::tracing::init_tracing().map_err(AppError::Internal)?;

        info!(
            "日志级别: {}",
            config_manager
                .get_string("logging.level")
                .unwrap_or("info".to_string())
        );
        info!("启动应用服务器，配置: {:?}", config);

        // 初始化数据库（建表 + 种子，幂等）
        let pool = db::get_pool().await?;
        db::initialize_database(&pool).await?;

        let pool_data = web::Data::new(pool);
        let mut server = HttpServer::new(move || {
            App::new()
                .wrap(Logger::default())
                .app_data(pool_data.clone())
                .configure(configure_global_routes)
        });
        if let Some(workers) = config.workers {
            server = server.workers(workers);
        }

        info!("服务器将在 {}:{} 上启动", config.host, config.port);
        server
            .bind((config.host.as_str(), config.port))
            .map_err(|e| AppError::Internal(anyhow::Error::new(e)))?
            .run()
            .await
            .map_err(|e| AppError::Internal(anyhow::Error::new(e)))?;

        Ok(())
    }
}

impl Default for AppBootstrap {
    fn default() -> Self {
        Self::new()
    }
}
