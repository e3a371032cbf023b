use anyhow::{anyhow, Result};
use config::{Config, Environment, File, FileFormat};
use lazy_static::lazy_static;
use serde::de::DeserializeOwned;
use std::sync::{Arc, RwLock};

lazy_static! {
    static ref GLOBAL_CONFIG_MANAGER: RwLock<Option<Arc<ConfigManager>>> = RwLock::new(None);
}

/// 配置错误类型
/// Configuration error type
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("配置项 '{key}' 不存在")]
    KeyNotFound { key: String },
    #[error("配置项 '{key}' 类型转换失败: {message}")]
    TypeConversionError { key: String, message: String },
    #[error("配置初始化失败: {message}")]
    InitializationError { message: String },
}

/// 配置管理器
/// 按优先级加载：config/default.toml < config/production.toml < 环境变量（HF_ 前缀）
pub struct ConfigManager {
    config: Config,
}

impl ConfigManager {
    /// 创建配置管理器
    pub fn new() -> Result<Self> {
        let builder = Config::builder()
            .add_source(
                File::with_name("config/default")
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(
                File::with_name("config/production")
                    .format(FileFormat::Toml)
                    .required(false),
            )
            .add_source(Environment::with_prefix("HF").separator("_"));

        let config = builder
            .build()
            .map_err(|e| anyhow!("构建配置失败: {}", e))?;
        Ok(Self { config })
    }

    /// 获取指定 key 的配置值
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        self.config
            .get(key)
            .map_err(|e| anyhow!("获取配置 '{}' 失败: {}", key, e))
    }

    /// 获取指定 key 的配置值，如果不存在返回默认值
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    /// 获取字符串配置值
    pub fn get_string(&self, key: &str) -> Result<String> {
        self.get(key)
    }
}

/// 初始化全局配置管理器（幂等，重复调用保留首次结果）
/// Initialize the global configuration manager (idempotent)
pub fn init_global_config_manager() -> Result<Arc<ConfigManager>> {
    {
        let guard = GLOBAL_CONFIG_MANAGER
            .read()
            .map_err(|e| anyhow!("配置管理器锁错误: {}", e))?;
        if let Some(mgr) = guard.as_ref() {
            return Ok(mgr.clone());
        }
    }
    let mgr = Arc::new(ConfigManager::new()?);
    let mut guard = GLOBAL_CONFIG_MANAGER
        .write()
        .map_err(|e| anyhow!("配置管理器锁错误: {}", e))?;
    if guard.is_none() {
        *guard = Some(mgr.clone());
    }
    Ok(guard.as_ref().cloned().unwrap_or(mgr))
}

/// 获取全局配置管理器
/// Get the global configuration manager
pub fn get_global_config_manager() -> Result<Arc<ConfigManager>> {
    {
        let guard = GLOBAL_CONFIG_MANAGER
            .read()
            .map_err(|e| anyhow!("配置管理器锁错误: {}", e))?;
        if let Some(mgr) = guard.as_ref() {
            return Ok(mgr.clone());
        }
    }
    init_global_config_manager()
}
