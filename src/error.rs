use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// 字段级验证错误
/// Field-level validation error
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// 统一的应用错误类型
/// Unified application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    #[error("{message}")]
    Duplicate { message: String },

    #[error("{message}")]
    Unauthenticated { message: String },

    #[error("{resource} not found")]
    NotFound { resource: String },

    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),

    #[error("配置错误: {0}")]
    Config(#[from] crate::comm::config::ConfigError),

    #[error("内部错误: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// 创建单字段验证错误
    pub fn validation<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self::Validation(vec![FieldError::new(field, message)])
    }

    /// 创建唯一性冲突错误（注册用户名重复）
    pub fn duplicate<T: Into<String>>(message: T) -> Self {
        Self::Duplicate {
            message: message.into(),
        }
    }

    /// 创建认证错误
    pub fn unauthenticated<T: Into<String>>(message: T) -> Self {
        Self::Unauthenticated {
            message: message.into(),
        }
    }

    /// 创建资源未找到错误，`resource` 为实体显示名（如 "Patient"）
    pub fn not_found<T: Into<String>>(resource: T) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// 获取HTTP状态码
    pub fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;

        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Duplicate { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        // 记录错误日志：服务端错误记 error，客户端错误记 info
        match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
            }
            AppError::Config(e) => {
                tracing::error!("Config error: {}", e);
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {}", e);
            }
            other => {
                tracing::info!("Client error: {}", other);
            }
        }

        // 响应体与REST契约一致：
        // 400 验证 => {errors:[{field,message}]}，其余 => {error:"..."}
        // 数据库/内部错误不向客户端泄露细节
        match self {
            AppError::Validation(errors) => {
                HttpResponse::build(status).json(json!({ "errors": errors }))
            }
            AppError::Duplicate { message } | AppError::Unauthenticated { message } => {
                HttpResponse::build(status).json(json!({ "error": message }))
            }
            AppError::NotFound { resource } => HttpResponse::build(status)
                .json(json!({ "error": format!("{} not found", resource) })),
            AppError::Database(_) | AppError::Config(_) | AppError::Internal(_) => {
                HttpResponse::build(status).json(json!({ "error": "Database error" }))
            }
        }
    }
}

/// 应用结果类型
pub type AppResult<T> = Result<T, AppError>;
