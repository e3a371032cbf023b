use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::{Pool, Sqlite};

use crate::auth::jwt::issue_token;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult, FieldError};

/// 注册请求
/// Registration request
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    /// 缺省角色为 user；传入的角色仅存储，不做权限区分
    pub role: Option<String>,
}

/// 登录请求
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// 认证响应中的用户信息
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
    pub role: String,
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    password: String,
    role: String,
}

/// 用户注册
/// POST /api/auth/register
pub async fn register(
    pool: web::Data<Pool<Sqlite>>,
    payload: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let mut errors = Vec::new();
    if payload.username.chars().count() < 3 {
        errors.push(FieldError::new(
            "username",
            "Username must be at least 3 characters",
        ));
    }
    if payload.password.chars().count() < 6 {
        errors.push(FieldError::new(
            "password",
            "Password must be at least 6 characters",
        ));
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let existing: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE username = ?")
        .bind(&payload.username)
        .fetch_optional(pool.get_ref())
        .await?;
    if existing.is_some() {
        return Err(AppError::duplicate("Username already exists"));
    }

    let role = payload.role.clone().unwrap_or_else(|| "user".to_string());
    let hashed = hash_password(&payload.password)?;
    let result = sqlx::query("INSERT INTO users (username, password, role) VALUES (?, ?, ?)")
        .bind(&payload.username)
        .bind(&hashed)
        .bind(&role)
        .execute(pool.get_ref())
        .await?;
    let id = result.last_insert_rowid();

    let token = issue_token(id, &payload.username, &role)?;
    Ok(HttpResponse::Created().json(json!({
        "message": "User created successfully",
        "token": token,
        "user": UserInfo { id, username: payload.username.clone(), role },
    })))
}

/// 用户登录
/// POST /api/auth/login
pub async fn login(
    pool: web::Data<Pool<Sqlite>>,
    payload: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let mut errors = Vec::new();
    if payload.username.is_empty() {
        errors.push(FieldError::new("username", "Username is required"));
    }
    if payload.password.is_empty() {
        errors.push(FieldError::new("password", "Password is required"));
    }
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let user: Option<UserRow> =
        sqlx::query_as("SELECT id, username, password, role FROM users WHERE username = ?")
            .bind(&payload.username)
            .fetch_optional(pool.get_ref())
            .await?;

    // 未知用户与密码错误统一为同一响应，不暴露用户是否存在
    let user = match user {
        Some(u) if verify_password(&payload.password, &u.password) => u,
        _ => return Err(AppError::unauthenticated("Invalid credentials")),
    };

    let token = issue_token(user.id, &user.username, &user.role)?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Login successful",
        "token": token,
        "user": UserInfo {
            id: user.id,
            username: user.username,
            role: user.role,
        },
    })))
}

/// 注册认证路由
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/auth/register", web::post().to(register))
        .route("/auth/login", web::post().to(login));
}
