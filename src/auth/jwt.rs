use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::comm::config::get_global_config_manager;
use crate::error::{AppError, AppResult};

/// 凭证有效期：24小时，固定，不续期
/// Credential lifetime: 24 hours, fixed, no refresh
pub const TOKEN_TTL_SECS: u64 = 24 * 60 * 60;

/// JWT 载荷：身份 + 角色 + 签发/过期时间
/// JWT claims: identity + role + issued-at/expiry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: i64,
    pub username: String,
    pub role: String,
    pub iat: u64,
    pub exp: u64,
}

/// 签名密钥，取自配置键 `auth.secret`
fn jwt_secret() -> String {
    get_global_config_manager()
        .ok()
        .and_then(|mgr| mgr.get_string("auth.secret").ok())
        .unwrap_or_else(|| "hospital-finance-dev-secret".to_string())
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// 签发凭证
/// Issue a credential
pub fn issue_token(id: i64, username: &str, role: &str) -> AppResult<String> {
    let iat = now_secs();
    let claims = Claims {
        id,
        username: username.to_string(),
        role: role.to_string(),
        iat,
        exp: iat + TOKEN_TTL_SECS,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret().as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!("签发凭证失败: {}", e)))
}

/// 校验凭证（含过期检查），失败统一为 401
/// Verify a credential (expiry included); failures map to 401
pub fn verify_token(token: &str) -> AppResult<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret().as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthenticated("Invalid or expired token"))
}
