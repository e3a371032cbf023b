/// 认证模块：凭证签发、校验与登录注册接口
/// Authentication module: credential issue/verify + register/login endpoints

pub mod jwt;
pub mod password;
pub mod routes;

pub use jwt::{issue_token, verify_token, Claims};
pub use password::{hash_password, verify_password};
