/// 中间件模块
/// Middleware module

pub mod auth_gate;

pub use auth_gate::AuthGate;
