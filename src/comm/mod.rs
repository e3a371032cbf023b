/// 通用通信模块
/// Common communication module

pub mod config;
pub mod tracing;
