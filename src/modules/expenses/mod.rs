/// 科室支出模块
/// Expenses module

pub mod models;
pub mod routes;

pub use routes::configure_routes;
