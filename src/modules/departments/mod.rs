/// 科室模块
/// Departments module

pub mod models;
pub mod routes;

pub use routes::configure_routes;
