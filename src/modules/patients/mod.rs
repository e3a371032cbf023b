/// 患者模块
/// Patients module

pub mod models;
pub mod routes;

pub use routes::configure_routes;
