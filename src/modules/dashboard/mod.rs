/// 仪表盘聚合模块
/// Dashboard aggregation module

pub mod models;
pub mod routes;

pub use routes::configure_routes;
