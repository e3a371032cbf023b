/// 账务流水模块
/// Transactions module

pub mod models;
pub mod routes;

pub use routes::configure_routes;
