pub mod auth;
pub mod client;
pub mod error;
pub mod middleware;
#[path = "bootstrap/app_bootstrap.rs"]
pub mod app_bootstrap;
#[path = "bootstrap/route_registry.rs"]
pub mod route_registry;
pub mod comm;
pub mod db;

// Modules
pub mod modules;

// Re-export bootstrap modules
pub use app_bootstrap::*;
pub use route_registry::configure_global_routes;
