/// 数据库模块
/// Database module

pub mod connection;
pub mod init;

pub use connection::{get_pool, memory_pool};
pub use init::initialize_database;
