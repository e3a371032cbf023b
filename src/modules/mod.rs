/// 业务模块管理
/// 每个实体一个模块：models（行/载荷/验证）+ routes（处理器/路由注册）

pub mod dashboard;
pub mod departments;
pub mod expenses;
pub mod patients;
pub mod transactions;
pub mod validation;
