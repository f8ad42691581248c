//! 房产交易平台核心：内存实体存储、查询筛选引擎、外部房源导入，以及薄的 AI 顾问与命令层。

pub mod ai;
pub mod app_service;
pub mod app_state;
pub mod commands;
pub mod config;
pub mod import;
pub mod query;
pub mod seed;
pub mod storage;

pub use app_state::{AppContext, AppEvent};
pub use config::AppConfig;
pub use storage::{Store, StoreError};
