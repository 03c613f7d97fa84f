//! GradeSystem - 教学成绩计算后端服务
//!
//! 基于 Actix Web 构建的成绩计算与生命周期管理服务。
//!
//! # 架构
//! - `audit`: 敏感操作审计
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `formula`: 计分公式引擎（解析、求值、等级映射）
//! - `models`: 数据模型定义
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod audit;
pub mod config;
pub mod entity;
pub mod errors;
pub mod formula;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
