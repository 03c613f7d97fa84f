//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。
//!
//! `offering_members`、`assessment_grades`、`class_offerings` 三张表
//! 归属选课/测评/排课子系统，本服务只读。

pub mod prelude;

pub mod assessment_grades;
pub mod class_offerings;
pub mod final_grades;
pub mod grade_computations;
pub mod grading_components;
pub mod grading_formulas;
pub mod offering_members;
