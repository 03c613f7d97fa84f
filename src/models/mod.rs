//! 数据模型定义
//!
//! 按业务域拆分：计分成分、计分公式、成绩计算、最终成绩、统计报表。
//! `ErrorCode` 为 API 层错误码，与 `crate::errors` 的内部错误分离。

pub mod common;
pub mod components;
pub mod computations;
pub mod final_grades;
pub mod formulas;
pub mod reports;

pub use common::pagination::{PaginatedResponse, PaginationInfo, PaginationQuery};
pub use common::response::ApiResponse;

/// 程序启动时间（用于运行时长统计）
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// API 错误码
///
/// 通用错误沿用 HTTP 语义段，业务错误按域分段：
/// 1xxx 计分成分，2xxx 计分公式，3xxx 成绩计算，4xxx 最终成绩生命周期。
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, ts_rs::TS)]
#[ts(export, export_to = "../frontend/src/types/generated/error-code.ts")]
#[repr(i32)]
pub enum ErrorCode {
    Success = 200,
    BadRequest = 400,
    Unauthorized = 401,
    Forbidden = 403,
    NotFound = 404,
    InternalServerError = 500,

    // 计分成分
    ComponentNotFound = 1001,
    ComponentNameExists = 1002,
    ComponentInUse = 1003,
    ComponentSchemeMismatch = 1004,
    InvalidWeight = 1005,
    WeightSumMismatch = 1006,

    // 计分公式
    FormulaNotFound = 2001,
    NoActiveFormula = 2002,
    FormulaSyntaxError = 2003,
    UnknownReference = 2004,
    DivisionByZeroRisk = 2005,
    BoundaryGapError = 2006,

    // 成绩计算
    ComputationNotFound = 3001,
    ComputationInProgress = 3002,
    IncompleteGrading = 3003,
    MissingComponentScore = 3004,

    // 最终成绩生命周期
    FinalGradeNotFound = 4001,
    FinalGradeLocked = 4002,
    OverridePresent = 4003,
    CannotOverrideLocked = 4004,
    CannotUnpublishLocked = 4005,
    MustPublishBeforeLock = 4006,
    StateConflict = 4007,
}
