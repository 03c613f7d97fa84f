use serde::Serialize;
use ts_rs::TS;

use crate::models::common::pagination::PaginationInfo;
use crate::models::final_grades::entities::FinalGrade;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/final-grade.ts")]
pub struct FinalGradeListResponse {
    pub items: Vec<FinalGrade>,
    pub pagination: PaginationInfo,
}

// 批量状态迁移中单行的失败记录
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/final-grade.ts")]
pub struct TransitionFailure {
    pub student_id: i64,
    pub error_code: i32,
    pub detail: String,
}

// 批量状态迁移结果
//
// publish 幂等：已发布/已锁定的行计入 skipped 而非 failed。
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/final-grade.ts")]
pub struct BatchTransitionResponse {
    pub affected: i64,
    pub skipped: i64,
    pub failed: Vec<TransitionFailure>,
}
