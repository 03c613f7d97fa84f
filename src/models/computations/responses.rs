use serde::Serialize;
use ts_rs::TS;

use crate::models::common::pagination::PaginationInfo;
use crate::models::computations::entities::GradeComputation;

// 单个学生的计算结果
//
// 失败学生只记录原因，不写 FinalGrade，也不中止批次。
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/computation.ts")]
pub struct StudentComputationOutcome {
    pub student_id: i64,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter: Option<String>,
    // 失败时的 API 错误码
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl StudentComputationOutcome {
    pub fn ok(student_id: i64, raw_score: f64, letter: String) -> Self {
        Self {
            student_id,
            ok: true,
            raw_score: Some(raw_score),
            letter: Some(letter),
            error_code: None,
            detail: None,
        }
    }

    pub fn failed(
        student_id: i64,
        error_code: crate::models::ErrorCode,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            student_id,
            ok: false,
            raw_score: None,
            letter: None,
            error_code: Some(error_code as i32),
            detail: Some(detail.into()),
        }
    }
}

// 计算批次响应（批次元数据 + 逐学生结果）
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/computation.ts")]
pub struct ComputationResponse {
    pub computation: GradeComputation,
    pub results: Vec<StudentComputationOutcome>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/computation.ts")]
pub struct ComputationListResponse {
    pub items: Vec<GradeComputation>,
    pub pagination: PaginationInfo,
}
