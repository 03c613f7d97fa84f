use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::pagination::PaginationQuery;
use crate::models::final_grades::entities::GradeStatus;

// 人工改分请求
//
// score 与 letter 至少提供其一；只给 score 时，
// 等级按当前生效公式的边界重新映射。
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/final-grade.ts")]
pub struct OverrideGradeRequest {
    pub score: Option<f64>,
    pub letter: Option<String>,
    pub reason: String,
}

// 解锁请求（解锁必须留痕：操作者 + 理由）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/final-grade.ts")]
pub struct UnlockGradeRequest {
    pub reason: String,
}

// 最终成绩列表查询参数
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/final-grade.ts")]
pub struct FinalGradeListQuery {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub status: Option<GradeStatus>,
}
