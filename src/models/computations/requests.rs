use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::pagination::PaginationQuery;

// 触发成绩计算请求
//
// formula_id 缺省时使用教学班当前生效的公式；
// student_ids 缺省时使用教学班完整名册。
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/computation.ts")]
pub struct ComputeGradesRequest {
    pub formula_id: Option<i64>,
    pub student_ids: Option<Vec<i64>>,
}

// 计算批次列表查询参数
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/computation.ts")]
pub struct ComputationListQuery {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
}
