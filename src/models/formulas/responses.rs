use serde::Serialize;
use ts_rs::TS;

use crate::models::common::pagination::PaginationInfo;
use crate::models::formulas::entities::GradingFormula;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/formula.ts")]
pub struct FormulaListResponse {
    pub items: Vec<GradingFormula>,
    pub pagination: PaginationInfo,
}

// 公式校验结果
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/formula.ts")]
pub struct ValidationResultResponse {
    pub valid: bool,
    // 校验失败时的错误详情
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    // 表达式引用的成分名（去重、按出现顺序）
    pub references: Vec<String>,
}

// 公式试算结果
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/formula.ts")]
pub struct PreviewResponse {
    pub raw_score: f64,
    pub letter: String,
}
