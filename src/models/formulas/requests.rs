use std::collections::HashMap;

use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::pagination::PaginationQuery;
use crate::models::formulas::entities::GradeBoundary;

// 创建计分公式请求
//
// 创建即生效：同教学班原有的生效公式会在同一事务中被停用，
// 历史公式保留，供既往计算追溯。
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/formula.ts")]
pub struct CreateFormulaRequest {
    pub expression: String,
    // 缺省时使用配置中的 grading.default_output_scale
    pub output_scale: Option<f64>,
    pub grade_boundaries: Vec<GradeBoundary>,
}

// 校验公式请求（只校验，不求值、不落库）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/formula.ts")]
pub struct ValidateFormulaRequest {
    pub expression: String,
}

// 试算公式请求（校验 + 求值 + 映射等级，不落库）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/formula.ts")]
pub struct PreviewFormulaRequest {
    pub expression: String,
    pub output_scale: Option<f64>,
    pub grade_boundaries: Vec<GradeBoundary>,
    // 成分名 -> 样例分数
    pub sample_scores: HashMap<String, f64>,
}

// 公式列表查询参数
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/formula.ts")]
pub struct FormulaListQuery {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
}
