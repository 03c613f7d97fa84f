use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 等级边界
//
// 按 min_score 降序排列，(min_score, letter) 表示分数落在
// [min_score, 上一档 min_score) 区间时取该字母等级。
// 完整的边界序列必须无缝覆盖 [0, output_scale]。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/formula.ts")]
pub struct GradeBoundary {
    pub min_score: f64,
    pub letter: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/formula.ts")]
pub struct GradingFormula {
    // 公式ID
    pub id: i64,
    // 教学班ID
    pub class_offering_id: i64,
    // 算式表达式（只含 + - * / ( )、数字字面量与成分引用）
    pub expression: String,
    // 输出量程（通常为 100）
    pub output_scale: f64,
    // 等级边界（降序）
    pub grade_boundaries: Vec<GradeBoundary>,
    // 是否为当前生效公式（每个教学班至多一个）
    pub is_active: bool,
    // 创建者ID
    pub created_by: i64,
    // 创建时间
    pub created_at: chrono::DateTime<chrono::Utc>,
}
