use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::final_grades::entities::GradeStatus;

// 教学班成绩摘要
//
// 只统计 published / locked 的最终成绩，draft 尚未生效，不计入。
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct ClassGradingSummary {
    pub class_offering_id: i64,
    pub count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub median: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

// 等级分布的单个桶（按边界降序排列）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct LetterBucket {
    pub letter: String,
    pub count: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct GradeDistributionResponse {
    pub class_offering_id: i64,
    pub buckets: Vec<LetterBucket>,
}

// 成绩单中的单条记录（带生命周期状态，供消费方区分临时/最终数据）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct TranscriptEntry {
    pub class_offering_id: i64,
    pub offering_name: String,
    pub academic_period: String,
    pub score: f64,
    pub letter: String,
    pub status: GradeStatus,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct StudentTranscriptResponse {
    pub student_id: i64,
    pub entries: Vec<TranscriptEntry>,
}

// 成绩单查询参数
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/report.ts")]
pub struct TranscriptQuery {
    // 逗号分隔的学期列表，如 "2025-spring,2025-fall"；缺省为全部学期
    pub periods: Option<String>,
}
