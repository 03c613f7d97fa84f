use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::pagination::PaginationQuery;
use crate::models::components::entities::WeightScheme;

// 创建计分成分请求
//
// # name 字段说明
// 成分名称同时是公式中的引用标识符，必须满足标识符格式
// （字母或下划线开头，只含字母、数字、下划线）。
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/component.ts")]
pub struct CreateComponentRequest {
    pub name: String,
    pub weight: f64,
    pub max_score: f64,
    pub scheme: WeightScheme,
}

// 更新计分成分请求
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/component.ts")]
pub struct UpdateComponentRequest {
    pub name: Option<String>,
    pub weight: Option<f64>,
    pub max_score: Option<f64>,
}

// 成分列表查询参数
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/component.ts")]
pub struct ComponentListQuery {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    // 是否包含已软删除的成分
    pub include_inactive: Option<bool>,
}
