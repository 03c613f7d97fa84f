use serde::Serialize;
use ts_rs::TS;

use crate::models::common::pagination::PaginationInfo;
use crate::models::components::entities::GradingComponent;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/component.ts")]
pub struct ComponentListResponse {
    pub items: Vec<GradingComponent>,
    pub pagination: PaginationInfo,
}
