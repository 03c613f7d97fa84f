use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 计算批次状态
//
// 批次一旦离开 running 即不可变。进程中断留下的 running
// 批次由启动恢复流程标记为 failed，避免永久悬挂。
#[derive(Debug, Clone, Copy, Serialize, PartialEq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/computation.ts")]
pub enum ComputationStatus {
    Running,
    Completed,
    Failed,
}

impl ComputationStatus {
    pub const RUNNING: &'static str = "running";
    pub const COMPLETED: &'static str = "completed";
    pub const FAILED: &'static str = "failed";
}

impl<'de> Deserialize<'de> for ComputationStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for ComputationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComputationStatus::Running => write!(f, "running"),
            ComputationStatus::Completed => write!(f, "completed"),
            ComputationStatus::Failed => write!(f, "failed"),
        }
    }
}

impl std::str::FromStr for ComputationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "running" => Ok(ComputationStatus::Running),
            "completed" => Ok(ComputationStatus::Completed),
            "failed" => Ok(ComputationStatus::Failed),
            _ => Err(format!("Invalid computation status: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/computation.ts")]
pub struct GradeComputation {
    // 批次ID
    pub id: i64,
    // 教学班ID
    pub class_offering_id: i64,
    // 使用的公式ID
    pub formula_id: i64,
    // 触发者ID
    pub triggered_by: i64,
    // 批次状态
    pub status: ComputationStatus,
    // 目标学生数
    pub student_count: i64,
    // 成功数
    pub succeeded_count: i64,
    // 失败数（逐学生失败，不中止批次）
    pub failed_count: i64,
    // 开始时间
    pub started_at: chrono::DateTime<chrono::Utc>,
    // 结束时间
    pub finished_at: Option<chrono::DateTime<chrono::Utc>>,
}
