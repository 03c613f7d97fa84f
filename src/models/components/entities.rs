use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 计分方式
//
// 一个教学班下的活跃成分必须使用同一种计分方式：
// 要么全部为权重制（权重和需满足配置的目标值），要么全部为分值制。
#[derive(Debug, Clone, Copy, Serialize, PartialEq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/component.ts")]
pub enum WeightScheme {
    Weighted, // 权重制（0-1）
    Points,   // 分值制
}

impl WeightScheme {
    pub const WEIGHTED: &'static str = "weighted";
    pub const POINTS: &'static str = "points";
}

impl<'de> Deserialize<'de> for WeightScheme {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "weighted" => Ok(WeightScheme::Weighted),
            "points" => Ok(WeightScheme::Points),
            _ => Err(serde::de::Error::custom(format!(
                "无效的计分方式: '{s}'. 支持的方式: weighted, points"
            ))),
        }
    }
}

impl std::fmt::Display for WeightScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeightScheme::Weighted => write!(f, "weighted"),
            WeightScheme::Points => write!(f, "points"),
        }
    }
}

impl std::str::FromStr for WeightScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weighted" => Ok(WeightScheme::Weighted),
            "points" => Ok(WeightScheme::Points),
            _ => Err(format!("Invalid weight scheme: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/component.ts")]
pub struct GradingComponent {
    // 成分ID
    pub id: i64,
    // 教学班ID
    pub class_offering_id: i64,
    // 成分名称（同时是公式中的引用标识符）
    pub name: String,
    // 权重（权重制下 0-1，分值制下为分值）
    pub weight: f64,
    // 满分
    pub max_score: f64,
    // 计分方式
    pub scheme: WeightScheme,
    // 是否活跃（软删除标记）
    pub active: bool,
    // 创建时间
    pub created_at: chrono::DateTime<chrono::Utc>,
    // 更新时间
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
