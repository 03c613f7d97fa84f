use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 最终成绩生命周期状态
//
// draft -> published -> locked，反向边仅有
// published -> draft（撤销发布）与 locked -> published（解锁）。
// 状态不会跳级，也没有终态：locked 始终可以被授权者解锁。
#[derive(Debug, Clone, Copy, Serialize, PartialEq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/final-grade.ts")]
pub enum GradeStatus {
    Draft,
    Published,
    Locked,
}

impl GradeStatus {
    pub const DRAFT: &'static str = "draft";
    pub const PUBLISHED: &'static str = "published";
    pub const LOCKED: &'static str = "locked";

    /// 可发布：仅 draft
    pub fn can_publish(&self) -> bool {
        matches!(self, GradeStatus::Draft)
    }

    /// 可撤销发布：仅 published（locked 必须先解锁）
    pub fn can_unpublish(&self) -> bool {
        matches!(self, GradeStatus::Published)
    }

    /// 可锁定：仅 published（锁定蕴含已发布）
    pub fn can_lock(&self) -> bool {
        matches!(self, GradeStatus::Published)
    }

    /// 可解锁：仅 locked
    pub fn can_unlock(&self) -> bool {
        matches!(self, GradeStatus::Locked)
    }

    /// 允许人工改分：draft 或 published
    pub fn allows_override(&self) -> bool {
        matches!(self, GradeStatus::Draft | GradeStatus::Published)
    }

    /// 允许被重算覆盖：仅 draft
    pub fn allows_recompute(&self) -> bool {
        matches!(self, GradeStatus::Draft)
    }
}

impl<'de> Deserialize<'de> for GradeStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "draft" => Ok(GradeStatus::Draft),
            "published" => Ok(GradeStatus::Published),
            "locked" => Ok(GradeStatus::Locked),
            _ => Err(serde::de::Error::custom(format!(
                "无效的成绩状态: '{s}'. 支持的状态: draft, published, locked"
            ))),
        }
    }
}

impl std::fmt::Display for GradeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GradeStatus::Draft => write!(f, "draft"),
            GradeStatus::Published => write!(f, "published"),
            GradeStatus::Locked => write!(f, "locked"),
        }
    }
}

impl std::str::FromStr for GradeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(GradeStatus::Draft),
            "published" => Ok(GradeStatus::Published),
            "locked" => Ok(GradeStatus::Locked),
            _ => Err(format!("Invalid grade status: {s}")),
        }
    }
}

// 人工改分记录（附着在 FinalGrade 上，不抹除计算历史）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/final-grade.ts")]
pub struct GradeOverride {
    pub score: f64,
    pub letter: String,
    pub reason: String,
    pub applied_by: i64,
    pub applied_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/final-grade.ts")]
pub struct FinalGrade {
    // 学生ID
    pub student_id: i64,
    // 教学班ID（与 student_id 构成唯一键）
    pub class_offering_id: i64,
    // 产生该行的计算批次ID
    pub computation_id: i64,
    // 公式计算出的原始分（改分不修改此值）
    pub raw_score: f64,
    // 公式计算出的等级
    pub letter: String,
    // 生命周期状态
    pub status: GradeStatus,
    // 人工改分（如有，展示值取此处）
    pub r#override: Option<GradeOverride>,
    // 发布时间
    pub published_at: Option<chrono::DateTime<chrono::Utc>>,
    // 锁定时间
    pub locked_at: Option<chrono::DateTime<chrono::Utc>>,
    // 更新时间
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl FinalGrade {
    /// 展示分数：有改分取改分，否则取计算值
    pub fn displayed_score(&self) -> f64 {
        self.r#override.as_ref().map_or(self.raw_score, |o| o.score)
    }

    /// 展示等级：有改分取改分，否则取计算值
    pub fn displayed_letter(&self) -> &str {
        self.r#override.as_ref().map_or(&self.letter, |o| &o.letter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle_forward_edges() {
        assert!(GradeStatus::Draft.can_publish());
        assert!(GradeStatus::Published.can_lock());
        assert!(!GradeStatus::Draft.can_lock());
        assert!(!GradeStatus::Locked.can_publish());
        assert!(!GradeStatus::Published.can_publish());
    }

    #[test]
    fn test_lifecycle_reverse_edges() {
        assert!(GradeStatus::Published.can_unpublish());
        assert!(!GradeStatus::Locked.can_unpublish());
        assert!(!GradeStatus::Draft.can_unpublish());
        assert!(GradeStatus::Locked.can_unlock());
        assert!(!GradeStatus::Published.can_unlock());
    }

    #[test]
    fn test_locked_rejects_everything_but_unlock() {
        let locked = GradeStatus::Locked;
        assert!(!locked.allows_override());
        assert!(!locked.allows_recompute());
        assert!(!locked.can_unpublish());
        assert!(!locked.can_publish());
        assert!(locked.can_unlock());
    }

    #[test]
    fn test_override_allowed_states() {
        assert!(GradeStatus::Draft.allows_override());
        assert!(GradeStatus::Published.allows_override());
        assert!(!GradeStatus::Locked.allows_override());
    }

    #[test]
    fn test_recompute_only_overwrites_draft() {
        assert!(GradeStatus::Draft.allows_recompute());
        assert!(!GradeStatus::Published.allows_recompute());
        assert!(!GradeStatus::Locked.allows_recompute());
    }

    #[test]
    fn test_displayed_value_prefers_override() {
        let mut grade = FinalGrade {
            student_id: 1,
            class_offering_id: 1,
            computation_id: 1,
            raw_score: 86.0,
            letter: "B".to_string(),
            status: GradeStatus::Draft,
            r#override: None,
            published_at: None,
            locked_at: None,
            updated_at: chrono::Utc::now(),
        };
        assert_eq!(grade.displayed_score(), 86.0);
        assert_eq!(grade.displayed_letter(), "B");

        grade.r#override = Some(GradeOverride {
            score: 91.0,
            letter: "A".to_string(),
            reason: "补交作业".to_string(),
            applied_by: 7,
            applied_at: chrono::Utc::now(),
        });
        assert_eq!(grade.displayed_score(), 91.0);
        assert_eq!(grade.displayed_letter(), "A");
        // 计算值保持不变，供审计
        assert_eq!(grade.raw_score, 86.0);
    }

    #[test]
    fn test_status_round_trip() {
        for s in ["draft", "published", "locked"] {
            let status: GradeStatus = s.parse().unwrap();
            assert_eq!(status.to_string(), s);
        }
        assert!("archived".parse::<GradeStatus>().is_err());
    }
}
