//! 最终成绩实体
//!
//! (student_id, class_offering_id) 唯一：最终成绩是"当前投影"，
//! 计算批次只追加，投影行被新批次覆盖（仅 draft 状态下）。

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "final_grades")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub class_offering_id: i64,
    pub computation_id: i64,
    pub raw_score: f64,
    pub letter: String,
    pub status: String,
    pub override_score: Option<f64>,
    pub override_letter: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub override_reason: Option<String>,
    pub override_by: Option<i64>,
    pub override_at: Option<i64>,
    pub published_at: Option<i64>,
    pub locked_at: Option<i64>,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::grade_computations::Entity",
        from = "Column::ComputationId",
        to = "super::grade_computations::Column::Id"
    )]
    Computation,
}

impl Related<super::grade_computations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Computation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_final_grade(
        self,
    ) -> crate::errors::Result<crate::models::final_grades::entities::FinalGrade> {
        use crate::errors::GradeSystemError;
        use crate::models::final_grades::entities::{FinalGrade, GradeOverride};
        use chrono::{DateTime, Utc};

        // override 列要么全有要么全无，逐列取齐后再组装
        let r#override = match (
            self.override_score,
            self.override_letter,
            self.override_reason,
            self.override_by,
            self.override_at,
        ) {
            (Some(score), Some(letter), Some(reason), Some(applied_by), Some(applied_at)) => {
                Some(GradeOverride {
                    score,
                    letter,
                    reason,
                    applied_by,
                    applied_at: DateTime::<Utc>::from_timestamp(applied_at, 0).unwrap_or_default(),
                })
            }
            (None, None, None, None, None) => None,
            _ => {
                return Err(GradeSystemError::database_operation(format!(
                    "final_grade {} 的改分列不完整",
                    self.id
                )));
            }
        };

        Ok(FinalGrade {
            student_id: self.student_id,
            class_offering_id: self.class_offering_id,
            computation_id: self.computation_id,
            raw_score: self.raw_score,
            letter: self.letter,
            status: self.status.parse().map_err(GradeSystemError::validation)?,
            r#override,
            published_at: self
                .published_at
                .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
            locked_at: self
                .locked_at
                .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        })
    }
}
