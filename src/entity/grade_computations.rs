//! 成绩计算批次实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "grade_computations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub class_offering_id: i64,
    pub formula_id: i64,
    pub triggered_by: i64,
    pub status: String,
    pub student_count: i64,
    pub succeeded_count: i64,
    pub failed_count: i64,
    pub started_at: i64,
    pub finished_at: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::grading_formulas::Entity",
        from = "Column::FormulaId",
        to = "super::grading_formulas::Column::Id"
    )]
    Formula,
    #[sea_orm(has_many = "super::final_grades::Entity")]
    FinalGrades,
}

impl Related<super::grading_formulas::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Formula.def()
    }
}

impl Related<super::final_grades::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FinalGrades.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_computation(
        self,
    ) -> crate::errors::Result<crate::models::computations::entities::GradeComputation> {
        use crate::errors::GradeSystemError;
        use crate::models::computations::entities::GradeComputation;
        use chrono::{DateTime, Utc};

        Ok(GradeComputation {
            id: self.id,
            class_offering_id: self.class_offering_id,
            formula_id: self.formula_id,
            triggered_by: self.triggered_by,
            status: self.status.parse().map_err(GradeSystemError::validation)?,
            student_count: self.student_count,
            succeeded_count: self.succeeded_count,
            failed_count: self.failed_count,
            started_at: DateTime::<Utc>::from_timestamp(self.started_at, 0).unwrap_or_default(),
            finished_at: self
                .finished_at
                .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
        })
    }
}
