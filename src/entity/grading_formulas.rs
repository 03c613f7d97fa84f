//! 计分公式实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "grading_formulas")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub class_offering_id: i64,
    #[sea_orm(column_type = "Text")]
    pub expression: String,
    pub output_scale: f64,
    // 等级边界，JSON 数组（降序）
    #[sea_orm(column_type = "Text")]
    pub grade_boundaries: String,
    pub is_active: bool,
    pub created_by: i64,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::grade_computations::Entity")]
    Computations,
}

impl Related<super::grade_computations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Computations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_formula(self) -> crate::errors::Result<crate::models::formulas::entities::GradingFormula> {
        use crate::models::formulas::entities::GradingFormula;
        use chrono::{DateTime, Utc};

        let grade_boundaries = serde_json::from_str(&self.grade_boundaries)?;

        Ok(GradingFormula {
            id: self.id,
            class_offering_id: self.class_offering_id,
            expression: self.expression,
            output_scale: self.output_scale,
            grade_boundaries,
            is_active: self.is_active,
            created_by: self.created_by,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
        })
    }
}
