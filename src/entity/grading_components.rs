//! 计分成分实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "grading_components")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub class_offering_id: i64,
    pub name: String,
    pub weight: f64,
    pub max_score: f64,
    pub scheme: String,
    pub active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::assessment_grades::Entity")]
    AssessmentGrades,
}

impl Related<super::assessment_grades::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AssessmentGrades.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_component(self) -> crate::errors::Result<crate::models::components::entities::GradingComponent> {
        use crate::errors::GradeSystemError;
        use crate::models::components::entities::GradingComponent;
        use chrono::{DateTime, Utc};

        Ok(GradingComponent {
            id: self.id,
            class_offering_id: self.class_offering_id,
            name: self.name,
            weight: self.weight,
            max_score: self.max_score,
            scheme: self.scheme.parse().map_err(GradeSystemError::validation)?,
            active: self.active,
            created_at: DateTime::<Utc>::from_timestamp(self.created_at, 0).unwrap_or_default(),
            updated_at: DateTime::<Utc>::from_timestamp(self.updated_at, 0).unwrap_or_default(),
        })
    }
}
