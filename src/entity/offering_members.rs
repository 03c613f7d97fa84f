//! 教学班成员实体（选课子系统所有，本服务只读）
//!
//! role 为 student 的行构成名册（按 position 排序），
//! role 为 instructor 的行用于 can_manage_grades 能力判定。

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "offering_members")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub class_offering_id: i64,
    pub user_id: i64,
    pub role: String,
    pub position: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub const ROLE_STUDENT: &'static str = "student";
    pub const ROLE_INSTRUCTOR: &'static str = "instructor";
}
