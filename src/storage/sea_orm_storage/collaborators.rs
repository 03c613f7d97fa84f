//! 协作子系统读取操作
//!
//! 名册、原始测评分数、授权能力三类数据由其他子系统写入，
//! 本服务只读，任何写入都是越界。

use super::SeaOrmStorage;
use crate::entity::assessment_grades::{Column as GradeColumn, Entity as AssessmentGrades};
use crate::entity::offering_members::{
    Column as MemberColumn, Entity as OfferingMembers, Model as OfferingMember,
};
use crate::errors::{GradeSystemError, Result};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use std::collections::HashMap;

impl SeaOrmStorage {
    /// 读取学生在指定成分上的原始分数
    ///
    /// 返回映射中缺失的 component_id 表示尚未评分，由调用方处理。
    pub async fn get_component_scores_impl(
        &self,
        student_id: i64,
        _class_offering_id: i64,
        component_ids: &[i64],
    ) -> Result<HashMap<i64, f64>> {
        if component_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = AssessmentGrades::find()
            .filter(GradeColumn::StudentId.eq(student_id))
            .filter(GradeColumn::ComponentId.is_in(component_ids.to_vec()))
            .all(&self.db)
            .await
            .map_err(|e| GradeSystemError::database_operation(format!("查询测评分数失败: {e}")))?;

        Ok(rows.into_iter().map(|r| (r.component_id, r.score)).collect())
    }

    /// 按名册顺序返回教学班的学生ID
    pub async fn get_students_for_offering_impl(
        &self,
        class_offering_id: i64,
    ) -> Result<Vec<i64>> {
        let rows = OfferingMembers::find()
            .filter(MemberColumn::ClassOfferingId.eq(class_offering_id))
            .filter(MemberColumn::Role.eq(OfferingMember::ROLE_STUDENT))
            .order_by_asc(MemberColumn::Position)
            .all(&self.db)
            .await
            .map_err(|e| GradeSystemError::database_operation(format!("查询名册失败: {e}")))?;

        Ok(rows.into_iter().map(|r| r.user_id).collect())
    }

    /// 成绩管理能力判定：教学班的 instructor 成员
    pub async fn can_manage_grades_impl(
        &self,
        user_id: i64,
        class_offering_id: i64,
    ) -> Result<bool> {
        let row = OfferingMembers::find()
            .filter(MemberColumn::ClassOfferingId.eq(class_offering_id))
            .filter(MemberColumn::UserId.eq(user_id))
            .filter(MemberColumn::Role.eq(OfferingMember::ROLE_INSTRUCTOR))
            .one(&self.db)
            .await
            .map_err(|e| GradeSystemError::database_operation(format!("查询授权能力失败: {e}")))?;

        Ok(row.is_some())
    }
}
