//! 最终成绩存储操作
//!
//! 所有条件写入（覆盖草稿、状态迁移、改分）都以 WHERE 条件
//! 把前置状态编进 SQL，靠受影响行数判断是否被并发抢先。

use super::SeaOrmStorage;
use crate::entity::final_grades::{ActiveModel, Column, Entity as FinalGrades};
use crate::errors::{GradeSystemError, Result};
use crate::models::{
    PaginationInfo,
    final_grades::{
        entities::{FinalGrade, GradeOverride, GradeStatus},
        requests::FinalGradeListQuery,
        responses::FinalGradeListResponse,
    },
    reports::responses::TranscriptEntry,
};
use crate::storage::DraftWriteOutcome;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};

impl SeaOrmStorage {
    /// 写入草稿成绩
    ///
    /// 不存在则新建；存在且为 draft 且无改分则覆盖；
    /// published/locked 或带改分的行原样拒绝，由调用方逐学生上报。
    pub async fn write_draft_final_grade_impl(
        &self,
        student_id: i64,
        class_offering_id: i64,
        computation_id: i64,
        raw_score: f64,
        letter: String,
    ) -> Result<DraftWriteOutcome> {
        let now = chrono::Utc::now().timestamp();

        let existing = FinalGrades::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::ClassOfferingId.eq(class_offering_id))
            .one(&self.db)
            .await
            .map_err(|e| GradeSystemError::database_operation(format!("查询最终成绩失败: {e}")))?;

        let Some(existing) = existing else {
            let model = ActiveModel {
                student_id: Set(student_id),
                class_offering_id: Set(class_offering_id),
                computation_id: Set(computation_id),
                raw_score: Set(raw_score),
                letter: Set(letter),
                status: Set(GradeStatus::Draft.to_string()),
                updated_at: Set(now),
                ..Default::default()
            };

            let inserted = model.insert(&self.db).await.map_err(|e| {
                GradeSystemError::database_operation(format!("写入草稿成绩失败: {e}"))
            })?;

            return Ok(DraftWriteOutcome::Written(inserted.into_final_grade()?));
        };

        let status: GradeStatus = existing
            .status
            .parse()
            .map_err(GradeSystemError::validation)?;
        if !status.allows_recompute() {
            return Ok(DraftWriteOutcome::Refused(status));
        }
        if existing.override_score.is_some() {
            return Ok(DraftWriteOutcome::HasOverride);
        }

        // 条件覆盖：状态与改分条件编进 WHERE，防止并发窗口内被改动
        let result = FinalGrades::update_many()
            .col_expr(Column::ComputationId, Expr::value(computation_id))
            .col_expr(Column::RawScore, Expr::value(raw_score))
            .col_expr(Column::Letter, Expr::value(letter))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(existing.id))
            .filter(Column::Status.eq(GradeStatus::DRAFT))
            .filter(Column::OverrideScore.is_null())
            .exec(&self.db)
            .await
            .map_err(|e| {
                GradeSystemError::database_operation(format!("覆盖草稿成绩失败: {e}"))
            })?;

        if result.rows_affected == 0 {
            return Err(GradeSystemError::state_conflict(format!(
                "学生 {student_id} 的成绩行在写入期间被并发修改"
            )));
        }

        let written = self
            .get_final_grade_impl(student_id, class_offering_id)
            .await?
            .ok_or_else(|| {
                GradeSystemError::database_operation("覆盖后读取草稿成绩失败".to_string())
            })?;

        Ok(DraftWriteOutcome::Written(written))
    }

    /// 获取单个最终成绩
    pub async fn get_final_grade_impl(
        &self,
        student_id: i64,
        class_offering_id: i64,
    ) -> Result<Option<FinalGrade>> {
        let result = FinalGrades::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::ClassOfferingId.eq(class_offering_id))
            .one(&self.db)
            .await
            .map_err(|e| GradeSystemError::database_operation(format!("查询最终成绩失败: {e}")))?;

        result.map(|m| m.into_final_grade()).transpose()
    }

    /// 列出最终成绩（分页，按学生ID升序）
    pub async fn list_final_grades_with_pagination_impl(
        &self,
        class_offering_id: i64,
        query: FinalGradeListQuery,
    ) -> Result<FinalGradeListResponse> {
        let page = query.pagination.page.max(1) as u64;
        let size = query.pagination.size.clamp(1, 100) as u64;

        let mut select = FinalGrades::find().filter(Column::ClassOfferingId.eq(class_offering_id));

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        select = select.order_by_asc(Column::StudentId);

        let paginator = select.paginate(&self.db, size);
        let total = paginator.num_items().await.map_err(|e| {
            GradeSystemError::database_operation(format!("查询最终成绩总数失败: {e}"))
        })?;

        let pages = paginator.num_pages().await.map_err(|e| {
            GradeSystemError::database_operation(format!("查询最终成绩页数失败: {e}"))
        })?;

        let grades = paginator.fetch_page(page - 1).await.map_err(|e| {
            GradeSystemError::database_operation(format!("查询最终成绩列表失败: {e}"))
        })?;

        Ok(FinalGradeListResponse {
            items: grades
                .into_iter()
                .map(|m| m.into_final_grade())
                .collect::<Result<Vec<_>>>()?,
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 列出指定状态的全部最终成绩（批量迁移与统计用，不分页）
    pub async fn list_final_grades_by_status_impl(
        &self,
        class_offering_id: i64,
        statuses: &[GradeStatus],
    ) -> Result<Vec<FinalGrade>> {
        let status_strs: Vec<String> = statuses.iter().map(|s| s.to_string()).collect();

        let models = FinalGrades::find()
            .filter(Column::ClassOfferingId.eq(class_offering_id))
            .filter(Column::Status.is_in(status_strs))
            .order_by_asc(Column::StudentId)
            .all(&self.db)
            .await
            .map_err(|e| {
                GradeSystemError::database_operation(format!("按状态查询最终成绩失败: {e}"))
            })?;

        models.into_iter().map(|m| m.into_final_grade()).collect()
    }

    /// 批量发布：draft -> published
    ///
    /// 幂等：只命中 draft 行，已发布/已锁定的行天然跳过。
    pub async fn publish_drafts_impl(&self, class_offering_id: i64) -> Result<u64> {
        let now = chrono::Utc::now().timestamp();

        let result = FinalGrades::update_many()
            .col_expr(Column::Status, Expr::value(GradeStatus::PUBLISHED))
            .col_expr(Column::PublishedAt, Expr::value(Some(now)))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::ClassOfferingId.eq(class_offering_id))
            .filter(Column::Status.eq(GradeStatus::DRAFT))
            .exec(&self.db)
            .await
            .map_err(|e| GradeSystemError::database_operation(format!("批量发布失败: {e}")))?;

        Ok(result.rows_affected)
    }

    /// 批量撤销发布：published -> draft（locked 不受影响）
    pub async fn unpublish_published_impl(&self, class_offering_id: i64) -> Result<u64> {
        let now = chrono::Utc::now().timestamp();

        let result = FinalGrades::update_many()
            .col_expr(Column::Status, Expr::value(GradeStatus::DRAFT))
            .col_expr(Column::PublishedAt, Expr::value(None::<i64>))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::ClassOfferingId.eq(class_offering_id))
            .filter(Column::Status.eq(GradeStatus::PUBLISHED))
            .exec(&self.db)
            .await
            .map_err(|e| GradeSystemError::database_operation(format!("批量撤销发布失败: {e}")))?;

        Ok(result.rows_affected)
    }

    /// 条件状态迁移：仅当前状态等于 expected 时生效
    ///
    /// 进入 published 盖发布时间戳，进入 locked 盖锁定时间戳；
    /// 反向迁移清空对应时间戳。返回 None 表示并发抢先或行不存在。
    pub async fn set_status_if_impl(
        &self,
        student_id: i64,
        class_offering_id: i64,
        expected: GradeStatus,
        new_status: GradeStatus,
    ) -> Result<Option<FinalGrade>> {
        let now = chrono::Utc::now().timestamp();

        let mut update = FinalGrades::update_many()
            .col_expr(Column::Status, Expr::value(new_status.to_string()))
            .col_expr(Column::UpdatedAt, Expr::value(now));

        match new_status {
            GradeStatus::Published => {
                // 解锁回 published 不重盖发布时间，仅清锁定时间
                if expected == GradeStatus::Draft {
                    update = update.col_expr(Column::PublishedAt, Expr::value(Some(now)));
                }
                update = update.col_expr(Column::LockedAt, Expr::value(None::<i64>));
            }
            GradeStatus::Locked => {
                update = update.col_expr(Column::LockedAt, Expr::value(Some(now)));
            }
            GradeStatus::Draft => {
                update = update
                    .col_expr(Column::PublishedAt, Expr::value(None::<i64>))
                    .col_expr(Column::LockedAt, Expr::value(None::<i64>));
            }
        }

        let result = update
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::ClassOfferingId.eq(class_offering_id))
            .filter(Column::Status.eq(expected.to_string()))
            .exec(&self.db)
            .await
            .map_err(|e| GradeSystemError::database_operation(format!("状态迁移失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.get_final_grade_impl(student_id, class_offering_id).await
    }

    /// 条件写入改分：仅状态仍为 expected 时生效
    pub async fn set_override_if_impl(
        &self,
        student_id: i64,
        class_offering_id: i64,
        expected: GradeStatus,
        r#override: GradeOverride,
    ) -> Result<Option<FinalGrade>> {
        let now = chrono::Utc::now().timestamp();

        let result = FinalGrades::update_many()
            .col_expr(Column::OverrideScore, Expr::value(Some(r#override.score)))
            .col_expr(
                Column::OverrideLetter,
                Expr::value(Some(r#override.letter)),
            )
            .col_expr(
                Column::OverrideReason,
                Expr::value(Some(r#override.reason)),
            )
            .col_expr(Column::OverrideBy, Expr::value(Some(r#override.applied_by)))
            .col_expr(
                Column::OverrideAt,
                Expr::value(Some(r#override.applied_at.timestamp())),
            )
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::ClassOfferingId.eq(class_offering_id))
            .filter(Column::Status.eq(expected.to_string()))
            .exec(&self.db)
            .await
            .map_err(|e| GradeSystemError::database_operation(format!("写入改分失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.get_final_grade_impl(student_id, class_offering_id).await
    }

    /// 条件移除改分
    pub async fn clear_override_if_impl(
        &self,
        student_id: i64,
        class_offering_id: i64,
        expected: GradeStatus,
    ) -> Result<Option<FinalGrade>> {
        let now = chrono::Utc::now().timestamp();

        let result = FinalGrades::update_many()
            .col_expr(Column::OverrideScore, Expr::value(None::<f64>))
            .col_expr(Column::OverrideLetter, Expr::value(None::<String>))
            .col_expr(Column::OverrideReason, Expr::value(None::<String>))
            .col_expr(Column::OverrideBy, Expr::value(None::<i64>))
            .col_expr(Column::OverrideAt, Expr::value(None::<i64>))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::ClassOfferingId.eq(class_offering_id))
            .filter(Column::Status.eq(expected.to_string()))
            .exec(&self.db)
            .await
            .map_err(|e| GradeSystemError::database_operation(format!("移除改分失败: {e}")))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.get_final_grade_impl(student_id, class_offering_id).await
    }

    /// 学生成绩单：跨教学班汇总，可按学期过滤
    ///
    /// 展示值遵循改分优先规则，并附带状态供消费方区分
    /// 临时（draft）与已生效（published/locked）数据。
    pub async fn list_student_transcript_impl(
        &self,
        student_id: i64,
        periods: Option<Vec<String>>,
    ) -> Result<Vec<TranscriptEntry>> {
        use crate::entity::class_offerings::Entity as ClassOfferings;

        let grades = FinalGrades::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_asc(Column::ClassOfferingId)
            .all(&self.db)
            .await
            .map_err(|e| GradeSystemError::database_operation(format!("查询成绩单失败: {e}")))?;

        let mut entries = Vec::with_capacity(grades.len());
        for model in grades {
            let offering = ClassOfferings::find_by_id(model.class_offering_id)
                .one(&self.db)
                .await
                .map_err(|e| {
                    GradeSystemError::database_operation(format!("查询教学班失败: {e}"))
                })?;

            // 教学班记录缺失的行跳过，不让成绩单整体失败
            let Some(offering) = offering else {
                tracing::warn!(
                    "成绩单跳过教学班 {}：排课子系统中无对应记录",
                    model.class_offering_id
                );
                continue;
            };

            if let Some(ref wanted) = periods {
                if !wanted.contains(&offering.academic_period) {
                    continue;
                }
            }

            let grade = model.into_final_grade()?;
            entries.push(TranscriptEntry {
                class_offering_id: grade.class_offering_id,
                offering_name: offering.name,
                academic_period: offering.academic_period,
                score: grade.displayed_score(),
                letter: grade.displayed_letter().to_string(),
                status: grade.status,
            });
        }

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OFFERING: i64 = 7;

    // 预置公式与两个计算批次，满足 final_grades.computation_id 外键
    // （新库中批次 id 依次为 1、2，对应各测试引用的 computation_id）
    async fn seed_computations(storage: &SeaOrmStorage) {
        storage
            .create_formula_and_activate_impl(OFFERING, 1, "Exam".to_string(), 100.0, Vec::new())
            .await
            .unwrap();
        for _ in 0..2 {
            storage
                .create_computation_impl(OFFERING, 1, 1, 1)
                .await
                .unwrap();
        }
    }

    async fn write_draft(storage: &SeaOrmStorage, student_id: i64) -> FinalGrade {
        match storage
            .write_draft_final_grade_impl(student_id, OFFERING, 1, 86.0, "B".to_string())
            .await
            .unwrap()
        {
            DraftWriteOutcome::Written(grade) => grade,
            other => panic!("写入草稿失败: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_publish_is_idempotent() {
        let storage = SeaOrmStorage::new_in_memory().await;
        seed_computations(&storage).await;
        write_draft(&storage, 1).await;
        write_draft(&storage, 2).await;

        assert_eq!(storage.publish_drafts_impl(OFFERING).await.unwrap(), 2);
        // 二次发布没有 draft 行可命中，报零行，不报错
        assert_eq!(storage.publish_drafts_impl(OFFERING).await.unwrap(), 0);

        let published = storage
            .list_final_grades_by_status_impl(OFFERING, &[GradeStatus::Published])
            .await
            .unwrap();
        assert_eq!(published.len(), 2);
    }

    #[tokio::test]
    async fn test_recompute_refuses_published_and_locked() {
        let storage = SeaOrmStorage::new_in_memory().await;
        seed_computations(&storage).await;
        write_draft(&storage, 1).await;
        storage.publish_drafts_impl(OFFERING).await.unwrap();

        let outcome = storage
            .write_draft_final_grade_impl(1, OFFERING, 2, 90.0, "A".to_string())
            .await
            .unwrap();
        assert!(matches!(
            outcome,
            DraftWriteOutcome::Refused(GradeStatus::Published)
        ));

        storage
            .set_status_if_impl(1, OFFERING, GradeStatus::Published, GradeStatus::Locked)
            .await
            .unwrap()
            .unwrap();

        let outcome = storage
            .write_draft_final_grade_impl(1, OFFERING, 2, 90.0, "A".to_string())
            .await
            .unwrap();
        assert!(matches!(
            outcome,
            DraftWriteOutcome::Refused(GradeStatus::Locked)
        ));

        // 原计算值未被动过
        let grade = storage.get_final_grade_impl(1, OFFERING).await.unwrap().unwrap();
        assert_eq!(grade.raw_score, 86.0);
        assert_eq!(grade.letter, "B");
    }

    #[tokio::test]
    async fn test_recompute_refuses_override_on_draft() {
        let storage = SeaOrmStorage::new_in_memory().await;
        seed_computations(&storage).await;
        write_draft(&storage, 1).await;

        storage
            .set_override_if_impl(
                1,
                OFFERING,
                GradeStatus::Draft,
                GradeOverride {
                    score: 91.0,
                    letter: "A".to_string(),
                    reason: "补交作业".to_string(),
                    applied_by: 3,
                    applied_at: chrono::Utc::now(),
                },
            )
            .await
            .unwrap()
            .unwrap();

        let outcome = storage
            .write_draft_final_grade_impl(1, OFFERING, 2, 70.0, "C".to_string())
            .await
            .unwrap();
        assert!(matches!(outcome, DraftWriteOutcome::HasOverride));

        // 移除改分后恢复可重算
        storage
            .clear_override_if_impl(1, OFFERING, GradeStatus::Draft)
            .await
            .unwrap()
            .unwrap();
        let outcome = storage
            .write_draft_final_grade_impl(1, OFFERING, 2, 70.0, "C".to_string())
            .await
            .unwrap();
        assert!(matches!(outcome, DraftWriteOutcome::Written(_)));
    }

    #[tokio::test]
    async fn test_unpublish_returns_only_published_rows() {
        let storage = SeaOrmStorage::new_in_memory().await;
        seed_computations(&storage).await;
        write_draft(&storage, 1).await;
        write_draft(&storage, 2).await;
        storage.publish_drafts_impl(OFFERING).await.unwrap();

        // 学生 1 锁定后不受批量撤销影响
        storage
            .set_status_if_impl(1, OFFERING, GradeStatus::Published, GradeStatus::Locked)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(storage.unpublish_published_impl(OFFERING).await.unwrap(), 1);

        let locked = storage.get_final_grade_impl(1, OFFERING).await.unwrap().unwrap();
        assert_eq!(locked.status, GradeStatus::Locked);
        let reverted = storage.get_final_grade_impl(2, OFFERING).await.unwrap().unwrap();
        assert_eq!(reverted.status, GradeStatus::Draft);
        assert!(reverted.published_at.is_none());
    }
}
