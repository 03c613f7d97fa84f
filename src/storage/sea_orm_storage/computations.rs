//! 成绩计算批次存储操作

use super::SeaOrmStorage;
use crate::entity::grade_computations::{ActiveModel, Column, Entity as GradeComputations};
use crate::errors::{GradeSystemError, Result};
use crate::models::{
    PaginationInfo,
    computations::{
        entities::{ComputationStatus, GradeComputation},
        requests::ComputationListQuery,
        responses::ComputationListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};

impl SeaOrmStorage {
    /// 新建批次（running）
    pub async fn create_computation_impl(
        &self,
        class_offering_id: i64,
        formula_id: i64,
        triggered_by: i64,
        student_count: i64,
    ) -> Result<GradeComputation> {
        let model = ActiveModel {
            class_offering_id: Set(class_offering_id),
            formula_id: Set(formula_id),
            triggered_by: Set(triggered_by),
            status: Set(ComputationStatus::Running.to_string()),
            student_count: Set(student_count),
            succeeded_count: Set(0),
            failed_count: Set(0),
            started_at: Set(chrono::Utc::now().timestamp()),
            finished_at: Set(None),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| GradeSystemError::database_operation(format!("创建计算批次失败: {e}")))?;

        result.into_computation()
    }

    /// 批次收尾
    ///
    /// 仅允许从 running 迁出：批次离开 running 后即不可变。
    pub async fn finish_computation_impl(
        &self,
        id: i64,
        status: ComputationStatus,
        succeeded_count: i64,
        failed_count: i64,
    ) -> Result<()> {
        let result = GradeComputations::update_many()
            .col_expr(Column::Status, Expr::value(status.to_string()))
            .col_expr(Column::SucceededCount, Expr::value(succeeded_count))
            .col_expr(Column::FailedCount, Expr::value(failed_count))
            .col_expr(
                Column::FinishedAt,
                Expr::value(Some(chrono::Utc::now().timestamp())),
            )
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(ComputationStatus::Running.to_string()))
            .exec(&self.db)
            .await
            .map_err(|e| GradeSystemError::database_operation(format!("批次收尾失败: {e}")))?;

        if result.rows_affected == 0 {
            return Err(GradeSystemError::state_conflict(format!(
                "批次 {id} 不在 running 状态，无法收尾"
            )));
        }

        Ok(())
    }

    /// 通过 ID 获取批次
    pub async fn get_computation_by_id_impl(&self, id: i64) -> Result<Option<GradeComputation>> {
        let result = GradeComputations::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| GradeSystemError::database_operation(format!("查询计算批次失败: {e}")))?;

        result.map(|m| m.into_computation()).transpose()
    }

    /// 列出批次（分页，新的在前）
    pub async fn list_computations_with_pagination_impl(
        &self,
        class_offering_id: i64,
        query: ComputationListQuery,
    ) -> Result<ComputationListResponse> {
        let page = query.pagination.page.max(1) as u64;
        let size = query.pagination.size.clamp(1, 100) as u64;

        let select = GradeComputations::find()
            .filter(Column::ClassOfferingId.eq(class_offering_id))
            .order_by_desc(Column::StartedAt);

        let paginator = select.paginate(&self.db, size);
        let total = paginator.num_items().await.map_err(|e| {
            GradeSystemError::database_operation(format!("查询批次总数失败: {e}"))
        })?;

        let pages = paginator.num_pages().await.map_err(|e| {
            GradeSystemError::database_operation(format!("查询批次页数失败: {e}"))
        })?;

        let computations = paginator.fetch_page(page - 1).await.map_err(|e| {
            GradeSystemError::database_operation(format!("查询批次列表失败: {e}"))
        })?;

        Ok(ComputationListResponse {
            items: computations
                .into_iter()
                .map(|m| m.into_computation())
                .collect::<Result<Vec<_>>>()?,
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 教学班当前 running 状态的批次
    pub async fn get_running_computation_impl(
        &self,
        class_offering_id: i64,
    ) -> Result<Option<GradeComputation>> {
        let result = GradeComputations::find()
            .filter(Column::ClassOfferingId.eq(class_offering_id))
            .filter(Column::Status.eq(ComputationStatus::Running.to_string()))
            .one(&self.db)
            .await
            .map_err(|e| {
                GradeSystemError::database_operation(format!("查询运行中批次失败: {e}"))
            })?;

        result.map(|m| m.into_computation()).transpose()
    }

    /// 将超时的 running 批次标记为 failed
    ///
    /// 进程中断会留下永远 running 的批次；启动恢复时统一判死，
    /// 已写入的草稿行保持原样，后续重算可覆盖。
    pub async fn fail_stale_computations_impl(&self, older_than_secs: i64) -> Result<u64> {
        let cutoff = chrono::Utc::now().timestamp() - older_than_secs;

        let result = GradeComputations::update_many()
            .col_expr(
                Column::Status,
                Expr::value(ComputationStatus::Failed.to_string()),
            )
            .col_expr(
                Column::FinishedAt,
                Expr::value(Some(chrono::Utc::now().timestamp())),
            )
            .filter(Column::Status.eq(ComputationStatus::Running.to_string()))
            .filter(Column::StartedAt.lt(cutoff))
            .exec(&self.db)
            .await
            .map_err(|e| {
                GradeSystemError::database_operation(format!("标记僵死批次失败: {e}"))
            })?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 预置公式行，满足 grade_computations.formula_id 外键（新库中 id 为 1）
    async fn seed_formula(storage: &SeaOrmStorage) {
        storage
            .create_formula_and_activate_impl(1, 7, "Exam".to_string(), 100.0, Vec::new())
            .await
            .unwrap();
    }

    // 把批次的 started_at 拨回指定秒数前
    async fn age_computation(storage: &SeaOrmStorage, id: i64, secs: i64) {
        GradeComputations::update_many()
            .col_expr(
                Column::StartedAt,
                Expr::value(chrono::Utc::now().timestamp() - secs),
            )
            .filter(Column::Id.eq(id))
            .exec(&storage.db)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_stale_running_computation_superseded() {
        let storage = SeaOrmStorage::new_in_memory().await;
        seed_formula(&storage).await;

        let stuck = storage.create_computation_impl(1, 1, 7, 30).await.unwrap();
        age_computation(&storage, stuck.id, 100_000).await;

        // 超时前：running 批次挡住后续计算
        assert!(
            storage
                .get_running_computation_impl(1)
                .await
                .unwrap()
                .is_some()
        );

        // 超时清理后：批次判 failed，不再阻塞
        let swept = storage.fail_stale_computations_impl(600).await.unwrap();
        assert_eq!(swept, 1);
        assert!(
            storage
                .get_running_computation_impl(1)
                .await
                .unwrap()
                .is_none()
        );

        let failed = storage
            .get_computation_by_id_impl(stuck.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(failed.status, ComputationStatus::Failed);
    }

    #[tokio::test]
    async fn test_fresh_running_computation_not_swept() {
        let storage = SeaOrmStorage::new_in_memory().await;
        seed_formula(&storage).await;

        let running = storage.create_computation_impl(1, 1, 7, 30).await.unwrap();

        assert_eq!(storage.fail_stale_computations_impl(600).await.unwrap(), 0);
        let found = storage.get_running_computation_impl(1).await.unwrap();
        assert_eq!(found.unwrap().id, running.id);
    }

    #[tokio::test]
    async fn test_finish_computation_leaves_running() {
        let storage = SeaOrmStorage::new_in_memory().await;
        seed_formula(&storage).await;

        let computation = storage.create_computation_impl(1, 1, 7, 3).await.unwrap();
        storage
            .finish_computation_impl(computation.id, ComputationStatus::Completed, 2, 1)
            .await
            .unwrap();

        let finished = storage
            .get_computation_by_id_impl(computation.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(finished.status, ComputationStatus::Completed);
        assert_eq!(finished.succeeded_count, 2);
        assert_eq!(finished.failed_count, 1);

        // 离开 running 后不可再收尾
        assert!(
            storage
                .finish_computation_impl(computation.id, ComputationStatus::Failed, 0, 3)
                .await
                .is_err()
        );
    }
}
