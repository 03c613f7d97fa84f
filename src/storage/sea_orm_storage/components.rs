//! 计分成分存储操作

use super::SeaOrmStorage;
use crate::entity::grading_components::{ActiveModel, Column, Entity as GradingComponents};
use crate::errors::{GradeSystemError, Result};
use crate::models::{
    PaginationInfo,
    components::{
        entities::GradingComponent,
        requests::{ComponentListQuery, CreateComponentRequest, UpdateComponentRequest},
        responses::ComponentListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建成分
    pub async fn create_component_impl(
        &self,
        class_offering_id: i64,
        req: CreateComponentRequest,
    ) -> Result<GradingComponent> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            class_offering_id: Set(class_offering_id),
            name: Set(req.name),
            weight: Set(req.weight),
            max_score: Set(req.max_score),
            scheme: Set(req.scheme.to_string()),
            active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| GradeSystemError::database_operation(format!("创建成分失败: {e}")))?;

        result.into_component()
    }

    /// 通过 ID 获取成分
    pub async fn get_component_by_id_impl(&self, id: i64) -> Result<Option<GradingComponent>> {
        let result = GradingComponents::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| GradeSystemError::database_operation(format!("查询成分失败: {e}")))?;

        result.map(|m| m.into_component()).transpose()
    }

    /// 列出成分（分页）
    pub async fn list_components_with_pagination_impl(
        &self,
        class_offering_id: i64,
        query: ComponentListQuery,
    ) -> Result<ComponentListResponse> {
        let page = query.pagination.page.max(1) as u64;
        let size = query.pagination.size.clamp(1, 100) as u64;

        let mut select =
            GradingComponents::find().filter(Column::ClassOfferingId.eq(class_offering_id));

        // 缺省只返回活跃成分
        if !query.include_inactive.unwrap_or(false) {
            select = select.filter(Column::Active.eq(true));
        }

        select = select.order_by_asc(Column::Id);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| GradeSystemError::database_operation(format!("查询成分总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| GradeSystemError::database_operation(format!("查询成分页数失败: {e}")))?;

        let components = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| GradeSystemError::database_operation(format!("查询成分列表失败: {e}")))?;

        Ok(ComponentListResponse {
            items: components
                .into_iter()
                .map(|m| m.into_component())
                .collect::<Result<Vec<_>>>()?,
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 列出教学班的全部活跃成分
    pub async fn list_active_components_impl(
        &self,
        class_offering_id: i64,
    ) -> Result<Vec<GradingComponent>> {
        let models = GradingComponents::find()
            .filter(Column::ClassOfferingId.eq(class_offering_id))
            .filter(Column::Active.eq(true))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| GradeSystemError::database_operation(format!("查询活跃成分失败: {e}")))?;

        models.into_iter().map(|m| m.into_component()).collect()
    }

    /// 更新成分
    pub async fn update_component_impl(
        &self,
        id: i64,
        update: UpdateComponentRequest,
    ) -> Result<Option<GradingComponent>> {
        // 先检查成分是否存在
        let existing = self.get_component_by_id_impl(id).await?;
        if existing.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(now),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }

        if let Some(weight) = update.weight {
            model.weight = Set(weight);
        }

        if let Some(max_score) = update.max_score {
            model.max_score = Set(max_score);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| GradeSystemError::database_operation(format!("更新成分失败: {e}")))?;

        self.get_component_by_id_impl(id).await
    }

    /// 软删除成分
    pub async fn deactivate_component_impl(&self, id: i64) -> Result<bool> {
        let existing = GradingComponents::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| GradeSystemError::database_operation(format!("查询成分失败: {e}")))?;

        let Some(existing) = existing else {
            return Ok(false);
        };
        if !existing.active {
            return Ok(false);
        }

        let model = ActiveModel {
            id: Set(id),
            active: Set(false),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        model
            .update(&self.db)
            .await
            .map_err(|e| GradeSystemError::database_operation(format!("软删除成分失败: {e}")))?;

        Ok(true)
    }
}
