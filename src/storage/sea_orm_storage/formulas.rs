//! 计分公式存储操作

use super::SeaOrmStorage;
use crate::entity::grading_formulas::{ActiveModel, Column, Entity as GradingFormulas};
use crate::errors::{GradeSystemError, Result};
use crate::models::{
    PaginationInfo,
    formulas::{
        entities::{GradeBoundary, GradingFormula},
        requests::FormulaListQuery,
        responses::FormulaListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 创建公式并使之生效
    ///
    /// 同一事务内停用原生效公式，"每班至多一个生效公式"由此保证。
    /// 原公式保留，既往计算批次仍指向它。
    pub async fn create_formula_and_activate_impl(
        &self,
        class_offering_id: i64,
        created_by: i64,
        expression: String,
        output_scale: f64,
        grade_boundaries: Vec<GradeBoundary>,
    ) -> Result<GradingFormula> {
        let boundaries_json = serde_json::to_string(&grade_boundaries)?;
        let now = chrono::Utc::now().timestamp();

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| GradeSystemError::database_operation(format!("开启事务失败: {e}")))?;

        // 停用原生效公式
        GradingFormulas::update_many()
            .col_expr(Column::IsActive, sea_orm::sea_query::Expr::value(false))
            .filter(Column::ClassOfferingId.eq(class_offering_id))
            .filter(Column::IsActive.eq(true))
            .exec(&txn)
            .await
            .map_err(|e| GradeSystemError::database_operation(format!("停用原公式失败: {e}")))?;

        let model = ActiveModel {
            class_offering_id: Set(class_offering_id),
            expression: Set(expression),
            output_scale: Set(output_scale),
            grade_boundaries: Set(boundaries_json),
            is_active: Set(true),
            created_by: Set(created_by),
            created_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&txn)
            .await
            .map_err(|e| GradeSystemError::database_operation(format!("创建公式失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| GradeSystemError::database_operation(format!("提交事务失败: {e}")))?;

        result.into_formula()
    }

    /// 通过 ID 获取公式
    pub async fn get_formula_by_id_impl(&self, id: i64) -> Result<Option<GradingFormula>> {
        let result = GradingFormulas::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| GradeSystemError::database_operation(format!("查询公式失败: {e}")))?;

        result.map(|m| m.into_formula()).transpose()
    }

    /// 获取教学班当前生效公式
    pub async fn get_active_formula_impl(
        &self,
        class_offering_id: i64,
    ) -> Result<Option<GradingFormula>> {
        let result = GradingFormulas::find()
            .filter(Column::ClassOfferingId.eq(class_offering_id))
            .filter(Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(|e| GradeSystemError::database_operation(format!("查询生效公式失败: {e}")))?;

        result.map(|m| m.into_formula()).transpose()
    }

    /// 列出公式（分页，新的在前）
    pub async fn list_formulas_with_pagination_impl(
        &self,
        class_offering_id: i64,
        query: FormulaListQuery,
    ) -> Result<FormulaListResponse> {
        let page = query.pagination.page.max(1) as u64;
        let size = query.pagination.size.clamp(1, 100) as u64;

        let select = GradingFormulas::find()
            .filter(Column::ClassOfferingId.eq(class_offering_id))
            .order_by_desc(Column::CreatedAt);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| GradeSystemError::database_operation(format!("查询公式总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| GradeSystemError::database_operation(format!("查询公式页数失败: {e}")))?;

        let formulas = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| GradeSystemError::database_operation(format!("查询公式列表失败: {e}")))?;

        Ok(FormulaListResponse {
            items: formulas
                .into_iter()
                .map(|m| m.into_formula())
                .collect::<Result<Vec<_>>>()?,
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 生效公式是否引用了指定成分名
    ///
    /// 成分软删除前的引用检查：被生效公式引用的成分不可删除。
    pub async fn active_formula_references_impl(
        &self,
        class_offering_id: i64,
        component_name: &str,
    ) -> Result<bool> {
        let Some(formula) = self.get_active_formula_impl(class_offering_id).await? else {
            return Ok(false);
        };

        // 历史公式曾通过校验，解析失败视为存储损坏
        let expr = crate::formula::parse(&formula.expression)
            .map_err(|e| GradeSystemError::database_operation(format!("解析存量公式失败: {e}")))?;

        Ok(expr.references().iter().any(|name| name == component_name))
    }
}
