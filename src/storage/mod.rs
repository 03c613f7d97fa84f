use std::collections::HashMap;
use std::sync::Arc;

use crate::models::{
    components::{
        entities::GradingComponent,
        requests::{ComponentListQuery, CreateComponentRequest, UpdateComponentRequest},
        responses::ComponentListResponse,
    },
    computations::{
        entities::{ComputationStatus, GradeComputation},
        requests::ComputationListQuery,
        responses::ComputationListResponse,
    },
    final_grades::{
        entities::{FinalGrade, GradeOverride, GradeStatus},
        requests::FinalGradeListQuery,
        responses::FinalGradeListResponse,
    },
    formulas::{
        entities::{GradeBoundary, GradingFormula},
        requests::FormulaListQuery,
        responses::FormulaListResponse,
    },
    reports::responses::TranscriptEntry,
};

use crate::errors::Result;

pub mod sea_orm_storage;

/// 测评分数读取接口（测评子系统协作方）
///
/// 返回映射中缺失的 component_id 表示该成分尚未评分，
/// 由调用方决定如何处理，绝不默认为零。
#[async_trait::async_trait]
pub trait AssessmentStore: Send + Sync {
    async fn get_component_scores(
        &self,
        student_id: i64,
        class_offering_id: i64,
        component_ids: &[i64],
    ) -> Result<HashMap<i64, f64>>;
}

/// 名册读取接口（选课子系统协作方）
#[async_trait::async_trait]
pub trait RosterProvider: Send + Sync {
    /// 按名册顺序返回教学班的学生ID
    async fn get_students_for_offering(&self, class_offering_id: i64) -> Result<Vec<i64>>;
}

/// 授权能力判定接口（权限子系统协作方）
///
/// 所有变更操作前都必须调用；false 一律映射为 Forbidden，
/// 不向调用方泄露内部细节。
#[async_trait::async_trait]
pub trait AccessControl: Send + Sync {
    async fn can_manage_grades(&self, user_id: i64, class_offering_id: i64) -> Result<bool>;
}

/// 草稿写入结果
///
/// 重算覆盖只允许 draft 且无改分的行；其余情形逐学生上报，
/// 不中止批次。
#[derive(Debug, Clone)]
pub enum DraftWriteOutcome {
    /// 已写入（新建或覆盖草稿）
    Written(FinalGrade),
    /// 行处于 published/locked，拒绝覆盖
    Refused(GradeStatus),
    /// 行上存在人工改分，须先移除
    HasOverride,
}

#[async_trait::async_trait]
pub trait Storage: AssessmentStore + RosterProvider + AccessControl + Send + Sync {
    /// 计分成分管理方法
    // 创建成分
    async fn create_component(
        &self,
        class_offering_id: i64,
        component: CreateComponentRequest,
    ) -> Result<GradingComponent>;
    // 通过ID获取成分
    async fn get_component_by_id(&self, id: i64) -> Result<Option<GradingComponent>>;
    // 列出成分（分页）
    async fn list_components_with_pagination(
        &self,
        class_offering_id: i64,
        query: ComponentListQuery,
    ) -> Result<ComponentListResponse>;
    // 列出教学班的全部活跃成分
    async fn list_active_components(&self, class_offering_id: i64)
    -> Result<Vec<GradingComponent>>;
    // 更新成分
    async fn update_component(
        &self,
        id: i64,
        update: UpdateComponentRequest,
    ) -> Result<Option<GradingComponent>>;
    // 软删除成分（active = false），不做物理删除
    async fn deactivate_component(&self, id: i64) -> Result<bool>;

    /// 计分公式管理方法
    // 创建公式并使之生效，同事务停用原生效公式
    async fn create_formula_and_activate(
        &self,
        class_offering_id: i64,
        created_by: i64,
        expression: String,
        output_scale: f64,
        grade_boundaries: Vec<GradeBoundary>,
    ) -> Result<GradingFormula>;
    // 通过ID获取公式
    async fn get_formula_by_id(&self, id: i64) -> Result<Option<GradingFormula>>;
    // 获取教学班当前生效公式
    async fn get_active_formula(&self, class_offering_id: i64) -> Result<Option<GradingFormula>>;
    // 列出公式（分页）
    async fn list_formulas_with_pagination(
        &self,
        class_offering_id: i64,
        query: FormulaListQuery,
    ) -> Result<FormulaListResponse>;
    // 是否存在引用了指定成分名的生效公式（删除成分前检查）
    async fn active_formula_references(
        &self,
        class_offering_id: i64,
        component_name: &str,
    ) -> Result<bool>;

    /// 成绩计算批次方法
    // 新建批次（running 状态）
    async fn create_computation(
        &self,
        class_offering_id: i64,
        formula_id: i64,
        triggered_by: i64,
        student_count: i64,
    ) -> Result<GradeComputation>;
    // 批次收尾：写入终态与成功/失败计数
    async fn finish_computation(
        &self,
        id: i64,
        status: ComputationStatus,
        succeeded_count: i64,
        failed_count: i64,
    ) -> Result<()>;
    // 通过ID获取批次
    async fn get_computation_by_id(&self, id: i64) -> Result<Option<GradeComputation>>;
    // 列出批次（分页）
    async fn list_computations_with_pagination(
        &self,
        class_offering_id: i64,
        query: ComputationListQuery,
    ) -> Result<ComputationListResponse>;
    // 教学班是否有 running 状态的批次
    async fn get_running_computation(
        &self,
        class_offering_id: i64,
    ) -> Result<Option<GradeComputation>>;
    // 将超时的 running 批次标记为 failed（启动恢复）
    async fn fail_stale_computations(&self, older_than_secs: i64) -> Result<u64>;

    /// 最终成绩方法
    // 写入草稿成绩（新建或覆盖既有草稿；published/locked/有改分的行拒绝）
    async fn write_draft_final_grade(
        &self,
        student_id: i64,
        class_offering_id: i64,
        computation_id: i64,
        raw_score: f64,
        letter: String,
    ) -> Result<DraftWriteOutcome>;
    // 获取单个最终成绩
    async fn get_final_grade(
        &self,
        student_id: i64,
        class_offering_id: i64,
    ) -> Result<Option<FinalGrade>>;
    // 列出最终成绩（分页）
    async fn list_final_grades_with_pagination(
        &self,
        class_offering_id: i64,
        query: FinalGradeListQuery,
    ) -> Result<FinalGradeListResponse>;
    // 列出指定状态的全部最终成绩（批量迁移与统计用）
    async fn list_final_grades_by_status(
        &self,
        class_offering_id: i64,
        statuses: &[GradeStatus],
    ) -> Result<Vec<FinalGrade>>;
    // 批量发布：draft -> published，返回受影响行数
    async fn publish_drafts(&self, class_offering_id: i64) -> Result<u64>;
    // 批量撤销发布：published -> draft，返回受影响行数
    async fn unpublish_published(&self, class_offering_id: i64) -> Result<u64>;
    // 条件状态迁移：仅当前状态等于 expected 时生效（乐观并发）
    async fn set_status_if(
        &self,
        student_id: i64,
        class_offering_id: i64,
        expected: GradeStatus,
        new_status: GradeStatus,
    ) -> Result<Option<FinalGrade>>;
    // 条件写入改分：仅 draft/published 且状态未被并发修改时生效
    async fn set_override_if(
        &self,
        student_id: i64,
        class_offering_id: i64,
        expected: GradeStatus,
        r#override: GradeOverride,
    ) -> Result<Option<FinalGrade>>;
    // 条件移除改分
    async fn clear_override_if(
        &self,
        student_id: i64,
        class_offering_id: i64,
        expected: GradeStatus,
    ) -> Result<Option<FinalGrade>>;

    /// 报表方法
    // 学生成绩单：按学期过滤，附教学班名称与学期标注
    async fn list_student_transcript(
        &self,
        student_id: i64,
        periods: Option<Vec<String>>,
    ) -> Result<Vec<TranscriptEntry>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
