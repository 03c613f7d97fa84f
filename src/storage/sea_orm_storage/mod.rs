//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod collaborators;
mod components;
mod computations;
mod final_grades;
mod formulas;

use crate::config::AppConfig;
use crate::errors::{GradeSystemError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| GradeSystemError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| GradeSystemError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| GradeSystemError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| GradeSystemError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 内存 SQLite 实例（测试用）
    ///
    /// 单连接：每个内存库绑定一条连接，连接池取多条会各开一个空库。
    #[cfg(test)]
    pub(crate) async fn new_in_memory() -> Self {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).sqlx_logging(false);

        let db = Database::connect(opt)
            .await
            .expect("Failed to connect to in-memory SQLite");
        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        Self { db }
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(GradeSystemError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

// Storage trait 实现
use std::collections::HashMap;

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
use crate::storage::{AccessControl, AssessmentStore, DraftWriteOutcome, RosterProvider, Storage};
use async_trait::async_trait;

#[async_trait]
impl AssessmentStore for SeaOrmStorage {
    async fn get_component_scores(
        &self,
        student_id: i64,
        class_offering_id: i64,
        component_ids: &[i64],
    ) -> Result<HashMap<i64, f64>> {
        self.get_component_scores_impl(student_id, class_offering_id, component_ids)
            .await
    }
}

#[async_trait]
impl RosterProvider for SeaOrmStorage {
    async fn get_students_for_offering(&self, class_offering_id: i64) -> Result<Vec<i64>> {
        self.get_students_for_offering_impl(class_offering_id).await
    }
}

#[async_trait]
impl AccessControl for SeaOrmStorage {
    async fn can_manage_grades(&self, user_id: i64, class_offering_id: i64) -> Result<bool> {
        self.can_manage_grades_impl(user_id, class_offering_id).await
    }
}

#[async_trait]
impl Storage for SeaOrmStorage {
    // 计分成分模块
    async fn create_component(
        &self,
        class_offering_id: i64,
        component: CreateComponentRequest,
    ) -> Result<GradingComponent> {
        self.create_component_impl(class_offering_id, component).await
    }

    async fn get_component_by_id(&self, id: i64) -> Result<Option<GradingComponent>> {
        self.get_component_by_id_impl(id).await
    }

    async fn list_components_with_pagination(
        &self,
        class_offering_id: i64,
        query: ComponentListQuery,
    ) -> Result<ComponentListResponse> {
        self.list_components_with_pagination_impl(class_offering_id, query)
            .await
    }

    async fn list_active_components(
        &self,
        class_offering_id: i64,
    ) -> Result<Vec<GradingComponent>> {
        self.list_active_components_impl(class_offering_id).await
    }

    async fn update_component(
        &self,
        id: i64,
        update: UpdateComponentRequest,
    ) -> Result<Option<GradingComponent>> {
        self.update_component_impl(id, update).await
    }

    async fn deactivate_component(&self, id: i64) -> Result<bool> {
        self.deactivate_component_impl(id).await
    }

    // 计分公式模块
    async fn create_formula_and_activate(
        &self,
        class_offering_id: i64,
        created_by: i64,
        expression: String,
        output_scale: f64,
        grade_boundaries: Vec<GradeBoundary>,
    ) -> Result<GradingFormula> {
        self.create_formula_and_activate_impl(
            class_offering_id,
            created_by,
            expression,
            output_scale,
            grade_boundaries,
        )
        .await
    }

    async fn get_formula_by_id(&self, id: i64) -> Result<Option<GradingFormula>> {
        self.get_formula_by_id_impl(id).await
    }

    async fn get_active_formula(&self, class_offering_id: i64) -> Result<Option<GradingFormula>> {
        self.get_active_formula_impl(class_offering_id).await
    }

    async fn list_formulas_with_pagination(
        &self,
        class_offering_id: i64,
        query: FormulaListQuery,
    ) -> Result<FormulaListResponse> {
        self.list_formulas_with_pagination_impl(class_offering_id, query)
            .await
    }

    async fn active_formula_references(
        &self,
        class_offering_id: i64,
        component_name: &str,
    ) -> Result<bool> {
        self.active_formula_references_impl(class_offering_id, component_name)
            .await
    }

    // 成绩计算批次模块
    async fn create_computation(
        &self,
        class_offering_id: i64,
        formula_id: i64,
        triggered_by: i64,
        student_count: i64,
    ) -> Result<GradeComputation> {
        self.create_computation_impl(class_offering_id, formula_id, triggered_by, student_count)
            .await
    }

    async fn finish_computation(
        &self,
        id: i64,
        status: ComputationStatus,
        succeeded_count: i64,
        failed_count: i64,
    ) -> Result<()> {
        self.finish_computation_impl(id, status, succeeded_count, failed_count)
            .await
    }

    async fn get_computation_by_id(&self, id: i64) -> Result<Option<GradeComputation>> {
        self.get_computation_by_id_impl(id).await
    }

    async fn list_computations_with_pagination(
        &self,
        class_offering_id: i64,
        query: ComputationListQuery,
    ) -> Result<ComputationListResponse> {
        self.list_computations_with_pagination_impl(class_offering_id, query)
            .await
    }

    async fn get_running_computation(
        &self,
        class_offering_id: i64,
    ) -> Result<Option<GradeComputation>> {
        self.get_running_computation_impl(class_offering_id).await
    }

    async fn fail_stale_computations(&self, older_than_secs: i64) -> Result<u64> {
        self.fail_stale_computations_impl(older_than_secs).await
    }

    // 最终成绩模块
    async fn write_draft_final_grade(
        &self,
        student_id: i64,
        class_offering_id: i64,
        computation_id: i64,
        raw_score: f64,
        letter: String,
    ) -> Result<DraftWriteOutcome> {
        self.write_draft_final_grade_impl(
            student_id,
            class_offering_id,
            computation_id,
            raw_score,
            letter,
        )
        .await
    }

    async fn get_final_grade(
        &self,
        student_id: i64,
        class_offering_id: i64,
    ) -> Result<Option<FinalGrade>> {
        self.get_final_grade_impl(student_id, class_offering_id).await
    }

    async fn list_final_grades_with_pagination(
        &self,
        class_offering_id: i64,
        query: FinalGradeListQuery,
    ) -> Result<FinalGradeListResponse> {
        self.list_final_grades_with_pagination_impl(class_offering_id, query)
            .await
    }

    async fn list_final_grades_by_status(
        &self,
        class_offering_id: i64,
        statuses: &[GradeStatus],
    ) -> Result<Vec<FinalGrade>> {
        self.list_final_grades_by_status_impl(class_offering_id, statuses)
            .await
    }

    async fn publish_drafts(&self, class_offering_id: i64) -> Result<u64> {
        self.publish_drafts_impl(class_offering_id).await
    }

    async fn unpublish_published(&self, class_offering_id: i64) -> Result<u64> {
        self.unpublish_published_impl(class_offering_id).await
    }

    async fn set_status_if(
        &self,
        student_id: i64,
        class_offering_id: i64,
        expected: GradeStatus,
        new_status: GradeStatus,
    ) -> Result<Option<FinalGrade>> {
        self.set_status_if_impl(student_id, class_offering_id, expected, new_status)
            .await
    }

    async fn set_override_if(
        &self,
        student_id: i64,
        class_offering_id: i64,
        expected: GradeStatus,
        r#override: GradeOverride,
    ) -> Result<Option<FinalGrade>> {
        self.set_override_if_impl(student_id, class_offering_id, expected, r#override)
            .await
    }

    async fn clear_override_if(
        &self,
        student_id: i64,
        class_offering_id: i64,
        expected: GradeStatus,
    ) -> Result<Option<FinalGrade>> {
        self.clear_override_if_impl(student_id, class_offering_id, expected)
            .await
    }

    // 报表模块
    async fn list_student_transcript(
        &self,
        student_id: i64,
        periods: Option<Vec<String>>,
    ) -> Result<Vec<TranscriptEntry>> {
        self.list_student_transcript_impl(student_id, periods).await
    }
}
