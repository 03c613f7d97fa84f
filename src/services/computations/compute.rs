use std::collections::HashMap;
use std::collections::HashSet;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::{ComputationService, OfferingGuard};
use crate::config::AppConfig;
use crate::formula::{self, FormulaError};
use crate::models::components::entities::GradingComponent;
use crate::models::computations::entities::ComputationStatus;
use crate::models::computations::requests::ComputeGradesRequest;
use crate::models::computations::responses::{ComputationResponse, StudentComputationOutcome};
use crate::models::final_grades::entities::GradeStatus;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::formulas::create::formula_error_code;
use crate::services::formulas::weight_sum_violation;
use crate::storage::DraftWriteOutcome;

/// 把按成分ID的原始分数换算成按成分名的求值输入
///
/// 只收公式实际引用的成分；缺分的成分名原样返回，
/// 不静默按零处理。
pub(crate) fn collect_reference_scores(
    references: &[String],
    components: &[GradingComponent],
    scores_by_id: &HashMap<i64, f64>,
) -> Result<HashMap<String, f64>, String> {
    let mut scores = HashMap::with_capacity(references.len());
    for name in references {
        let component = components
            .iter()
            .find(|c| c.name == *name)
            .ok_or_else(|| name.clone())?;
        let score = scores_by_id
            .get(&component.id)
            .ok_or_else(|| name.clone())?;
        scores.insert(name.clone(), *score);
    }
    Ok(scores)
}

pub async fn compute_grades(
    service: &ComputationService,
    request: &HttpRequest,
    class_offering_id: i64,
    user_id: i64,
    req: ComputeGradesRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.can_manage_grades(user_id, class_offering_id).await {
        Ok(true) => {}
        Ok(false) => {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::Forbidden,
                "没有管理该教学班成绩的权限",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("权限检查失败: {e}"),
                )),
            );
        }
    }

    // 进程内互斥，持有至函数返回
    let _guard = match OfferingGuard::try_acquire(class_offering_id) {
        Some(guard) => guard,
        None => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::ComputationInProgress,
                "教学班已有进行中的计算",
            )));
        }
    };

    // 进程中断会留下永远 running 的批次，不能只靠启动恢复清理，
    // 否则重算一直被挡到下次重启。每次计算前先按超时线清一遍。
    let stale_secs = AppConfig::get().grading.stale_computation_secs;
    match storage.fail_stale_computations(stale_secs).await {
        Ok(0) => {}
        Ok(count) => {
            warn!(class_offering_id, "已将 {} 个僵死批次判为 failed", count);
        }
        Err(e) => {
            warn!(class_offering_id, "清理僵死批次失败: {e}");
        }
    }

    // 跨进程互斥：数据库里的 running 批次
    match storage.get_running_computation(class_offering_id).await {
        Ok(Some(running)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::ComputationInProgress,
                format!("教学班已有进行中的计算 (批次 {})", running.id),
            )));
        }
        Ok(None) => {}
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询运行中批次失败: {e}"),
                )),
            );
        }
    }

    // 选定公式：指定ID或当前生效
    let formula_row = match req.formula_id {
        Some(formula_id) => match storage.get_formula_by_id(formula_id).await {
            Ok(Some(f)) if f.class_offering_id == class_offering_id => f,
            Ok(_) => {
                return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::FormulaNotFound,
                    "公式不存在",
                )));
            }
            Err(e) => {
                return Ok(
                    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                        ErrorCode::InternalServerError,
                        format!("查询公式失败: {e}"),
                    )),
                );
            }
        },
        None => match storage.get_active_formula(class_offering_id).await {
            Ok(Some(f)) => f,
            Ok(None) => {
                return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                    ErrorCode::NoActiveFormula,
                    "教学班没有生效的公式",
                )));
            }
            Err(e) => {
                return Ok(
                    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                        ErrorCode::InternalServerError,
                        format!("查询生效公式失败: {e}"),
                    )),
                );
            }
        },
    };

    let components = match storage.list_active_components(class_offering_id).await {
        Ok(components) => components,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询活跃成分失败: {e}"),
                )),
            );
        }
    };

    // 计算启动时点再校验一次权重和，成分可能在公式生效后被改过
    if let Some(violation) = weight_sum_violation(&components) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::WeightSumMismatch,
            violation,
        )));
    }

    // 公式存量表达式对照当前成分集重新校验
    let known: HashSet<String> = components.iter().map(|c| c.name.clone()).collect();
    let expr = match formula::validate(&formula_row.expression, &known) {
        Ok(expr) => expr,
        Err(e) => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                formula_error_code(&e),
                format!("公式 {} 无法用于计算: {e}", formula_row.id),
            )));
        }
    };
    let references = expr.references();

    // 名册解析：未指定时取完整名册，指定时校验成员资格
    let roster = match storage.get_students_for_offering(class_offering_id).await {
        Ok(roster) => roster,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询名册失败: {e}"),
                )),
            );
        }
    };

    let roster_set: HashSet<i64> = roster.iter().copied().collect();
    let (students, outside_roster): (Vec<i64>, Vec<i64>) = match req.student_ids {
        Some(ids) => ids.into_iter().partition(|id| roster_set.contains(id)),
        None => (roster, Vec::new()),
    };

    let computation = match storage
        .create_computation(
            class_offering_id,
            formula_row.id,
            user_id,
            (students.len() + outside_roster.len()) as i64,
        )
        .await
    {
        Ok(computation) => computation,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("创建计算批次失败: {e}"),
                )),
            );
        }
    };

    info!(
        computation_id = computation.id,
        class_offering_id,
        formula_id = formula_row.id,
        students = students.len(),
        "grade computation started"
    );

    let mut results: Vec<StudentComputationOutcome> = Vec::with_capacity(computation.student_count as usize);
    for student_id in outside_roster {
        results.push(StudentComputationOutcome::failed(
            student_id,
            ErrorCode::NotFound,
            "学生不在教学班名册中",
        ));
    }

    // 逐学生计算：单个失败只记录，不中止批次
    let component_ids: Vec<i64> = components.iter().map(|c| c.id).collect();
    for student_id in students {
        let outcome = compute_one_student(
            &storage,
            student_id,
            class_offering_id,
            computation.id,
            &expr,
            &references,
            &components,
            &component_ids,
            &formula_row.grade_boundaries,
        )
        .await;
        results.push(outcome);
    }

    let succeeded = results.iter().filter(|r| r.ok).count() as i64;
    let failed = results.len() as i64 - succeeded;

    if let Err(e) = storage
        .finish_computation(computation.id, ComputationStatus::Completed, succeeded, failed)
        .await
    {
        return Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("批次收尾失败: {e}"),
            )),
        );
    }

    let computation = match storage.get_computation_by_id(computation.id).await {
        Ok(Some(c)) => c,
        Ok(None) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "批次收尾后读取失败",
                )),
            );
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询计算批次失败: {e}"),
                )),
            );
        }
    };

    info!(
        computation_id = computation.id,
        succeeded, failed, "grade computation finished"
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        ComputationResponse {
            computation,
            results,
        },
        "成绩计算完成",
    )))
}

#[allow(clippy::too_many_arguments)]
async fn compute_one_student(
    storage: &std::sync::Arc<dyn crate::storage::Storage>,
    student_id: i64,
    class_offering_id: i64,
    computation_id: i64,
    expr: &formula::Expr,
    references: &[String],
    components: &[GradingComponent],
    component_ids: &[i64],
    grade_boundaries: &[crate::models::formulas::entities::GradeBoundary],
) -> StudentComputationOutcome {
    let scores_by_id = match storage
        .get_component_scores(student_id, class_offering_id, component_ids)
        .await
    {
        Ok(scores) => scores,
        Err(e) => {
            warn!(student_id, "读取测评分数失败: {e}");
            return StudentComputationOutcome::failed(
                student_id,
                ErrorCode::InternalServerError,
                format!("读取测评分数失败: {e}"),
            );
        }
    };

    let scores = match collect_reference_scores(references, components, &scores_by_id) {
        Ok(scores) => scores,
        Err(missing) => {
            return StudentComputationOutcome::failed(
                student_id,
                ErrorCode::IncompleteGrading,
                format!("成分 {missing} 尚未评分"),
            );
        }
    };

    let raw_score = match formula::evaluate(expr, &scores) {
        Ok(score) => score,
        Err(e) => {
            let code = match e {
                FormulaError::MissingComponentScore(_) => ErrorCode::MissingComponentScore,
                _ => formula_error_code(&e),
            };
            return StudentComputationOutcome::failed(student_id, code, e.to_string());
        }
    };

    let letter = match formula::boundaries::map_to_letter(raw_score, grade_boundaries) {
        Ok(letter) => letter.to_string(),
        Err(e) => {
            return StudentComputationOutcome::failed(
                student_id,
                ErrorCode::BoundaryGapError,
                e.to_string(),
            );
        }
    };

    match storage
        .write_draft_final_grade(
            student_id,
            class_offering_id,
            computation_id,
            raw_score,
            letter.clone(),
        )
        .await
    {
        Ok(DraftWriteOutcome::Written(_)) => {
            StudentComputationOutcome::ok(student_id, raw_score, letter)
        }
        Ok(DraftWriteOutcome::Refused(GradeStatus::Locked)) => StudentComputationOutcome::failed(
            student_id,
            ErrorCode::FinalGradeLocked,
            "成绩已锁定，不能重算覆盖",
        ),
        Ok(DraftWriteOutcome::Refused(status)) => StudentComputationOutcome::failed(
            student_id,
            ErrorCode::StateConflict,
            format!("成绩处于 {status} 状态，不能重算覆盖"),
        ),
        Ok(DraftWriteOutcome::HasOverride) => StudentComputationOutcome::failed(
            student_id,
            ErrorCode::OverridePresent,
            "成绩存在人工改分，须先移除改分再重算",
        ),
        Err(e) => StudentComputationOutcome::failed(
            student_id,
            ErrorCode::InternalServerError,
            format!("写入草稿成绩失败: {e}"),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::components::entities::WeightScheme;

    fn component(id: i64, name: &str) -> GradingComponent {
        GradingComponent {
            id,
            class_offering_id: 1,
            name: name.to_string(),
            weight: 0.5,
            max_score: 100.0,
            scheme: WeightScheme::Weighted,
            active: true,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_collect_reference_scores() {
        let components = vec![component(10, "Homework"), component(11, "Exam")];
        let scores_by_id: HashMap<i64, f64> = [(10, 80.0), (11, 90.0)].into_iter().collect();
        let references = vec!["Homework".to_string(), "Exam".to_string()];

        let scores = collect_reference_scores(&references, &components, &scores_by_id).unwrap();
        assert_eq!(scores["Homework"], 80.0);
        assert_eq!(scores["Exam"], 90.0);
    }

    #[test]
    fn test_collect_reports_missing_score() {
        let components = vec![component(10, "Homework"), component(11, "Exam")];
        let scores_by_id: HashMap<i64, f64> = [(10, 80.0)].into_iter().collect();
        let references = vec!["Homework".to_string(), "Exam".to_string()];

        let missing =
            collect_reference_scores(&references, &components, &scores_by_id).unwrap_err();
        assert_eq!(missing, "Exam");
    }

    #[tokio::test]
    async fn test_batch_skips_student_with_missing_score() {
        use crate::models::components::requests::CreateComponentRequest;
        use crate::models::formulas::entities::GradeBoundary;
        use crate::storage::sea_orm_storage::SeaOrmStorage;
        use sea_orm::{ActiveModelTrait, Set};
        use std::sync::Arc;

        let sea = SeaOrmStorage::new_in_memory().await;
        let offering = 1;

        let mut component_ids = Vec::new();
        for (name, weight) in [("Homework", 0.4), ("Exam", 0.6)] {
            let created = sea
                .create_component_impl(
                    offering,
                    CreateComponentRequest {
                        name: name.to_string(),
                        weight,
                        max_score: 100.0,
                        scheme: WeightScheme::Weighted,
                    },
                )
                .await
                .unwrap();
            component_ids.push(created.id);
        }

        // 学生 1、2 两项齐全；学生 3 缺 Exam 分数
        for (student_id, component_id, score) in [
            (1, component_ids[0], 80.0),
            (1, component_ids[1], 90.0),
            (2, component_ids[0], 70.0),
            (2, component_ids[1], 60.0),
            (3, component_ids[0], 95.0),
        ] {
            crate::entity::assessment_grades::ActiveModel {
                student_id: Set(student_id),
                component_id: Set(component_id),
                score: Set(score),
                graded_at: Set(chrono::Utc::now().timestamp()),
                ..Default::default()
            }
            .insert(&sea.db)
            .await
            .unwrap();
        }

        let components = sea.list_active_components_impl(offering).await.unwrap();
        let known: HashSet<String> = components.iter().map(|c| c.name.clone()).collect();
        let expr = formula::validate("Homework*0.4 + Exam*0.6", &known).unwrap();
        let references = expr.references();
        let boundaries = vec![
            GradeBoundary {
                min_score: 85.0,
                letter: "A".to_string(),
            },
            GradeBoundary {
                min_score: 60.0,
                letter: "B".to_string(),
            },
            GradeBoundary {
                min_score: 0.0,
                letter: "C".to_string(),
            },
        ];

        // 预置公式行，满足 grade_computations.formula_id 外键（新库中 id 为 1）
        sea.create_formula_and_activate_impl(
            offering,
            9,
            "Homework*0.4 + Exam*0.6".to_string(),
            100.0,
            Vec::new(),
        )
        .await
        .unwrap();
        let computation = sea.create_computation_impl(offering, 1, 9, 3).await.unwrap();
        let storage: Arc<dyn crate::storage::Storage> = Arc::new(sea.clone());

        let mut results = Vec::new();
        for student_id in [1, 2, 3] {
            results.push(
                compute_one_student(
                    &storage,
                    student_id,
                    offering,
                    computation.id,
                    &expr,
                    &references,
                    &components,
                    &component_ids,
                    &boundaries,
                )
                .await,
            );
        }

        let succeeded = results.iter().filter(|r| r.ok).count();
        assert_eq!(succeeded, 2);
        assert_eq!(results.len() - succeeded, 1);

        let incomplete = &results[2];
        assert!(!incomplete.ok);
        assert_eq!(
            incomplete.error_code,
            Some(ErrorCode::IncompleteGrading as i32)
        );
        // 缺分学生不产生成绩行
        assert!(sea.get_final_grade_impl(3, offering).await.unwrap().is_none());

        // 成功学生写入草稿行，分数按公式求值、等级按边界映射
        let grade = sea
            .get_final_grade_impl(1, offering)
            .await
            .unwrap()
            .unwrap();
        assert!((grade.raw_score - 86.0).abs() < 1e-9);
        assert_eq!(grade.letter, "A");
        assert_eq!(grade.status, GradeStatus::Draft);
    }

    #[test]
    fn test_collect_ignores_unreferenced_components() {
        // Quiz 没有分数，但公式没引用它，不影响结果
        let components = vec![component(10, "Homework"), component(12, "Quiz")];
        let scores_by_id: HashMap<i64, f64> = [(10, 70.0)].into_iter().collect();
        let references = vec!["Homework".to_string()];

        let scores = collect_reference_scores(&references, &components, &scores_by_id).unwrap();
        assert_eq!(scores.len(), 1);
        assert_eq!(scores["Homework"], 70.0);
    }
}
