use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{FinalGradeService, ensure_can_manage};
use crate::audit::{self, AuditEvent};
use crate::formula::boundaries::map_to_letter;
use crate::models::final_grades::entities::GradeOverride;
use crate::models::final_grades::requests::OverrideGradeRequest;
use crate::models::{ApiResponse, ErrorCode};

/// 人工改分
///
/// 改分附着在成绩行上，计算值保持不变供审计追溯。
/// score 与 letter 至少提供其一；只给 score 时等级按
/// 当前生效公式的边界重新映射。
pub async fn override_grade(
    service: &FinalGradeService,
    request: &HttpRequest,
    class_offering_id: i64,
    student_id: i64,
    user_id: i64,
    req: OverrideGradeRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Some(response) = ensure_can_manage(&storage, user_id, class_offering_id).await {
        return Ok(response);
    }

    if req.score.is_none() && req.letter.is_none() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "score 与 letter 至少提供其一",
        )));
    }
    if req.reason.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "改分必须提供理由",
        )));
    }
    if let Some(score) = req.score {
        if !score.is_finite() {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                "score 必须是有限数",
            )));
        }
    }

    let existing = match storage.get_final_grade(student_id, class_offering_id).await {
        Ok(Some(grade)) => grade,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::FinalGradeNotFound,
                "最终成绩不存在",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询最终成绩失败: {e}"),
                )),
            );
        }
    };

    if !existing.status.allows_override() {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::CannotOverrideLocked,
            "成绩已锁定，须先解锁再改分",
        )));
    }

    let score = req.score.unwrap_or(existing.raw_score);
    let letter = match req.letter {
        Some(letter) => letter,
        None => {
            // 只改分数时，等级按生效公式的边界重新映射
            let formula = match storage.get_active_formula(class_offering_id).await {
                Ok(Some(formula)) => formula,
                Ok(None) => {
                    return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                        ErrorCode::NoActiveFormula,
                        "没有生效公式，改分时必须同时提供 letter",
                    )));
                }
                Err(e) => {
                    return Ok(HttpResponse::InternalServerError().json(
                        ApiResponse::error_empty(
                            ErrorCode::InternalServerError,
                            format!("查询生效公式失败: {e}"),
                        ),
                    ));
                }
            };
            match map_to_letter(score, &formula.grade_boundaries) {
                Ok(letter) => letter.to_string(),
                Err(e) => {
                    return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                        ErrorCode::BoundaryGapError,
                        e.to_string(),
                    )));
                }
            }
        }
    };

    let reason = req.reason;
    let grade_override = GradeOverride {
        score,
        letter,
        reason: reason.clone(),
        applied_by: user_id,
        applied_at: chrono::Utc::now(),
    };

    match storage
        .set_override_if(student_id, class_offering_id, existing.status, grade_override)
        .await
    {
        Ok(Some(grade)) => {
            audit::record(
                AuditEvent::new("final_grade.override", user_id, class_offering_id)
                    .student(student_id)
                    .reason(reason),
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(grade, "改分成功")))
        }
        Ok(None) => Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::StateConflict,
            "成绩状态被并发修改，请重试",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("写入改分失败: {e}"),
            )),
        ),
    }
}
