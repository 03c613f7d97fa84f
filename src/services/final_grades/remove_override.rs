use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{FinalGradeService, ensure_can_manage};
use crate::audit::{self, AuditEvent};
use crate::models::{ApiResponse, ErrorCode};

/// 移除人工改分
///
/// 移除后展示值回落到计算值。锁定状态下不允许动改分。
pub async fn remove_override(
    service: &FinalGradeService,
    request: &HttpRequest,
    class_offering_id: i64,
    student_id: i64,
    user_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Some(response) = ensure_can_manage(&storage, user_id, class_offering_id).await {
        return Ok(response);
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
            "成绩已锁定，须先解锁再移除改分",
        )));
    }

    if existing.r#override.is_none() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "该成绩没有人工改分",
        )));
    }

    match storage
        .clear_override_if(student_id, class_offering_id, existing.status)
        .await
    {
        Ok(Some(grade)) => {
            audit::record(
                AuditEvent::new("final_grade.remove_override", user_id, class_offering_id)
                    .student(student_id),
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(grade, "改分已移除")))
        }
        Ok(None) => Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::StateConflict,
            "成绩状态被并发修改，请重试",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("移除改分失败: {e}"),
            )),
        ),
    }
}
