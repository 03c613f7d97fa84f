use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{FinalGradeService, ensure_can_manage};
use crate::audit::{self, AuditEvent};
use crate::models::final_grades::entities::GradeStatus;
use crate::models::final_grades::requests::UnlockGradeRequest;
use crate::models::{ApiResponse, ErrorCode};

/// 解锁单个学生的成绩
///
/// locked -> published，必须附理由，并记录审计事件。
pub async fn unlock_grade(
    service: &FinalGradeService,
    request: &HttpRequest,
    class_offering_id: i64,
    student_id: i64,
    user_id: i64,
    req: UnlockGradeRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Some(response) = ensure_can_manage(&storage, user_id, class_offering_id).await {
        return Ok(response);
    }

    if req.reason.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "解锁必须提供理由",
        )));
    }

    match storage
        .set_status_if(
            student_id,
            class_offering_id,
            GradeStatus::Locked,
            GradeStatus::Published,
        )
        .await
    {
        Ok(Some(grade)) => {
            audit::record(
                AuditEvent::new("final_grade.unlock", user_id, class_offering_id)
                    .student(student_id)
                    .reason(req.reason),
            );
            return Ok(HttpResponse::Ok().json(ApiResponse::success(grade, "成绩已解锁")));
        }
        Ok(None) => {}
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("解锁成绩失败: {e}"),
                )),
            );
        }
    }

    match storage.get_final_grade(student_id, class_offering_id).await {
        Ok(Some(_)) => Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::StateConflict,
            "成绩不在锁定状态",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::FinalGradeNotFound,
            "最终成绩不存在",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("查询最终成绩失败: {e}"),
            )),
        ),
    }
}
