use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{FinalGradeService, ensure_can_manage};
use crate::models::final_grades::entities::GradeStatus;
use crate::models::{ApiResponse, ErrorCode};

/// 锁定单个学生的成绩
///
/// 锁定蕴含已发布：draft 行必须先发布。重复锁定按幂等处理。
pub async fn lock_grade(
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

    // 乐观迁移：published -> locked
    match storage
        .set_status_if(
            student_id,
            class_offering_id,
            GradeStatus::Published,
            GradeStatus::Locked,
        )
        .await
    {
        Ok(Some(grade)) => {
            info!(
                class_offering_id,
                student_id,
                actor_id = user_id,
                "final grade locked"
            );
            return Ok(HttpResponse::Ok().json(ApiResponse::success(grade, "成绩已锁定")));
        }
        Ok(None) => {}
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("锁定成绩失败: {e}"),
                )),
            );
        }
    }

    // 迁移未命中，按当前状态给出具体原因
    match storage.get_final_grade(student_id, class_offering_id).await {
        Ok(Some(grade)) => match grade.status {
            GradeStatus::Locked => {
                Ok(HttpResponse::Ok().json(ApiResponse::success(grade, "成绩已锁定")))
            }
            GradeStatus::Draft => Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::MustPublishBeforeLock,
                "草稿成绩必须先发布才能锁定",
            ))),
            GradeStatus::Published => Ok(HttpResponse::Conflict().json(
                ApiResponse::error_empty(ErrorCode::StateConflict, "成绩状态被并发修改，请重试"),
            )),
        },
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
