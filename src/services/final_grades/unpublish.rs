use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{FinalGradeService, ensure_can_manage};
use crate::models::final_grades::entities::GradeStatus;
use crate::models::final_grades::responses::{BatchTransitionResponse, TransitionFailure};
use crate::models::{ApiResponse, ErrorCode};

/// 批量撤销发布
///
/// 只有 published 行回到 draft；locked 行必须先解锁，
/// 逐行计入 failed 而不是整体拒绝。
pub async fn unpublish_grades(
    service: &FinalGradeService,
    request: &HttpRequest,
    class_offering_id: i64,
    user_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Some(response) = ensure_can_manage(&storage, user_id, class_offering_id).await {
        return Ok(response);
    }

    let snapshot = match storage
        .list_final_grades_by_status(
            class_offering_id,
            &[GradeStatus::Draft, GradeStatus::Locked],
        )
        .await
    {
        Ok(grades) => grades,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询成绩状态失败: {e}"),
                )),
            );
        }
    };

    let skipped = snapshot
        .iter()
        .filter(|g| g.status == GradeStatus::Draft)
        .count() as i64;
    let failed: Vec<TransitionFailure> = snapshot
        .iter()
        .filter(|g| g.status == GradeStatus::Locked)
        .map(|g| TransitionFailure {
            student_id: g.student_id,
            error_code: ErrorCode::CannotUnpublishLocked as i32,
            detail: "成绩已锁定，须先解锁再撤销发布".to_string(),
        })
        .collect();

    match storage.unpublish_published(class_offering_id).await {
        Ok(affected) => {
            info!(
                class_offering_id,
                actor_id = user_id,
                affected,
                "final grades unpublished"
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                BatchTransitionResponse {
                    affected: affected as i64,
                    skipped,
                    failed,
                },
                "撤销发布完成",
            )))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("撤销发布失败: {e}"),
            )),
        ),
    }
}
