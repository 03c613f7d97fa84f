use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{FinalGradeService, ensure_can_manage};
use crate::models::final_grades::entities::GradeStatus;
use crate::models::final_grades::responses::BatchTransitionResponse;
use crate::models::{ApiResponse, ErrorCode};

/// 批量发布教学班的草稿成绩
///
/// 幂等：已发布/已锁定的行计入 skipped，重复调用不报错。
pub async fn publish_grades(
    service: &FinalGradeService,
    request: &HttpRequest,
    class_offering_id: i64,
    user_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Some(response) = ensure_can_manage(&storage, user_id, class_offering_id).await {
        return Ok(response);
    }

    // 已生效的行数，发布后计入 skipped
    let already = match storage
        .list_final_grades_by_status(
            class_offering_id,
            &[GradeStatus::Published, GradeStatus::Locked],
        )
        .await
    {
        Ok(grades) => grades.len() as i64,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询成绩状态失败: {e}"),
                )),
            );
        }
    };

    match storage.publish_drafts(class_offering_id).await {
        Ok(affected) => {
            info!(
                class_offering_id,
                actor_id = user_id,
                affected,
                "final grades published"
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                BatchTransitionResponse {
                    affected: affected as i64,
                    skipped: already,
                    failed: Vec::new(),
                },
                "成绩发布完成",
            )))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("发布成绩失败: {e}"),
            )),
        ),
    }
}
