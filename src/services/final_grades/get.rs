use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FinalGradeService;
use crate::models::{ApiResponse, ErrorCode};

pub async fn get_final_grade(
    service: &FinalGradeService,
    request: &HttpRequest,
    class_offering_id: i64,
    student_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_final_grade(student_id, class_offering_id).await {
        Ok(Some(grade)) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(grade, "获取最终成绩成功")))
        }
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
