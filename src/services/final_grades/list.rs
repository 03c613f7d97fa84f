use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FinalGradeService;
use crate::models::final_grades::requests::FinalGradeListQuery;
use crate::models::{ApiResponse, ErrorCode};

pub async fn list_final_grades(
    service: &FinalGradeService,
    request: &HttpRequest,
    class_offering_id: i64,
    query: FinalGradeListQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage
        .list_final_grades_with_pagination(class_offering_id, query)
        .await
    {
        Ok(resp) => Ok(HttpResponse::Ok().json(ApiResponse::success(resp, "获取成绩列表成功"))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("获取成绩列表失败: {e}"),
            )),
        ),
    }
}
