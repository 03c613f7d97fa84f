use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ComputationService;
use crate::models::{ApiResponse, ErrorCode};

pub async fn get_computation(
    service: &ComputationService,
    request: &HttpRequest,
    class_offering_id: i64,
    computation_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_computation_by_id(computation_id).await {
        Ok(Some(computation)) if computation.class_offering_id == class_offering_id => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(computation, "获取计算批次成功")))
        }
        Ok(_) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ComputationNotFound,
            "计算批次不存在",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("查询计算批次失败: {e}"),
            )),
        ),
    }
}
