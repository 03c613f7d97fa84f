use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ComputationService;
use crate::models::computations::requests::ComputationListQuery;
use crate::models::{ApiResponse, ErrorCode};

pub async fn list_computations(
    service: &ComputationService,
    request: &HttpRequest,
    class_offering_id: i64,
    query: ComputationListQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage
        .list_computations_with_pagination(class_offering_id, query)
        .await
    {
        Ok(resp) => Ok(HttpResponse::Ok().json(ApiResponse::success(resp, "获取批次列表成功"))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("获取批次列表失败: {e}"),
            )),
        ),
    }
}
