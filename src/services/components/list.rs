use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ComponentService;
use crate::models::components::requests::ComponentListQuery;
use crate::models::{ApiResponse, ErrorCode};

pub async fn list_components(
    service: &ComponentService,
    request: &HttpRequest,
    class_offering_id: i64,
    query: ComponentListQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage
        .list_components_with_pagination(class_offering_id, query)
        .await
    {
        Ok(resp) => Ok(HttpResponse::Ok().json(ApiResponse::success(resp, "获取成分列表成功"))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("获取成分列表失败: {e}"),
            )),
        ),
    }
}
