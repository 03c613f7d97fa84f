use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FormulaService;
use crate::models::formulas::requests::FormulaListQuery;
use crate::models::{ApiResponse, ErrorCode};

pub async fn list_formulas(
    service: &FormulaService,
    request: &HttpRequest,
    class_offering_id: i64,
    query: FormulaListQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage
        .list_formulas_with_pagination(class_offering_id, query)
        .await
    {
        Ok(resp) => Ok(HttpResponse::Ok().json(ApiResponse::success(resp, "获取公式列表成功"))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("获取公式列表失败: {e}"),
            )),
        ),
    }
}
