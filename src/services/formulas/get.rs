use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FormulaService;
use crate::models::{ApiResponse, ErrorCode};

pub async fn get_active_formula(
    service: &FormulaService,
    request: &HttpRequest,
    class_offering_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.get_active_formula(class_offering_id).await {
        Ok(Some(formula)) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(formula, "获取生效公式成功")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NoActiveFormula,
            "教学班没有生效的公式",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("查询生效公式失败: {e}"),
            )),
        ),
    }
}
