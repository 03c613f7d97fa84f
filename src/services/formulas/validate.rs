use std::collections::HashSet;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FormulaService;
use crate::formula;
use crate::models::formulas::requests::ValidateFormulaRequest;
use crate::models::formulas::responses::ValidationResultResponse;
use crate::models::{ApiResponse, ErrorCode};

/// 校验公式
///
/// 只校验不落库；校验失败也是 200，结果在响应体里，
/// 前端编辑器靠它做实时反馈。
pub async fn validate_formula(
    service: &FormulaService,
    request: &HttpRequest,
    class_offering_id: i64,
    req: ValidateFormulaRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let known: HashSet<String> = match storage.list_active_components(class_offering_id).await {
        Ok(components) => components.into_iter().map(|c| c.name).collect(),
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询活跃成分失败: {e}"),
                )),
            );
        }
    };

    let result = match formula::validate(&req.expression, &known) {
        Ok(expr) => ValidationResultResponse {
            valid: true,
            error: None,
            references: expr.references(),
        },
        Err(e) => ValidationResultResponse {
            valid: false,
            error: Some(e.to_string()),
            // 语法尚能解析时仍给出引用列表，方便前端提示
            references: formula::parse(&req.expression)
                .map(|expr| expr.references())
                .unwrap_or_default(),
        },
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(result, "公式校验完成")))
}
