use std::collections::HashSet;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FormulaService;
use super::create::formula_error_code;
use crate::config::AppConfig;
use crate::formula;
use crate::models::formulas::requests::PreviewFormulaRequest;
use crate::models::formulas::responses::PreviewResponse;
use crate::models::{ApiResponse, ErrorCode};

/// 试算公式
///
/// 用请求附带的样例分数走完整的 校验-求值-等级映射 链路，
/// 不触碰任何学生数据，也不落库。
pub async fn preview_formula(
    service: &FormulaService,
    request: &HttpRequest,
    class_offering_id: i64,
    req: PreviewFormulaRequest,
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

    let output_scale = req
        .output_scale
        .unwrap_or(AppConfig::get().grading.default_output_scale);

    match formula::preview(
        &req.expression,
        &known,
        &req.grade_boundaries,
        output_scale,
        &req.sample_scores,
    ) {
        Ok(outcome) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            PreviewResponse {
                raw_score: outcome.raw_score,
                letter: outcome.letter,
            },
            "公式试算完成",
        ))),
        Err(e) => Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            formula_error_code(&e),
            e.to_string(),
        ))),
    }
}
