use std::collections::HashSet;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FormulaService;
use crate::config::AppConfig;
use crate::formula::{self, FormulaError};
use crate::models::formulas::requests::CreateFormulaRequest;
use crate::models::{ApiResponse, ErrorCode};

/// 公式引擎错误到 API 错误码的换算
pub(crate) fn formula_error_code(err: &FormulaError) -> ErrorCode {
    match err {
        FormulaError::Syntax(_) => ErrorCode::FormulaSyntaxError,
        FormulaError::UnknownReference(_) => ErrorCode::UnknownReference,
        FormulaError::DivisionByZeroRisk | FormulaError::DivisionByZero => {
            ErrorCode::DivisionByZeroRisk
        }
        FormulaError::MissingComponentScore(_) => ErrorCode::MissingComponentScore,
        FormulaError::Boundary(_) => ErrorCode::BoundaryGapError,
    }
}

pub async fn create_formula(
    service: &FormulaService,
    request: &HttpRequest,
    class_offering_id: i64,
    user_id: i64,
    req: CreateFormulaRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.can_manage_grades(user_id, class_offering_id).await {
        Ok(true) => {}
        Ok(false) => {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::Forbidden,
                "没有管理该教学班成绩的权限",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("权限检查失败: {e}"),
                )),
            );
        }
    }

    let active = match storage.list_active_components(class_offering_id).await {
        Ok(components) => components,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询活跃成分失败: {e}"),
                )),
            );
        }
    };

    // 生效时点校验权重和
    if let Some(violation) = super::weight_sum_violation(&active) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::WeightSumMismatch,
            violation,
        )));
    }

    let known: HashSet<String> = active.into_iter().map(|c| c.name).collect();
    if let Err(e) = formula::validate(&req.expression, &known) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            formula_error_code(&e),
            e.to_string(),
        )));
    }

    let output_scale = req
        .output_scale
        .unwrap_or(AppConfig::get().grading.default_output_scale);
    if let Err(e) = formula::boundaries::validate_boundaries(&req.grade_boundaries, output_scale) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            formula_error_code(&e),
            e.to_string(),
        )));
    }

    match storage
        .create_formula_and_activate(
            class_offering_id,
            user_id,
            req.expression,
            output_scale,
            req.grade_boundaries,
        )
        .await
    {
        Ok(formula) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(formula, "公式创建并已生效")))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("创建公式失败: {e}"),
            )),
        ),
    }
}
