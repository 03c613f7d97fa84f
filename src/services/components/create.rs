use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ComponentService;
use crate::models::components::entities::WeightScheme;
use crate::models::components::requests::CreateComponentRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::validate::{validate_component_name, validate_max_score, validate_weight};

pub async fn create_component(
    service: &ComponentService,
    request: &HttpRequest,
    class_offering_id: i64,
    user_id: i64,
    req: CreateComponentRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    // 权限检查：仅教学班的成绩管理者
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

    // 名称必须满足公式标识符格式
    if let Err(msg) = validate_component_name(&req.name) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
    }

    if let Err(msg) = validate_weight(req.weight, req.scheme == WeightScheme::Weighted) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::InvalidWeight, msg)));
    }

    if let Err(msg) = validate_max_score(req.max_score) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
    }

    // 同班活跃成分：名称唯一、计分方式一致
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

    if active.iter().any(|c| c.name == req.name) {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::ComponentNameExists,
            format!("成分名称 {} 已存在", req.name),
        )));
    }

    if let Some(existing) = active.first() {
        if existing.scheme != req.scheme {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::ComponentSchemeMismatch,
                format!(
                    "教学班已使用 {} 计分方式，不能混用 {}",
                    existing.scheme, req.scheme
                ),
            )));
        }
    }

    match storage.create_component(class_offering_id, req).await {
        Ok(component) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(component, "成分创建成功")))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("创建成分失败: {e}"),
            )),
        ),
    }
}
