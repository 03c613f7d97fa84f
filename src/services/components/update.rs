use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ComponentService;
use crate::models::components::entities::WeightScheme;
use crate::models::components::requests::UpdateComponentRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::utils::validate::{validate_component_name, validate_max_score, validate_weight};

pub async fn update_component(
    service: &ComponentService,
    request: &HttpRequest,
    class_offering_id: i64,
    component_id: i64,
    user_id: i64,
    req: UpdateComponentRequest,
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

    // 获取成分并确认归属
    let existing = match storage.get_component_by_id(component_id).await {
        Ok(Some(component)) => component,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ComponentNotFound,
                "成分不存在",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询成分失败: {e}"),
                )),
            );
        }
    };

    if existing.class_offering_id != class_offering_id || !existing.active {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ComponentNotFound,
            "成分不存在",
        )));
    }

    if let Some(ref name) = req.name {
        if let Err(msg) = validate_component_name(name) {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
        }

        // 改名不得与其他活跃成分撞名
        if *name != existing.name {
            let active = match storage.list_active_components(class_offering_id).await {
                Ok(components) => components,
                Err(e) => {
                    return Ok(HttpResponse::InternalServerError().json(
                        ApiResponse::error_empty(
                            ErrorCode::InternalServerError,
                            format!("查询活跃成分失败: {e}"),
                        ),
                    ));
                }
            };
            if active.iter().any(|c| c.id != component_id && c.name == *name) {
                return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                    ErrorCode::ComponentNameExists,
                    format!("成分名称 {name} 已存在"),
                )));
            }

            // 旧名仍被生效公式引用时不允许改名，否则公式立即失效
            match storage
                .active_formula_references(class_offering_id, &existing.name)
                .await
            {
                Ok(true) => {
                    return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                        ErrorCode::ComponentInUse,
                        format!("成分 {} 正被生效公式引用，不能改名", existing.name),
                    )));
                }
                Ok(false) => {}
                Err(e) => {
                    return Ok(HttpResponse::InternalServerError().json(
                        ApiResponse::error_empty(
                            ErrorCode::InternalServerError,
                            format!("公式引用检查失败: {e}"),
                        ),
                    ));
                }
            }
        }
    }

    if let Some(weight) = req.weight {
        if let Err(msg) = validate_weight(weight, existing.scheme == WeightScheme::Weighted) {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::InvalidWeight, msg)));
        }
    }

    if let Some(max_score) = req.max_score {
        if let Err(msg) = validate_max_score(max_score) {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::BadRequest, msg)));
        }
    }

    match storage.update_component(component_id, req).await {
        Ok(Some(component)) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(component, "成分更新成功")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ComponentNotFound,
            "成分不存在",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("更新成分失败: {e}"),
            )),
        ),
    }
}
