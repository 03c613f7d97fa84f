use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ComponentService;
use crate::models::{ApiResponse, ErrorCode};

pub async fn delete_component(
    service: &ComponentService,
    request: &HttpRequest,
    class_offering_id: i64,
    component_id: i64,
    user_id: i64,
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

    // 被生效公式引用的成分不可删除
    match storage
        .active_formula_references(class_offering_id, &existing.name)
        .await
    {
        Ok(true) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::ComponentInUse,
                format!("成分 {} 正被生效公式引用，不能删除", existing.name),
            )));
        }
        Ok(false) => {}
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("公式引用检查失败: {e}"),
                )),
            );
        }
    }

    // 软删除：历史计算批次仍需要该成分的定义
    match storage.deactivate_component(component_id).await {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("成分已删除"))),
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::ComponentNotFound,
            "成分不存在",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("删除成分失败: {e}"),
            )),
        ),
    }
}
