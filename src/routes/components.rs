use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::components::requests::{
    ComponentListQuery, CreateComponentRequest, UpdateComponentRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::ComponentService;
use crate::utils::{SafeComponentIdI64, SafeOfferingIdI64, extract_user_id};

// 懒加载的全局 ComponentService 实例
static COMPONENT_SERVICE: Lazy<ComponentService> = Lazy::new(ComponentService::new_lazy);

// 创建成分
pub async fn create_component(
    req: HttpRequest,
    offering: SafeOfferingIdI64,
    body: web::Json<CreateComponentRequest>,
) -> ActixResult<HttpResponse> {
    let user_id = match extract_user_id(&req) {
        Some(id) => id,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "无法获取用户信息",
            )));
        }
    };

    COMPONENT_SERVICE
        .create_component(&req, offering.0, user_id, body.into_inner())
        .await
}

// 列出成分
pub async fn list_components(
    req: HttpRequest,
    offering: SafeOfferingIdI64,
    query: web::Query<ComponentListQuery>,
) -> ActixResult<HttpResponse> {
    COMPONENT_SERVICE
        .list_components(&req, offering.0, query.into_inner())
        .await
}

// 更新成分
pub async fn update_component(
    req: HttpRequest,
    offering: SafeOfferingIdI64,
    component: SafeComponentIdI64,
    body: web::Json<UpdateComponentRequest>,
) -> ActixResult<HttpResponse> {
    let user_id = match extract_user_id(&req) {
        Some(id) => id,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "无法获取用户信息",
            )));
        }
    };

    COMPONENT_SERVICE
        .update_component(&req, offering.0, component.0, user_id, body.into_inner())
        .await
}

// 删除成分（软删除）
pub async fn delete_component(
    req: HttpRequest,
    offering: SafeOfferingIdI64,
    component: SafeComponentIdI64,
) -> ActixResult<HttpResponse> {
    let user_id = match extract_user_id(&req) {
        Some(id) => id,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "无法获取用户信息",
            )));
        }
    };

    COMPONENT_SERVICE
        .delete_component(&req, offering.0, component.0, user_id)
        .await
}

// 配置路由
pub fn configure_components_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/offerings/{offering_id}/components")
            .service(
                web::resource("")
                    .route(web::get().to(list_components))
                    .route(web::post().to(create_component)),
            )
            .service(
                web::resource("/{component_id}")
                    .route(web::put().to(update_component))
                    .route(web::delete().to(delete_component)),
            ),
    );
}
