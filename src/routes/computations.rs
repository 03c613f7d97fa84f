use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::computations::requests::{ComputationListQuery, ComputeGradesRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::ComputationService;
use crate::utils::{SafeComputationIdI64, SafeOfferingIdI64, extract_user_id};

// 懒加载的全局 ComputationService 实例
static COMPUTATION_SERVICE: Lazy<ComputationService> = Lazy::new(ComputationService::new_lazy);

// 触发成绩计算
pub async fn compute_grades(
    req: HttpRequest,
    offering: SafeOfferingIdI64,
    body: web::Json<ComputeGradesRequest>,
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

    COMPUTATION_SERVICE
        .compute_grades(&req, offering.0, user_id, body.into_inner())
        .await
}

// 获取计算批次详情
pub async fn get_computation(
    req: HttpRequest,
    offering: SafeOfferingIdI64,
    computation: SafeComputationIdI64,
) -> ActixResult<HttpResponse> {
    COMPUTATION_SERVICE
        .get_computation(&req, offering.0, computation.0)
        .await
}

// 列出计算批次
pub async fn list_computations(
    req: HttpRequest,
    offering: SafeOfferingIdI64,
    query: web::Query<ComputationListQuery>,
) -> ActixResult<HttpResponse> {
    COMPUTATION_SERVICE
        .list_computations(&req, offering.0, query.into_inner())
        .await
}

// 配置路由
pub fn configure_computations_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/offerings/{offering_id}/computations")
            .service(
                web::resource("")
                    .route(web::get().to(list_computations))
                    .route(web::post().to(compute_grades)),
            )
            .service(web::resource("/{computation_id}").route(web::get().to(get_computation))),
    );
}
