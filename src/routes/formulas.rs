use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::formulas::requests::{
    CreateFormulaRequest, FormulaListQuery, PreviewFormulaRequest, ValidateFormulaRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::FormulaService;
use crate::utils::{SafeOfferingIdI64, extract_user_id};

// 懒加载的全局 FormulaService 实例
static FORMULA_SERVICE: Lazy<FormulaService> = Lazy::new(FormulaService::new_lazy);

// 创建公式（创建即生效）
pub async fn create_formula(
    req: HttpRequest,
    offering: SafeOfferingIdI64,
    body: web::Json<CreateFormulaRequest>,
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

    FORMULA_SERVICE
        .create_formula(&req, offering.0, user_id, body.into_inner())
        .await
}

// 获取当前生效公式
pub async fn get_active_formula(
    req: HttpRequest,
    offering: SafeOfferingIdI64,
) -> ActixResult<HttpResponse> {
    FORMULA_SERVICE.get_active_formula(&req, offering.0).await
}

// 列出公式（含历史）
pub async fn list_formulas(
    req: HttpRequest,
    offering: SafeOfferingIdI64,
    query: web::Query<FormulaListQuery>,
) -> ActixResult<HttpResponse> {
    FORMULA_SERVICE
        .list_formulas(&req, offering.0, query.into_inner())
        .await
}

// 校验公式（不落库）
pub async fn validate_formula(
    req: HttpRequest,
    offering: SafeOfferingIdI64,
    body: web::Json<ValidateFormulaRequest>,
) -> ActixResult<HttpResponse> {
    FORMULA_SERVICE
        .validate_formula(&req, offering.0, body.into_inner())
        .await
}

// 试算公式（不落库）
pub async fn preview_formula(
    req: HttpRequest,
    offering: SafeOfferingIdI64,
    body: web::Json<PreviewFormulaRequest>,
) -> ActixResult<HttpResponse> {
    FORMULA_SERVICE
        .preview_formula(&req, offering.0, body.into_inner())
        .await
}

// 配置路由
pub fn configure_formulas_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/offerings/{offering_id}/formulas")
            .service(
                web::resource("")
                    .route(web::get().to(list_formulas))
                    .route(web::post().to(create_formula)),
            )
            .service(web::resource("/active").route(web::get().to(get_active_formula)))
            .service(web::resource("/validate").route(web::post().to(validate_formula)))
            .service(web::resource("/preview").route(web::post().to(preview_formula))),
    );
}
