use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::final_grades::requests::{
    FinalGradeListQuery, OverrideGradeRequest, UnlockGradeRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::FinalGradeService;
use crate::utils::{SafeOfferingIdI64, SafeStudentIdI64, extract_user_id};

// 懒加载的全局 FinalGradeService 实例
static FINAL_GRADE_SERVICE: Lazy<FinalGradeService> = Lazy::new(FinalGradeService::new_lazy);

fn require_user_id(req: &HttpRequest) -> Result<i64, HttpResponse> {
    extract_user_id(req).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "无法获取用户信息",
        ))
    })
}

// 列出最终成绩
pub async fn list_final_grades(
    req: HttpRequest,
    offering: SafeOfferingIdI64,
    query: web::Query<FinalGradeListQuery>,
) -> ActixResult<HttpResponse> {
    FINAL_GRADE_SERVICE
        .list_final_grades(&req, offering.0, query.into_inner())
        .await
}

// 获取单个最终成绩
pub async fn get_final_grade(
    req: HttpRequest,
    offering: SafeOfferingIdI64,
    student: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    FINAL_GRADE_SERVICE
        .get_final_grade(&req, offering.0, student.0)
        .await
}

// 批量发布
pub async fn publish_grades(
    req: HttpRequest,
    offering: SafeOfferingIdI64,
) -> ActixResult<HttpResponse> {
    let user_id = match require_user_id(&req) {
        Ok(id) => id,
        Err(response) => return Ok(response),
    };

    FINAL_GRADE_SERVICE
        .publish_grades(&req, offering.0, user_id)
        .await
}

// 批量撤销发布
pub async fn unpublish_grades(
    req: HttpRequest,
    offering: SafeOfferingIdI64,
) -> ActixResult<HttpResponse> {
    let user_id = match require_user_id(&req) {
        Ok(id) => id,
        Err(response) => return Ok(response),
    };

    FINAL_GRADE_SERVICE
        .unpublish_grades(&req, offering.0, user_id)
        .await
}

// 锁定成绩
pub async fn lock_grade(
    req: HttpRequest,
    offering: SafeOfferingIdI64,
    student: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    let user_id = match require_user_id(&req) {
        Ok(id) => id,
        Err(response) => return Ok(response),
    };

    FINAL_GRADE_SERVICE
        .lock_grade(&req, offering.0, student.0, user_id)
        .await
}

// 解锁成绩（须附理由）
pub async fn unlock_grade(
    req: HttpRequest,
    offering: SafeOfferingIdI64,
    student: SafeStudentIdI64,
    body: web::Json<UnlockGradeRequest>,
) -> ActixResult<HttpResponse> {
    let user_id = match require_user_id(&req) {
        Ok(id) => id,
        Err(response) => return Ok(response),
    };

    FINAL_GRADE_SERVICE
        .unlock_grade(&req, offering.0, student.0, user_id, body.into_inner())
        .await
}

// 人工改分
pub async fn override_grade(
    req: HttpRequest,
    offering: SafeOfferingIdI64,
    student: SafeStudentIdI64,
    body: web::Json<OverrideGradeRequest>,
) -> ActixResult<HttpResponse> {
    let user_id = match require_user_id(&req) {
        Ok(id) => id,
        Err(response) => return Ok(response),
    };

    FINAL_GRADE_SERVICE
        .override_grade(&req, offering.0, student.0, user_id, body.into_inner())
        .await
}

// 移除人工改分
pub async fn remove_override(
    req: HttpRequest,
    offering: SafeOfferingIdI64,
    student: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    let user_id = match require_user_id(&req) {
        Ok(id) => id,
        Err(response) => return Ok(response),
    };

    FINAL_GRADE_SERVICE
        .remove_override(&req, offering.0, student.0, user_id)
        .await
}

// 配置路由
pub fn configure_final_grades_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/offerings/{offering_id}/final-grades")
            .service(web::resource("").route(web::get().to(list_final_grades)))
            .service(web::resource("/publish").route(web::post().to(publish_grades)))
            .service(web::resource("/unpublish").route(web::post().to(unpublish_grades)))
            .service(web::resource("/{student_id}").route(web::get().to(get_final_grade)))
            .service(web::resource("/{student_id}/lock").route(web::post().to(lock_grade)))
            .service(web::resource("/{student_id}/unlock").route(web::post().to(unlock_grade)))
            .service(
                web::resource("/{student_id}/override")
                    .route(web::put().to(override_grade))
                    .route(web::delete().to(remove_override)),
            ),
    );
}
