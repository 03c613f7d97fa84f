use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::reports::responses::TranscriptQuery;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::ReportService;
use crate::utils::{SafeOfferingIdI64, SafeStudentIdI64, extract_user_id};

// 懒加载的全局 ReportService 实例
static REPORT_SERVICE: Lazy<ReportService> = Lazy::new(ReportService::new_lazy);

// 教学班成绩摘要
pub async fn get_class_summary(
    req: HttpRequest,
    offering: SafeOfferingIdI64,
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

    REPORT_SERVICE
        .get_class_summary(&req, offering.0, user_id)
        .await
}

// 教学班等级分布
pub async fn get_grade_distribution(
    req: HttpRequest,
    offering: SafeOfferingIdI64,
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

    REPORT_SERVICE
        .get_grade_distribution(&req, offering.0, user_id)
        .await
}

// 学生成绩单
pub async fn get_student_transcript(
    req: HttpRequest,
    student: SafeStudentIdI64,
    query: web::Query<TranscriptQuery>,
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

    REPORT_SERVICE
        .get_student_transcript(&req, student.0, user_id, query.into_inner())
        .await
}

// 配置路由
pub fn configure_reports_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/offerings/{offering_id}/reports")
            .service(web::resource("/summary").route(web::get().to(get_class_summary)))
            .service(web::resource("/distribution").route(web::get().to(get_grade_distribution))),
    );
    cfg.service(
        web::scope("/api/v1/students/{student_id}")
            .service(web::resource("/transcript").route(web::get().to(get_student_transcript))),
    );
}
