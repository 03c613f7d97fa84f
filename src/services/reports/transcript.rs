use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ReportService;
use crate::models::reports::responses::{StudentTranscriptResponse, TranscriptQuery};
use crate::models::{ApiResponse, ErrorCode};

/// 学生成绩单
///
/// 跨教学班汇总，只允许学生本人查询自己的成绩单；
/// 教师侧的视角走各教学班的成绩列表接口。
pub async fn get_student_transcript(
    service: &ReportService,
    request: &HttpRequest,
    student_id: i64,
    user_id: i64,
    query: TranscriptQuery,
) -> ActixResult<HttpResponse> {
    if user_id != student_id {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "只能查询本人的成绩单",
        )));
    }

    let storage = service.get_storage(request);

    let periods = query.periods.map(|raw| {
        raw.split(',')
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
    });

    match storage.list_student_transcript(student_id, periods).await {
        Ok(entries) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            StudentTranscriptResponse {
                student_id,
                entries,
            },
            "获取成绩单成功",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("获取成绩单失败: {e}"),
            )),
        ),
    }
}
