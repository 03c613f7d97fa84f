use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ReportService;
use crate::models::final_grades::entities::GradeStatus;
use crate::models::reports::responses::ClassGradingSummary;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::final_grades::ensure_can_manage;

/// 描述统计，输入为空时各项均为 None
pub(crate) fn describe(scores: &[f64]) -> (Option<f64>, Option<f64>, Option<f64>, Option<f64>) {
    if scores.is_empty() {
        return (None, None, None, None);
    }

    let mut sorted = scores.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mean = sorted.iter().sum::<f64>() / sorted.len() as f64;
    let median = if sorted.len() % 2 == 1 {
        sorted[sorted.len() / 2]
    } else {
        let hi = sorted.len() / 2;
        (sorted[hi - 1] + sorted[hi]) / 2.0
    };
    let min = sorted[0];
    let max = sorted[sorted.len() - 1];

    (Some(mean), Some(median), Some(min), Some(max))
}

/// 教学班成绩摘要
///
/// 只统计 published / locked 的行，统计口径是展示值（改分优先）。
pub async fn get_class_summary(
    service: &ReportService,
    request: &HttpRequest,
    class_offering_id: i64,
    user_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Some(response) = ensure_can_manage(&storage, user_id, class_offering_id).await {
        return Ok(response);
    }

    let grades = match storage
        .list_final_grades_by_status(
            class_offering_id,
            &[GradeStatus::Published, GradeStatus::Locked],
        )
        .await
    {
        Ok(grades) => grades,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询最终成绩失败: {e}"),
                )),
            );
        }
    };

    let scores: Vec<f64> = grades.iter().map(|g| g.displayed_score()).collect();
    let (mean, median, min, max) = describe(&scores);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        ClassGradingSummary {
            class_offering_id,
            count: scores.len() as i64,
            mean,
            median,
            min,
            max,
        },
        "获取成绩摘要成功",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_empty() {
        assert_eq!(describe(&[]), (None, None, None, None));
    }

    #[test]
    fn test_describe_single() {
        let (mean, median, min, max) = describe(&[88.0]);
        assert_eq!(mean, Some(88.0));
        assert_eq!(median, Some(88.0));
        assert_eq!(min, Some(88.0));
        assert_eq!(max, Some(88.0));
    }

    #[test]
    fn test_describe_odd_count() {
        let (mean, median, min, max) = describe(&[70.0, 90.0, 80.0]);
        assert_eq!(mean, Some(80.0));
        assert_eq!(median, Some(80.0));
        assert_eq!(min, Some(70.0));
        assert_eq!(max, Some(90.0));
    }

    #[test]
    fn test_describe_even_count_interpolates_median() {
        let (_, median, _, _) = describe(&[60.0, 70.0, 80.0, 100.0]);
        assert_eq!(median, Some(75.0));
    }

    #[test]
    fn test_describe_unsorted_input() {
        let (_, median, min, max) = describe(&[95.0, 55.0, 75.0]);
        assert_eq!(median, Some(75.0));
        assert_eq!(min, Some(55.0));
        assert_eq!(max, Some(95.0));
    }
}
