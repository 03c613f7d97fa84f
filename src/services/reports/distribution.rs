use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ReportService;
use crate::models::final_grades::entities::GradeStatus;
use crate::models::formulas::entities::GradeBoundary;
use crate::models::reports::responses::{GradeDistributionResponse, LetterBucket};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::final_grades::ensure_can_manage;

/// 按边界顺序构造等级桶
///
/// 桶序即边界序（高到低），没有命中的等级也保留零计数桶；
/// 改分写入的边界外等级追加在末尾，按首次出现顺序。
pub(crate) fn bucket_letters(letters: &[String], boundaries: &[GradeBoundary]) -> Vec<LetterBucket> {
    let mut buckets: Vec<LetterBucket> = boundaries
        .iter()
        .map(|b| LetterBucket {
            letter: b.letter.clone(),
            count: 0,
        })
        .collect();

    for letter in letters {
        if let Some(bucket) = buckets.iter_mut().find(|b| b.letter == *letter) {
            bucket.count += 1;
        } else {
            buckets.push(LetterBucket {
                letter: letter.clone(),
                count: 1,
            });
        }
    }

    buckets
}

/// 教学班等级分布
///
/// 只统计 published / locked 的行，等级取展示值（改分优先）。
pub async fn get_grade_distribution(
    service: &ReportService,
    request: &HttpRequest,
    class_offering_id: i64,
    user_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    if let Some(response) = ensure_can_manage(&storage, user_id, class_offering_id).await {
        return Ok(response);
    }

    let formula = match storage.get_active_formula(class_offering_id).await {
        Ok(Some(formula)) => formula,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::NoActiveFormula,
                "教学班没有生效的公式，无法确定等级顺序",
            )));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("查询生效公式失败: {e}"),
                )),
            );
        }
    };

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

    let letters: Vec<String> = grades
        .iter()
        .map(|g| g.displayed_letter().to_string())
        .collect();
    let buckets = bucket_letters(&letters, &formula.grade_boundaries);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        GradeDistributionResponse {
            class_offering_id,
            buckets,
        },
        "获取等级分布成功",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boundaries() -> Vec<GradeBoundary> {
        [(90.0, "A"), (80.0, "B"), (0.0, "C")]
            .iter()
            .map(|(min_score, letter)| GradeBoundary {
                min_score: *min_score,
                letter: letter.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_buckets_follow_boundary_order() {
        let letters: Vec<String> = ["C", "A", "B", "A"].iter().map(|s| s.to_string()).collect();
        let buckets = bucket_letters(&letters, &boundaries());
        assert_eq!(buckets.len(), 3);
        assert_eq!((buckets[0].letter.as_str(), buckets[0].count), ("A", 2));
        assert_eq!((buckets[1].letter.as_str(), buckets[1].count), ("B", 1));
        assert_eq!((buckets[2].letter.as_str(), buckets[2].count), ("C", 1));
    }

    #[test]
    fn test_empty_grades_keep_zero_buckets() {
        let buckets = bucket_letters(&[], &boundaries());
        assert_eq!(buckets.len(), 3);
        assert!(buckets.iter().all(|b| b.count == 0));
    }

    #[test]
    fn test_override_letter_outside_boundaries_appended() {
        let letters: Vec<String> = ["A", "P"].iter().map(|s| s.to_string()).collect();
        let buckets = bucket_letters(&letters, &boundaries());
        assert_eq!(buckets.len(), 4);
        assert_eq!((buckets[3].letter.as_str(), buckets[3].count), ("P", 1));
    }
}
