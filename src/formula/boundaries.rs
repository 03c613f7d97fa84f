//! 等级边界校验与映射
//!
//! 边界按 min_score 降序排列，必须无缝、无重叠地覆盖 [0, output_scale]：
//! 严格降序即无重叠，末档 min_score 为 0 即无缺口。

use super::FormulaError;
use crate::models::formulas::entities::GradeBoundary;

/// 校验边界序列能够完整平铺 [0, output_scale]
pub fn validate_boundaries(
    boundaries: &[GradeBoundary],
    output_scale: f64,
) -> Result<(), FormulaError> {
    if !(output_scale > 0.0) {
        return Err(FormulaError::Boundary(format!(
            "输出量程必须为正数，当前为 {output_scale}"
        )));
    }
    if boundaries.is_empty() {
        return Err(FormulaError::Boundary("边界序列为空".to_string()));
    }

    for boundary in boundaries {
        if boundary.letter.trim().is_empty() {
            return Err(FormulaError::Boundary("等级字母不能为空".to_string()));
        }
        // 等级是短标识（A+、通过），不是描述文本
        if boundary.letter.chars().count() > 8 {
            return Err(FormulaError::Boundary(format!(
                "等级字母过长（最多 8 个字符）: {}",
                boundary.letter
            )));
        }
        if !boundary.min_score.is_finite() {
            return Err(FormulaError::Boundary(format!(
                "等级 {} 的下界不是有效数字",
                boundary.letter
            )));
        }
    }

    // 首档下界不得超出量程，否则 (first.min, scale] 区间无对应等级
    let first = &boundaries[0];
    if first.min_score > output_scale {
        return Err(FormulaError::Boundary(format!(
            "首档下界 {} 超出输出量程 {output_scale}",
            first.min_score
        )));
    }

    // 严格降序：等值即重叠，升序即乱序
    for pair in boundaries.windows(2) {
        if pair[1].min_score >= pair[0].min_score {
            return Err(FormulaError::Boundary(format!(
                "边界必须严格降序: {} ({}) 之后是 {} ({})",
                pair[0].min_score, pair[0].letter, pair[1].min_score, pair[1].letter
            )));
        }
    }

    // 末档必须落到 0，否则 [0, last.min) 区间无对应等级
    let last = &boundaries[boundaries.len() - 1];
    if last.min_score != 0.0 {
        return Err(FormulaError::Boundary(format!(
            "末档下界必须为 0，当前为 {}",
            last.min_score
        )));
    }

    Ok(())
}

/// 分数映射到等级：降序线性扫描，首个 min_score <= score 的边界胜出
///
/// 调用方需已通过 `validate_boundaries`；负分落在所有边界之外，报错。
pub fn map_to_letter(score: f64, boundaries: &[GradeBoundary]) -> Result<&str, FormulaError> {
    for boundary in boundaries {
        if boundary.min_score <= score {
            return Ok(&boundary.letter);
        }
    }
    Err(FormulaError::Boundary(format!(
        "分数 {score} 未落入任何等级区间"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boundaries(pairs: &[(f64, &str)]) -> Vec<GradeBoundary> {
        pairs
            .iter()
            .map(|(min_score, letter)| GradeBoundary {
                min_score: *min_score,
                letter: letter.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_valid_tiling() {
        let b = boundaries(&[(90.0, "A"), (80.0, "B"), (70.0, "C"), (0.0, "D")]);
        assert!(validate_boundaries(&b, 100.0).is_ok());
    }

    #[test]
    fn test_gap_at_bottom_rejected() {
        // 末档 60 留下 [0, 60) 的缺口
        let b = boundaries(&[(90.0, "A"), (60.0, "B")]);
        assert!(matches!(
            validate_boundaries(&b, 100.0),
            Err(FormulaError::Boundary(_))
        ));
    }

    #[test]
    fn test_overlap_rejected() {
        let b = boundaries(&[(90.0, "A"), (90.0, "B"), (0.0, "C")]);
        assert!(matches!(
            validate_boundaries(&b, 100.0),
            Err(FormulaError::Boundary(_))
        ));
    }

    #[test]
    fn test_unordered_rejected() {
        let b = boundaries(&[(80.0, "B"), (90.0, "A"), (0.0, "C")]);
        assert!(matches!(
            validate_boundaries(&b, 100.0),
            Err(FormulaError::Boundary(_))
        ));
    }

    #[test]
    fn test_first_min_above_scale_rejected() {
        let b = boundaries(&[(120.0, "A"), (0.0, "B")]);
        assert!(matches!(
            validate_boundaries(&b, 100.0),
            Err(FormulaError::Boundary(_))
        ));
    }

    #[test]
    fn test_empty_and_blank_letter_rejected() {
        assert!(validate_boundaries(&[], 100.0).is_err());
        let b = boundaries(&[(90.0, " "), (0.0, "B")]);
        assert!(validate_boundaries(&b, 100.0).is_err());
    }

    #[test]
    fn test_overlong_letter_rejected() {
        let b = boundaries(&[(90.0, "Excellent"), (0.0, "B")]);
        assert!(validate_boundaries(&b, 100.0).is_err());
        // 8 个字符以内的多字节等级合法
        let b = boundaries(&[(60.0, "通过"), (0.0, "不通过")]);
        assert!(validate_boundaries(&b, 100.0).is_ok());
    }

    #[test]
    fn test_map_exactly_one_letter_in_range() {
        let b = boundaries(&[(90.0, "A"), (80.0, "B"), (70.0, "C"), (0.0, "D")]);
        assert_eq!(map_to_letter(100.0, &b).unwrap(), "A");
        assert_eq!(map_to_letter(90.0, &b).unwrap(), "A");
        assert_eq!(map_to_letter(89.999, &b).unwrap(), "B");
        assert_eq!(map_to_letter(86.0, &b).unwrap(), "B");
        assert_eq!(map_to_letter(70.0, &b).unwrap(), "C");
        assert_eq!(map_to_letter(0.0, &b).unwrap(), "D");
    }

    #[test]
    fn test_map_negative_score_rejected() {
        let b = boundaries(&[(90.0, "A"), (0.0, "D")]);
        assert!(map_to_letter(-0.5, &b).is_err());
    }

    #[test]
    fn test_map_whole_range_covered() {
        let b = boundaries(&[(90.0, "A"), (80.0, "B"), (70.0, "C"), (0.0, "D")]);
        // 任意 [0, 100] 内的分数都恰好命中一个等级
        let mut score = 0.0;
        while score <= 100.0 {
            assert!(map_to_letter(score, &b).is_ok());
            score += 0.37;
        }
    }
}
