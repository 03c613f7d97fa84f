//! 计分公式引擎
//!
//! 封闭文法：`+ - * / ( )`、数字字面量与成分引用（标识符），
//! 不支持函数调用，不是脚本语言。递归下降解析为不可变求值树
//! （Literal / Reference / Binary），求值纯函数化，结果确定。
//!
//! - `parser`: 词法 + 语法分析
//! - `eval`: 求值
//! - `boundaries`: 等级边界校验与分数到等级的映射

pub mod boundaries;
pub mod eval;
pub mod parser;

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::models::formulas::entities::GradeBoundary;

pub use eval::evaluate;
pub use parser::{BinOp, Expr, parse};

/// 公式引擎错误
///
/// 在服务层换算为 API 错误码；引擎自身不触碰 HTTP 语义。
#[derive(Debug, Clone, PartialEq)]
pub enum FormulaError {
    /// 表达式格式错误（附出错位置说明）
    Syntax(String),
    /// 引用了未知的成分名
    UnknownReference(String),
    /// 字面量零除数（静态可检出，校验期拒绝）
    DivisionByZeroRisk,
    /// 求值时除数为零（成分分数在运行时才可知）
    DivisionByZero,
    /// 被引用成分缺少分数（不静默按零处理）
    MissingComponentScore(String),
    /// 等级边界未能无缝覆盖输出量程，或分数落在边界之外
    Boundary(String),
}

impl fmt::Display for FormulaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormulaError::Syntax(msg) => write!(f, "表达式语法错误: {msg}"),
            FormulaError::UnknownReference(name) => write!(f, "未知的成分引用: {name}"),
            FormulaError::DivisionByZeroRisk => write!(f, "表达式含字面量零除数"),
            FormulaError::DivisionByZero => write!(f, "求值时除数为零"),
            FormulaError::MissingComponentScore(name) => {
                write!(f, "成分 {name} 缺少分数")
            }
            FormulaError::Boundary(msg) => write!(f, "等级边界错误: {msg}"),
        }
    }
}

impl std::error::Error for FormulaError {}

/// 校验表达式：解析 + 引用检查 + 字面量零除数检查，不求值
pub fn validate(expression: &str, known: &HashSet<String>) -> Result<Expr, FormulaError> {
    let expr = parse(expression)?;

    for name in expr.references() {
        if !known.contains(&name) {
            return Err(FormulaError::UnknownReference(name));
        }
    }

    if expr.has_literal_zero_divisor() {
        return Err(FormulaError::DivisionByZeroRisk);
    }

    Ok(expr)
}

/// 试算结果
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewOutcome {
    pub raw_score: f64,
    pub letter: String,
}

/// 试算：校验 + 求值 + 等级映射，无副作用、不落库
pub fn preview(
    expression: &str,
    known: &HashSet<String>,
    grade_boundaries: &[GradeBoundary],
    output_scale: f64,
    sample_scores: &HashMap<String, f64>,
) -> Result<PreviewOutcome, FormulaError> {
    let expr = validate(expression, known)?;
    boundaries::validate_boundaries(grade_boundaries, output_scale)?;

    let raw_score = evaluate(&expr, sample_scores)?;
    let letter = boundaries::map_to_letter(raw_score, grade_boundaries)?.to_string();

    Ok(PreviewOutcome { raw_score, letter })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known(names: &[&str]) -> HashSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn boundaries() -> Vec<GradeBoundary> {
        [(90.0, "A"), (80.0, "B"), (70.0, "C"), (0.0, "D")]
            .iter()
            .map(|(min_score, letter)| GradeBoundary {
                min_score: *min_score,
                letter: letter.to_string(),
            })
            .collect()
    }

    #[test]
    fn test_validate_rejects_unknown_reference() {
        let err = validate("Homework + Final", &known(&["Homework"])).unwrap_err();
        assert_eq!(err, FormulaError::UnknownReference("Final".to_string()));
    }

    #[test]
    fn test_validate_rejects_literal_zero_divisor() {
        let err = validate("Homework / 0", &known(&["Homework"])).unwrap_err();
        assert_eq!(err, FormulaError::DivisionByZeroRisk);
        // 嵌套位置同样可检出
        let err = validate("1 + (Homework / 0.0) * 2", &known(&["Homework"])).unwrap_err();
        assert_eq!(err, FormulaError::DivisionByZeroRisk);
        // 非字面量除数不做静态判定，留给求值期
        assert!(validate("Homework / (2 - 2)", &known(&["Homework"])).is_ok());
    }

    #[test]
    fn test_preview_weighted_course() {
        // Homework=80, Exam=90, 0.4/0.6 加权 -> 86 -> B
        let scores: HashMap<String, f64> =
            [("Homework".to_string(), 80.0), ("Exam".to_string(), 90.0)]
                .into_iter()
                .collect();
        let outcome = preview(
            "Homework*0.4 + Exam*0.6",
            &known(&["Homework", "Exam"]),
            &boundaries(),
            100.0,
            &scores,
        )
        .unwrap();
        assert!((outcome.raw_score - 86.0).abs() < 1e-9);
        assert_eq!(outcome.letter, "B");
    }

    #[test]
    fn test_preview_is_deterministic() {
        let scores: HashMap<String, f64> =
            [("Homework".to_string(), 77.5), ("Exam".to_string(), 63.25)]
                .into_iter()
                .collect();
        let first = preview(
            "(Homework + Exam) / 2",
            &known(&["Homework", "Exam"]),
            &boundaries(),
            100.0,
            &scores,
        )
        .unwrap();
        for _ in 0..10 {
            let again = preview(
                "(Homework + Exam) / 2",
                &known(&["Homework", "Exam"]),
                &boundaries(),
                100.0,
                &scores,
            )
            .unwrap();
            assert_eq!(first, again);
        }
    }

    #[test]
    fn test_preview_missing_score_is_error() {
        let scores: HashMap<String, f64> = [("Homework".to_string(), 80.0)].into_iter().collect();
        let err = preview(
            "Homework*0.4 + Exam*0.6",
            &known(&["Homework", "Exam"]),
            &boundaries(),
            100.0,
            &scores,
        )
        .unwrap_err();
        assert_eq!(err, FormulaError::MissingComponentScore("Exam".to_string()));
    }
}
