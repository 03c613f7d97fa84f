//! 求值树求值
//!
//! 纯函数：相同输入必得相同输出，无时间、随机等隐式依赖。

use std::collections::HashMap;

use super::FormulaError;
use super::parser::{BinOp, Expr};

/// 对求值树求值
///
/// 被引用成分缺少分数时返回 `MissingComponentScore`，
/// 不静默按零处理，那会把"未评分"伪装成"零分"。
pub fn evaluate(expr: &Expr, scores: &HashMap<String, f64>) -> Result<f64, FormulaError> {
    match expr {
        Expr::Literal(value) => Ok(*value),
        Expr::Reference(name) => scores
            .get(name)
            .copied()
            .ok_or_else(|| FormulaError::MissingComponentScore(name.clone())),
        Expr::Binary { op, lhs, rhs } => {
            let l = evaluate(lhs, scores)?;
            let r = evaluate(rhs, scores)?;
            match op {
                BinOp::Add => Ok(l + r),
                BinOp::Sub => Ok(l - r),
                BinOp::Mul => Ok(l * r),
                BinOp::Div => {
                    if r == 0.0 {
                        Err(FormulaError::DivisionByZero)
                    } else {
                        Ok(l / r)
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::parser::parse;

    fn scores(pairs: &[(&str, f64)]) -> HashMap<String, f64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_weighted_sum() {
        let expr = parse("Homework*0.4 + Exam*0.6").unwrap();
        let result = evaluate(&expr, &scores(&[("Homework", 80.0), ("Exam", 90.0)])).unwrap();
        assert!((result - 86.0).abs() < 1e-9);
    }

    #[test]
    fn test_arithmetic() {
        let expr = parse("(10 - 4) / 2 * 3").unwrap();
        assert_eq!(evaluate(&expr, &HashMap::new()).unwrap(), 9.0);
    }

    #[test]
    fn test_unary_minus_evaluates() {
        let expr = parse("-5 + 8").unwrap();
        assert_eq!(evaluate(&expr, &HashMap::new()).unwrap(), 3.0);
    }

    #[test]
    fn test_missing_score() {
        let expr = parse("Homework + Exam").unwrap();
        let err = evaluate(&expr, &scores(&[("Homework", 80.0)])).unwrap_err();
        assert_eq!(err, FormulaError::MissingComponentScore("Exam".to_string()));
    }

    #[test]
    fn test_runtime_division_by_zero() {
        let expr = parse("Total / Count").unwrap();
        let err = evaluate(&expr, &scores(&[("Total", 10.0), ("Count", 0.0)])).unwrap_err();
        assert_eq!(err, FormulaError::DivisionByZero);
    }

    #[test]
    fn test_determinism() {
        let expr = parse("A*0.25 + B*0.25 + C*0.5").unwrap();
        let s = scores(&[("A", 71.5), ("B", 88.0), ("C", 93.25)]);
        let first = evaluate(&expr, &s).unwrap();
        for _ in 0..100 {
            assert_eq!(evaluate(&expr, &s).unwrap(), first);
        }
    }
}
