//! 表达式词法与语法分析
//!
//! 文法（经典递归下降，乘除优先于加减）：
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := factor (('*' | '/') factor)*
//! factor := NUMBER | IDENT | '(' expr ')' | '-' factor
//! ```

use super::FormulaError;

/// 二元运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// 不可变求值树
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// 数字字面量
    Literal(f64),
    /// 成分引用（成分名）
    Reference(String),
    /// 二元运算
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

impl Expr {
    /// 收集引用的成分名（按首次出现顺序去重）
    pub fn references(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_references(&mut out);
        out
    }

    fn collect_references(&self, out: &mut Vec<String>) {
        match self {
            Expr::Literal(_) => {}
            Expr::Reference(name) => {
                if !out.iter().any(|n| n == name) {
                    out.push(name.clone());
                }
            }
            Expr::Binary { lhs, rhs, .. } => {
                lhs.collect_references(out);
                rhs.collect_references(out);
            }
        }
    }

    /// 是否存在字面量零除数（静态可检出的除零风险）
    pub fn has_literal_zero_divisor(&self) -> bool {
        match self {
            Expr::Literal(_) | Expr::Reference(_) => false,
            Expr::Binary { op, lhs, rhs } => {
                if *op == BinOp::Div
                    && matches!(rhs.as_ref(), Expr::Literal(v) if *v == 0.0)
                {
                    return true;
                }
                lhs.has_literal_zero_divisor() || rhs.has_literal_zero_divisor()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

/// 词法分析：只认数字、标识符与六个符号，其余一律拒绝
fn tokenize(input: &str) -> Result<Vec<Token>, FormulaError> {
    let mut tokens = Vec::new();
    let chars: Vec<char> = input.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            ' ' | '\t' | '\r' | '\n' => i += 1,
            '+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            '*' => {
                tokens.push(Token::Star);
                i += 1;
            }
            '/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            '0'..='9' | '.' => {
                let start = i;
                let mut seen_dot = false;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    if chars[i] == '.' {
                        if seen_dot {
                            return Err(FormulaError::Syntax(format!(
                                "数字中出现多个小数点 (位置 {i})"
                            )));
                        }
                        seen_dot = true;
                    }
                    i += 1;
                }
                let text: String = chars[start..i].iter().collect();
                let value = text.parse::<f64>().map_err(|_| {
                    FormulaError::Syntax(format!("无效的数字字面量 '{text}' (位置 {start})"))
                })?;
                tokens.push(Token::Number(value));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                tokens.push(Token::Ident(chars[start..i].iter().collect()));
            }
            _ => {
                return Err(FormulaError::Syntax(format!(
                    "不支持的字符 '{c}' (位置 {i})"
                )));
            }
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expr(&mut self) -> Result<Expr, FormulaError> {
        let mut lhs = self.term()?;
        while let Some(op) = match self.peek() {
            Some(Token::Plus) => Some(BinOp::Add),
            Some(Token::Minus) => Some(BinOp::Sub),
            _ => None,
        } {
            self.pos += 1;
            let rhs = self.term()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn term(&mut self) -> Result<Expr, FormulaError> {
        let mut lhs = self.factor()?;
        while let Some(op) = match self.peek() {
            Some(Token::Star) => Some(BinOp::Mul),
            Some(Token::Slash) => Some(BinOp::Div),
            _ => None,
        } {
            self.pos += 1;
            let rhs = self.factor()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn factor(&mut self) -> Result<Expr, FormulaError> {
        match self.next() {
            Some(Token::Number(value)) => Ok(Expr::Literal(value)),
            Some(Token::Ident(name)) => Ok(Expr::Reference(name)),
            Some(Token::Minus) => {
                // 一元负号：展开为 0 - factor
                let inner = self.factor()?;
                Ok(Expr::Binary {
                    op: BinOp::Sub,
                    lhs: Box::new(Expr::Literal(0.0)),
                    rhs: Box::new(inner),
                })
            }
            Some(Token::LParen) => {
                let inner = self.expr()?;
                match self.next() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err(FormulaError::Syntax("缺少右括号".to_string())),
                }
            }
            Some(token) => Err(FormulaError::Syntax(format!(
                "此处不应出现 {token:?}"
            ))),
            None => Err(FormulaError::Syntax("表达式意外结束".to_string())),
        }
    }
}

/// 解析表达式为求值树
pub fn parse(expression: &str) -> Result<Expr, FormulaError> {
    let tokens = tokenize(expression)?;
    if tokens.is_empty() {
        return Err(FormulaError::Syntax("表达式为空".to_string()));
    }

    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.expr()?;

    if parser.pos != parser.tokens.len() {
        return Err(FormulaError::Syntax(format!(
            "表达式在第 {} 个符号后存在多余内容",
            parser.pos
        )));
    }

    Ok(expr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_literal_and_reference() {
        assert_eq!(parse("42").unwrap(), Expr::Literal(42.0));
        assert_eq!(
            parse("Homework").unwrap(),
            Expr::Reference("Homework".to_string())
        );
    }

    #[test]
    fn test_precedence_mul_over_add() {
        // 1 + 2 * 3 应解析为 1 + (2 * 3)
        let expr = parse("1 + 2 * 3").unwrap();
        match expr {
            Expr::Binary { op: BinOp::Add, rhs, .. } => {
                assert!(matches!(*rhs, Expr::Binary { op: BinOp::Mul, .. }));
            }
            other => panic!("unexpected tree: {other:?}"),
        }
    }

    #[test]
    fn test_parentheses_override_precedence() {
        let expr = parse("(1 + 2) * 3").unwrap();
        match expr {
            Expr::Binary { op: BinOp::Mul, lhs, .. } => {
                assert!(matches!(*lhs, Expr::Binary { op: BinOp::Add, .. }));
            }
            other => panic!("unexpected tree: {other:?}"),
        }
    }

    #[test]
    fn test_unary_minus() {
        let expr = parse("-Exam + 100").unwrap();
        let refs = expr.references();
        assert_eq!(refs, vec!["Exam".to_string()]);
    }

    #[test]
    fn test_syntax_errors() {
        assert!(matches!(parse(""), Err(FormulaError::Syntax(_))));
        assert!(matches!(parse("1 +"), Err(FormulaError::Syntax(_))));
        assert!(matches!(parse("(1 + 2"), Err(FormulaError::Syntax(_))));
        assert!(matches!(parse("1 2"), Err(FormulaError::Syntax(_))));
        assert!(matches!(parse("a @ b"), Err(FormulaError::Syntax(_))));
        assert!(matches!(parse("1.2.3"), Err(FormulaError::Syntax(_))));
    }

    #[test]
    fn test_no_function_calls() {
        // 封闭文法：标识符后跟括号视为相邻多余内容，直接拒绝
        assert!(matches!(parse("max(1, 2)"), Err(FormulaError::Syntax(_))));
    }

    #[test]
    fn test_references_deduplicated_in_order() {
        let expr = parse("Hw * 0.3 + Exam * 0.5 + Hw * 0.2").unwrap();
        assert_eq!(
            expr.references(),
            vec!["Hw".to_string(), "Exam".to_string()]
        );
    }

    #[test]
    fn test_literal_zero_divisor_detection() {
        assert!(parse("a / 0").unwrap().has_literal_zero_divisor());
        assert!(parse("1 + a / 0.0 * 2").unwrap().has_literal_zero_divisor());
        assert!(!parse("a / 2").unwrap().has_literal_zero_divisor());
        assert!(!parse("a / b").unwrap().has_literal_zero_divisor());
    }
}
