use once_cell::sync::Lazy;
use regex::Regex;

static COMPONENT_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("Invalid component name regex"));

/// 校验成分名称
///
/// 成分名称同时是公式里的引用标识符，格式必须与公式文法的
/// 标识符一致，否则创建出来的成分永远无法被公式引用。
pub fn validate_component_name(name: &str) -> Result<(), &'static str> {
    if name.is_empty() || name.len() > 64 {
        return Err("Component name length must be between 1 and 64 characters");
    }
    if !COMPONENT_NAME_RE.is_match(name) {
        return Err(
            "Component name must start with a letter or underscore and contain only letters, digits or underscores",
        );
    }
    Ok(())
}

/// 校验权重取值
///
/// 权重制下权重是 0-1 的占比；分值制下权重即分值，只需非负。
pub fn validate_weight(weight: f64, weighted_scheme: bool) -> Result<(), &'static str> {
    if !weight.is_finite() {
        return Err("Weight must be a finite number");
    }
    if weighted_scheme {
        if !(0.0..=1.0).contains(&weight) {
            return Err("Weight must be between 0 and 1 under the weighted scheme");
        }
    } else if weight < 0.0 {
        return Err("Weight must be non-negative under the points scheme");
    }
    Ok(())
}

/// 校验满分取值
pub fn validate_max_score(max_score: f64) -> Result<(), &'static str> {
    if !max_score.is_finite() || max_score <= 0.0 {
        return Err("Max score must be a positive number");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_component_names() {
        assert!(validate_component_name("Homework").is_ok());
        assert!(validate_component_name("final_exam").is_ok());
        assert!(validate_component_name("_lab2").is_ok());
        assert!(validate_component_name("Quiz1").is_ok());
    }

    #[test]
    fn test_invalid_component_names() {
        assert!(validate_component_name("").is_err());
        assert!(validate_component_name("2quiz").is_err());
        assert!(validate_component_name("mid term").is_err());
        assert!(validate_component_name("exam-1").is_err());
        assert!(validate_component_name("期末").is_err());
        assert!(validate_component_name(&"x".repeat(65)).is_err());
    }

    #[test]
    fn test_weight_bounds_weighted() {
        assert!(validate_weight(0.0, true).is_ok());
        assert!(validate_weight(0.4, true).is_ok());
        assert!(validate_weight(1.0, true).is_ok());
        assert!(validate_weight(1.01, true).is_err());
        assert!(validate_weight(-0.1, true).is_err());
        assert!(validate_weight(f64::NAN, true).is_err());
    }

    #[test]
    fn test_weight_bounds_points() {
        assert!(validate_weight(30.0, false).is_ok());
        assert!(validate_weight(0.0, false).is_ok());
        assert!(validate_weight(-1.0, false).is_err());
        assert!(validate_weight(f64::INFINITY, false).is_err());
    }

    #[test]
    fn test_max_score() {
        assert!(validate_max_score(100.0).is_ok());
        assert!(validate_max_score(0.0).is_err());
        assert!(validate_max_score(-5.0).is_err());
        assert!(validate_max_score(f64::NAN).is_err());
    }
}
