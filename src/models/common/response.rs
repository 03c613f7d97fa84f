use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::ErrorCode;

// 统一的API响应结构
//
// code 沿用 ErrorCode 的取值：成功为 200，失败为对应的业务错误码。
// 逐学生的失败明细放在 data 内，不使用顶层 code 表达。
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub struct ApiResponse<T: TS> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T: TS> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error(code: ErrorCode, data: T, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }
}

impl ApiResponse<()> {
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error_empty(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: code as i32,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_uses_success_code() {
        let resp = ApiResponse::success(42i64, "ok");
        assert_eq!(resp.code, ErrorCode::Success as i32);
        assert_eq!(resp.data, Some(42));
    }

    #[test]
    fn test_empty_data_is_omitted_from_json() {
        let resp = ApiResponse::error_empty(ErrorCode::NoActiveFormula, "没有生效的计分公式");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(!json.contains("\"data\""));
        assert!(json.contains(&(ErrorCode::NoActiveFormula as i32).to_string()));
    }
}
