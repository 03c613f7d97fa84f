//! 调用者身份提取
//!
//! 身份认证由上游网关完成，经校验的用户ID放在 X-User-Id 头里
//! 转发进来。本服务只做能力判定（can_manage_grades），不做认证。

use actix_web::HttpRequest;

pub const USER_ID_HEADER: &str = "X-User-Id";

/// 从网关注入的请求头中提取用户ID
///
/// 头缺失或不是合法整数都返回 None，由调用方映射为 401。
pub fn extract_user_id(request: &HttpRequest) -> Option<i64> {
    request
        .headers()
        .get(USER_ID_HEADER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_extract_valid_user_id() {
        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, "42"))
            .to_http_request();
        assert_eq!(extract_user_id(&req), Some(42));
    }

    #[test]
    fn test_extract_missing_header() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(extract_user_id(&req), None);
    }

    #[test]
    fn test_extract_garbage_header() {
        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, "not-a-number"))
            .to_http_request();
        assert_eq!(extract_user_id(&req), None);
    }

    #[test]
    fn test_extract_trims_whitespace() {
        let req = TestRequest::default()
            .insert_header((USER_ID_HEADER, " 7 "))
            .to_http_request();
        assert_eq!(extract_user_id(&req), Some(7));
    }
}
