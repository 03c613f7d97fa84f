//! 路径参数安全提取器
//!
//! 路径段解析失败时直接返回统一的 400 响应，
//! 不让 actix 的默认错误格式漏到客户端。

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use std::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

macro_rules! define_safe_i64_extractor {
    ($name:ident, $param:literal, $label:literal) => {
        pub struct $name(pub i64);

        impl FromRequest for $name {
            type Error = actix_web::Error;
            type Future = Ready<Result<Self, Self::Error>>;

            fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
                let parsed = req
                    .match_info()
                    .get($param)
                    .and_then(|raw| raw.parse::<i64>().ok())
                    .filter(|id| *id > 0);

                ready(match parsed {
                    Some(id) => Ok($name(id)),
                    None => Err(actix_web::error::InternalError::from_response(
                        concat!("invalid ", $label),
                        actix_web::HttpResponse::BadRequest().json(ApiResponse::error_empty(
                            ErrorCode::BadRequest,
                            concat!($label, " 必须是正整数"),
                        )),
                    )
                    .into()),
                })
            }
        }
    };
}

define_safe_i64_extractor!(SafeOfferingIdI64, "offering_id", "教学班ID");
define_safe_i64_extractor!(SafeComponentIdI64, "component_id", "成分ID");
define_safe_i64_extractor!(SafeStudentIdI64, "student_id", "学生ID");
define_safe_i64_extractor!(SafeFormulaIdI64, "formula_id", "公式ID");
define_safe_i64_extractor!(SafeComputationIdI64, "computation_id", "批次ID");
