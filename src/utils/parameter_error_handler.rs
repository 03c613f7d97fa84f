//! 请求参数错误处理器
//!
//! 把 actix 的 JSON / Query 反序列化错误改写成统一的 ApiResponse
//! 格式，错误详情原样透传（反序列化器的报错已足够具体）。

use actix_web::error::{InternalError, JsonPayloadError, QueryPayloadError};
use actix_web::{Error, HttpRequest, HttpResponse};

use crate::models::{ApiResponse, ErrorCode};

pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> Error {
    let detail = err.to_string();
    let response = HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::BadRequest,
        format!("请求体格式错误: {detail}"),
    ));
    InternalError::from_response(err, response).into()
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> Error {
    let detail = err.to_string();
    let response = HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::BadRequest,
        format!("查询参数格式错误: {detail}"),
    ));
    InternalError::from_response(err, response).into()
}
