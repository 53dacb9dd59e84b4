//! HTTP Middleware
//!
//! 传输层拒绝的日志中间件

use axum::http::StatusCode;
use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

/// 非 200 响应的原因
///
/// 应用层错误都以 HTTP 200 + `{error, kind}` 返回并在 ApiError::into_response() 中记录，
/// 因此到这里的 4xx/5xx 只来自 axum 提取器与请求体上限的拒绝、未知路由或静态文件
fn rejection_reason(status: StatusCode) -> &'static str {
    match status {
        StatusCode::PAYLOAD_TOO_LARGE => "Request body exceeds the upload limit",
        StatusCode::UNSUPPORTED_MEDIA_TYPE => "Unsupported content type",
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => "Malformed request body",
        StatusCode::NOT_FOUND => "No route or static file",
        s if s.is_server_error() => "HTTP server error",
        _ => "HTTP client error",
    }
}

/// 记录被拒绝的请求
pub async fn error_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    let response = next.run(request).await;
    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            elapsed_ms,
            "{}",
            rejection_reason(status)
        );
    } else if status.is_client_error() {
        tracing::warn!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            elapsed_ms,
            "{}",
            rejection_reason(status)
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        extract::DefaultBodyLimit,
        http::Request as HttpRequest,
        routing::post,
        Json, Router,
    };
    use serde_json::Value;
    use tower::util::ServiceExt;

    async fn echo(Json(body): Json<Value>) -> Json<Value> {
        Json(body)
    }

    fn router() -> Router {
        Router::new()
            .route("/echo", post(echo))
            .layer(DefaultBodyLimit::max(32))
            .layer(axum::middleware::from_fn(error_logging_middleware))
    }

    async fn status_of(content_type: &str, body: String) -> StatusCode {
        let request = HttpRequest::builder()
            .method("POST")
            .uri("/echo")
            .header("content-type", content_type)
            .body(Body::from(body))
            .unwrap();
        router().oneshot(request).await.unwrap().status()
    }

    #[test]
    fn test_rejection_reasons() {
        assert_eq!(
            rejection_reason(StatusCode::PAYLOAD_TOO_LARGE),
            "Request body exceeds the upload limit"
        );
        assert_eq!(
            rejection_reason(StatusCode::UNPROCESSABLE_ENTITY),
            "Malformed request body"
        );
        assert_eq!(rejection_reason(StatusCode::BAD_GATEWAY), "HTTP server error");
        assert_eq!(rejection_reason(StatusCode::METHOD_NOT_ALLOWED), "HTTP client error");
    }

    #[tokio::test]
    async fn test_valid_request_passes_through() {
        assert_eq!(
            status_of("application/json", r#"{"a":1}"#.to_string()).await,
            StatusCode::OK
        );
    }

    #[tokio::test]
    async fn test_extractor_rejections_keep_status() {
        assert_eq!(
            status_of("application/json", format!("\"{}\"", "x".repeat(64))).await,
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            status_of("text/plain", "{}".to_string()).await,
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(
            status_of("application/json", "{not json".to_string()).await,
            StatusCode::BAD_REQUEST
        );
    }
}
