use axum::extract::Request;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    CONTENT_TYPE,
};
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

pub const ALLOWED_METHODS: &str = "GET, POST, PATCH, DELETE, OPTIONS";
pub const ALLOWED_HEADERS: &str = "Content-Type";

/// Answers preflight requests and stamps JSON and CORS headers on every response.
///
/// `OPTIONS` is handled here for any path, before routing, with an empty body.
pub async fn api_headers(request: Request, next: Next) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        tracing::debug!(uri = %request.uri(), "preflight");
        StatusCode::OK.into_response()
    } else {
        next.run(request).await
    };

    insert_api_headers(response.headers_mut());
    response
}

fn insert_api_headers(headers: &mut HeaderMap) {
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );
}
