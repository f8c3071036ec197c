use super::{API_PREFIX, SharedManager};
use crate::error::{
    message_response, ApiError, METHOD_NOT_ALLOWED_MESSAGE, NOT_FOUND_MESSAGE,
};
use crate::models::{Category, CategoryError, CategoryPayload, CategorySummary};
use axum::body::Bytes;
use axum::extract::rejection::RawPathParamsRejection;
use axum::extract::{FromRequestParts, Query, RawPathParams, State};
use axum::http::header::{ACCESS_CONTROL_EXPOSE_HEADERS, LOCATION};
use axum::http::request::Parts;
use axum::http::{HeaderValue, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::collections::HashMap;

pub async fn list_categories(
    State(manager): State<SharedManager>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<CategorySummary>>, ApiError> {
    tracing::debug!(?params, "list categories");
    Ok(Json(manager.list_categories().await?))
}

pub async fn get_category(
    State(manager): State<SharedManager>,
    ItemId(id): ItemId,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Category>, ApiError> {
    tracing::debug!(%id, ?params, "get category");
    Ok(Json(manager.get_category(&id).await?))
}

pub async fn create_category(
    State(manager): State<SharedManager>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let payload = parse_payload(&body)?;
    let (id, summaries) = manager.add_category(payload).await?;
    Ok(mutation_response(StatusCode::CREATED, Some(&id), summaries))
}

pub async fn update_category(
    State(manager): State<SharedManager>,
    ItemId(path_id): ItemId,
    body: Bytes,
) -> Result<Response, ApiError> {
    let payload = parse_payload(&body)?;
    let (id, summaries) = manager.update_category(&path_id, payload).await?;
    Ok(mutation_response(StatusCode::CREATED, Some(&id), summaries))
}

pub async fn delete_category(
    State(manager): State<SharedManager>,
    ItemId(id): ItemId,
) -> Result<Response, ApiError> {
    let summaries = manager.delete_category(&id).await?;
    Ok(mutation_response(StatusCode::OK, None, summaries))
}

pub async fn not_found(uri: Uri) -> Response {
    tracing::debug!(%uri, "no route");
    message_response(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE)
}

pub async fn method_not_allowed() -> Response {
    message_response(StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED_MESSAGE)
}

/// The body is parsed as JSON regardless of `Content-Type`.
fn parse_payload(body: &[u8]) -> Result<CategoryPayload, ApiError> {
    let value: serde_json::Value = serde_json::from_slice(body)?;
    Ok(CategoryPayload::parse(value).map_err(CategoryError::from)?)
}

/// Id of an item route: whatever follows the last `/` after `/category/`.
///
/// Empty on `/category/` itself. A path that cannot be decoded names no
/// category, so it is answered with the usual item 404.
pub struct ItemId(pub String);

impl<S: Send + Sync> FromRequestParts<S> for ItemId {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let params = match RawPathParams::from_request_parts(parts, state).await {
            Ok(params) => params,
            Err(RawPathParamsRejection::MissingPathParams(_)) => return Ok(Self(String::new())),
            Err(rejection) => {
                tracing::debug!(uri = %parts.uri, error = %rejection, "undecodable item path");
                return Err(CategoryError::NotFound(parts.uri.path().to_string()).into());
            }
        };

        let rest = params
            .iter()
            .find(|(key, _)| *key == "id")
            .map(|(_, value)| value)
            .unwrap_or_default();
        Ok(Self(trailing_segment(rest).to_string()))
    }
}

fn trailing_segment(rest: &str) -> &str {
    rest.rsplit('/').next().unwrap_or(rest)
}

fn mutation_response(
    status: StatusCode,
    id: Option<&str>,
    summaries: Vec<CategorySummary>,
) -> Response {
    let mut response = (status, Json(summaries)).into_response();
    let headers = response.headers_mut();
    headers.insert(
        ACCESS_CONTROL_EXPOSE_HEADERS,
        HeaderValue::from_static("Location"),
    );
    if let Some(id) = id {
        match HeaderValue::from_str(&format!("{API_PREFIX}/category/{id}")) {
            Ok(location) => {
                headers.insert(LOCATION, location);
            }
            Err(e) => tracing::warn!(%id, error = %e, "id is not a valid Location header"),
        }
    }
    response
}
