// src/handlers/comments.rs

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use serde_json::json;

use crate::{
    error::AppError,
    models::{
        comment::{CommentInput, CreateCommentRequest, UpdateCommentRequest, validate_comment},
        filters::{COMMENT_SORT_SAFE_LIST, Filters},
    },
    store::CommentStore,
    utils::{
        json::ReadJson,
        params::{IdParam, QueryValues, read_int, read_string},
        validator::Validator,
    },
};

/// Header a client may send to make an update conditional on the version
/// it last saw.
pub const EXPECTED_VERSION_HEADER: &str = "x-expected-version";

/// Creates a comment.
/// Returns 201 with the stored comment and its location.
pub async fn create_comment(
    State(comments): State<CommentStore>,
    ReadJson(payload): ReadJson<CreateCommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let input = CommentInput::from(payload);

    let mut v = Validator::new();
    validate_comment(&mut v, &input);
    if !v.is_empty() {
        return Err(v.into());
    }

    let comment = comments.insert(&input).await?;

    tracing::info!(id = comment.id, "comment created");

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/v1/comments/{}", comment.id))],
        Json(json!({ "comment": comment })),
    ))
}

/// Get a single comment by ID.
pub async fn show_comment(
    State(comments): State<CommentStore>,
    IdParam(id): IdParam,
) -> Result<impl IntoResponse, AppError> {
    let comment = comments.get(id).await?;

    Ok(Json(json!({ "comment": comment })))
}

/// Partially updates a comment.
///
/// The write only lands if the row still carries the version read here;
/// otherwise the client gets 409 and should re-fetch.
pub async fn update_comment(
    State(comments): State<CommentStore>,
    IdParam(id): IdParam,
    headers: HeaderMap,
    ReadJson(payload): ReadJson<UpdateCommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut comment = comments.get(id).await?;

    if let Some(expected) = headers.get(EXPECTED_VERSION_HEADER) {
        if expected.as_bytes() != comment.version.to_string().as_bytes() {
            return Err(AppError::EditConflict);
        }
    }

    let input = payload.apply_to(&comment);

    let mut v = Validator::new();
    validate_comment(&mut v, &input);
    if !v.is_empty() {
        return Err(v.into());
    }

    comment.version = comments.update(comment.id, comment.version, &input).await?;
    comment.content = input.content;
    comment.author = input.author;

    Ok(Json(json!({ "comment": comment })))
}

/// Delete a comment (Hard Delete).
pub async fn delete_comment(
    State(comments): State<CommentStore>,
    IdParam(id): IdParam,
) -> Result<impl IntoResponse, AppError> {
    comments.delete(id).await?;

    tracing::info!(id, "comment deleted");

    Ok(Json(json!({ "message": "comment successfully deleted" })))
}

/// Lists comments with full-text filters, pagination and sorting.
pub async fn list_comments(
    State(comments): State<CommentStore>,
    params: QueryValues,
) -> Result<impl IntoResponse, AppError> {
    let mut v = Validator::new();

    // Numbers are parsed by hand so bad values become field-level failures.
    let content = read_string(params.get("content"), "");
    let author = read_string(params.get("author"), "");
    let filters = Filters {
        page: read_int(&mut v, params.get("page"), 1, "page"),
        page_size: read_int(&mut v, params.get("page_size"), 20, "page_size"),
        sort: read_string(params.get("sort"), "id"),
        sort_safe_list: COMMENT_SORT_SAFE_LIST,
    };

    let Some(filters) = filters.validate(&mut v) else {
        return Err(v.into());
    };

    let (rows, metadata) = comments.list_all(&content, &author, &filters).await?;

    Ok(Json(json!({ "comments": rows, "metadata": metadata })))
}
