use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use common::types::Message;
use serde::Deserialize;
use service::pagination::Pagination;
use service::question::dto::{QuestionCreationDto, QuestionDto};
use service::validation::validate_input;
use tracing::info;
use utoipa::IntoParams;

use crate::errors::JsonApiError;
use crate::openapi::{ErrorDoc, MessageDoc, QuestionCreationDoc, QuestionDoc};
use crate::state::ServerState;

pub const DELETED_MESSAGE: &str = "successfully deleted question";

/// Raw listing parameters. Kept as strings so that an empty value counts as
/// absent and a non-numeric one gets a readable error.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 1-based page index, `0` is treated as `1`
    pub page: Option<String>,
    /// items per page, `0` means 10 and anything above 50 is capped
    pub page_size: Option<String>,
}

fn question_id(path: Result<Path<i32>, PathRejection>) -> Result<i32, JsonApiError> {
    let Path(id) = path?;
    Ok(id)
}

fn creation_body(body: Result<Json<QuestionCreationDto>, JsonRejection>) -> Result<QuestionCreationDto, JsonApiError> {
    let Json(input) = body?;
    validate_input(&input)?;
    Ok(input)
}

#[utoipa::path(
    get,
    path = "/questions",
    tag = "questions",
    params(PageQuery),
    responses(
        (status = 200, description = "One page of questions", body = [QuestionDoc]),
        (status = 400, description = "Non-numeric pagination", body = ErrorDoc),
        (status = 500, description = "Storage failure", body = ErrorDoc)
    )
)]
pub async fn list(
    State(state): State<ServerState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<Vec<QuestionDto>>, JsonApiError> {
    let Query(q) = query?;
    let page = Pagination::from_query(q.page.as_deref(), q.page_size.as_deref())?;
    let questions = state.questions.get_questions_page(page).await?;
    info!(page = page.page, page_size = page.page_size, count = questions.len(), "list questions");
    Ok(Json(questions))
}

#[utoipa::path(
    get,
    path = "/questions/{id}",
    tag = "questions",
    params(("id" = i32, Path, description = "Question id")),
    responses(
        (status = 200, description = "Question with its options", body = QuestionDoc),
        (status = 404, description = "No such question", body = ErrorDoc)
    )
)]
pub async fn get(
    State(state): State<ServerState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<QuestionDto>, JsonApiError> {
    let id = question_id(id)?;
    Ok(Json(state.questions.get_question_by_id(id).await?))
}

#[utoipa::path(
    post,
    path = "/questions",
    tag = "questions",
    request_body = QuestionCreationDoc,
    responses(
        (status = 200, description = "Created question as stored", body = QuestionDoc),
        (status = 400, description = "Invalid payload", body = ErrorDoc),
        (status = 500, description = "Storage failure", body = ErrorDoc)
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    body: Result<Json<QuestionCreationDto>, JsonRejection>,
) -> Result<Json<QuestionDto>, JsonApiError> {
    let input = creation_body(body)?;
    Ok(Json(state.questions.create_question(&input).await?))
}

#[utoipa::path(
    put,
    path = "/questions/{id}",
    tag = "questions",
    params(("id" = i32, Path, description = "Question id")),
    request_body = QuestionCreationDoc,
    responses(
        (status = 200, description = "Updated question; id 0 and no options when the id is unknown", body = QuestionDoc),
        (status = 400, description = "Invalid payload", body = ErrorDoc),
        (status = 500, description = "Storage failure", body = ErrorDoc)
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    id: Result<Path<i32>, PathRejection>,
    body: Result<Json<QuestionCreationDto>, JsonRejection>,
) -> Result<Json<QuestionDto>, JsonApiError> {
    let id = question_id(id)?;
    let input = creation_body(body)?;
    Ok(Json(state.questions.update_question(id, &input).await?))
}

#[utoipa::path(
    delete,
    path = "/questions/{id}",
    tag = "questions",
    params(("id" = i32, Path, description = "Question id")),
    responses(
        (status = 200, description = "Deleted, or nothing to delete", body = MessageDoc),
        (status = 500, description = "Storage failure", body = ErrorDoc)
    )
)]
pub async fn delete(
    State(state): State<ServerState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<Message>, JsonApiError> {
    let id = question_id(id)?;
    state.questions.delete_question(id).await?;
    Ok(Json(Message::new(DELETED_MESSAGE)))
}
