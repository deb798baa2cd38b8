use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, Form, Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use super::domain::{PollDetail, PollId, PollSummary};
use super::repository::PollRepository;
use super::service::{PollService, PollServiceError, MISSING_CHOICE_MESSAGE};

pub const EMPTY_INDEX_MESSAGE: &str = "No polls are available.";

/// Router builder exposing the index, detail, results, and vote endpoints.
pub fn poll_router<R>(service: Arc<PollService<R>>) -> Router
where
    R: PollRepository + 'static,
{
    Router::new()
        .route("/polls", get(index_handler::<R>))
        .route("/polls/:poll_id", get(detail_handler::<R>))
        .route("/polls/:poll_id/results", get(results_handler::<R>))
        .route("/polls/:poll_id/vote", post(vote_handler::<R>))
        .with_state(service)
}

pub fn results_path(poll_id: PollId) -> String {
    format!("/polls/{poll_id}/results")
}

#[derive(Debug, Serialize)]
pub struct PollIndexView {
    pub polls: Vec<PollSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

/// Detail page re-rendered after a rejected vote.
#[derive(Debug, Serialize)]
pub struct VoteFormView {
    #[serde(flatten)]
    pub poll: PollDetail,
    pub error_message: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct VoteForm {
    #[serde(default)]
    pub choice: Option<String>,
}

pub(crate) async fn index_handler<R>(State(service): State<Arc<PollService<R>>>) -> Response
where
    R: PollRepository + 'static,
{
    match service.latest(Utc::now()) {
        Ok(polls) => {
            let message = polls.is_empty().then_some(EMPTY_INDEX_MESSAGE);
            (StatusCode::OK, Json(PollIndexView { polls, message })).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn detail_handler<R>(
    State(service): State<Arc<PollService<R>>>,
    Path(poll_id): Path<String>,
) -> Response
where
    R: PollRepository + 'static,
{
    let Some(poll_id) = parse_poll_id(&poll_id) else {
        return not_found(&poll_id);
    };
    match service.detail(poll_id, Utc::now()) {
        Ok(detail) => (StatusCode::OK, Json(detail)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn results_handler<R>(
    State(service): State<Arc<PollService<R>>>,
    Path(poll_id): Path<String>,
) -> Response
where
    R: PollRepository + 'static,
{
    let Some(poll_id) = parse_poll_id(&poll_id) else {
        return not_found(&poll_id);
    };
    match service.results(poll_id, Utc::now()) {
        Ok(results) => (StatusCode::OK, Json(results)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn vote_handler<R>(
    State(service): State<Arc<PollService<R>>>,
    Path(poll_id): Path<String>,
    form: Result<Form<VoteForm>, FormRejection>,
) -> Response
where
    R: PollRepository + 'static,
{
    let Some(poll_id) = parse_poll_id(&poll_id) else {
        return not_found(&poll_id);
    };
    // An unreadable form carries no choice.
    let form = form.map(|Form(form)| form).unwrap_or_default();
    match service.vote(poll_id, form.choice.as_deref(), Utc::now()) {
        Ok(_) => Redirect::to(&results_path(poll_id)).into_response(),
        Err(err) => error_response(err),
    }
}

fn parse_poll_id(raw: &str) -> Option<PollId> {
    raw.parse::<u64>().ok().map(PollId)
}

fn not_found(poll_id: &str) -> Response {
    let payload = json!({ "error": format!("poll {poll_id} not found") });
    (StatusCode::NOT_FOUND, Json(payload)).into_response()
}

fn error_response(err: PollServiceError) -> Response {
    match err {
        PollServiceError::NotFound(poll_id) => not_found(&poll_id.to_string()),
        PollServiceError::MissingChoice { detail } => {
            let view = VoteFormView {
                poll: *detail,
                error_message: MISSING_CHOICE_MESSAGE.to_string(),
            };
            (StatusCode::UNPROCESSABLE_ENTITY, Json(view)).into_response()
        }
        PollServiceError::Repository(source) => {
            warn!(error = %source, "poll repository failure");
            let payload = json!({ "error": source.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
