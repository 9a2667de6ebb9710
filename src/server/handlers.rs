//! HTTP API Request Handlers
//!
//! Handlers that map HTTP requests to `QaSession` operations.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Form, Json,
};

use super::types::*;
use crate::qa::{normalize_question, Answer};
use crate::session::{ProcessReport, QaSession};

/// Maximum number of URLs accepted in one request
const MAX_URLS_PER_REQUEST: usize = 100;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<QaSession>,
}

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        model_loaded: state.session.has_model(),
        model_name: state.session.model_name().map(str::to_string),
        fetches: state.session.fetch_stats(),
    })
}

/// Process a JSON array of URLs and rebuild the context
pub async fn process_urls(
    State(state): State<AppState>,
    body: Result<Json<Vec<String>>, JsonRejection>,
) -> impl IntoResponse {
    let urls = match body {
        Ok(Json(urls)) => urls,
        Err(rejection) => {
            return (
                rejection.status(),
                Json(ProcessUrlsError {
                    status: "error".to_string(),
                    message: format!("Expected a JSON array of URL strings: {}", rejection.body_text()),
                    results: Default::default(),
                }),
            )
                .into_response();
        }
    };

    if urls.len() > MAX_URLS_PER_REQUEST {
        return (
            StatusCode::BAD_REQUEST,
            Json(ProcessUrlsError {
                status: "error".to_string(),
                message: format!("Too many URLs: {} (max {})", urls.len(), MAX_URLS_PER_REQUEST),
                results: Default::default(),
            }),
        )
            .into_response();
    }

    let report = state.session.process_urls(&urls).await;
    let results = report.results();
    match report.context {
        Ok(stats) => (
            StatusCode::OK,
            Json(ProcessUrlsResponse {
                status: "success".to_string(),
                processed_urls: results.len(),
                results,
                context_words: stats.words,
            }),
        )
            .into_response(),
        Err(e) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ProcessUrlsError {
                status: "error".to_string(),
                message: e.to_string(),
                results,
            }),
        )
            .into_response(),
    }
}

/// Answer `?question=` against the current context
pub async fn ask_question(
    State(state): State<AppState>,
    Query(query): Query<AskQuery>,
) -> impl IntoResponse {
    let question = query.question.unwrap_or_default();
    if normalize_question(&question).is_none() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(Answer::InvalidQuestion.to_string())),
        )
            .into_response();
    }

    let answer = state.session.ask(&question).await;
    (
        StatusCode::OK,
        Json(AnswerResponse {
            answer: answer.to_string(),
        }),
    )
        .into_response()
}

/// Stored pages and current context size
pub async fn pages(State(state): State<AppState>) -> impl IntoResponse {
    Json(PagesResponse {
        pages: state.session.pages(),
        context_words: state.session.context_stats().map(|s| s.words),
    })
}

/// UI form: process newline-separated URLs, plain-text status
pub async fn ui_process_urls(
    State(state): State<AppState>,
    Form(form): Form<UrlsForm>,
) -> impl IntoResponse {
    let urls: Vec<String> = form
        .urls
        .lines()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(str::to_string)
        .collect();

    if urls.is_empty() {
        return "Please enter at least one URL".to_string();
    }

    let report = state.session.process_urls(&urls).await;
    render_report(&report)
}

/// UI form: plain-text answer
pub async fn ui_ask_question(
    State(state): State<AppState>,
    Form(form): Form<QuestionForm>,
) -> impl IntoResponse {
    state.session.ask(&form.question).await.to_string()
}

/// Serve the HTML page
pub async fn ui_index() -> impl IntoResponse {
    axum::response::Html(super::ui::INDEX_HTML)
}

fn render_report(report: &ProcessReport) -> String {
    let mut lines = Vec::with_capacity(report.outcomes.len() + 1);
    match &report.context {
        Ok(stats) => lines.push(format!(
            "URLs processed successfully! Context: {} words from {} pages.",
            stats.words, stats.pages
        )),
        Err(e) => lines.push(format!("Context not updated: {}", e)),
    }
    for outcome in &report.outcomes {
        lines.push(format!("{}: {}", outcome.url, outcome.summary()));
    }
    lines.join("\n")
}
