//! Server-rendered shell: routing table and page handlers.

pub mod render;

use std::sync::Arc;

use axum::Router;
use axum::extract::{Form, RawQuery, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use serde::Deserialize;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::api::{ApiResult, CriticaApi, ErrorCode};
use crate::pages::article_search::{self, SearchFilter};
use crate::pages::article_view::{self, ArticleViewQuery, ArticleViewer};
use crate::pages::dashboard;
use crate::session::{ApiKey, SharedSession};

#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn CriticaApi>,
    pub session: Arc<SharedSession>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route(article_search::PATH, get(search))
        .route(article_view::PATH, get(view_article))
        .route("/article_view/choose", post(choose_section))
        .route(dashboard::PATH, get(show_dashboard))
        .route("/dashboard/article", post(new_article))
        .route("/dashboard/article_data", post(edit_article))
        .route("/dashboard/section", post(new_section))
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::NotFound
        | ErrorCode::ArticleNonexistent
        | ErrorCode::ArticleSectionNonexistent => StatusCode::NOT_FOUND,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::NoCapability => StatusCode::FORBIDDEN,
        ErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        ErrorCode::InvalidDuration
        | ErrorCode::InvalidPosition
        | ErrorCode::DecodeError
        | ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Network => StatusCode::BAD_GATEWAY,
        ErrorCode::InternalServerError | ErrorCode::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_response(code: ErrorCode) -> Response {
    (status_for(code), Html(render::error_page(code))).into_response()
}

fn respond<T>(result: ApiResult<T>, ready: impl FnOnce(T) -> Response) -> Response {
    match result {
        Ok(value) => ready(value),
        Err(code) => error_response(code),
    }
}

async fn home() -> Html<String> {
    Html(render::home_page())
}

async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Html(render::not_found_page())).into_response()
}

async fn search(State(state): State<AppState>, RawQuery(query): RawQuery) -> Response {
    let filter = SearchFilter::parse(query.as_deref().unwrap_or_default());
    let loaded = article_search::load(state.api.as_ref(), &filter).await;
    respond(loaded, |articles| {
        Html(render::search_page(&filter, &articles)).into_response()
    })
}

async fn view_article(State(state): State<AppState>, RawQuery(query): RawQuery) -> Response {
    let query = ArticleViewQuery::parse(query.as_deref().unwrap_or_default());
    let Some(article_id) = query.article_id else {
        return error_response(ErrorCode::NotFound);
    };
    let loaded = article_view::load(state.api.as_ref(), article_id).await;
    respond(loaded, |data| {
        let viewer = ArticleViewer::new(data, &query);
        Html(render::article_page(&viewer)).into_response()
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChooseForm {
    article_id: i64,
    position: i64,
    #[serde(default)]
    mistakes: u32,
    #[serde(default)]
    marks: String,
    candidate: usize,
}

/// Applies one choice and redirects to the resulting URL, replacing the
/// reader's position in the address bar.
async fn choose_section(State(state): State<AppState>, Form(form): Form<ChooseForm>) -> Response {
    let query = ArticleViewQuery {
        article_id: Some(form.article_id),
        position: form.position.max(0),
        mistakes: form.mistakes,
        marks: ArticleViewQuery::parse_marks(&form.marks),
    };
    let loaded = article_view::load(state.api.as_ref(), form.article_id).await;
    respond(loaded, |data| {
        let mut viewer = ArticleViewer::new(data, &query);
        if let Err(err) = viewer.choose(form.candidate) {
            tracing::debug!(%err, "ignoring choice");
        }
        Redirect::to(&viewer.query().href()).into_response()
    })
}

fn current_api_key(state: &AppState) -> Option<ApiKey> {
    state.session.api_key()
}

async fn show_dashboard(State(state): State<AppState>) -> Response {
    let Some(api_key) = current_api_key(&state) else {
        return (StatusCode::UNAUTHORIZED, Html(render::login_required_page())).into_response();
    };
    let loaded = dashboard::load(state.api.as_ref(), &api_key).await;
    respond(loaded, |data| {
        Html(render::dashboard_page(&api_key, &data)).into_response()
    })
}

fn minutes_to_ms(minutes: i64) -> i64 {
    minutes.saturating_mul(60_000)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewArticleForm {
    title: String,
    duration_minutes: i64,
}

async fn new_article(State(state): State<AppState>, Form(form): Form<NewArticleForm>) -> Response {
    let Some(api_key) = current_api_key(&state) else {
        return (StatusCode::UNAUTHORIZED, Html(render::login_required_page())).into_response();
    };
    let created = dashboard::create_article(
        state.api.as_ref(),
        &api_key,
        &form.title,
        minutes_to_ms(form.duration_minutes),
    )
    .await;
    respond(created, |_| {
        Redirect::to(dashboard::PATH).into_response()
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EditArticleForm {
    article_id: i64,
    title: String,
    duration_minutes: i64,
    /// Checkbox: present only when ticked.
    active: Option<String>,
}

async fn edit_article(State(state): State<AppState>, Form(form): Form<EditArticleForm>) -> Response {
    let Some(api_key) = current_api_key(&state) else {
        return (StatusCode::UNAUTHORIZED, Html(render::login_required_page())).into_response();
    };
    let updated = dashboard::update_article(
        state.api.as_ref(),
        &api_key,
        form.article_id,
        &form.title,
        minutes_to_ms(form.duration_minutes),
        form.active.is_some(),
    )
    .await;
    respond(updated, |_| {
        Redirect::to(dashboard::PATH).into_response()
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewSectionForm {
    article_id: i64,
    position: i64,
    variant: i64,
    section_text: String,
}

async fn new_section(State(state): State<AppState>, Form(form): Form<NewSectionForm>) -> Response {
    let Some(api_key) = current_api_key(&state) else {
        return (StatusCode::UNAUTHORIZED, Html(render::login_required_page())).into_response();
    };
    let created = dashboard::add_section(
        state.api.as_ref(),
        &api_key,
        dashboard::NewSection {
            article_id: form.article_id,
            position: form.position,
            variant: form.variant,
            section_text: form.section_text,
            active: true,
        },
    )
    .await;
    respond(created, |_| {
        Redirect::to(dashboard::PATH).into_response()
    })
}
