use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use tracing::error;

use crate::catalog::{CatalogEntry, DocumentType};

use super::controller::WizardError;
use super::domain::{SessionId, SessionState, WizardEvent, WizardPage};
use super::form::{read_application, read_selection};
use super::reference::ReferenceGenerator;
use super::repository::SessionRepository;
use super::service::{OpenedSession, WizardService, WizardServiceError};
use super::views::{render_failure, render_page, Notice, PageView};

pub const SESSION_COOKIE: &str = "docs_wizard_session";

/// Body ceiling for the information page, in place of axum's 2 MB default.
pub const MAX_APPLICATION_BYTES: usize = 64 * 1024 * 1024;

/// Router builder exposing the wizard pages, checklist downloads, and the
/// JSON catalog/session views.
pub fn wizard_router<R, G>(service: Arc<WizardService<R, G>>) -> Router
where
    R: SessionRepository + 'static,
    G: ReferenceGenerator + 'static,
{
    Router::new()
        .route("/", get(page_handler::<R, G>))
        .route("/wizard/next", post(next_handler::<R, G>))
        .route(
            "/wizard/submit",
            post(submit_handler::<R, G>).layer(DefaultBodyLimit::max(MAX_APPLICATION_BYTES)),
        )
        .route("/wizard/reset", post(reset_handler::<R, G>))
        .route("/wizard/check-status", post(check_status_handler::<R, G>))
        .route("/wizard/refresh-status", post(refresh_status_handler::<R, G>))
        .route("/checklists/:document", get(checklist_handler::<R, G>))
        .route("/api/v1/documents", get(catalog_handler::<R, G>))
        .route("/api/v1/session", get(session_handler::<R, G>))
        .with_state(service)
}

/// Session id carried by the request's cookie header, if any.
pub fn session_from_headers(headers: &HeaderMap) -> Option<SessionId> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| SessionId(value.to_string()))
}

fn session_cookie(id: &SessionId) -> Option<HeaderValue> {
    HeaderValue::from_str(&format!(
        "{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax"
    ))
    .ok()
}

fn with_cookie(mut response: Response, session: &OpenedSession) -> Response {
    if session.created {
        if let Some(cookie) = session_cookie(&session.id) {
            response.headers_mut().append(header::SET_COOKIE, cookie);
        }
    }
    response
}

fn failure(err: WizardServiceError) -> Response {
    error!(error = %err, "wizard request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(render_failure(
            "Something went wrong while processing your request. Please try again.",
        )),
    )
        .into_response()
}

fn render_state<R, G>(
    service: &WizardService<R, G>,
    state: &SessionState,
    notice: Option<Notice>,
) -> Result<String, WizardServiceError>
where
    R: SessionRepository + 'static,
    G: ReferenceGenerator + 'static,
{
    let checklists = if state.page == WizardPage::Confirmation {
        service.checklists(state)?
    } else {
        Vec::new()
    };

    Ok(render_page(&PageView {
        state,
        catalog: service.catalog(),
        checklists: &checklists,
        notice,
    }))
}

pub(crate) async fn page_handler<R, G>(
    State(service): State<Arc<WizardService<R, G>>>,
    headers: HeaderMap,
) -> Response
where
    R: SessionRepository + 'static,
    G: ReferenceGenerator + 'static,
{
    let session = match service.open(session_from_headers(&headers)) {
        Ok(session) => session,
        Err(err) => return failure(err),
    };

    match render_state(&service, &session.state, None) {
        Ok(html) => with_cookie(Html(html).into_response(), &session),
        Err(err) => failure(err),
    }
}

/// Apply one event and answer with a redirect back to the current page, or
/// with the unchanged page and an inline notice when the action is refused.
fn respond<R, G>(service: &WizardService<R, G>, session: OpenedSession, event: WizardEvent) -> Response
where
    R: SessionRepository + 'static,
    G: ReferenceGenerator + 'static,
{
    match service.dispatch(&session.id, event) {
        Ok(_) => with_cookie(Redirect::to("/").into_response(), &session),
        Err(WizardServiceError::Wizard(rejection)) => {
            let status = match rejection {
                WizardError::EmptySelection => StatusCode::UNPROCESSABLE_ENTITY,
                WizardError::UnexpectedAction { .. } => StatusCode::CONFLICT,
            };
            let notice = Notice::Error(rejection.to_string());
            match render_state(service, &session.state, Some(notice)) {
                Ok(html) => with_cookie((status, Html(html)).into_response(), &session),
                Err(err) => failure(err),
            }
        }
        Err(other) => failure(other),
    }
}

fn bad_form(err: axum::extract::multipart::MultipartError) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Html(render_failure(&format!("The form could not be read: {}", err.body_text()))),
    )
        .into_response()
}

pub(crate) async fn next_handler<R, G>(
    State(service): State<Arc<WizardService<R, G>>>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response
where
    R: SessionRepository + 'static,
    G: ReferenceGenerator + 'static,
{
    let selection = match read_selection(multipart).await {
        Ok(selection) => selection,
        Err(err) => return bad_form(err),
    };
    match service.open(session_from_headers(&headers)) {
        Ok(session) => respond(&service, session, WizardEvent::Next { selection }),
        Err(err) => failure(err),
    }
}

pub(crate) async fn submit_handler<R, G>(
    State(service): State<Arc<WizardService<R, G>>>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Response
where
    R: SessionRepository + 'static,
    G: ReferenceGenerator + 'static,
{
    let form = match read_application(multipart, service.catalog()).await {
        Ok(form) => form,
        Err(err) => return bad_form(err),
    };
    match service.open(session_from_headers(&headers)) {
        Ok(session) => respond(&service, session, WizardEvent::SubmitApplication(form)),
        Err(err) => failure(err),
    }
}

async fn simple_action<R, G>(
    service: Arc<WizardService<R, G>>,
    headers: HeaderMap,
    event: WizardEvent,
) -> Response
where
    R: SessionRepository + 'static,
    G: ReferenceGenerator + 'static,
{
    match service.open(session_from_headers(&headers)) {
        Ok(session) => respond(&service, session, event),
        Err(err) => failure(err),
    }
}

pub(crate) async fn reset_handler<R, G>(
    State(service): State<Arc<WizardService<R, G>>>,
    headers: HeaderMap,
) -> Response
where
    R: SessionRepository + 'static,
    G: ReferenceGenerator + 'static,
{
    simple_action(service, headers, WizardEvent::StartNewApplication).await
}

pub(crate) async fn check_status_handler<R, G>(
    State(service): State<Arc<WizardService<R, G>>>,
    headers: HeaderMap,
) -> Response
where
    R: SessionRepository + 'static,
    G: ReferenceGenerator + 'static,
{
    simple_action(service, headers, WizardEvent::CheckStatus).await
}

pub(crate) async fn refresh_status_handler<R, G>(
    State(service): State<Arc<WizardService<R, G>>>,
    headers: HeaderMap,
) -> Response
where
    R: SessionRepository + 'static,
    G: ReferenceGenerator + 'static,
{
    simple_action(service, headers, WizardEvent::RefreshStatus).await
}

pub(crate) async fn checklist_handler<R, G>(
    State(service): State<Arc<WizardService<R, G>>>,
    Path(document): Path<String>,
) -> Response
where
    R: SessionRepository + 'static,
    G: ReferenceGenerator + 'static,
{
    let document = match document.parse::<DocumentType>() {
        Ok(document) => document,
        Err(err) => {
            return (StatusCode::NOT_FOUND, Json(json!({ "error": err.to_string() })))
                .into_response()
        }
    };

    match service.checklist(document) {
        Ok(artifact) => {
            let disposition = format!("attachment; filename=\"{}\"", artifact.file_name);
            let mut response = (
                StatusCode::OK,
                [(header::CONTENT_TYPE, mime::APPLICATION_PDF.as_ref())],
                artifact.bytes,
            )
                .into_response();
            if let Ok(value) = HeaderValue::from_str(&disposition) {
                response
                    .headers_mut()
                    .insert(header::CONTENT_DISPOSITION, value);
            }
            response
        }
        Err(err) => {
            error!(%document, error = %err, "checklist export failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": err.to_string() })),
            )
                .into_response()
        }
    }
}

/// Catalog view served by `/api/v1/documents`.
#[derive(Debug, Serialize)]
pub struct CatalogView<'a> {
    pub documents: Vec<CatalogDocumentView<'a>>,
}

#[derive(Debug, Serialize)]
pub struct CatalogDocumentView<'a> {
    pub slug: &'static str,
    #[serde(flatten)]
    pub entry: &'a CatalogEntry,
}

pub(crate) async fn catalog_handler<R, G>(
    State(service): State<Arc<WizardService<R, G>>>,
) -> Response
where
    R: SessionRepository + 'static,
    G: ReferenceGenerator + 'static,
{
    let view = CatalogView {
        documents: service
            .catalog()
            .entries()
            .map(|entry| CatalogDocumentView {
                slug: entry.document.slug(),
                entry,
            })
            .collect(),
    };
    Json(view).into_response()
}

/// Sanitized view of a session for `/api/v1/session`.
#[derive(Debug, Serialize)]
pub struct SessionView {
    pub session_id: SessionId,
    pub page: u8,
    pub page_name: WizardPage,
    pub selected: Vec<DocumentType>,
    pub submissions: Vec<SubmissionView>,
}

#[derive(Debug, Serialize)]
pub struct SubmissionView {
    pub document: DocumentType,
    pub reference_number: u32,
    pub status: &'static str,
}

impl SessionView {
    pub fn new(session_id: SessionId, state: &SessionState) -> Self {
        Self {
            session_id,
            page: state.page.number(),
            page_name: state.page,
            selected: state.selected.iter().copied().collect(),
            submissions: state
                .submissions
                .iter()
                .map(|(document, submission)| SubmissionView {
                    document: *document,
                    reference_number: submission.reference_number.value(),
                    status: submission.status.label(),
                })
                .collect(),
        }
    }
}

pub(crate) async fn session_handler<R, G>(
    State(service): State<Arc<WizardService<R, G>>>,
    headers: HeaderMap,
) -> Response
where
    R: SessionRepository + 'static,
    G: ReferenceGenerator + 'static,
{
    let Some(id) = session_from_headers(&headers) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "no active session" })),
        )
            .into_response();
    };

    match service.snapshot(&id) {
        Ok(Some(state)) => Json(SessionView::new(id, &state)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "no active session" })),
        )
            .into_response(),
        Err(err) => {
            error!(session = %id, error = %err, "session lookup failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": err.to_string() })),
            )
                .into_response()
        }
    }
}
