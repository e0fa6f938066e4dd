use axum::http::{header, StatusCode};
use tower::ServiceExt;

use super::common::*;
use crate::catalog::DocumentType;
use crate::wizard::domain::{SessionId, WizardPage};
use crate::wizard::ResetPolicy;

async fn start_session(router: &axum::Router) -> SessionId {
    let response = router
        .clone()
        .oneshot(empty_request("GET", "/", None))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    issued_session(&response).expect("session cookie issued")
}

#[tokio::test]
async fn first_visit_renders_selection_and_sets_cookie() {
    let (router, repository, _dir) = build_router(ResetPolicy::Retain);

    let response = router
        .oneshot(empty_request("GET", "/", None))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let id = issued_session(&response).expect("cookie issued");
    assert_eq!(
        repository.stored(&id).map(|state| state.page),
        Some(WizardPage::Selection)
    );
    let html = read_text_body(response).await;
    assert!(html.contains("Select Your Documents"));
}

#[tokio::test]
async fn returning_visit_reuses_session_without_new_cookie() {
    let (router, repository, _dir) = build_router(ResetPolicy::Retain);
    let id = start_session(&router).await;

    let response = router
        .oneshot(empty_request("GET", "/", Some(&id)))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    assert!(issued_session(&response).is_none());
    assert_eq!(repository.len(), 1);
}

#[tokio::test]
async fn next_without_documents_answers_unprocessable_with_message() {
    let (router, repository, _dir) = build_router(ResetPolicy::Retain);
    let id = start_session(&router).await;

    let response = router
        .oneshot(multipart_post(
            "/wizard/next",
            Some(&id),
            &[Part::Text("note", "nothing picked")],
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = read_text_body(response).await;
    assert!(html.contains("Please select at least one document to process."));
    assert_eq!(
        repository.stored(&id).map(|state| state.page),
        Some(WizardPage::Selection)
    );
}

#[tokio::test]
async fn next_ignores_unknown_document_values() {
    let (router, repository, _dir) = build_router(ResetPolicy::Retain);
    let id = start_session(&router).await;

    let response = router
        .oneshot(multipart_post(
            "/wizard/next",
            Some(&id),
            &[
                Part::Text("documents", "barangay-clearance"),
                Part::Text("documents", "dfa-passport"),
            ],
        ))
        .await
        .expect("route executes");

    assert_redirects_home(&response);
    let stored = repository.stored(&id).expect("session stored");
    assert_eq!(stored.page, WizardPage::Information);
    assert_eq!(
        stored.selected.into_iter().collect::<Vec<_>>(),
        vec![DocumentType::DfaPassport]
    );
}

#[tokio::test]
async fn information_page_offers_upload_for_each_requirement() {
    let (router, _repository, _dir) = build_router(ResetPolicy::Retain);
    let id = start_session(&router).await;

    router
        .clone()
        .oneshot(multipart_post(
            "/wizard/next",
            Some(&id),
            &[Part::Text("documents", "dfa-passport")],
        ))
        .await
        .expect("route executes");

    let response = router
        .oneshot(empty_request("GET", "/", Some(&id)))
        .await
        .expect("route executes");
    let html = read_text_body(response).await;

    assert_eq!(html.matches("type=\"file\"").count(), 3);
    assert!(html.contains("Upload Old Passport (if renewing)"));
    assert!(html.contains("action=\"/wizard/submit\""));
}

#[tokio::test]
async fn submit_accepts_uploads_and_blank_fields() {
    let (router, repository, _dir) = build_router(ResetPolicy::Retain);
    let id = start_session(&router).await;

    router
        .clone()
        .oneshot(multipart_post(
            "/wizard/next",
            Some(&id),
            &[Part::Text("documents", "lto-drivers-license")],
        ))
        .await
        .expect("route executes");

    let response = router
        .oneshot(multipart_post(
            "/wizard/submit",
            Some(&id),
            &[
                Part::Text("full_name", ""),
                Part::Text("birthdate", "not-a-date"),
                Part::Text("address", ""),
                Part::File {
                    name: "upload:lto-drivers-license:1",
                    file_name: "photo.png",
                    content_type: "image/png",
                    bytes: b"\x89PNG fake",
                },
                Part::File {
                    name: "upload:lto-drivers-license:0",
                    file_name: "",
                    content_type: "application/octet-stream",
                    bytes: b"",
                },
            ],
        ))
        .await
        .expect("route executes");

    assert_redirects_home(&response);
    let stored = repository.stored(&id).expect("session stored");
    assert_eq!(stored.page, WizardPage::Confirmation);
    assert_eq!(stored.submissions.len(), 1);
}

#[tokio::test]
async fn submit_accepts_scans_larger_than_default_body_limit() {
    let (router, repository, _dir) = build_router(ResetPolicy::Retain);
    let id = start_session(&router).await;

    router
        .clone()
        .oneshot(multipart_post(
            "/wizard/next",
            Some(&id),
            &[Part::Text("documents", "nbi-clearance")],
        ))
        .await
        .expect("route executes");

    let scan = vec![0x25_u8; 3 * 1024 * 1024];
    let response = router
        .oneshot(multipart_post(
            "/wizard/submit",
            Some(&id),
            &[
                Part::Text("full_name", "Maria Santos"),
                Part::File {
                    name: "upload:nbi-clearance:0",
                    file_name: "birth-certificate.pdf",
                    content_type: "application/pdf",
                    bytes: &scan,
                },
            ],
        ))
        .await
        .expect("route executes");

    assert_redirects_home(&response);
    let stored = repository.stored(&id).expect("session stored");
    assert_eq!(stored.page, WizardPage::Confirmation);
    assert!(stored.submissions.contains_key(&DocumentType::NbiClearance));
}

#[tokio::test]
async fn out_of_order_action_answers_conflict_and_keeps_page() {
    let (router, repository, _dir) = build_router(ResetPolicy::Retain);
    let id = start_session(&router).await;

    let response = router
        .oneshot(empty_request("POST", "/wizard/refresh-status", Some(&id)))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let html = read_text_body(response).await;
    assert!(html.contains("not available on page 1"));
    assert_eq!(
        repository.stored(&id).map(|state| state.page),
        Some(WizardPage::Selection)
    );
}

#[tokio::test]
async fn action_without_cookie_starts_a_session() {
    let (router, repository, _dir) = build_router(ResetPolicy::Retain);

    let response = router
        .oneshot(multipart_post(
            "/wizard/next",
            None,
            &[Part::Text("documents", "psa-birth-certificate")],
        ))
        .await
        .expect("route executes");

    assert_redirects_home(&response);
    let id = issued_session(&response).expect("cookie issued");
    assert_eq!(
        repository.stored(&id).map(|state| state.page),
        Some(WizardPage::Information)
    );
}

#[tokio::test]
async fn status_page_tracks_refreshes() {
    let (router, _repository, _dir) = build_router(ResetPolicy::Retain);
    let id = start_session(&router).await;

    for request in [
        multipart_post(
            "/wizard/next",
            Some(&id),
            &[Part::Text("documents", "nbi-clearance")],
        ),
        multipart_post(
            "/wizard/submit",
            Some(&id),
            &[Part::Text("full_name", "Juan dela Cruz")],
        ),
        empty_request("POST", "/wizard/check-status", Some(&id)),
        empty_request("POST", "/wizard/refresh-status", Some(&id)),
    ] {
        let response = router
            .clone()
            .oneshot(request)
            .await
            .expect("route executes");
        assert_redirects_home(&response);
    }

    let response = router
        .oneshot(empty_request("GET", "/", Some(&id)))
        .await
        .expect("route executes");
    let html = read_text_body(response).await;

    assert!(html.contains("Application Status"));
    assert!(html.contains("Reference Number: 100000"));
    assert!(html.contains("Status: Processing"));
}

#[tokio::test]
async fn checklist_route_serves_pdf_attachment() {
    let (router, _repository, _dir) = build_router(ResetPolicy::Retain);

    let response = router
        .oneshot(empty_request("GET", "/checklists/psa-birth-certificate", None))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).map(|v| v.as_bytes()),
        Some(b"application/pdf".as_slice())
    );
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok()),
        Some("attachment; filename=\"PSA Birth Certificate_requirements.pdf\"")
    );
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    assert!(body.starts_with(b"%PDF"));
}

#[tokio::test]
async fn checklist_route_rejects_unknown_documents() {
    let (router, _repository, _dir) = build_router(ResetPolicy::Retain);

    let response = router
        .oneshot(empty_request("GET", "/checklists/voter-id", None))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn catalog_endpoint_lists_requirements_and_guidance() {
    let (router, _repository, _dir) = build_router(ResetPolicy::Retain);

    let response = router
        .oneshot(empty_request("GET", "/api/v1/documents", None))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let documents = payload["documents"].as_array().expect("documents array");
    assert_eq!(documents.len(), 4);
    assert_eq!(documents[1]["document"], "DFA Passport");
    assert_eq!(documents[1]["slug"], "dfa-passport");
    assert_eq!(documents[1]["requirements"].as_array().map(Vec::len), Some(3));
    assert_eq!(documents[1]["requirements"][0]["kind"], "upload");
}

#[tokio::test]
async fn session_endpoint_reports_snapshot_or_not_found() {
    let (router, _repository, _dir) = build_router(ResetPolicy::Retain);

    let missing = router
        .clone()
        .oneshot(empty_request("GET", "/api/v1/session", None))
        .await
        .expect("route executes");
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let id = start_session(&router).await;
    router
        .clone()
        .oneshot(multipart_post(
            "/wizard/next",
            Some(&id),
            &[Part::Text("documents", "NBI Clearance")],
        ))
        .await
        .expect("route executes");

    let response = router
        .oneshot(empty_request("GET", "/api/v1/session", Some(&id)))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["page"], 2);
    assert_eq!(payload["page_name"], "information");
    assert_eq!(payload["selected"][0], "NBI Clearance");
    assert_eq!(payload["submissions"].as_array().map(Vec::len), Some(0));
}
