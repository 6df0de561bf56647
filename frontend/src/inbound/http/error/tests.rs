//! Tests for HTTP error mapping.

use super::*;
use crate::domain::Error;
use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use rstest::{fixture, rstest};
use rstest_bdd_macros::{given, then, when};
use serde_json::{Value, json};

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn internal_error_case() -> Error {
    Error::internal("boom")
        .with_trace_id(TRACE_ID)
        .with_details(json!({"secret": "x"}))
}

async fn body_json(response: HttpResponse) -> Value {
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    serde_json::from_slice(&bytes).expect("JSON body")
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("no auth"), StatusCode::UNAUTHORIZED)]
#[case(Error::forbidden("denied"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("Link not found"), StatusCode::NOT_FOUND)]
#[case(Error::upstream("Failed to load link details"), StatusCode::INTERNAL_SERVER_ERROR)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] err: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&err), status);
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted_but_keep_trace_id(internal_error_case: Error) {
    let response = ResponseError::error_response(&internal_error_case);
    assert_eq!(
        response
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok()),
        Some(TRACE_ID)
    );
    let payload = body_json(response).await;
    assert_eq!(
        payload,
        json!({
            "code": "internal_error",
            "message": "Internal server error",
            "traceId": TRACE_ID
        })
    );
}

#[actix_web::test]
async fn upstream_failures_keep_their_message() {
    let response = ResponseError::error_response(&Error::upstream("Failed to load profile data"));
    assert!(response.headers().get(TRACE_ID_HEADER).is_none());
    let payload = body_json(response).await;
    assert_eq!(payload["message"], "Failed to load profile data");
    assert_eq!(payload["code"], "upstream_failure");
}

#[actix_web::test]
async fn redirect_is_see_other_with_location() {
    let response = PageError::login_required().error_response();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        response.headers().get(LOCATION).and_then(|v| v.to_str().ok()),
        Some(LOGIN_PATH)
    );
}

#[actix_web::test]
async fn form_rejection_keeps_backend_status_and_message() {
    let response = PageError::form(422, "Email already registered").error_response();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body_json(response).await,
        json!({ "invalid": true, "message": "Email already registered" })
    );
}

#[rstest]
#[case(CallFailure::SessionExpired, StatusCode::SEE_OTHER)]
#[case(CallFailure::Rejected { status: 400, message: "bad".into(), data: None }, StatusCode::BAD_REQUEST)]
#[case(CallFailure::NotFound { message: "gone".into() }, StatusCode::NOT_FOUND)]
#[case(CallFailure::Unavailable { status: None, message: "refused".into() }, StatusCode::INTERNAL_SERVER_ERROR)]
fn call_site_maps_each_failure_class(#[case] failure: CallFailure, #[case] status: StatusCode) {
    let page = CallSite::new("Failed to load link details")
        .not_found("Link not found")
        .page_error(failure);
    assert_eq!(page.status_code(), status);
}

#[test]
fn call_site_messages_replace_backend_wording() {
    let site = CallSite::new("Failed to load link details").not_found("Link not found");
    let PageError::Failure(missing) = site.page_error(CallFailure::NotFound {
        message: "No row with id 9".into(),
    }) else {
        panic!("expected failure");
    };
    assert_eq!(missing.message(), "Link not found");

    let PageError::Failure(down) = site.page_error(CallFailure::Unavailable {
        status: Some(502),
        message: "bad gateway".into(),
    }) else {
        panic!("expected failure");
    };
    assert_eq!(down.message(), "Failed to load link details");
}

#[given("a backend 404 for a link lookup")]
fn a_backend_404_for_a_link_lookup() -> CallFailure {
    CallFailure::NotFound {
        message: "detail from backend".into(),
    }
}

#[when("the link detail page maps the failure")]
fn the_link_detail_page_maps_the_failure(failure: CallFailure) -> PageError {
    CallSite::new("Failed to load link details")
        .not_found("Link not found")
        .page_error(failure)
}

#[then("the visitor sees a 404 saying the link was not found")]
fn the_visitor_sees_a_404(page: PageError) {
    assert_eq!(page.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(page.to_string(), "Link not found");
}

#[test]
fn link_lookup_404_flow() {
    the_visitor_sees_a_404(the_link_detail_page_maps_the_failure(
        a_backend_404_for_a_link_lookup(),
    ));
}

#[test]
fn from_actix_error_is_redacted_internal_error() {
    let err: Error = actix_web::error::ErrorBadRequest("boom").into();
    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.message(), "Internal server error");
}
