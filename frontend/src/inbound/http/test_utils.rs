//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, test, web};
use serde_json::{Value, json};

use super::session::SessionContext;
use super::state::HttpState;
use crate::domain::ports::{MockStashApi, MockStashApiFactory, StashApi};
use crate::domain::{BearerToken, Error, UserId, UserRecord};

/// Token stored by [`SEED_PATH`].
pub const TEST_TOKEN: &str = "T1";
/// Logs the test client in without touching the backend.
pub const SEED_PATH: &str = "/__test__/seed";
/// Reports the current session as JSON.
pub const WHOAMI_PATH: &str = "/__test__/whoami";

/// Session middleware for tests: fresh key, cookie named `session`, no
/// `Secure` flag so plain-HTTP test requests keep it.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// User record stored by [`SEED_PATH`].
pub fn test_user() -> UserRecord {
    let mut user = UserRecord::new(UserId::new(1), "a@b.com");
    user.username = Some("ada".to_owned());
    user
}

/// Factory handing out `api` exactly once, asserting the token it is bound to.
pub fn factory_once(expected_token: &'static str, api: MockStashApi) -> MockStashApiFactory {
    let mut factory = MockStashApiFactory::new();
    factory
        .expect_client()
        .withf(move |token| token.as_str() == expected_token)
        .times(1)
        .return_once(move |_| Box::new(api) as Box<dyn StashApi>);
    factory
}

/// Factory that fails the test if any backend client is requested.
pub fn no_backend() -> MockStashApiFactory {
    let mut factory = MockStashApiFactory::new();
    factory.expect_client().never();
    factory
}

async fn seed_session(session: SessionContext) -> Result<HttpResponse, Error> {
    session.persist(&BearerToken::new(TEST_TOKEN), &test_user())?;
    Ok(HttpResponse::NoContent().finish())
}

async fn whoami(session: SessionContext) -> HttpResponse {
    let current = session.check();
    HttpResponse::Ok().json(json!({
        "token": current.token().map(BearerToken::as_str),
        "user": current.user(),
    }))
}

/// Page routes plus the seed and whoami helpers over `factory`.
pub fn page_app(
    factory: MockStashApiFactory,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(HttpState::new(Arc::new(factory))))
        .wrap(test_session_middleware())
        .route(SEED_PATH, web::post().to(seed_session))
        .route(WHOAMI_PATH, web::get().to(whoami))
        .configure(super::configure)
}

/// Session cookie set by `res`, if any.
pub fn session_cookie(res: &ServiceResponse) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
}

/// Log in through [`SEED_PATH`] and return the session cookie.
pub async fn seeded_cookie<S>(app: &S) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = test::call_service(app, test::TestRequest::post().uri(SEED_PATH).to_request()).await;
    session_cookie(&res).expect("seed sets session cookie")
}

/// Session as seen with `cookie`: `{ token, user }`.
pub async fn whoami_with<S>(app: &S, cookie: Cookie<'static>) -> Value
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = test::TestRequest::get()
        .uri(WHOAMI_PATH)
        .cookie(cookie)
        .to_request();
    test::call_and_read_body_json(app, req).await
}
