//! Landing page loader.

use actix_web::{HttpResponse, get};
use serde::Serialize;

use super::session::SessionContext;
use crate::domain::UserRecord;

#[derive(Serialize)]
struct HomePage<'a> {
    user: Option<&'a UserRecord>,
}

/// `GET /`: the signed-in user, or `null` for visitors.
#[get("/")]
pub async fn home(session: SessionContext) -> HttpResponse {
    let current = session.check();
    HttpResponse::Ok().json(HomePage {
        user: current.user(),
    })
}
