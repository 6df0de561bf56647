//! Stash page: link listing, link detail, and link actions.
//!
//! ```text
//! GET  /stash?tab=unread
//! POST /stash/links                  url=https://example.com&note=later
//! POST /stash/links/{id}/read
//! POST /stash/links/{id}/delete
//! POST /stash/links/{id}/category    category_id=3
//! POST /stash/links/{id}/summarize
//! GET  /stash/links/{id}
//! ```

use actix_web::{HttpResponse, get, post, web};
use futures_util::future::try_join;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::error::{CallSite, PageError};
use super::session::SessionContext;
use super::state::HttpState;
use crate::domain::{
    Category, CategoryId, Error, Link, LinkId, LinkStatusTab, LinkUpdate, LinkValidationError,
    NewLink,
};

const LIST: CallSite = CallSite::new("Failed to fetch links");
const SAVE: CallSite = CallSite::new("Failed to save link");
const MARK_READ: CallSite = CallSite::new("Failed to mark link as read");
const DELETE: CallSite = CallSite::new("Failed to delete link");
const DETAIL: CallSite = CallSite::new("Failed to load link details").not_found("Link not found");
const CATEGORY: CallSite = CallSite::new("Failed to update link category");
const SUMMARIZE: CallSite = CallSite::new("Failed to summarize link");

/// Query string of `GET /stash`.
#[derive(Debug, Default, Deserialize)]
pub struct StashQuery {
    pub tab: Option<String>,
}

impl StashQuery {
    fn tab(&self) -> Result<Option<LinkStatusTab>, Error> {
        match self.tab.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|err: LinkValidationError| Error::invalid_request(err.to_string())),
        }
    }
}

#[derive(Serialize)]
struct StashPage {
    links: Vec<Link>,
    tab: Option<LinkStatusTab>,
}

/// Form body of `POST /stash/links`.
#[derive(Debug, Default, Deserialize)]
pub struct AddLinkForm {
    pub url: Option<String>,
    pub note: Option<String>,
}

/// Form body of `POST /stash/links/{id}/category`; blank clears it.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryForm {
    pub category_id: Option<String>,
}

impl CategoryForm {
    fn category(&self) -> Result<Option<CategoryId>, Error> {
        match self.category_id.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw
                .parse()
                .map(|id| Some(CategoryId::new(id)))
                .map_err(|_| Error::invalid_request("Category ID must be a number")),
        }
    }
}

#[derive(Serialize)]
struct LinkAck {
    success: bool,
    id: LinkId,
}

#[derive(Serialize)]
struct LinkDetailPage {
    link: Link,
    categories: Vec<Category>,
}

fn link_id(raw: &str) -> Result<LinkId, Error> {
    raw.trim()
        .parse()
        .map(LinkId::new)
        .map_err(|_| Error::invalid_request(LinkValidationError::MissingId.to_string()))
}

/// `GET /stash`: saved links, optionally filtered by read state.
#[get("/stash")]
pub async fn stash(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<StashQuery>,
) -> Result<HttpResponse, PageError> {
    let current = session.require()?;
    let tab = query.tab()?;
    let api = state.client(current.token());
    let mut links = session
        .guard()
        .run(api.list_links())
        .await
        .map_err(|failure| LIST.page_error(failure))?;
    if let Some(tab) = tab {
        links.retain(|link| tab.matches(link));
    }
    Ok(HttpResponse::Ok().json(StashPage { links, tab }))
}

/// `POST /stash/links`: save a URL with an optional note.
#[post("/stash/links")]
pub async fn add_link(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<AddLinkForm>,
) -> Result<HttpResponse, PageError> {
    let current = session.require()?;
    let new_link = NewLink::try_new(form.url.as_deref(), form.note.as_deref())
        .map_err(|err| Error::invalid_request(err.to_string()))?;
    let api = state.client(current.token());
    let link = session
        .guard()
        .run(api.save_link(&new_link))
        .await
        .map_err(|failure| SAVE.page_error(failure))?;
    info!(link_id = %link.id, "link saved");
    Ok(HttpResponse::Ok().json(link))
}

/// `POST /stash/links/{id}/read`.
#[post("/stash/links/{id}/read")]
pub async fn mark_read(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> Result<HttpResponse, PageError> {
    let current = session.require()?;
    let id = link_id(&path)?;
    let api = state.client(current.token());
    session
        .guard()
        .run(api.mark_read(id))
        .await
        .map_err(|failure| MARK_READ.page_error(failure))?;
    Ok(HttpResponse::Ok().json(LinkAck { success: true, id }))
}

/// `POST /stash/links/{id}/delete`.
#[post("/stash/links/{id}/delete")]
pub async fn remove_link(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> Result<HttpResponse, PageError> {
    let current = session.require()?;
    let id = link_id(&path)?;
    let api = state.client(current.token());
    session
        .guard()
        .run(api.delete_link(id))
        .await
        .map_err(|failure| DELETE.page_error(failure))?;
    info!(link_id = %id, "link deleted");
    Ok(HttpResponse::Ok().json(LinkAck { success: true, id }))
}

/// `POST /stash/links/{id}/category`: assign or clear the category.
#[post("/stash/links/{id}/category")]
pub async fn assign_category(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    form: web::Form<CategoryForm>,
) -> Result<HttpResponse, PageError> {
    let current = session.require()?;
    let id = link_id(&path)?;
    let update = LinkUpdate::assign_category(form.category()?);
    let api = state.client(current.token());
    let link = session
        .guard()
        .run(api.update_link(id, &update))
        .await
        .map_err(|failure| CATEGORY.page_error(failure))?;
    Ok(HttpResponse::Ok().json(link))
}

/// `POST /stash/links/{id}/summarize`: ask the backend for a fresh summary.
#[post("/stash/links/{id}/summarize")]
pub async fn summarize_link(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> Result<HttpResponse, PageError> {
    let current = session.require()?;
    let id = link_id(&path)?;
    let api = state.client(current.token());
    let link = session
        .guard()
        .run(api.summarize_link(id))
        .await
        .map_err(|failure| SUMMARIZE.page_error(failure))?;
    Ok(HttpResponse::Ok().json(link))
}

/// `GET /stash/links/{id}`: the link plus every category for the picker.
#[get("/stash/links/{id}")]
pub async fn link_detail(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> Result<HttpResponse, PageError> {
    let current = session.require()?;
    let id = link_id(&path)?;
    let api = state.client(current.token());
    let (link, categories) = session
        .guard()
        .run(try_join(api.get_link(id), api.list_categories()))
        .await
        .map_err(|failure| DETAIL.page_error(failure))?;
    Ok(HttpResponse::Ok().json(LinkDetailPage { link, categories }))
}
