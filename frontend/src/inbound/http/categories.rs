//! Category management page.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::error::{CallSite, PageError};
use super::session::SessionContext;
use super::state::HttpState;
use crate::domain::{Category, CategoryDraft, CategoryId, Error};

const LIST: CallSite = CallSite::new("Failed to fetch categories");
const CREATE: CallSite = CallSite::new("Failed to create category");
const RENAME: CallSite = CallSite::new("Failed to rename category").not_found("Category not found");
const DELETE: CallSite = CallSite::new("Failed to delete category").not_found("Category not found");

/// Form body of the create and rename actions.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryNameForm {
    pub name: Option<String>,
}

impl CategoryNameForm {
    fn draft(&self) -> Result<CategoryDraft, Error> {
        CategoryDraft::try_new(self.name.as_deref())
            .map_err(|err| Error::invalid_request(err.to_string()))
    }
}

#[derive(Serialize)]
struct CategoriesPage {
    categories: Vec<Category>,
}

#[derive(Serialize)]
struct CategoryAck {
    success: bool,
    id: CategoryId,
}

fn category_id(raw: &str) -> Result<CategoryId, Error> {
    raw.trim()
        .parse()
        .map(CategoryId::new)
        .map_err(|_| Error::invalid_request("Category ID is required"))
}

/// `GET /categories`.
#[get("/categories")]
pub async fn categories(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> Result<HttpResponse, PageError> {
    let current = session.require()?;
    let api = state.client(current.token());
    let categories = session
        .guard()
        .run(api.list_categories())
        .await
        .map_err(|failure| LIST.page_error(failure))?;
    Ok(HttpResponse::Ok().json(CategoriesPage { categories }))
}

/// `POST /categories`: create a category.
#[post("/categories")]
pub async fn create_category(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<CategoryNameForm>,
) -> Result<HttpResponse, PageError> {
    let current = session.require()?;
    let draft = form.draft()?;
    let api = state.client(current.token());
    let category = session
        .guard()
        .run(api.create_category(&draft))
        .await
        .map_err(|failure| CREATE.page_error(failure))?;
    info!(category_id = %category.id, "category created");
    Ok(HttpResponse::Ok().json(category))
}

/// `POST /categories/{id}`: rename a category.
#[post("/categories/{id}")]
pub async fn rename_category(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    form: web::Form<CategoryNameForm>,
) -> Result<HttpResponse, PageError> {
    let current = session.require()?;
    let id = category_id(&path)?;
    let draft = form.draft()?;
    let api = state.client(current.token());
    let category = session
        .guard()
        .run(api.update_category(id, &draft))
        .await
        .map_err(|failure| RENAME.page_error(failure))?;
    Ok(HttpResponse::Ok().json(category))
}

/// `POST /categories/{id}/delete`.
#[post("/categories/{id}/delete")]
pub async fn delete_category(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> Result<HttpResponse, PageError> {
    let current = session.require()?;
    let id = category_id(&path)?;
    let api = state.client(current.token());
    session
        .guard()
        .run(api.delete_category(id))
        .await
        .map_err(|failure| DELETE.page_error(failure))?;
    info!(category_id = %id, "category deleted");
    Ok(HttpResponse::Ok().json(CategoryAck { success: true, id }))
}
