//! HTTP inbound adapter: page loaders and form actions over the Stash API.

pub mod auth;
pub mod categories;
pub mod error;
pub mod health;
pub mod home;
pub mod links;
pub mod profile;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;

use actix_web::web;

pub use error::{CallSite, LOGIN_PATH, PageError};

/// Register every page route. Health probes are mounted separately.
///
/// # Examples
/// ```no_run
/// use std::sync::Arc;
///
/// use actix_web::{App, web};
/// use frontend::inbound::http::{configure, state::HttpState};
/// use frontend::outbound::ReqwestStashApiFactory;
///
/// # fn build() -> Result<(), reqwest::Error> {
/// let factory = ReqwestStashApiFactory::new("http://localhost:8000", None)?;
/// let app = App::new()
///     .app_data(web::Data::new(HttpState::new(Arc::new(factory))))
///     .configure(configure);
/// # let _ = app;
/// # Ok(())
/// # }
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(home::home)
        .service(auth::login)
        .service(auth::register)
        .service(auth::logout)
        .service(links::stash)
        .service(links::add_link)
        .service(links::link_detail)
        .service(links::mark_read)
        .service(links::remove_link)
        .service(links::assign_category)
        .service(links::summarize_link)
        .service(categories::categories)
        .service(categories::create_category)
        .service(categories::rename_category)
        .service(categories::delete_category)
        .service(profile::profile)
        .service(profile::update_profile)
        .service(profile::change_password)
        .service(profile::delete_account);
}
