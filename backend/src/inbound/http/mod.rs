//! HTTP inbound adapter exposing the passport REST endpoints.

use actix_web::web;

use crate::domain::Error;

pub mod error;
pub mod experiences;
pub mod health;
pub mod passport;
pub mod ranking;
pub mod schemas;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;

/// Register every `/api/v1` handler on `cfg`.
///
/// Malformed JSON bodies and query strings are reported with the same error
/// payload as domain failures.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use backend::inbound::http::configure_api;
///
/// let _app = App::new().service(web::scope("/api/v1").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("malformed JSON body: {err}")).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("malformed query string: {err}")).into()
    }))
    .service(passport::register)
    .service(passport::passport)
    .service(ranking::ranking)
    .service(experiences::resolve_by_uid)
    .service(experiences::list_uids)
    .service(experiences::set_uid_active)
    .service(experiences::update_points)
    .service(experiences::set_visibility)
    .service(experiences::delete_experience);
}
