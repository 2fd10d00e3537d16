//! Test helpers for inbound HTTP components.

use actix_session::{Session, SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::{App, HttpResponse, test, web};

use super::session::USER_ID_KEY;

const SESSION_COOKIE: &str = "session";

/// Fixed signing key so cookies minted by one test app open in another.
fn test_key() -> Key {
    Key::from(&[7_u8; 64])
}

/// Session middleware for tests: cookie named `session`, `Secure` disabled.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), test_key())
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_secure(false)
        .build()
}

/// Mint a session cookie carrying `user_id` verbatim, as the account
/// subsystem would after login.
pub async fn session_cookie_for(user_id: &str) -> Cookie<'static> {
    let raw = user_id.to_owned();
    let app = test::init_service(App::new().wrap(test_session_middleware()).route(
        "/login",
        web::post().to(move |session: Session| {
            let raw = raw.clone();
            async move {
                match session.insert(USER_ID_KEY, raw) {
                    Ok(()) => HttpResponse::NoContent().finish(),
                    Err(_) => HttpResponse::InternalServerError().finish(),
                }
            }
        }),
    ))
    .await;

    let res = test::call_service(&app, test::TestRequest::post().uri("/login").to_request()).await;
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(Cookie::into_owned)
        .expect("session cookie set")
}
