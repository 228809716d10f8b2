use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::response::Redirect;
use axum_extra::extract::cookie::{Cookie, Key, PrivateCookieJar};

/// Name of the session marker cookie.
pub const SESSION_COOKIE: &str = "loggedIn";

pub const LOGIN_PATH: &str = "/login";

/// Session marker set after a successful login. No max-age: it lives for the
/// browser session and never expires server side.
pub fn session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, "true"))
        .path("/")
        .http_only(true)
        .build()
}

/// True when the jar holds a session marker that decrypted with our key.
pub fn has_session(jar: &PrivateCookieJar) -> bool {
    jar.get(SESSION_COOKIE)
        .is_some_and(|cookie| cookie.value() == "true")
}

/// Guard for pages behind the login. Requests without a valid session marker
/// are redirected to the login page.
#[derive(Debug, Clone, Copy)]
pub struct RequireSession;

impl<S> FromRequestParts<S> for RequireSession
where
    S: Send + Sync,
    Key: FromRef<S>,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = match PrivateCookieJar::<Key>::from_request_parts(parts, state).await {
            Ok(jar) => jar,
            Err(never) => match never {},
        };
        if has_session(&jar) {
            Ok(Self)
        } else {
            Err(Redirect::to(LOGIN_PATH))
        }
    }
}
