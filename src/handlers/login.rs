use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;

use crate::middleware::auth::session_cookie;
use crate::service::credentials;
use crate::types::forms::LoginForm;
use crate::{PaygateError, router::PaygateState};

pub const HOME_PATH: &str = "/home";

/// POST /login -> sets the session marker and redirects home, or 401.
pub async fn login_submit(
    State(state): State<PaygateState>,
    jar: PrivateCookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, PaygateError> {
    credentials::authenticate(&state.storage, &form.username, &form.password).await?;
    let jar = jar.add(session_cookie());
    Ok((jar, Redirect::to(HOME_PATH)).into_response())
}
