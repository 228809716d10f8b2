use axum::{
    extract::{Path, State},
    response::Html,
};
use minijinja::context;

use crate::middleware::RequireSession;
use crate::templates::{LOGIN, PAY};
use crate::types::views::PayPage;
use crate::{PaygateError, router::PaygateState};

/// GET / and GET /login
pub async fn login_page(State(state): State<PaygateState>) -> Result<Html<String>, PaygateError> {
    let html = state
        .templates
        .render(LOGIN, context! {})
        .map_err(PaygateError::Render)?;
    Ok(Html(html))
}

/// GET /home -> static landing page from the public directory.
pub async fn home_page(
    _session: RequireSession,
    State(state): State<PaygateState>,
) -> Result<Html<String>, PaygateError> {
    let html = tokio::fs::read_to_string(state.public_dir.join("home.html")).await?;
    Ok(Html(html))
}

/// GET /pay.ejs -> blank intake form.
pub async fn pay_page(
    _session: RequireSession,
    State(state): State<PaygateState>,
) -> Result<Html<String>, PaygateError> {
    render_pay(&state, PayPage::default())
}

/// GET /payment/{user_id} -> completion form bound to a payer id.
pub async fn payer_page(
    State(state): State<PaygateState>,
    Path(user_id): Path<String>,
) -> Result<Html<String>, PaygateError> {
    render_pay(
        &state,
        PayPage {
            user_id: Some(user_id),
        },
    )
}

fn render_pay(state: &PaygateState, page: PayPage) -> Result<Html<String>, PaygateError> {
    let html = state
        .templates
        .render(PAY, page)
        .map_err(PaygateError::Render)?;
    Ok(Html(html))
}
