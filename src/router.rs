use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    extract::FromRef,
    routing::{get, post},
};
use axum_extra::extract::cookie::Key;
use base64::Engine;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::Config;
use crate::db::Storage;
use crate::error::PaygateError;
use crate::handlers::{login, pages, payment};
use crate::service::font::ReceiptFont;
use crate::service::receipt::{RECEIPTS_ROUTE, ReceiptService};
use crate::templates::Templates;

#[derive(Clone)]
pub struct PaygateState {
    pub storage: Storage,
    pub templates: Arc<Templates>,
    pub receipts: ReceiptService,
    pub public_dir: PathBuf,
    key: Key,
}

impl PaygateState {
    pub fn new(storage: Storage, cfg: &Config) -> Result<Self, PaygateError> {
        let templates = Arc::new(Templates::new().map_err(PaygateError::Render)?);
        let font = match &cfg.receipt_font {
            Some(path) => ReceiptFont::from_path(path)?,
            None => ReceiptFont::bundled(),
        };
        let receipts = ReceiptService::new(templates.clone(), font, cfg.receipts_dir.clone());
        Ok(Self {
            storage,
            templates,
            receipts,
            public_dir: cfg.public_dir.clone(),
            key: cookie_key(cfg.cookie_secret.as_deref())?,
        })
    }
}

impl FromRef<PaygateState> for Key {
    fn from_ref(state: &PaygateState) -> Self {
        state.key.clone()
    }
}

/// Decode the configured secret, or fall back to a per-process random key.
fn cookie_key(secret: Option<&str>) -> Result<Key, PaygateError> {
    let Some(secret) = secret else {
        warn!("COOKIE_SECRET not set; sessions will not survive a restart");
        return Ok(Key::generate());
    };
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(secret.trim())
        .map_err(|e| PaygateError::CookieSecret(e.to_string()))?;
    Key::try_from(bytes.as_slice()).map_err(|e| PaygateError::CookieSecret(e.to_string()))
}

pub fn paygate_router(state: PaygateState) -> Router {
    let receipts = ServeDir::new(state.receipts.dir());
    let public = ServeDir::new(&state.public_dir);

    Router::new()
        .route("/", get(pages::login_page))
        .route("/login", get(pages::login_page).post(login::login_submit))
        .route("/home", get(pages::home_page))
        .route("/pay.ejs", get(pages::pay_page))
        .route("/payment", post(payment::submit_payer))
        .route("/payment/{user_id}", get(pages::payer_page))
        .route("/complete-payment", post(payment::complete_payment))
        .nest_service(RECEIPTS_ROUTE, receipts)
        .fallback_service(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
