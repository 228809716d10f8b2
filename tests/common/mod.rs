#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, header},
};
use paygate::{config::Config, db::Storage};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tower::ServiceExt;

pub const USERNAME: &str = "cashier@example.com";
pub const PASSWORD: &str = "24U202";

pub struct TestApp {
    pub app: Router,
    pub storage: Storage,
    pub receipts_dir: PathBuf,
    _tmp: TempDir,
}

/// Router backed by a fresh SQLite file and receipts directory, with one seeded login.
pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_, _| {}).await
}

/// Like [`spawn_app`], letting the test adjust the config. The closure also gets
/// the temp dir, which outlives the returned app.
pub async fn spawn_app_with(configure: impl FnOnce(&mut Config, &Path)) -> TestApp {
    let tmp = tempfile::tempdir().expect("failed to create temp dir");
    let database_url = format!("sqlite:{}", tmp.path().join("paygate.sqlite").display());
    let storage = Storage::connect(&database_url)
        .await
        .expect("failed to open storage");
    paygate::service::credentials::seed_credential(&storage, USERNAME, PASSWORD)
        .await
        .expect("failed to seed credential");

    let mut cfg = Config {
        connection_url: database_url,
        receipts_dir: tmp.path().join("receipts"),
        public_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("public"),
        ..Config::default()
    };
    configure(&mut cfg, tmp.path());
    let receipts_dir = cfg.receipts_dir.clone();
    let state = paygate::PaygateState::new(storage.clone(), &cfg).expect("failed to build state");

    TestApp {
        app: paygate::paygate_router(state),
        storage,
        receipts_dir,
        _tmp: tmp,
    }
}

impl TestApp {
    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut req = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            req = req.header(header::COOKIE, cookie);
        }
        self.app
            .clone()
            .oneshot(req.body(Body::empty()).expect("failed to build request"))
            .await
            .expect("request failed")
    }

    pub async fn post_form(&self, uri: &str, fields: &[(&str, &str)]) -> Response<Body> {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        self.app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(body))
                    .expect("failed to build request"),
            )
            .await
            .expect("request failed")
    }

    /// Log in with the seeded account and return the `Cookie` header value to replay.
    pub async fn login(&self) -> String {
        let resp = self
            .post_form("/login", &[("username", USERNAME), ("password", PASSWORD)])
            .await;
        session_cookie(&resp).expect("login did not set a session cookie")
    }
}

pub fn session_cookie(resp: &Response<Body>) -> Option<String> {
    resp.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("loggedIn="))
        .map(|v| v.split(';').next().unwrap_or_default().to_string())
}

pub fn location(resp: &Response<Body>) -> Option<&str> {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

pub async fn body_string(resp: Response<Body>) -> String {
    let body = to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    String::from_utf8(body.to_vec()).expect("response body was not utf-8")
}
