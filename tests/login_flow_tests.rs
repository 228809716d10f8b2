mod common;

use axum::http::{StatusCode, header};
use common::{PASSWORD, USERNAME, body_string, location, session_cookie, spawn_app};

#[tokio::test]
async fn login_with_valid_credentials_sets_cookie_and_redirects_home() {
    let app = spawn_app().await;

    let resp = app
        .post_form("/login", &[("username", USERNAME), ("password", PASSWORD)])
        .await;

    assert!(resp.status().is_redirection());
    assert_eq!(location(&resp), Some("/home"));

    let set_cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("missing set-cookie");
    assert!(set_cookie.starts_with("loggedIn="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(!set_cookie.contains("Max-Age"));
}

#[tokio::test]
async fn login_with_wrong_password_is_rejected_without_cookie() {
    let app = spawn_app().await;

    let resp = app
        .post_form("/login", &[("username", USERNAME), ("password", "nope")])
        .await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(session_cookie(&resp).is_none());
    assert_eq!(body_string(resp).await, "Invalid username or password");
}

#[tokio::test]
async fn login_with_unknown_username_is_rejected_without_cookie() {
    let app = spawn_app().await;

    let resp = app
        .post_form("/login", &[("username", "ghost"), ("password", PASSWORD)])
        .await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(session_cookie(&resp).is_none());
}

#[tokio::test]
async fn protected_pages_redirect_to_login_without_session() {
    let app = spawn_app().await;

    for uri in ["/home", "/pay.ejs"] {
        let resp = app.get(uri, None).await;
        assert!(resp.status().is_redirection(), "{uri} was not redirected");
        assert_eq!(location(&resp), Some("/login"));
    }
}

#[tokio::test]
async fn forged_plain_cookie_is_not_a_session() {
    let app = spawn_app().await;

    let resp = app.get("/home", Some("loggedIn=true")).await;

    assert!(resp.status().is_redirection());
    assert_eq!(location(&resp), Some("/login"));
}

#[tokio::test]
async fn session_cookie_unlocks_protected_pages() {
    let app = spawn_app().await;
    let cookie = app.login().await;

    let resp = app.get("/home", Some(&cookie)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_string(resp).await.contains("You are signed in."));

    let resp = app.get("/pay.ejs", Some(&cookie)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_string(resp).await.contains(r#"action="/payment""#));
}

#[tokio::test]
async fn login_page_is_served_at_root_and_login() {
    let app = spawn_app().await;

    for uri in ["/", "/login"] {
        let resp = app.get(uri, None).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert!(body_string(resp).await.contains(r#"action="/login""#));
    }
}

#[tokio::test]
async fn public_assets_are_served() {
    let app = spawn_app().await;

    let resp = app.get("/styles.css", None).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn seeding_twice_keeps_both_credentials() {
    let app = spawn_app().await;

    paygate::service::credentials::seed_credential(&app.storage, USERNAME, "other-password")
        .await
        .unwrap();

    assert_eq!(app.storage.count_credentials(USERNAME).await.unwrap(), 2);
    // the first credential still decides the login
    let resp = app
        .post_form("/login", &[("username", USERNAME), ("password", PASSWORD)])
        .await;
    assert!(resp.status().is_redirection());
}
