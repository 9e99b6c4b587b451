//! Session login/logout round trips through the HTTP surface.

use axum::http::StatusCode;

use wheels_integration_tests::{
    ADMIN_PASSWORD, ADMIN_USERNAME, TestApp, location, session_cookie,
};

#[tokio::test]
async fn login_page_renders() {
    let app = TestApp::new();
    let response = app.get("/auth/login", None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn admin_login_redirects_to_console() {
    let app = TestApp::new();
    let body = format!("username={ADMIN_USERNAME}&password={ADMIN_PASSWORD}");
    let response = app.post_form("/auth/login", &body, None).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/admin"));
    assert!(session_cookie(&response).is_some());
}

#[tokio::test]
async fn user_login_redirects_to_home() {
    let app = TestApp::new();
    app.seed_user("maria", "senha-forte-123", None);

    let response = app
        .post_form("/auth/login", "username=maria&password=senha-forte-123", None)
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/home"));
}

#[tokio::test]
async fn bad_credentials_bounce_back_with_error() {
    let app = TestApp::new();
    let response = app
        .post_form("/auth/login", "username=maria&password=errada", None)
        .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let target = location(&response).unwrap_or_default();
    assert!(target.starts_with("/auth/login?error="), "got {target}");
}

#[tokio::test]
async fn logout_invalidates_the_session() {
    let app = TestApp::new();
    let cookie = app.login(ADMIN_USERNAME, ADMIN_PASSWORD).await;

    // Session works before logout
    assert_eq!(
        app.get("/admin", Some(&cookie)).await.status(),
        StatusCode::OK
    );

    let response = app.post_form("/auth/logout", "", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/auth/login"));

    // Same cookie no longer grants access
    let response = app.get("/admin", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/auth/login"));
}
