//! Route guarding: anonymous and non-admin requests never reach gated pages.

use axum::http::StatusCode;

use wheels_integration_tests::{ADMIN_PASSWORD, ADMIN_USERNAME, TestApp, location};

#[tokio::test]
async fn root_redirects_to_login() {
    let app = TestApp::new();
    let response = app.get("/", None).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/auth/login"));
}

#[tokio::test]
async fn health_is_public() {
    let app = TestApp::new();
    let response = app.get("/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn user_pages_require_login() {
    let app = TestApp::new();
    for path in ["/home", "/bikes", "/payment"] {
        let response = app.get(path, None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "path {path}");
        assert_eq!(location(&response), Some("/auth/login"), "path {path}");
    }
}

#[tokio::test]
async fn admin_pages_require_login() {
    let app = TestApp::new();
    for path in [
        "/admin",
        "/admin/register-sales",
        "/admin/consult-sales",
        "/admin/manage-bikes",
    ] {
        let response = app.get(path, None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "path {path}");
        assert_eq!(location(&response), Some("/auth/login"), "path {path}");
    }
}

#[tokio::test]
async fn admin_pages_reject_ordinary_users() {
    let app = TestApp::new();
    app.seed_user("maria", "senha-forte-123", None);
    let cookie = app.login("maria", "senha-forte-123").await;

    let response = app.get("/admin", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/home"));
}

#[tokio::test]
async fn admin_reaches_dashboard() {
    let app = TestApp::new();
    let cookie = app.login(ADMIN_USERNAME, ADMIN_PASSWORD).await;

    let response = app.get("/admin", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn logged_in_user_reaches_home() {
    let app = TestApp::new();
    app.seed_user("maria", "senha-forte-123", None);
    let cookie = app.login("maria", "senha-forte-123").await;

    let response = app.get("/home", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn auth_pages_redirect_logged_in_users() {
    let app = TestApp::new();
    app.seed_user("maria", "senha-forte-123", None);
    let cookie = app.login("maria", "senha-forte-123").await;

    for path in ["/auth/login", "/auth/register"] {
        let response = app.get(path, Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "path {path}");
        assert_eq!(location(&response), Some("/home"), "path {path}");
    }
}

#[tokio::test]
async fn auth_pages_redirect_logged_in_admin_to_console() {
    let app = TestApp::new();
    let cookie = app.login(ADMIN_USERNAME, ADMIN_PASSWORD).await;

    let response = app.get("/auth/login", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/admin"));
}

#[tokio::test]
async fn auth_pages_render_for_anonymous_visitors() {
    let app = TestApp::new();
    for path in ["/auth/login", "/auth/register"] {
        let response = app.get(path, None).await;
        assert_eq!(response.status(), StatusCode::OK, "path {path}");
    }
}

#[tokio::test]
async fn unknown_path_is_404() {
    let app = TestApp::new();
    let response = app.get("/nao-existe", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
