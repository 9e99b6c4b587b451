//! Integration test support for Wheels.
//!
//! Builds the full site router against an in-memory roster store so tests
//! can exercise routing, guards, and session flows without a network or a
//! filesystem. The remote API client points at an unroutable address; tests
//! that would hit it stop at the guard or validation layer instead.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use secrecy::SecretString;
use tower::ServiceExt;
use tower_http::trace::TraceLayer;

use wheels_core::CustomerId;
use wheels_site::api::WheelsClient;
use wheels_site::config::{AdminSeedConfig, SiteConfig};
use wheels_site::middleware::create_session_layer;
use wheels_site::routes;
use wheels_site::services::{AuthService, KeyValueStore, MemoryStore};
use wheels_site::state::AppState;

/// Seeded admin credentials for tests.
pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "aB3$xY9!mK2@nL5#";

/// A site instance wired for in-process requests.
pub struct TestApp {
    router: Router,
    auth: AuthService,
}

impl TestApp {
    /// Build the app with an empty in-memory roster (plus the admin seed).
    #[must_use]
    pub fn new() -> Self {
        let config = test_config();
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let auth = AuthService::new(store, ADMIN_USERNAME, ADMIN_PASSWORD).unwrap();
        let api = WheelsClient::new(&config.api_base_url);

        let session_layer = create_session_layer(&config);
        let state = AppState::new(config, api, auth.clone());

        // Same layering as the binary, minus the Sentry layers
        let router = Router::new()
            .merge(routes::routes())
            .layer(TraceLayer::new_for_http())
            .layer(session_layer)
            .with_state(state);

        Self { router, auth }
    }

    /// Register a user straight into the roster, bypassing the HTTP flow
    /// (which would need the remote API).
    pub fn seed_user(&self, username: &str, password: &str, customer_id: Option<CustomerId>) {
        self.auth.register(username, password, customer_id).unwrap();
    }

    /// Perform a GET request, optionally with a session cookie.
    pub async fn get(&self, path: &str, cookie: Option<&str>) -> Response<Body> {
        let mut request = Request::builder().uri(path).method("GET");
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        self.router
            .clone()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    /// Perform a form POST request, optionally with a session cookie.
    pub async fn post_form(&self, path: &str, body: &str, cookie: Option<&str>) -> Response<Body> {
        let mut request = Request::builder()
            .uri(path)
            .method("POST")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        self.router
            .clone()
            .oneshot(request.body(Body::from(body.to_string())).unwrap())
            .await
            .unwrap()
    }

    /// Log in via the HTTP flow and return the session cookie.
    pub async fn login(&self, username: &str, password: &str) -> String {
        let body = format!("username={username}&password={password}");
        let response = self.post_form("/auth/login", &body, None).await;
        session_cookie(&response).expect("login should set a session cookie")
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Extract the session cookie (name=value) from a response, if set.
#[must_use]
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    let raw = response.headers().get(header::SET_COOKIE)?.to_str().ok()?;
    Some(raw.split(';').next().unwrap_or(raw).to_string())
}

/// The `Location` header of a redirect response.
#[must_use]
pub fn location(response: &Response<Body>) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

fn test_config() -> SiteConfig {
    SiteConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 0,
        base_url: "http://localhost".to_string(),
        // Unroutable on purpose; guard/session tests never reach the API
        api_base_url: "http://127.0.0.1:1".to_string(),
        data_dir: PathBuf::from("./test-data"),
        admin: AdminSeedConfig {
            username: ADMIN_USERNAME.to_string(),
            password: SecretString::from(ADMIN_PASSWORD),
        },
        sentry_dsn: None,
        sentry_environment: None,
    }
}
