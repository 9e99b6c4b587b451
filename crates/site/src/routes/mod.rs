//! HTTP route handlers for the site.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Redirect to login
//! GET  /health                 - Health check
//! GET  /home                   - Landing page (user)
//!
//! # Auth
//! GET  /auth/login             - Login page
//! POST /auth/login             - Login action
//! GET  /auth/register          - Register page
//! POST /auth/register          - Register action (creates remote customer)
//! POST /auth/logout            - Logout action
//!
//! # Bikes (requires user)
//! GET  /bikes                  - Bike grid with ?q= search
//! GET  /bikes/{id}/rent        - Rental form
//! POST /bikes/{id}/rent        - Stash pending rental, go to payment
//!
//! # Payment (requires user)
//! GET  /payment                - Payment summary (rental or late fee)
//! POST /payment                - Confirm payment, execute API call
//! GET  /payment/contract       - Rental contract PDF download
//!
//! # Admin console (requires admin)
//! GET  /admin                  - Dashboard
//! GET  /admin/register-sales   - Sale wizard (renders current step)
//! POST /admin/register-sales/choice            - Pick customer branch
//! POST /admin/register-sales/existing-customer - Verify customer ID
//! POST /admin/register-sales/new-customer      - Create customer
//! POST /admin/register-sales/bike-selection    - Create the rental
//! POST /admin/register-sales/restart           - Reset the wizard
//! GET  /admin/consult-sales    - Active rentals / sales history tables
//! GET  /admin/manage-bikes     - Inventory, add-bike form, returns
//! POST /admin/manage-bikes/add     - Register a bike
//! POST /admin/manage-bikes/return  - Finalize a rental (late fee aware)
//! ```

pub mod admin;
pub mod auth;
pub mod bikes;
pub mod home;
pub mod payment;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    http::StatusCode,
    response::{IntoResponse, Redirect},
    routing::{get, post},
};

use crate::filters;
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the bike routes router.
pub fn bike_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(bikes::index))
        .route("/{id}/rent", get(bikes::rent_form).post(bikes::rent))
}

/// Create the payment routes router.
pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(payment::show).post(payment::confirm))
        .route("/contract", get(payment::contract))
}

/// Not-found page template.
#[derive(Template, WebTemplate)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate;

/// Fallback handler for unknown paths.
async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, NotFoundTemplate)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Create all routes for the site.
pub fn routes() -> Router<AppState> {
    Router::new()
        // The storefront has no anonymous landing page
        .route("/", get(|| async { Redirect::to("/auth/login") }))
        .route("/health", get(health))
        .route("/home", get(home::home))
        .nest("/auth", auth_routes())
        .nest("/bikes", bike_routes())
        .nest("/payment", payment_routes())
        .nest("/admin", admin::routes())
        .fallback(not_found)
}
