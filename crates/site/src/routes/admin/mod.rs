//! Admin console route handlers.
//!
//! Every handler takes the `RequireAdmin` extractor; anonymous visitors are
//! sent to login and ordinary users back to the storefront.

pub mod consult_sales;
pub mod dashboard;
pub mod manage_bikes;
pub mod register_sales;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the admin console router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::dashboard))
        .route("/register-sales", get(register_sales::show))
        .route("/register-sales/choice", post(register_sales::choice))
        .route(
            "/register-sales/existing-customer",
            post(register_sales::existing_customer),
        )
        .route(
            "/register-sales/new-customer",
            post(register_sales::new_customer),
        )
        .route(
            "/register-sales/bike-selection",
            post(register_sales::bike_selection),
        )
        .route("/register-sales/restart", post(register_sales::restart))
        .route("/consult-sales", get(consult_sales::show))
        .route("/manage-bikes", get(manage_bikes::show))
        .route("/manage-bikes/add", post(manage_bikes::add_bike))
        .route("/manage-bikes/return", post(manage_bikes::return_rental))
}
