//! Admin dashboard handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;

use crate::filters;
use crate::middleware::RequireAdmin;

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/dashboard.html")]
pub struct DashboardTemplate {
    pub username: String,
}

/// Display the admin dashboard.
pub async fn dashboard(RequireAdmin(user): RequireAdmin) -> impl IntoResponse {
    DashboardTemplate {
        username: user.username,
    }
}
