//! Landing page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::IntoResponse;

use crate::filters;
use crate::middleware::RequireUser;

/// Rotating hero taglines.
const TAGLINES: &[&str] = &[
    "Pedale pela cidade do seu jeito.",
    "A bike certa para cada passeio.",
    "Alugue em minutos, devolva quando quiser.",
];

/// Landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub username: String,
    pub is_admin: bool,
    pub taglines: &'static [&'static str],
}

/// Display the landing page.
pub async fn home(RequireUser(user): RequireUser) -> impl IntoResponse {
    HomeTemplate {
        is_admin: user.is_admin(),
        username: user.username,
        taglines: TAGLINES,
    }
}
