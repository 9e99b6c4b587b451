//! Sales consultation handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::api::{Rental, Sale};
use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Which table to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SalesView {
    /// Active (not yet returned) rentals.
    #[default]
    Active,
    /// Completed sales.
    History,
}

impl SalesView {
    /// Whether the history tab is selected.
    #[must_use]
    pub const fn is_history(self) -> bool {
        matches!(self, Self::History)
    }
}

/// Query parameters for the consultation page.
#[derive(Debug, Default, Deserialize)]
pub struct ConsultQuery {
    #[serde(default)]
    pub view: SalesView,
}

/// Consultation page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/consult_sales.html")]
pub struct ConsultSalesTemplate {
    pub view: SalesView,
    pub rentals: Vec<Rental>,
    pub sales: Vec<Sale>,
}

/// Display active rentals or the sales history.
pub async fn show(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<ConsultQuery>,
) -> Result<Response, AppError> {
    let template = match query.view {
        SalesView::Active => ConsultSalesTemplate {
            view: query.view,
            rentals: state.api().list_current_rentals().await?,
            sales: Vec::new(),
        },
        SalesView::History => ConsultSalesTemplate {
            view: query.view,
            rentals: Vec::new(),
            sales: state.api().list_sales().await?,
        },
    };

    Ok(template.into_response())
}
