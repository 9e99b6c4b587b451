//! Bike inventory management handlers.
//!
//! One page: the inventory table, the add-bike form, and the active-rentals
//! return flow. Returning an overdue rental computes the late fee from the
//! bike's rate and hands off to the payment page; an on-time return hits the
//! API directly.

use std::str::FromStr;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::Local;
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;

use wheels_core::{RentalId, pricing};

use crate::api::{Bike, NewBike, Rental};
use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::models::{PendingPayment, session_keys};
use crate::notify::MessageQuery;
use crate::state::AppState;

const MANAGE_PATH: &str = "/admin/manage-bikes";

/// Add-bike form data. Money fields arrive as decimal strings.
#[derive(Debug, Deserialize)]
pub struct AddBikeForm {
    pub modelo: String,
    #[serde(default)]
    pub descricao: String,
    /// Checkbox: present when checked.
    #[serde(default)]
    pub infantil: Option<String>,
    pub valor_hora: String,
    pub taxa_atraso: String,
    pub taxa_dano: String,
}

/// Return form data.
#[derive(Debug, Deserialize)]
pub struct ReturnForm {
    pub rental_id: RentalId,
}

/// Inventory page template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/manage_bikes.html")]
pub struct ManageBikesTemplate {
    pub bikes: Vec<Bike>,
    pub rentals: Vec<Rental>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Display the inventory page.
pub async fn show(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
) -> Result<Response, AppError> {
    let bikes = state.api().list_bikes().await?;
    let rentals = state.api().list_current_rentals().await?;

    Ok(ManageBikesTemplate {
        bikes,
        rentals,
        error: query.error,
        success: query.success,
    }
    .into_response())
}

/// Register a new bike in the inventory.
pub async fn add_bike(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Form(form): Form<AddBikeForm>,
) -> Result<Response, AppError> {
    if form.modelo.trim().is_empty() {
        return Ok(
            crate::notify::redirect_error(MANAGE_PATH, "Informe o modelo da bicicleta.")
                .into_response(),
        );
    }

    let Ok(bike) = parse_bike(&form) else {
        return Ok(crate::notify::redirect_error(
            MANAGE_PATH,
            "Valores monetários inválidos. Use números com até duas casas decimais.",
        )
        .into_response());
    };

    if let Err(e) = state.api().create_bike(&bike).await {
        tracing::warn!(error = %e, "bike creation failed");
        return Ok(crate::notify::redirect_error(
            MANAGE_PATH,
            "Não foi possível cadastrar a bicicleta. Tente novamente.",
        )
        .into_response());
    }

    Ok(
        crate::notify::redirect_success(MANAGE_PATH, "Bicicleta cadastrada com sucesso!")
            .into_response(),
    )
}

/// Finalize a rental. Overdue rentals detour through the payment page to
/// settle the late fee first.
pub async fn return_rental(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ReturnForm>,
) -> Result<Response, AppError> {
    let rental = state
        .api()
        .list_current_rentals()
        .await?
        .into_iter()
        .find(|r| r.id == form.rental_id)
        .ok_or_else(|| AppError::NotFound(format!("rental {}", form.rental_id)))?;

    let (Some(bike), Some(customer)) = (rental.bike, rental.customer) else {
        return Err(AppError::Internal(format!(
            "rental {} is missing bike or customer details",
            rental.id
        )));
    };

    let now = Local::now().naive_local();
    if let Some(fee) = pricing::late_fee(bike.taxa_atraso, rental.expected_return, now) {
        session
            .insert(
                session_keys::PENDING_PAYMENT,
                PendingPayment::LateFee {
                    rental_id: rental.id,
                    bike,
                    customer_id: customer.id,
                    fee,
                },
            )
            .await?;
        return Ok(Redirect::to("/payment").into_response());
    }

    let message = match state.api().return_rental(rental.id).await {
        Ok(message) => message,
        Err(e) => {
            tracing::warn!(error = %e, "rental return failed");
            return Ok(crate::notify::redirect_error(
                MANAGE_PATH,
                "Não foi possível finalizar a devolução. Tente novamente.",
            )
            .into_response());
        }
    };

    Ok(crate::notify::redirect_success(MANAGE_PATH, &message).into_response())
}

/// Parse the form's money fields into the wire payload.
fn parse_bike(form: &AddBikeForm) -> Result<NewBike, rust_decimal::Error> {
    Ok(NewBike {
        modelo: form.modelo.trim().to_string(),
        descricao: form.descricao.trim().to_string(),
        infantil: form.infantil.is_some(),
        disponivel: true,
        valor_hora: Decimal::from_str(form.valor_hora.trim())?,
        taxa_atraso: Decimal::from_str(form.taxa_atraso.trim())?,
        taxa_dano: Decimal::from_str(form.taxa_dano.trim())?,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(valor_hora: &str) -> AddBikeForm {
        AddBikeForm {
            modelo: "Caloi Elite".to_string(),
            descricao: "Aro 29".to_string(),
            infantil: None,
            valor_hora: valor_hora.to_string(),
            taxa_atraso: "5.00".to_string(),
            taxa_dano: "150.00".to_string(),
        }
    }

    #[test]
    fn test_parse_bike_new_inventory_is_available() {
        let bike = parse_bike(&form("12.50")).unwrap();
        assert!(bike.disponivel);
        assert!(!bike.infantil);
        assert_eq!(bike.valor_hora, Decimal::from_str("12.50").unwrap());
    }

    #[test]
    fn test_parse_bike_checkbox_marks_child_size() {
        let mut f = form("8");
        f.infantil = Some("on".to_string());
        assert!(parse_bike(&f).unwrap().infantil);
    }

    #[test]
    fn test_parse_bike_rejects_non_numeric_money() {
        assert!(parse_bike(&form("doze reais")).is_err());
    }
}
