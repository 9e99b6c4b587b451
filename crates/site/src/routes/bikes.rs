//! Bike catalog and rental form handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::{Local, NaiveDateTime};
use serde::Deserialize;
use tower_sessions::Session;

use wheels_core::BikeId;

use crate::api::Bike;
use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireUser;
use crate::models::{PendingPayment, session_keys};
use crate::state::AppState;

/// `datetime-local` input format.
pub const DATETIME_LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Query parameters for the bike grid.
#[derive(Debug, Default, Deserialize)]
pub struct BikeListQuery {
    /// Substring search over bike ID and model.
    pub q: Option<String>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Rental form data.
#[derive(Debug, Deserialize)]
pub struct RentForm {
    /// `datetime-local` value (`YYYY-MM-DDTHH:MM`).
    pub expected_return: String,
    #[serde(default)]
    pub observations: Option<String>,
}

/// Bike grid template.
#[derive(Template, WebTemplate)]
#[template(path = "bikes/index.html")]
pub struct BikesTemplate {
    pub bikes: Vec<Bike>,
    pub q: String,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Rental form template.
#[derive(Template, WebTemplate)]
#[template(path = "bikes/rent.html")]
pub struct RentTemplate {
    pub bike: Bike,
    /// Minimum accepted `datetime-local` value (now).
    pub min_return: String,
    pub error: Option<String>,
}

/// Filter bikes by an id/model substring, case-insensitive.
fn filter_bikes(bikes: Vec<Bike>, query: &str) -> Vec<Bike> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return bikes;
    }
    bikes
        .into_iter()
        .filter(|b| {
            b.id.to_string().contains(&needle) || b.modelo.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Display the bike grid.
pub async fn index(
    RequireUser(_user): RequireUser,
    State(state): State<AppState>,
    Query(query): Query<BikeListQuery>,
) -> Result<Response, AppError> {
    let bikes = state.api().list_bikes().await?;
    let q = query.q.unwrap_or_default();

    Ok(BikesTemplate {
        bikes: filter_bikes(bikes, &q),
        q,
        error: query.error,
        success: query.success,
    }
    .into_response())
}

/// Look up one bike in the inventory listing.
async fn find_bike(state: &AppState, id: BikeId) -> Result<Bike, AppError> {
    state
        .api()
        .list_bikes()
        .await?
        .into_iter()
        .find(|b| b.id == id)
        .ok_or_else(|| AppError::NotFound(format!("bike {id}")))
}

/// Display the rental form for one bike.
pub async fn rent_form(
    RequireUser(_user): RequireUser,
    State(state): State<AppState>,
    Path(id): Path<BikeId>,
) -> Result<Response, AppError> {
    let bike = find_bike(&state, id).await?;
    if !bike.disponivel {
        return Ok(crate::notify::redirect_error(
            "/bikes",
            "Essa bicicleta não está disponível no momento.",
        )
        .into_response());
    }

    Ok(RentTemplate {
        bike,
        min_return: Local::now()
            .naive_local()
            .format(DATETIME_LOCAL_FORMAT)
            .to_string(),
        error: None,
    }
    .into_response())
}

/// Handle the rental form: validate the return date and stash the pending
/// rental for the payment page.
pub async fn rent(
    RequireUser(_user): RequireUser,
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<BikeId>,
    Form(form): Form<RentForm>,
) -> Result<Response, AppError> {
    let bike = find_bike(&state, id).await?;
    if !bike.disponivel {
        return Ok(crate::notify::redirect_error(
            "/bikes",
            "Essa bicicleta não está disponível no momento.",
        )
        .into_response());
    }

    let Ok(expected_return) =
        NaiveDateTime::parse_from_str(&form.expected_return, DATETIME_LOCAL_FORMAT)
    else {
        return Ok(rent_error(bike, "Informe uma data de devolução válida."));
    };
    if expected_return <= Local::now().naive_local() {
        return Ok(rent_error(bike, "A devolução deve ser em uma data futura."));
    }

    let observations = form
        .observations
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty());

    session
        .insert(
            session_keys::PENDING_PAYMENT,
            PendingPayment::NewRental {
                bike,
                expected_return,
                observations,
            },
        )
        .await?;

    Ok(Redirect::to("/payment").into_response())
}

/// Re-render the rental form with an inline error.
fn rent_error(bike: Bike, message: &str) -> Response {
    RentTemplate {
        bike,
        min_return: Local::now()
            .naive_local()
            .format(DATETIME_LOCAL_FORMAT)
            .to_string(),
        error: Some(message.to_string()),
    }
    .into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;

    use super::*;

    fn bike(id: i64, modelo: &str) -> Bike {
        Bike {
            id: BikeId::new(id),
            modelo: modelo.to_string(),
            descricao: String::new(),
            infantil: false,
            disponivel: true,
            valor_hora: Decimal::from_str("10").unwrap(),
            taxa_atraso: Decimal::from_str("5").unwrap(),
            taxa_dano: Decimal::from_str("100").unwrap(),
        }
    }

    #[test]
    fn test_filter_matches_model_case_insensitive() {
        let bikes = vec![bike(1, "Caloi Elite"), bike(2, "Monark BMX")];
        let hits = filter_bikes(bikes, "caloi");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, BikeId::new(1));
    }

    #[test]
    fn test_filter_matches_id() {
        let bikes = vec![bike(14, "Caloi"), bike(2, "Monark")];
        let hits = filter_bikes(bikes, "14");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, BikeId::new(14));
    }

    #[test]
    fn test_blank_query_returns_all() {
        let bikes = vec![bike(1, "Caloi"), bike(2, "Monark")];
        assert_eq!(filter_bikes(bikes, "  ").len(), 2);
    }

    #[test]
    fn test_datetime_local_format_parses() {
        let parsed = NaiveDateTime::parse_from_str("2025-03-10T14:30", DATETIME_LOCAL_FORMAT);
        assert!(parsed.is_ok());
    }
}
