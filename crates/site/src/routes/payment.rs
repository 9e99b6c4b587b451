//! Payment page handlers.
//!
//! One page, two variants, both driven by the `PendingPayment` session
//! payload: confirming a new rental (total projected from the pricing rules)
//! or settling a late fee computed by the return flow. Payment itself is
//! simulated; "confirming" executes the corresponding API call.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Redirect, Response},
};
use chrono::{Local, NaiveDateTime};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;

use wheels_core::{CustomerId, cpf, phone, pricing};

use crate::api::{Bike, Customer, NewRental};
use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireUser;
use crate::models::{CurrentUser, PAYMENT_METHODS, PendingPayment, session_keys};
use crate::notify::MessageQuery;
use crate::services::ContractData;
use crate::state::AppState;

/// Payment confirmation form data.
#[derive(Debug, Deserialize)]
pub struct PaymentForm {
    pub payment_method: String,
}

/// Payment page template.
#[derive(Template, WebTemplate)]
#[template(path = "payment/show.html")]
pub struct PaymentTemplate {
    pub is_late_fee: bool,
    pub bike: Bike,
    pub customer_name: String,
    pub customer_cpf: String,
    pub customer_email: String,
    /// Pre-formatted `dd/mm/aaaa hh:mm`; absent for late fees.
    pub expected_return_br: Option<String>,
    pub hours: i64,
    pub total: Decimal,
    pub observations: Option<String>,
    pub methods: &'static [&'static str],
    pub cancel_target: &'static str,
    pub error: Option<String>,
}

/// Read the pending payment from the session, if any.
async fn pending_payment(session: &Session) -> Result<Option<PendingPayment>, AppError> {
    Ok(session.get(session_keys::PENDING_PAYMENT).await?)
}

/// Resolve which customer the payload charges.
fn payload_customer(payload: &PendingPayment, user: &CurrentUser) -> Option<CustomerId> {
    payload.customer_override().or(user.customer_id)
}

/// Display the payment summary.
pub async fn show(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<MessageQuery>,
) -> Result<Response, AppError> {
    let Some(payload) = pending_payment(&session).await? else {
        return Ok(Redirect::to("/bikes").into_response());
    };

    let Some(customer_id) = payload_customer(&payload, &user) else {
        return Ok(crate::notify::redirect_error(
            "/bikes",
            "Seu login não está vinculado a um cadastro de cliente.",
        )
        .into_response());
    };
    let customer = state.api().get_customer(customer_id).await?;

    let cancel_target = payload.cancel_target();
    let template = match payload {
        PendingPayment::NewRental {
            bike,
            expected_return,
            observations,
        } => {
            let now = Local::now().naive_local();
            PaymentTemplate {
                is_late_fee: false,
                total: pricing::rental_total(bike.valor_hora, now, expected_return),
                hours: pricing::billable_hours(now, expected_return),
                customer_name: customer.nome_completo.clone(),
                customer_cpf: cpf::format(&customer.cpf),
                customer_email: customer.email().to_string(),
                expected_return_br: Some(filters::format_datetime_br(expected_return)),
                observations,
                bike,
                methods: PAYMENT_METHODS,
                cancel_target,
                error: query.error,
            }
        }
        PendingPayment::LateFee { bike, fee, .. } => PaymentTemplate {
            is_late_fee: true,
            total: fee,
            hours: 0,
            customer_name: customer.nome_completo.clone(),
            customer_cpf: cpf::format(&customer.cpf),
            customer_email: customer.email().to_string(),
            expected_return_br: None,
            observations: None,
            bike,
            methods: PAYMENT_METHODS,
            cancel_target,
            error: query.error,
        },
    };

    Ok(template.into_response())
}

/// Confirm the payment and execute the underlying API call.
pub async fn confirm(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<PaymentForm>,
) -> Result<Response, AppError> {
    let Some(payload) = pending_payment(&session).await? else {
        return Ok(Redirect::to("/bikes").into_response());
    };

    if !PAYMENT_METHODS.contains(&form.payment_method.as_str()) {
        return Ok(
            crate::notify::redirect_error("/payment", "Selecione uma forma de pagamento.")
                .into_response(),
        );
    }

    match payload {
        PendingPayment::NewRental {
            bike,
            expected_return,
            observations,
        } => {
            let Some(customer_id) = user.customer_id else {
                return Ok(crate::notify::redirect_error(
                    "/bikes",
                    "Seu login não está vinculado a um cadastro de cliente.",
                )
                .into_response());
            };

            let rental = NewRental {
                customer_id,
                bike_id: bike.id,
                expected_return: expected_return.format("%Y-%m-%dT%H:%M:00").to_string(),
                observations,
            };
            if let Err(e) = state.api().create_rental(&rental).await {
                tracing::warn!(error = %e, "rental creation failed at payment confirmation");
                return Ok(crate::notify::redirect_error(
                    "/payment",
                    "Não foi possível confirmar o aluguel. Tente novamente.",
                )
                .into_response());
            }

            session.remove::<PendingPayment>(session_keys::PENDING_PAYMENT).await?;
            Ok(crate::notify::redirect_success(
                "/bikes",
                &format!(
                    "Aluguel confirmado! Pagamento via {} aprovado.",
                    form.payment_method
                ),
            )
            .into_response())
        }
        PendingPayment::LateFee { rental_id, .. } => {
            let message = match state.api().return_rental(rental_id).await {
                Ok(message) => message,
                Err(e) => {
                    tracing::warn!(error = %e, "rental return failed at payment confirmation");
                    return Ok(crate::notify::redirect_error(
                        "/payment",
                        "Não foi possível finalizar a devolução. Tente novamente.",
                    )
                    .into_response());
                }
            };

            session.remove::<PendingPayment>(session_keys::PENDING_PAYMENT).await?;
            Ok(crate::notify::redirect_success("/admin/manage-bikes", &message).into_response())
        }
    }
}

/// Download the rental contract PDF for the pending rental.
pub async fn contract(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    session: Session,
) -> Result<Response, AppError> {
    let Some(PendingPayment::NewRental {
        bike,
        expected_return,
        observations,
    }) = pending_payment(&session).await?
    else {
        return Ok(Redirect::to("/bikes").into_response());
    };

    let Some(customer_id) = user.customer_id else {
        return Ok(crate::notify::redirect_error(
            "/bikes",
            "Seu login não está vinculado a um cadastro de cliente.",
        )
        .into_response());
    };
    let customer = state.api().get_customer(customer_id).await?;

    let now = Local::now().naive_local();
    let data = contract_data(&customer, bike, now, expected_return, observations);
    let filename = data.filename();
    let bytes = data.render()?;

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ),
    ];
    Ok((headers, bytes).into_response())
}

/// Assemble the contract input from the customer record and payload.
fn contract_data(
    customer: &Customer,
    bike: Bike,
    rental_start: NaiveDateTime,
    expected_return: NaiveDateTime,
    observations: Option<String>,
) -> ContractData {
    ContractData {
        customer_name: customer.nome_completo.clone(),
        cpf: cpf::format(&customer.cpf),
        celular: phone::format(customer.celular.as_deref().unwrap_or_default()),
        email: customer.email().to_string(),
        total: pricing::rental_total(bike.valor_hora, rental_start, expected_return),
        bike,
        rental_start,
        expected_return,
        observations,
    }
}
