//! Register-sales wizard handlers.
//!
//! The wizard state lives in the session; `GET /admin/register-sales`
//! renders whatever step the state machine is on and each POST drives one
//! transition. The rental is created directly at the final step, with no
//! payment page: the admin is charging at the counter.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::{Local, NaiveDateTime};
use serde::Deserialize;
use tower_sessions::Session;

use wheels_core::{CustomerId, cpf, phone};

use crate::api::{Bike, Customer, NewCustomer, NewRental};
use crate::error::AppError;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::models::{SaleWizard, session_keys};
use crate::notify::MessageQuery;
use crate::routes::bikes::DATETIME_LOCAL_FORMAT;
use crate::state::AppState;

const WIZARD_PATH: &str = "/admin/register-sales";

// =============================================================================
// Form Types
// =============================================================================

/// Branch choice form.
#[derive(Debug, Deserialize)]
pub struct ChoiceForm {
    /// `existing` or `new`.
    pub branch: String,
}

/// Existing-customer lookup form.
#[derive(Debug, Deserialize)]
pub struct ExistingCustomerForm {
    pub customer_id: String,
}

/// New-customer form (remote profile fields).
#[derive(Debug, Deserialize)]
pub struct NewCustomerForm {
    pub nome_completo: String,
    pub cpf: String,
    pub celular: String,
    pub email: String,
    #[serde(default)]
    pub genero: String,
    #[serde(default)]
    pub data_nascimento: String,
    #[serde(default)]
    pub cidade: String,
    #[serde(default)]
    pub pais: String,
}

/// Final step form: bike and return date.
#[derive(Debug, Deserialize)]
pub struct BikeSelectionForm {
    pub bike_id: i64,
    pub expected_return: String,
    #[serde(default)]
    pub observations: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Branch choice step.
#[derive(Template, WebTemplate)]
#[template(path = "admin/register_sales/choice.html")]
pub struct ChoiceTemplate {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Existing-customer lookup step.
#[derive(Template, WebTemplate)]
#[template(path = "admin/register_sales/existing_customer.html")]
pub struct ExistingCustomerTemplate {
    pub error: Option<String>,
}

/// New-customer step.
#[derive(Template, WebTemplate)]
#[template(path = "admin/register_sales/new_customer.html")]
pub struct NewCustomerTemplate {
    pub error: Option<String>,
}

/// Bike selection step.
#[derive(Template, WebTemplate)]
#[template(path = "admin/register_sales/bike_selection.html")]
pub struct BikeSelectionTemplate {
    pub customer: Customer,
    pub bikes: Vec<Bike>,
    pub min_return: String,
    pub error: Option<String>,
}

// =============================================================================
// Session Helpers
// =============================================================================

async fn load_wizard(session: &Session) -> Result<SaleWizard, AppError> {
    Ok(session
        .get(session_keys::SALE_WIZARD)
        .await?
        .unwrap_or_default())
}

async fn save_wizard(session: &Session, wizard: SaleWizard) -> Result<(), AppError> {
    session.insert(session_keys::SALE_WIZARD, wizard).await?;
    Ok(())
}

// =============================================================================
// Handlers
// =============================================================================

/// Render the wizard's current step.
pub async fn show(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<MessageQuery>,
) -> Result<Response, AppError> {
    let wizard = load_wizard(&session).await?;

    let page = match wizard {
        SaleWizard::Choice => ChoiceTemplate {
            error: query.error,
            success: query.success,
        }
        .into_response(),
        SaleWizard::ExistingCustomer => ExistingCustomerTemplate { error: query.error }.into_response(),
        SaleWizard::NewCustomer => NewCustomerTemplate { error: query.error }.into_response(),
        SaleWizard::BikeSelection { customer_id } => {
            let customer = state.api().get_customer(customer_id).await?;
            let bikes = state
                .api()
                .list_bikes()
                .await?
                .into_iter()
                .filter(|b| b.disponivel)
                .collect();
            BikeSelectionTemplate {
                customer,
                bikes,
                min_return: Local::now()
                    .naive_local()
                    .format(DATETIME_LOCAL_FORMAT)
                    .to_string(),
                error: query.error,
            }
            .into_response()
        }
    };

    Ok(page)
}

/// Pick the customer branch.
pub async fn choice(
    RequireAdmin(_admin): RequireAdmin,
    session: Session,
    Form(form): Form<ChoiceForm>,
) -> Result<Response, AppError> {
    let wizard = load_wizard(&session).await?;
    let next = match form.branch.as_str() {
        "existing" => wizard.choose_existing(),
        "new" => wizard.choose_new(),
        _ => {
            return Ok(
                crate::notify::redirect_error(WIZARD_PATH, "Escolha uma das opções.")
                    .into_response(),
            );
        }
    };

    match next {
        Ok(next) => {
            save_wizard(&session, next).await?;
            Ok(Redirect::to(WIZARD_PATH).into_response())
        }
        Err(e) => {
            Ok(crate::notify::redirect_error(WIZARD_PATH, &e.to_string()).into_response())
        }
    }
}

/// Verify an existing customer's ID against the API.
pub async fn existing_customer(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<ExistingCustomerForm>,
) -> Result<Response, AppError> {
    let wizard = load_wizard(&session).await?;

    let Ok(customer_id) = form.customer_id.trim().parse::<CustomerId>() else {
        return Ok(
            crate::notify::redirect_error(WIZARD_PATH, "Informe um código de cliente numérico.")
                .into_response(),
        );
    };

    match state.api().get_customer(customer_id).await {
        Ok(customer) => match wizard.customer_resolved(customer.id) {
            Ok(next) => {
                save_wizard(&session, next).await?;
                Ok(Redirect::to(WIZARD_PATH).into_response())
            }
            Err(e) => {
                Ok(crate::notify::redirect_error(WIZARD_PATH, &e.to_string()).into_response())
            }
        },
        Err(e) if e.is_not_found() => Ok(crate::notify::redirect_error(
            WIZARD_PATH,
            "Cliente não encontrado. Verifique o código informado.",
        )
        .into_response()),
        Err(e) => Err(e.into()),
    }
}

/// Create a new customer and advance to bike selection.
pub async fn new_customer(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<NewCustomerForm>,
) -> Result<Response, AppError> {
    let wizard = load_wizard(&session).await?;

    if let Err(message) = validate_customer(&form) {
        return Ok(crate::notify::redirect_error(WIZARD_PATH, message).into_response());
    }

    let today = Local::now().date_naive().format("%Y-%m-%d").to_string();
    let customer = NewCustomer {
        cpf: cpf::digits(&form.cpf),
        nome_completo: form.nome_completo.trim().to_string(),
        genero: form.genero,
        data_nascimento: form.data_nascimento,
        email: form.email.trim().to_string(),
        celular: phone::format(&form.celular),
        cidade: form.cidade,
        pais: form.pais,
        primeira_compra: today.clone(),
        ultima_compra: today,
    };

    let created = match state.api().create_customer(&customer).await {
        Ok(created) => created,
        Err(e) => {
            tracing::warn!(error = %e, "customer creation failed in sale wizard");
            return Ok(crate::notify::redirect_error(
                WIZARD_PATH,
                "Não foi possível criar o cliente. Tente novamente.",
            )
            .into_response());
        }
    };

    match wizard.customer_resolved(created.id) {
        Ok(next) => {
            save_wizard(&session, next).await?;
            Ok(Redirect::to(WIZARD_PATH).into_response())
        }
        Err(e) => Ok(crate::notify::redirect_error(WIZARD_PATH, &e.to_string()).into_response()),
    }
}

/// Create the rental for the resolved customer and reset the wizard.
pub async fn bike_selection(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<BikeSelectionForm>,
) -> Result<Response, AppError> {
    let wizard = load_wizard(&session).await?;
    let Some(customer_id) = wizard.customer_id() else {
        return Ok(crate::notify::redirect_error(
            WIZARD_PATH,
            "Selecione o cliente antes de escolher a bicicleta.",
        )
        .into_response());
    };

    let Ok(expected_return) =
        NaiveDateTime::parse_from_str(&form.expected_return, DATETIME_LOCAL_FORMAT)
    else {
        return Ok(crate::notify::redirect_error(
            WIZARD_PATH,
            "Informe uma data de devolução válida.",
        )
        .into_response());
    };
    if expected_return <= Local::now().naive_local() {
        return Ok(crate::notify::redirect_error(
            WIZARD_PATH,
            "A devolução deve ser em uma data futura.",
        )
        .into_response());
    }

    let rental = NewRental {
        customer_id,
        bike_id: form.bike_id.into(),
        expected_return: expected_return.format("%Y-%m-%dT%H:%M:00").to_string(),
        observations: form
            .observations
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty()),
    };

    if let Err(e) = state.api().create_rental(&rental).await {
        tracing::warn!(error = %e, "rental creation failed in sale wizard");
        return Ok(crate::notify::redirect_error(
            WIZARD_PATH,
            "Não foi possível registrar o aluguel. Tente novamente.",
        )
        .into_response());
    }

    save_wizard(&session, SaleWizard::Choice).await?;
    Ok(
        crate::notify::redirect_success(WIZARD_PATH, "Aluguel registrado com sucesso!")
            .into_response(),
    )
}

/// Reset the wizard back to the first step.
pub async fn restart(
    RequireAdmin(_admin): RequireAdmin,
    session: Session,
) -> Result<Response, AppError> {
    save_wizard(&session, SaleWizard::Choice).await?;
    Ok(Redirect::to(WIZARD_PATH).into_response())
}

/// Validate the new-customer form, returning a pt-BR message on failure.
fn validate_customer(form: &NewCustomerForm) -> Result<(), &'static str> {
    if form.nome_completo.trim().is_empty() || form.email.trim().is_empty() {
        return Err("Preencha todos os campos obrigatórios.");
    }
    if cpf::validate(&form.cpf).is_err() {
        return Err("CPF inválido. Verifique os dígitos informados.");
    }
    if phone::validate(&form.celular).is_err() {
        return Err("Celular inválido. Informe DDD e número.");
    }
    Ok(())
}
