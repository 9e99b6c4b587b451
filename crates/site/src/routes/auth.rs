//! Authentication route handlers.
//!
//! Login and logout act on the local roster only. Registration is the one
//! flow that touches both worlds: the renter profile is created on the
//! remote API first, then the local login record is linked to it.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::Local;
use serde::Deserialize;
use tower_sessions::Session;

use wheels_core::{cpf, phone};

use crate::api::NewCustomer;
use crate::error::AppError;
use crate::filters;
use crate::middleware::{OptionalUser, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::notify::MessageQuery;
use crate::services::AuthError;
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Registration form data.
///
/// Mirrors the remote customer profile plus the local credentials. CPF and
/// phone arrive masked from the page inputs; digits are extracted here.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
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

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub error: Option<String>,
}

// =============================================================================
// Login Routes
// =============================================================================

/// Where a logged-in visitor belongs instead of the auth pages.
fn logged_in_destination(user: &CurrentUser) -> &'static str {
    if user.is_admin() { "/admin" } else { "/home" }
}

/// Display the login page.
///
/// Visitors who already hold a session are sent straight to their landing
/// page instead.
pub async fn login_page(
    OptionalUser(user): OptionalUser,
    Query(query): Query<MessageQuery>,
) -> Response {
    if let Some(user) = user {
        return Redirect::to(logged_in_destination(&user)).into_response();
    }
    LoginTemplate {
        error: query.error,
        success: query.success,
    }
    .into_response()
}

/// Handle login form submission.
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    // Argon2 verification is CPU-bound; keep it off the async runtime
    let auth = state.auth().clone();
    let result = tokio::task::spawn_blocking(move || auth.login(&form.username, &form.password))
        .await
        .map_err(|e| AppError::Internal(format!("login task failed: {e}")))?;

    match result {
        Ok(user) => {
            let destination = logged_in_destination(&user);
            set_current_user(&session, &user).await?;
            tracing::info!(username = %user.username, "login");
            Ok(Redirect::to(destination).into_response())
        }
        Err(AuthError::InvalidCredentials) => {
            Ok(crate::notify::redirect_error("/auth/login", "Usuário ou senha inválidos.")
                .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(
    OptionalUser(user): OptionalUser,
    Query(query): Query<MessageQuery>,
) -> Response {
    if let Some(user) = user {
        return Redirect::to(logged_in_destination(&user)).into_response();
    }
    RegisterTemplate { error: query.error }.into_response()
}

/// Handle registration form submission.
///
/// Creates the remote customer profile first, then the local user linked to
/// it. A username collision detected after the customer was already created
/// is reported distinctly so the person knows their profile exists.
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<Response, AppError> {
    if let Err(message) = validate_registration(&form) {
        return Ok(crate::notify::redirect_error("/auth/register", message).into_response());
    }

    let today = Local::now().date_naive().format("%Y-%m-%d").to_string();
    let customer = NewCustomer {
        cpf: cpf::digits(&form.cpf),
        nome_completo: form.nome_completo.trim().to_string(),
        genero: form.genero.clone(),
        data_nascimento: form.data_nascimento.clone(),
        email: form.email.trim().to_string(),
        celular: phone::format(&form.celular),
        cidade: form.cidade.clone(),
        pais: form.pais.clone(),
        primeira_compra: today.clone(),
        ultima_compra: today,
    };

    let created = match state.api().create_customer(&customer).await {
        Ok(created) => created,
        Err(e) => {
            tracing::warn!(error = %e, "customer creation failed during registration");
            return Ok(crate::notify::redirect_error(
                "/auth/register",
                "Não foi possível criar o cadastro de cliente. Tente novamente.",
            )
            .into_response());
        }
    };

    let auth = state.auth().clone();
    let username = form.username.trim().to_string();
    let password = form.password;
    let result = tokio::task::spawn_blocking(move || {
        auth.register(&username, &password, Some(created.id))
    })
    .await
    .map_err(|e| AppError::Internal(format!("register task failed: {e}")))?;

    match result {
        Ok(()) => Ok(crate::notify::redirect_success(
            "/auth/login",
            "Cadastro realizado com sucesso! Faça login para continuar.",
        )
        .into_response()),
        Err(AuthError::UsernameTaken) => Ok(crate::notify::redirect_error(
            "/auth/register",
            "Seu cadastro de cliente foi criado, mas o nome de usuário já está em uso. Escolha outro nome de usuário.",
        )
        .into_response()),
        Err(e) => Err(e.into()),
    }
}

/// Validate the registration form, returning a pt-BR message on failure.
fn validate_registration(form: &RegisterForm) -> Result<(), &'static str> {
    if form.username.trim().is_empty()
        || form.password.is_empty()
        || form.nome_completo.trim().is_empty()
        || form.email.trim().is_empty()
    {
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

// =============================================================================
// Logout Route
// =============================================================================

/// Handle logout.
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session: {}", e);
    }

    // Also destroy the entire session
    if let Err(e) = session.flush().await {
        tracing::error!("Failed to flush session: {}", e);
    }

    Redirect::to("/auth/login").into_response()
}
