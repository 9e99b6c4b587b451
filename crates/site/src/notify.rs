//! Notification helpers.
//!
//! Pages show one-shot feedback popups fed by `?success=` / `?error=` query
//! parameters. Handlers that finish with a message redirect through these
//! helpers so the message survives the POST-redirect-GET hop.

use axum::response::Redirect;
use serde::Deserialize;

/// Query parameters for error/success display.
#[derive(Debug, Default, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Redirect to `path` carrying a success message.
#[must_use]
pub fn redirect_success(path: &str, message: &str) -> Redirect {
    Redirect::to(&with_param(path, "success", message))
}

/// Redirect to `path` carrying an error message.
#[must_use]
pub fn redirect_error(path: &str, message: &str) -> Redirect {
    Redirect::to(&with_param(path, "error", message))
}

fn with_param(path: &str, key: &str, message: &str) -> String {
    let sep = if path.contains('?') { '&' } else { '?' };
    format!("{path}{sep}{key}={}", urlencoding::encode(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_is_urlencoded() {
        let url = with_param("/bikes", "success", "Aluguel confirmado!");
        assert_eq!(url, "/bikes?success=Aluguel%20confirmado%21");
    }

    #[test]
    fn test_existing_query_appended_with_ampersand() {
        let url = with_param("/admin/consult-sales?view=active", "error", "falhou");
        assert_eq!(url, "/admin/consult-sales?view=active&error=falhou");
    }
}
