//! Session-facing domain types.

pub mod payment;
pub mod user;
pub mod wizard;

pub use payment::{PAYMENT_METHODS, PendingPayment};
pub use user::CurrentUser;
pub use wizard::{SaleWizard, WizardError};

/// Session storage keys.
pub mod session_keys {
    /// The logged-in user record.
    pub const CURRENT_USER: &str = "current_user";
    /// Payment payload carried between the rent/return flows and `/payment`.
    pub const PENDING_PAYMENT: &str = "pending_payment";
    /// Admin register-sales wizard state.
    pub const SALE_WIZARD: &str = "sale_wizard";
}
