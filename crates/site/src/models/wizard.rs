//! Admin register-sales wizard state machine.
//!
//! The wizard walks an admin through registering a rental at the counter:
//!
//! ```text
//! Choice ──existing──> ExistingCustomer ──verified──┐
//!   │                                               ├──> BikeSelection
//!   └────new─────────> NewCustomer ────created──────┘
//! ```
//!
//! Each state is a self-contained sub-view; `BikeSelection` carries the only
//! piece of data later steps need, the resolved customer ID. Transitions not
//! in the table are rejected, which keeps a stale form post (or a replayed
//! URL) from skipping the customer step.

use serde::{Deserialize, Serialize};

use wheels_core::CustomerId;

/// Errors from illegal wizard transitions.
#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
pub enum WizardError {
    /// The requested step does not follow from the current state.
    #[error("essa etapa não está disponível agora; recomece o cadastro")]
    InvalidTransition,
}

/// Current wizard step, stored in the admin's session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum SaleWizard {
    /// Entry step: pick existing or new customer.
    #[default]
    Choice,
    /// Capture an existing customer's ID.
    ExistingCustomer,
    /// Capture a brand new customer's details.
    NewCustomer,
    /// Customer resolved; pick a bike and a return date.
    BikeSelection { customer_id: CustomerId },
}

impl SaleWizard {
    /// From `Choice`, take the existing-customer branch.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::InvalidTransition`] from any other state.
    pub fn choose_existing(self) -> Result<Self, WizardError> {
        match self {
            Self::Choice => Ok(Self::ExistingCustomer),
            _ => Err(WizardError::InvalidTransition),
        }
    }

    /// From `Choice`, take the new-customer branch.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::InvalidTransition`] from any other state.
    pub fn choose_new(self) -> Result<Self, WizardError> {
        match self {
            Self::Choice => Ok(Self::NewCustomer),
            _ => Err(WizardError::InvalidTransition),
        }
    }

    /// Advance to bike selection once a customer is resolved, from either
    /// customer branch.
    ///
    /// # Errors
    ///
    /// Returns [`WizardError::InvalidTransition`] from `Choice` or from an
    /// already-completed `BikeSelection`.
    pub fn customer_resolved(self, customer_id: CustomerId) -> Result<Self, WizardError> {
        match self {
            Self::ExistingCustomer | Self::NewCustomer => {
                Ok(Self::BikeSelection { customer_id })
            }
            _ => Err(WizardError::InvalidTransition),
        }
    }

    /// The customer ID, once resolved.
    #[must_use]
    pub const fn customer_id(&self) -> Option<CustomerId> {
        match self {
            Self::BikeSelection { customer_id } => Some(*customer_id),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_existing() {
        let wizard = SaleWizard::default();
        let wizard = wizard.choose_existing().unwrap();
        assert_eq!(wizard, SaleWizard::ExistingCustomer);

        let wizard = wizard.customer_resolved(CustomerId::new(5)).unwrap();
        assert_eq!(wizard.customer_id(), Some(CustomerId::new(5)));
    }

    #[test]
    fn test_happy_path_new() {
        let wizard = SaleWizard::Choice.choose_new().unwrap();
        assert_eq!(wizard, SaleWizard::NewCustomer);
        let wizard = wizard.customer_resolved(CustomerId::new(9)).unwrap();
        assert!(matches!(wizard, SaleWizard::BikeSelection { .. }));
    }

    #[test]
    fn test_cannot_skip_customer_step() {
        let err = SaleWizard::Choice
            .customer_resolved(CustomerId::new(1))
            .unwrap_err();
        assert_eq!(err, WizardError::InvalidTransition);
    }

    #[test]
    fn test_cannot_branch_twice() {
        let wizard = SaleWizard::Choice.choose_existing().unwrap();
        assert!(wizard.choose_existing().is_err());
        assert!(wizard.choose_new().is_err());
    }

    #[test]
    fn test_completed_wizard_rejects_further_customer_posts() {
        let wizard = SaleWizard::Choice
            .choose_new()
            .unwrap()
            .customer_resolved(CustomerId::new(2))
            .unwrap();
        assert!(wizard.customer_resolved(CustomerId::new(3)).is_err());
    }

    #[test]
    fn test_session_serde_roundtrip() {
        let wizard = SaleWizard::BikeSelection {
            customer_id: CustomerId::new(7),
        };
        let json = serde_json::to_string(&wizard).unwrap();
        let back: SaleWizard = serde_json::from_str(&json).unwrap();
        assert_eq!(back, wizard);
    }
}
