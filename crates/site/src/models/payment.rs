//! Payment payloads carried through the session.
//!
//! The SPA original passed these between pages as router navigation state;
//! server-side, the payload lives in the session between the flow that
//! created it (renting a bike, returning an overdue one) and the `/payment`
//! page that settles it.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use wheels_core::{CustomerId, RentalId};

use crate::api::Bike;

/// What the payment page is about to charge for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PendingPayment {
    /// A new rental for the logged-in user's own customer profile.
    NewRental {
        bike: Bike,
        expected_return: NaiveDateTime,
        #[serde(default)]
        observations: Option<String>,
    },
    /// A late fee owed on an overdue return; settling it finalizes the
    /// rental. The customer may differ from the logged-in user (the flow is
    /// driven from the admin console).
    LateFee {
        rental_id: RentalId,
        bike: Bike,
        customer_id: CustomerId,
        fee: Decimal,
    },
}

impl PendingPayment {
    /// The customer whose details the payment page shows.
    ///
    /// For a new rental that is the session user's own profile, so `None`
    /// here means "use the logged-in user's customer ID".
    #[must_use]
    pub const fn customer_override(&self) -> Option<CustomerId> {
        match self {
            Self::NewRental { .. } => None,
            Self::LateFee { customer_id, .. } => Some(*customer_id),
        }
    }

    /// Where the cancel button should lead back to.
    #[must_use]
    pub const fn cancel_target(&self) -> &'static str {
        match self {
            Self::NewRental { .. } => "/bikes",
            Self::LateFee { .. } => "/admin/manage-bikes",
        }
    }
}

/// Accepted payment methods (simulated; nothing is actually charged).
pub const PAYMENT_METHODS: &[&str] = &["Dinheiro", "Cartão de Crédito", "Cartão de Débito", "Pix"];

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use wheels_core::BikeId;

    use super::*;

    fn bike() -> Bike {
        Bike {
            id: BikeId::new(2),
            modelo: "Caloi Elite".to_string(),
            descricao: String::new(),
            infantil: false,
            disponivel: true,
            valor_hora: Decimal::from_str("10.00").unwrap(),
            taxa_atraso: Decimal::from_str("5.00").unwrap(),
            taxa_dano: Decimal::from_str("150.00").unwrap(),
        }
    }

    #[test]
    fn test_session_serde_roundtrip() {
        let pending = PendingPayment::LateFee {
            rental_id: RentalId::new(4),
            bike: bike(),
            customer_id: CustomerId::new(11),
            fee: Decimal::from_str("15.00").unwrap(),
        };
        let json = serde_json::to_string(&pending).unwrap();
        let back: PendingPayment = serde_json::from_str(&json).unwrap();
        assert_eq!(back, pending);
    }

    #[test]
    fn test_customer_override() {
        let late = PendingPayment::LateFee {
            rental_id: RentalId::new(4),
            bike: bike(),
            customer_id: CustomerId::new(11),
            fee: Decimal::ONE,
        };
        assert_eq!(late.customer_override(), Some(CustomerId::new(11)));
        assert_eq!(late.cancel_target(), "/admin/manage-bikes");

        let rental = PendingPayment::NewRental {
            bike: bike(),
            expected_return: chrono::NaiveDate::from_ymd_opt(2025, 3, 10)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            observations: None,
        };
        assert_eq!(rental.customer_override(), None);
        assert_eq!(rental.cancel_target(), "/bikes");
    }
}
