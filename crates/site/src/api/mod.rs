//! Client for the remote Wheels REST API.
//!
//! # Architecture
//!
//! - The remote API is the source of truth for bikes, customers, rentals,
//!   and sales - NO local sync, direct calls on every page load
//! - Plain JSON over `reqwest`; list endpoints may answer `204 No Content`
//!   for an empty collection
//! - Error bodies carry `{ "message": ... }`; failures are surfaced to the
//!   caller, never retried
//!
//! # Example
//!
//! ```rust,ignore
//! use wheels_site::api::WheelsClient;
//!
//! let client = WheelsClient::new(&config.api_base_url);
//! let bikes = client.list_bikes().await?;
//! ```

pub mod types;

pub use types::{
    Bike, Customer, NewBike, NewCustomer, NewRental, Rental, Sale, SaleBike, SaleCustomer,
    SaleDate,
};

use std::sync::Arc;

use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::instrument;

use wheels_core::{CustomerId, RentalId};

/// Errors that can occur when calling the Wheels API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP transport failed (connection, TLS, body decode).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the error body.
        message: String,
    },
}

impl ApiError {
    /// Whether this error is a plain 404 for the requested resource.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }
}

/// Shape of the API's JSON error bodies.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Client for the remote Wheels REST API.
///
/// Cheaply cloneable; the underlying `reqwest::Client` pools connections.
#[derive(Debug, Clone)]
pub struct WheelsClient {
    inner: Arc<WheelsClientInner>,
}

#[derive(Debug)]
struct WheelsClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl WheelsClient {
    /// Create a new API client for the given base URL.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            inner: Arc::new(WheelsClientInner {
                client: reqwest::Client::new(),
                base_url: base_url.trim_end_matches('/').to_string(),
            }),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// List all bikes in the inventory.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or non-2xx status.
    #[instrument(skip(self))]
    pub async fn list_bikes(&self) -> Result<Vec<Bike>, ApiError> {
        self.get_list("/api/bikes").await
    }

    /// Register a new bike.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or non-2xx status.
    #[instrument(skip(self, bike), fields(modelo = %bike.modelo))]
    pub async fn create_bike(&self, bike: &NewBike) -> Result<Bike, ApiError> {
        let response = self
            .inner
            .client
            .post(self.url("/api/bikes"))
            .json(bike)
            .send()
            .await?;
        Self::json_or_error(response).await
    }

    /// Fetch a customer by ID.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or non-2xx status; a
    /// missing customer surfaces as a 404 [`ApiError::Status`].
    #[instrument(skip(self))]
    pub async fn get_customer(&self, id: CustomerId) -> Result<Customer, ApiError> {
        let response = self
            .inner
            .client
            .get(self.url(&format!("/api/customers/{id}")))
            .send()
            .await?;
        Self::json_or_error(response).await
    }

    /// Register a new customer, returning the created record (with its ID).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or non-2xx status.
    #[instrument(skip(self, customer), fields(cpf = %customer.cpf))]
    pub async fn create_customer(&self, customer: &NewCustomer) -> Result<Customer, ApiError> {
        let response = self
            .inner
            .client
            .post(self.url("/api/customers"))
            .json(customer)
            .send()
            .await?;
        Self::json_or_error(response).await
    }

    /// List all active rentals.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or non-2xx status.
    #[instrument(skip(self))]
    pub async fn list_current_rentals(&self) -> Result<Vec<Rental>, ApiError> {
        self.get_list("/api/current-rentals").await
    }

    /// Open a new rental.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or non-2xx status (e.g.
    /// the bike is no longer available).
    #[instrument(skip(self, rental), fields(bike_id = %rental.bike_id))]
    pub async fn create_rental(&self, rental: &NewRental) -> Result<(), ApiError> {
        let response = self
            .inner
            .client
            .post(self.url("/api/current-rentals"))
            .json(rental)
            .send()
            .await?;
        Self::ok_or_error(response).await?;
        Ok(())
    }

    /// Finalize a rental, returning the API's confirmation message.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or non-2xx status.
    #[instrument(skip(self))]
    pub async fn return_rental(&self, id: RentalId) -> Result<String, ApiError> {
        let response = self
            .inner
            .client
            .post(self.url(&format!("/api/current-rentals/{id}/return")))
            .send()
            .await?;
        let response = Self::ok_or_error(response).await?;
        Ok(response.text().await?)
    }

    /// List the sales history.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] on transport failure or non-2xx status.
    #[instrument(skip(self))]
    pub async fn list_sales(&self) -> Result<Vec<Sale>, ApiError> {
        self.get_list("/api/sales").await
    }

    /// GET a list endpoint, treating `204 No Content` as an empty list.
    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        let response = self.inner.client.get(self.url(path)).send().await?;
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(Vec::new());
        }
        Self::json_or_error(response).await
    }

    /// Decode a JSON body after checking the status.
    async fn json_or_error<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let response = Self::ok_or_error(response).await?;
        Ok(response.json().await?)
    }

    /// Pass a successful response through, otherwise extract the error
    /// message from the body.
    async fn ok_or_error(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map_or_else(|_| body.clone(), |e| e.message);
        let message = if message.trim().is_empty() {
            format!("requisição falhou com status {status}")
        } else {
            message
        };

        tracing::error!(status = %status, message = %message, "Wheels API returned an error");
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = WheelsClient::new("http://localhost:8080/");
        assert_eq!(client.url("/api/bikes"), "http://localhost:8080/api/bikes");
    }

    #[test]
    fn test_is_not_found() {
        let err = ApiError::Status {
            status: 404,
            message: "Cliente não encontrado".to_string(),
        };
        assert!(err.is_not_found());

        let err = ApiError::Status {
            status: 500,
            message: "boom".to_string(),
        };
        assert!(!err.is_not_found());
    }
}
