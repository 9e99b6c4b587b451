//! Wire types for the remote Wheels API.
//!
//! The API speaks Portuguese field names (`modelo`, `valorHora`, ...); the
//! serde renames keep the Rust side idiomatic. Money fields on outgoing
//! payloads serialize as JSON numbers, which is what the backend expects.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use wheels_core::{BikeId, CustomerId, RentalId, SaleId};

/// A rentable bike.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bike {
    #[serde(rename = "bikeID")]
    pub id: BikeId,
    pub modelo: String,
    #[serde(default)]
    pub descricao: String,
    /// Child-sized model.
    #[serde(default)]
    pub infantil: bool,
    /// Currently available for rental.
    #[serde(default)]
    pub disponivel: bool,
    #[serde(rename = "valorHora")]
    pub valor_hora: Decimal,
    #[serde(rename = "taxaAtraso")]
    pub taxa_atraso: Decimal,
    #[serde(rename = "taxaDano")]
    pub taxa_dano: Decimal,
}

/// Payload for registering a new bike.
#[derive(Debug, Clone, Serialize)]
pub struct NewBike {
    pub modelo: String,
    pub descricao: String,
    pub infantil: bool,
    pub disponivel: bool,
    #[serde(rename = "valorHora", with = "rust_decimal::serde::float")]
    pub valor_hora: Decimal,
    #[serde(rename = "taxaAtraso", with = "rust_decimal::serde::float")]
    pub taxa_atraso: Decimal,
    #[serde(rename = "taxaDano", with = "rust_decimal::serde::float")]
    pub taxa_dano: Decimal,
}

/// A renter profile (distinct from the local login record).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(rename = "customerID")]
    pub id: CustomerId,
    #[serde(rename = "nomeCompleto")]
    pub nome_completo: String,
    pub cpf: String,
    #[serde(default)]
    pub genero: Option<String>,
    #[serde(rename = "dataNascimento", default)]
    pub data_nascimento: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Some API responses nest the email under a `user` object.
    #[serde(default)]
    pub user: Option<CustomerAccount>,
    #[serde(default)]
    pub celular: Option<String>,
    #[serde(default)]
    pub cidade: Option<String>,
    #[serde(default)]
    pub pais: Option<String>,
}

/// Account details nested inside some customer responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerAccount {
    #[serde(default)]
    pub email: Option<String>,
}

impl Customer {
    /// Email for display, wherever the API happened to put it.
    #[must_use]
    pub fn email(&self) -> &str {
        self.user
            .as_ref()
            .and_then(|u| u.email.as_deref())
            .or(self.email.as_deref())
            .unwrap_or("N/A")
    }
}

/// Payload for registering a new customer.
#[derive(Debug, Clone, Serialize)]
pub struct NewCustomer {
    pub cpf: String,
    #[serde(rename = "nomeCompleto")]
    pub nome_completo: String,
    pub genero: String,
    #[serde(rename = "dataNascimento")]
    pub data_nascimento: String,
    pub email: String,
    pub celular: String,
    pub cidade: String,
    pub pais: String,
    #[serde(rename = "primeiraCompra")]
    pub primeira_compra: String,
    #[serde(rename = "ultimaCompra")]
    pub ultima_compra: String,
}

/// An active, not-yet-returned rental.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rental {
    #[serde(rename = "rentalID")]
    pub id: RentalId,
    #[serde(default)]
    pub customer: Option<Customer>,
    #[serde(default)]
    pub bike: Option<Bike>,
    #[serde(rename = "rentalStart")]
    pub rental_start: NaiveDateTime,
    #[serde(rename = "expectedReturn")]
    pub expected_return: NaiveDateTime,
}

/// Payload for opening a rental.
///
/// `expected_return` is sent as the `datetime-local` string plus seconds
/// (`YYYY-MM-DDTHH:MM:00`), matching what the backend parses.
#[derive(Debug, Clone, Serialize)]
pub struct NewRental {
    #[serde(rename = "customerId")]
    pub customer_id: CustomerId,
    #[serde(rename = "bikeId")]
    pub bike_id: BikeId,
    #[serde(rename = "expectedReturn")]
    pub expected_return: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observations: Option<String>,
}

/// A completed rental, as reported by the sales history endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    #[serde(rename = "saleID")]
    pub id: SaleId,
    #[serde(rename = "customerDetails", default)]
    pub customer_details: Option<SaleCustomer>,
    #[serde(rename = "bikeDetails", default)]
    pub bike_details: Option<SaleBike>,
    #[serde(rename = "dateDetails")]
    pub date_details: SaleDate,
    #[serde(rename = "valorTotal")]
    pub valor_total: Decimal,
}

/// Customer summary embedded in a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleCustomer {
    #[serde(rename = "nomeCompleto", default)]
    pub nome_completo: Option<String>,
}

/// Bike summary embedded in a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleBike {
    #[serde(default)]
    pub modelo: Option<String>,
}

/// Date block embedded in a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleDate {
    pub data: chrono::NaiveDate,
}
