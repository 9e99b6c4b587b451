//! Wheels Core - Shared types and stateless logic.
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no session state. Everything here is synchronously testable.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and the user role
//! - [`cpf`] - CPF masking and check-digit validation
//! - [`phone`] - Brazilian celular masking and validation
//! - [`pricing`] - Rental totals and late fees

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cpf;
pub mod phone;
pub mod pricing;
pub mod types;

pub use types::*;
