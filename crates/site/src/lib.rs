//! Wheels site library.
//!
//! This crate provides the storefront and admin console as a library,
//! allowing the router to be exercised from tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod notify;
pub mod routes;
pub mod services;
pub mod state;
