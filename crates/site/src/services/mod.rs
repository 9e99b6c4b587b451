//! Application services.

pub mod auth;
pub mod contract;
pub mod store;

pub use auth::{AuthError, AuthService};
pub use contract::{ContractData, ContractError};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore, StoreError, UserStore};
