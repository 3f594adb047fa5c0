#![doc = "The `taskboard` library crate."]
#![doc = ""]
#![doc = "This crate contains the domain models, authentication, persistence, task services,"]
#![doc = "routing configuration, and error handling for the Taskboard API."]
#![doc = "It is used by the main binary (`main.rs`) to construct and run the application."]

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
pub mod tasks;
pub mod uploads;

pub use crate::error::AppError;
pub use crate::state::AppState;
