#![doc = "The `tasktrack` library crate."]
#![doc = ""]
#![doc = "Domain models, persistence contracts and implementations, authentication,"]
#![doc = "use cases, routing configuration and error handling for the task tracking"]
#![doc = "service. The binary (`main.rs`) wires them into an actix-web server."]

pub mod auth;
pub mod config;
pub mod cors;
pub mod error;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod use_cases;

pub use crate::error::{AppError, AppResult};
pub use crate::state::AppState;
