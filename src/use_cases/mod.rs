//! Application operations. Each use case validates its input through the value
//! objects, drives the entities and persists through the repository traits.

pub mod auth;
pub mod tasks;

pub use auth::{AuthSession, AuthUseCases};
pub use tasks::TaskUseCases;
