//! Wiring of repositories, services and use cases into actix application data.

use actix_web::web;
use std::sync::Arc;

use crate::auth::{PasswordService, TokenService};
use crate::error::{json_error_handler, path_error_handler, query_error_handler};
use crate::repositories::{
    InMemoryTaskRepository, InMemoryUserRepository, TaskRepository, UserRepository,
};
use crate::use_cases::{AuthUseCases, TaskUseCases};

/// Everything a worker needs to serve requests. Cheap to clone: each worker gets
/// its own copy sharing the same repositories.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthUseCases,
    pub tasks: TaskUseCases,
    pub tokens: TokenService,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserRepository>,
        tasks: Arc<dyn TaskRepository>,
        passwords: PasswordService,
        tokens: TokenService,
    ) -> Self {
        Self {
            auth: AuthUseCases::new(users, passwords, tokens.clone()),
            tasks: TaskUseCases::new(tasks),
            tokens,
        }
    }

    /// State backed by process memory, for running the service without a database.
    pub fn in_memory(passwords: PasswordService, tokens: TokenService) -> Self {
        Self::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryTaskRepository::new()),
            passwords,
            tokens,
        )
    }

    /// Registers the use cases, the token service used by `AuthMiddleware` and the
    /// extractor configs that route parse failures through `AppError`.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(web::Data::new(self.auth.clone()))
            .app_data(web::Data::new(self.tasks.clone()))
            .app_data(web::Data::new(self.tokens.clone()))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .app_data(web::PathConfig::default().error_handler(path_error_handler));
    }
}
