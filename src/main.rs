use actix_web::{
    middleware::{Logger, NormalizePath},
    web, App, HttpServer,
};
use chrono::Duration;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

use tasktrack::{
    auth::{AuthMiddleware, PasswordService, TokenService},
    config::Config,
    cors::cors,
    repositories::{PgTaskRepository, PgUserRepository},
    routes::{self, health},
    AppState,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| {
        log::error!("Invalid configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e)
    })?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .map_err(|e| {
            log::error!("Failed to connect to database: {}", e);
            std::io::Error::new(std::io::ErrorKind::Other, e)
        })?;

    if config.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await.map_err(|e| {
            log::error!("Failed to run migrations: {}", e);
            std::io::Error::new(std::io::ErrorKind::Other, e)
        })?;
        log::info!("Database migrations applied");
    }

    let state = AppState::new(
        Arc::new(PgUserRepository::new(pool.clone())),
        Arc::new(PgTaskRepository::new(pool)),
        PasswordService::new(config.bcrypt_cost),
        TokenService::new(
            &config.jwt_secret,
            Duration::minutes(config.access_token_expire_minutes),
            Duration::days(config.refresh_token_expire_days),
        ),
    );

    log::info!("Starting server at {}", config.server_url());
    let cors_origins = config.cors_origins.clone();

    HttpServer::new(move || {
        let state = state.clone();
        App::new()
            .configure(|cfg| state.configure(cfg))
            .wrap(cors(&cors_origins))
            .wrap(Logger::default())
            .wrap(NormalizePath::trim())
            .service(health::health)
            .service(health::index)
            .service(
                web::scope("/api/v1")
                    .wrap(AuthMiddleware)
                    .configure(routes::config),
            )
    })
    .bind((config.server_host.as_str(), config.server_port))?
    .run()
    .await
}
