#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::middleware::{Logger, NormalizePath};
use actix_web::{test, web, App};
use chrono::Duration;
use serde_json::json;
use tasktrack::auth::{AuthMiddleware, AuthResponse, PasswordService, TokenService};
use tasktrack::routes::{self, health};
use tasktrack::AppState;

pub const SECRET: &str = "integration_test_secret";
pub const PASSWORD: &str = "Password123";

pub fn tokens() -> TokenService {
    TokenService::new(SECRET, Duration::minutes(30), Duration::days(7))
}

/// Fresh in-memory state. bcrypt runs at its minimum cost to keep the suite fast.
pub fn state() -> AppState {
    AppState::in_memory(PasswordService::new(PasswordService::MIN_COST), tokens())
}

/// The full application as `main` assembles it, minus CORS and the database.
pub async fn init_app(
    state: AppState,
) -> impl Service<
    actix_http::Request,
    Response = ServiceResponse<impl MessageBody>,
    Error = actix_web::Error,
> {
    test::init_service(
        App::new()
            .configure(|cfg| state.configure(cfg))
            .wrap(Logger::default())
            .wrap(NormalizePath::trim())
            .service(health::health)
            .service(health::index)
            .service(
                web::scope("/api/v1")
                    .wrap(AuthMiddleware)
                    .configure(routes::config),
            ),
    )
    .await
}

/// Registers a user and returns the sign-up response.
pub async fn sign_up<S, B>(app: &S, email: &str, username: &str) -> AuthResponse
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/api/v1/auth/signup")
        .set_json(json!({
            "email": email,
            "username": username,
            "password": PASSWORD
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    assert_eq!(
        status,
        201,
        "Sign-up failed. Body: {:?}",
        String::from_utf8_lossy(&body)
    );
    serde_json::from_slice(&body).expect("Failed to parse sign-up response")
}

/// Signs up and returns the access token.
pub async fn access_token<S, B>(app: &S, email: &str, username: &str) -> String
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    sign_up(app, email, username).await.tokens.access_token
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}
