use crate::{
    auth::{AuthResponse, AuthenticatedUser, LoginRequest, RefreshRequest, SignUpRequest},
    error::AppError,
    models::UserResponse,
    use_cases::{AuthSession, AuthUseCases},
};
use actix_web::{get, post, web, HttpResponse, Responder};
use serde_json::json;
use validator::Validate;

fn auth_response(message: &str, session: AuthSession) -> AuthResponse {
    AuthResponse {
        message: message.to_string(),
        user: UserResponse::from(&session.user),
        tokens: session.tokens,
    }
}

/// Register a new user
///
/// Creates a new account and returns it with an access/refresh token pair.
///
/// ## Responses:
/// - `201 Created`: `{message, user, tokens}`.
/// - `400 Bad Request`: Email or username already taken, or unparseable body.
/// - `422 Unprocessable Entity`: Malformed email or username, or weak password.
#[post("/signup")]
pub async fn signup(
    auth: web::Data<AuthUseCases>,
    body: web::Json<SignUpRequest>,
) -> Result<impl Responder, AppError> {
    body.validate()?;

    let session = auth
        .sign_up(&body.email, &body.username, &body.password)
        .await?;

    Ok(HttpResponse::Created().json(auth_response("User registered successfully", session)))
}

/// Login user
///
/// ## Responses:
/// - `200 OK`: `{message, user, tokens}`.
/// - `401 Unauthorized`: Unknown email, inactive account or wrong password.
#[post("/login")]
pub async fn login(
    auth: web::Data<AuthUseCases>,
    body: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    body.validate()?;

    let session = auth.login(&body.email, &body.password).await?;

    Ok(HttpResponse::Ok().json(auth_response("Login successful", session)))
}

/// Exchange a refresh token for a new access token.
#[post("/refresh")]
pub async fn refresh(
    auth: web::Data<AuthUseCases>,
    body: web::Json<RefreshRequest>,
) -> Result<impl Responder, AppError> {
    body.validate()?;

    let tokens = auth.refresh(&body.refresh_token).await?;

    Ok(HttpResponse::Ok().json(tokens))
}

#[post("/logout")]
pub async fn logout(auth: web::Data<AuthUseCases>) -> impl Responder {
    HttpResponse::Ok().json(json!({ "message": auth.logout() }))
}

/// Returns the authenticated user's profile.
#[get("/me")]
pub async fn me(
    auth: web::Data<AuthUseCases>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let user = auth.current_user(user.id()).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(&user)))
}
