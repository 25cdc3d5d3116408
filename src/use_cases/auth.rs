use std::sync::Arc;

use crate::auth::{PasswordService, TokenResponse, TokenService, TokenType};
use crate::error::{AppError, AppResult};
use crate::models::{Email, Password, User, UserId};
use crate::repositories::UserRepository;

/// A user together with a freshly issued token pair.
#[derive(Debug)]
pub struct AuthSession {
    pub user: User,
    pub tokens: TokenResponse,
}

/// Account operations: sign-up, login, token refresh and identity lookup.
#[derive(Clone)]
pub struct AuthUseCases {
    users: Arc<dyn UserRepository>,
    passwords: PasswordService,
    tokens: TokenService,
}

impl AuthUseCases {
    pub fn new(
        users: Arc<dyn UserRepository>,
        passwords: PasswordService,
        tokens: TokenService,
    ) -> Self {
        Self {
            users,
            passwords,
            tokens,
        }
    }

    /// Registers a new account and logs it in.
    pub async fn sign_up(
        &self,
        email: &str,
        username: &str,
        password: &str,
    ) -> AppResult<AuthSession> {
        let email = Email::parse(email)?;
        if self.users.exists_by_email(&email).await? {
            log::warn!("Sign-up rejected, email already registered: {}", email);
            return Err(AppError::DuplicateEmail);
        }
        if self.users.exists_by_username(username.trim()).await? {
            log::warn!("Sign-up rejected, username already taken: {}", username.trim());
            return Err(AppError::DuplicateUsername);
        }

        let password = Password::parse(password)?;
        let hashed_password = self.passwords.hash(&password)?;
        let user = User::new(email, username, hashed_password)?;
        let user = self.users.create(&user).await?;

        log::info!("User {} signed up as {}", user.id, user.username);
        self.session(user)
    }

    /// Unknown email, inactive account and wrong password all yield `InvalidCredentials`.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        let email = Email::parse(email).map_err(|_| AppError::InvalidCredentials)?;
        let user = match self.users.find_by_email(&email).await? {
            Some(user) if user.is_active => user,
            _ => {
                log::warn!("Login failed for {}", email);
                return Err(AppError::InvalidCredentials);
            }
        };

        if !self.passwords.verify(password, &user.hashed_password)? {
            log::warn!("Login failed for {}", email);
            return Err(AppError::InvalidCredentials);
        }

        log::info!("User {} logged in", user.id);
        self.session(user)
    }

    /// Exchanges a refresh token for a new access token. The refresh token itself
    /// is handed back unchanged.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<TokenResponse> {
        let claims = self.tokens.verify(refresh_token, TokenType::Refresh)?;
        let user = self.active_user(claims.user_id()).await?;
        let access_token = self.tokens.issue_access_token(&user)?;

        Ok(TokenResponse::bearer(
            access_token,
            refresh_token.to_string(),
            self.tokens.access_ttl_seconds(),
        ))
    }

    /// Looks up the account behind an authenticated request.
    pub async fn current_user(&self, user_id: UserId) -> AppResult<User> {
        self.active_user(user_id).await
    }

    /// Tokens are stateless, so there is nothing to revoke. Clients drop their copies.
    pub fn logout(&self) -> &'static str {
        "Successfully logged out"
    }

    async fn active_user(&self, user_id: UserId) -> AppResult<User> {
        match self.users.find_by_id(user_id).await? {
            Some(user) if user.is_active => Ok(user),
            _ => {
                log::warn!("Token presented for missing or inactive user {}", user_id);
                Err(AppError::Unauthorized("User not found or inactive".into()))
            }
        }
    }

    fn session(&self, user: User) -> AppResult<AuthSession> {
        let access_token = self.tokens.issue_access_token(&user)?;
        let refresh_token = self.tokens.issue_refresh_token(user.id)?;
        Ok(AuthSession {
            user,
            tokens: TokenResponse::bearer(
                access_token,
                refresh_token,
                self.tokens.access_ttl_seconds(),
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::InMemoryUserRepository;
    use chrono::Duration;

    fn tokens() -> TokenService {
        TokenService::new("use_case_secret", Duration::minutes(30), Duration::days(7))
    }

    fn use_cases() -> (AuthUseCases, Arc<InMemoryUserRepository>) {
        let users = Arc::new(InMemoryUserRepository::new());
        let auth = AuthUseCases::new(
            users.clone(),
            PasswordService::new(PasswordService::MIN_COST),
            tokens(),
        );
        (auth, users)
    }

    #[actix_rt::test]
    async fn test_sign_up_success() {
        let (auth, _) = use_cases();
        let session = auth
            .sign_up(" Test@Example.com ", "testuser", "TestPassword123")
            .await
            .unwrap();

        assert_eq!(session.user.email.as_str(), "test@example.com");
        assert_eq!(session.user.username, "testuser");
        assert!(session.user.is_active);
        assert_ne!(session.user.hashed_password, "TestPassword123");
        assert_eq!(session.tokens.token_type, "bearer");
        assert_eq!(session.tokens.expires_in, 30 * 60);

        let claims = tokens()
            .verify(&session.tokens.access_token, TokenType::Access)
            .unwrap();
        assert_eq!(claims.user_id(), session.user.id);
    }

    #[actix_rt::test]
    async fn test_sign_up_duplicates() {
        let (auth, _) = use_cases();
        auth.sign_up("test@example.com", "testuser", "TestPassword123")
            .await
            .unwrap();

        assert!(matches!(
            auth.sign_up("TEST@example.com", "another", "TestPassword123").await,
            Err(AppError::DuplicateEmail)
        ));
        assert!(matches!(
            auth.sign_up("other@example.com", "testuser", "TestPassword123").await,
            Err(AppError::DuplicateUsername)
        ));
    }

    #[actix_rt::test]
    async fn test_sign_up_weak_password() {
        let (auth, users) = use_cases();
        assert!(matches!(
            auth.sign_up("test@example.com", "testuser", "weakpass123").await,
            Err(AppError::InvalidPassword(_))
        ));
        let email = Email::parse("test@example.com").unwrap();
        assert!(!users.exists_by_email(&email).await.unwrap());
    }

    #[actix_rt::test]
    async fn test_login() {
        let (auth, _) = use_cases();
        auth.sign_up("test@example.com", "testuser", "TestPassword123")
            .await
            .unwrap();

        let session = auth.login("test@example.com", "TestPassword123").await.unwrap();
        assert_eq!(session.user.username, "testuser");

        assert!(matches!(
            auth.login("test@example.com", "WrongPassword123").await,
            Err(AppError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login("nobody@example.com", "TestPassword123").await,
            Err(AppError::InvalidCredentials)
        ));
    }

    #[actix_rt::test]
    async fn test_inactive_user_is_locked_out() {
        let (auth, users) = use_cases();
        let hashed = PasswordService::new(PasswordService::MIN_COST)
            .hash(&Password::parse("TestPassword123").unwrap())
            .unwrap();
        let mut user = User::new(
            Email::parse("inactive@example.com").unwrap(),
            "inactive",
            hashed,
        )
        .unwrap();
        user.is_active = false;
        users.create(&user).await.unwrap();

        assert!(matches!(
            auth.login("inactive@example.com", "TestPassword123").await,
            Err(AppError::InvalidCredentials)
        ));

        let refresh = tokens().issue_refresh_token(user.id).unwrap();
        assert!(matches!(
            auth.refresh(&refresh).await,
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(
            auth.current_user(user.id).await,
            Err(AppError::Unauthorized(_))
        ));
    }

    #[actix_rt::test]
    async fn test_refresh_keeps_refresh_token() {
        let (auth, _) = use_cases();
        let session = auth
            .sign_up("test@example.com", "testuser", "TestPassword123")
            .await
            .unwrap();

        let refreshed = auth.refresh(&session.tokens.refresh_token).await.unwrap();
        assert_eq!(refreshed.refresh_token, session.tokens.refresh_token);
        assert!(tokens()
            .verify(&refreshed.access_token, TokenType::Access)
            .is_ok());

        assert!(matches!(
            auth.refresh(&session.tokens.access_token).await,
            Err(AppError::Unauthorized(_))
        ));
    }

    #[actix_rt::test]
    async fn test_current_user() {
        let (auth, _) = use_cases();
        let session = auth
            .sign_up("test@example.com", "testuser", "TestPassword123")
            .await
            .unwrap();

        let user = auth.current_user(session.user.id).await.unwrap();
        assert_eq!(user.id, session.user.id);
        assert!(auth.current_user(UserId::generate()).await.is_err());
    }
}
