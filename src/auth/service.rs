use std::sync::Arc;

use log::info;
use uuid::Uuid;
use validator::Validate;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::TokenService;
use crate::auth::{LoginRequest, RegisterRequest};
use crate::error::AppError;
use crate::models::{User, UserProfile};
use crate::store::UserStore;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Registration, login and profile lookup on top of a `UserStore`.
pub struct AuthService {
    users: Arc<dyn UserStore>,
    tokens: TokenService,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, tokens: TokenService, bcrypt_cost: u32) -> Self {
        Self {
            users,
            tokens,
            bcrypt_cost,
        }
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<UserProfile, AppError> {
        request.validate()?;

        if self.users.find_by_email(&request.email).await?.is_some() {
            return Err(AppError::Conflict("User already exists".into()));
        }

        let password_hash = hash_password(&request.password, self.bcrypt_cost)?;
        let user = self
            .users
            .insert(&User::new(request.email.clone(), password_hash))
            .await?;

        info!("Registered user {}", user.id);
        Ok(user.into())
    }

    /// Checks credentials and issues a token. Unknown email and wrong password are
    /// indistinguishable to the caller.
    pub async fn login(&self, request: &LoginRequest) -> Result<String, AppError> {
        request.validate()?;

        let user = self
            .users
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| AppError::Unauthorized(INVALID_CREDENTIALS.into()))?;

        if !verify_password(&request.password, &user.password_hash)? {
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.into()));
        }

        self.tokens.generate(user.id)
    }

    pub async fn profile(&self, user_id: Uuid) -> Result<UserProfile, AppError> {
        self.users
            .find_by_id(user_id)
            .await?
            .map(UserProfile::from)
            .ok_or_else(|| AppError::NotFound("User not found".into()))
    }
}
