use crate::{
    auth::{AuthResponse, AuthService, AuthenticatedUser, LoginRequest, RegisterRequest},
    error::AppError,
};
use actix_web::{get, post, web, HttpResponse, Responder};
use serde_json::json;

/// Register a new user
///
/// Creates a new account. The response carries no user data.
#[post("/register")]
pub async fn register(
    auth: web::Data<AuthService>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    auth.register(&register_data).await?;
    Ok(HttpResponse::Created().json(json!({
        "message": "User registered successfully"
    })))
}

/// Login user
///
/// Authenticates a user and returns a bearer token valid for the configured lifetime.
#[post("/login")]
pub async fn login(
    auth: web::Data<AuthService>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let token = auth.login(&login_data).await?;
    Ok(HttpResponse::Ok().json(AuthResponse { token }))
}

/// Profile of the authenticated user: `{id, email}`.
#[get("/me", wrap = "crate::auth::AuthMiddleware")]
pub async fn me(
    auth: web::Data<AuthService>,
    user: AuthenticatedUser,
) -> Result<impl Responder, AppError> {
    let profile = auth.profile(user.id()).await?;
    Ok(HttpResponse::Ok().json(profile))
}
