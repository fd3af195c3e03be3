use actix_web::cookie::{time, Cookie};
use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::{info, error};

use crate::auth::gate::{AuthenticatedUser, SESSION_COOKIE};
use crate::db::models::User;
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub fullname: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: User,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: User,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<User>,
}

pub async fn register(
    req: web::Json<RegisterRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    info!("Received registration request for email: {:?}", req.email);

    match state.auth_service.register(&req.fullname, &req.email, &req.password).await {
        Ok(user) => {
            info!("Registration successful for email: {}", user.email);
            Ok(HttpResponse::Created().json(RegisterResponse {
                message: "User registered successfully".into(),
                user,
            }))
        }
        Err(e) => {
            error!("Registration failed for email: {:?}: {}", req.email, e);
            Err(e)
        }
    }
}

pub async fn login(
    req: web::Json<LoginRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    info!("Received login request for email: {}", req.email);
    match state.auth_service.authenticate(&req.email, &req.password).await {
        Ok((user, token)) => {
            info!("Login successful for email: {}", req.email);
            let cookie = Cookie::build(SESSION_COOKIE, token.clone())
                .path("/")
                .http_only(true)
                .max_age(time::Duration::seconds(state.tokens.ttl().num_seconds()))
                .finish();

            Ok(HttpResponse::Ok().cookie(cookie).json(LoginResponse {
                message: "User logged in successfully".into(),
                user,
                token,
            }))
        }
        Err(e) => {
            error!("Login failed for email: {}: {}", req.email, e);
            Err(e)
        }
    }
}

/// Clears the session cookie. Tokens are not tracked server-side, so there
/// is nothing else to revoke.
pub async fn logout() -> HttpResponse {
    let mut cookie = Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .http_only(true)
        .finish();
    cookie.make_removal();

    HttpResponse::Ok().cookie(cookie).json(serde_json::json!({
        "message": "User logged out successfully"
    }))
}

pub async fn list_users(
    _auth: AuthenticatedUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let users = state.auth_service.list_users().await?;
    Ok(HttpResponse::Ok().json(UsersResponse { users }))
}
