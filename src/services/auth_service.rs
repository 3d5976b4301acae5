use actix_web::web;
use serde::{Deserialize, Serialize};

use crate::models::{Role, User};
use crate::state::AppState;
use crate::utils::{AppError, AppResult};

// Request/Response structures
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub id: String,
    pub email: String,
    pub username: String,
    pub name: String,
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
}

/// Trimmed value of a required text field, or a validation error naming it.
pub(crate) fn required(value: &str, field: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(value.to_string())
}

pub async fn hash_password(password: String, cost: u32) -> AppResult<String> {
    Ok(web::block(move || bcrypt::hash(password, cost)).await??)
}

async fn verify_password(password: String, hash: String) -> AppResult<bool> {
    Ok(web::block(move || bcrypt::verify(password, &hash)).await??)
}

// User registration. New accounts are always students.
pub async fn register(state: &AppState, request: RegisterRequest) -> AppResult<RegisterResponse> {
    let email = required(&request.email, "email")?;
    let username = required(&request.username, "username")?;
    let name = required(&request.name, "name")?;
    if request.password.is_empty() {
        return Err(AppError::Validation("password is required".to_string()));
    }

    let password_hash = hash_password(request.password, state.bcrypt_cost).await?;

    let mut user = User::new(email, username, name, password_hash, Role::Student);
    state.users.create_user(&mut user).await?;

    let token = state.tokens.issue(&user.id, &user.email, user.role)?;

    log::info!("✅ User registered successfully: {}", user.id);

    Ok(RegisterResponse {
        id: user.id,
        email: user.email,
        username: user.username,
        name: user.name,
        token,
    })
}

// User login
pub async fn login(state: &AppState, request: LoginRequest) -> AppResult<LoginResponse> {
    let email = required(&request.email, "email")?;
    if request.password.is_empty() {
        return Err(AppError::Validation("password is required".to_string()));
    }

    let user = match state.users.get_by_email(&email).await? {
        Some(user) => user,
        None => {
            log::debug!("login attempt with unknown email");
            return Err(AppError::InvalidCredentials);
        }
    };

    if !verify_password(request.password, user.password_hash.clone()).await? {
        log::debug!("login attempt with wrong password for {}", user.id);
        return Err(AppError::InvalidCredentials);
    }

    let token = state.tokens.issue(&user.id, &user.email, user.role)?;

    log::info!("✅ User logged in: {} ({})", user.id, user.role);

    Ok(LoginResponse { token, role: user.role })
}
