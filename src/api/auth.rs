use actix_web::cookie::{time::Duration, Cookie, SameSite};
use actix_web::{web, HttpResponse, ResponseError};

use crate::middleware::AUTH_COOKIE;
use crate::services::auth_service::{self, LoginRequest, RegisterRequest};
use crate::services::token_service::TOKEN_TTL_HOURS;
use crate::state::AppState;

fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build(AUTH_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::hours(TOKEN_TTL_HOURS))
        .finish()
}

/// POST /api/auth/register
pub async fn register(state: web::Data<AppState>, request: web::Json<RegisterRequest>) -> HttpResponse {
    log::info!("📝 POST /auth/register - username: {}", request.username);

    match auth_service::register(&state, request.into_inner()).await {
        Ok(response) => HttpResponse::Created().json(response),
        Err(e) => {
            log::warn!("❌ Registration failed: {}", e);
            e.error_response()
        }
    }
}

/// POST /api/auth/login
///
/// Returns the token in the body and also sets it as an HTTP-only cookie.
pub async fn login(state: web::Data<AppState>, request: web::Json<LoginRequest>) -> HttpResponse {
    log::info!("🔐 POST /auth/login");

    match auth_service::login(&state, request.into_inner()).await {
        Ok(response) => HttpResponse::Ok()
            .cookie(session_cookie(response.token.clone(), state.cookie_secure))
            .json(response),
        Err(e) => {
            log::warn!("❌ Login failed: {}", e);
            e.error_response()
        }
    }
}

/// POST /api/auth/logout
///
/// Only clears the cookie. Tokens already handed out stay valid until they expire.
pub async fn logout(state: web::Data<AppState>) -> HttpResponse {
    let mut cookie = session_cookie(String::new(), state.cookie_secure);
    cookie.make_removal();

    HttpResponse::Ok().cookie(cookie).json(serde_json::json!({
        "message": "Logged out successfully"
    }))
}
