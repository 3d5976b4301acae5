use actix_web::{web, HttpResponse, ResponseError};

use crate::middleware::AuthenticatedUser;
use crate::services::user_service::{self, UpdateProfileRequest};
use crate::state::AppState;

/// GET /api/users/me
pub async fn get_me(user: web::ReqData<AuthenticatedUser>, state: web::Data<AppState>) -> HttpResponse {
    match user_service::get_profile(&state, &user.user_id).await {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(e) => {
            log::warn!("❌ Profile lookup failed for {}: {}", user.user_id, e);
            e.error_response()
        }
    }
}

/// PUT /api/users/me
pub async fn update_me(
    user: web::ReqData<AuthenticatedUser>,
    state: web::Data<AppState>,
    request: web::Json<UpdateProfileRequest>,
) -> HttpResponse {
    log::info!("✏️ PUT /users/me - user {}", user.user_id);

    match user_service::update_profile(&state, &user.user_id, request.into_inner()).await {
        Ok(profile) => HttpResponse::Ok().json(profile),
        Err(e) => {
            log::warn!("❌ Profile update failed for {}: {}", user.user_id, e);
            e.error_response()
        }
    }
}
