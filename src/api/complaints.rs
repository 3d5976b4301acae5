use actix_web::http::header::{CacheControl, CacheDirective};
use actix_web::{web, HttpResponse, HttpResponseBuilder, ResponseError};
use serde::Serialize;

use crate::middleware::AuthenticatedUser;
use crate::services::complaint_service::{
    self, CreateComplaintRequest, ListComplaintsQuery, UpdateStatusRequest,
};
use crate::state::AppState;

// Complaint views depend on the caller, never cache them.
fn no_store<T: Serialize>(mut builder: HttpResponseBuilder, body: T) -> HttpResponse {
    builder
        .insert_header(CacheControl(vec![CacheDirective::NoStore]))
        .json(body)
}

/// POST /api/complaints
pub async fn create_complaint(
    user: web::ReqData<AuthenticatedUser>,
    state: web::Data<AppState>,
    request: web::Json<CreateComplaintRequest>,
) -> HttpResponse {
    log::info!("📝 POST /complaints - user {}", user.user_id);

    match complaint_service::create_complaint(&state, &user, request.into_inner()).await {
        Ok(complaint) => no_store(HttpResponse::Created(), complaint),
        Err(e) => {
            log::warn!("❌ Complaint creation failed for {}: {}", user.user_id, e);
            e.error_response()
        }
    }
}

/// GET /api/complaints?status=&id=
pub async fn list_complaints(
    user: web::ReqData<AuthenticatedUser>,
    state: web::Data<AppState>,
    query: web::Query<ListComplaintsQuery>,
) -> HttpResponse {
    match complaint_service::list_complaints(&state, &user, query.into_inner()).await {
        Ok(complaints) => {
            log::debug!("📋 {} complaints for {} ({})", complaints.len(), user.user_id, user.role);
            no_store(HttpResponse::Ok(), complaints)
        }
        Err(e) => {
            log::warn!("❌ Complaint listing failed for {}: {}", user.user_id, e);
            e.error_response()
        }
    }
}

/// PUT /api/complaints/{id} (admin only)
pub async fn update_complaint_status(
    user: web::ReqData<AuthenticatedUser>,
    state: web::Data<AppState>,
    path: web::Path<String>,
    request: web::Json<UpdateStatusRequest>,
) -> HttpResponse {
    let complaint_id = path.into_inner();
    log::info!("🔄 PUT /complaints/{} - status {}", complaint_id, request.status);

    match complaint_service::update_complaint_status(&state, &user, &complaint_id, request.into_inner()).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            log::warn!("❌ Status update failed for {}: {}", complaint_id, e);
            e.error_response()
        }
    }
}

/// POST /api/complaints/{id}/like
pub async fn like_complaint(
    user: web::ReqData<AuthenticatedUser>,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> HttpResponse {
    match complaint_service::like_complaint(&state, &user, &path).await {
        Ok(complaint) => no_store(HttpResponse::Ok(), complaint),
        Err(e) => e.error_response(),
    }
}

/// DELETE /api/complaints/{id}/like
pub async fn unlike_complaint(
    user: web::ReqData<AuthenticatedUser>,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> HttpResponse {
    match complaint_service::unlike_complaint(&state, &user, &path).await {
        Ok(complaint) => no_store(HttpResponse::Ok(), complaint),
        Err(e) => e.error_response(),
    }
}
