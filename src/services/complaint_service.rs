use serde::{Deserialize, Serialize};

use crate::middleware::auth::AuthenticatedUser;
use crate::models::{Comment, Complaint, ComplaintResponse, ComplaintStatus, Role};
use crate::services::notification_service::{NEW_COMPLAINTS_QUEUE, STATUS_CHANGED_QUEUE};
use crate::state::AppState;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct CreateComplaintRequest {
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListComplaintsQuery {
    pub status: Option<String>,
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    #[serde(default)]
    pub status: String,
    pub comment: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateResponse {
    pub message: String,
    pub complaint_id: String,
    pub status: ComplaintStatus,
}

/// Empty filter means "no filter".
fn parse_status_filter(status: Option<&str>) -> AppResult<Option<ComplaintStatus>> {
    match status.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some),
    }
}

fn complaint_not_found() -> AppError {
    AppError::NotFound("complaint not found".to_string())
}

/// Files a new pending complaint owned by the caller and announces it on
/// the new-complaints queue. The write is not rolled back if the
/// announcement fails.
pub async fn create_complaint(
    state: &AppState,
    user: &AuthenticatedUser,
    request: CreateComplaintRequest,
) -> AppResult<ComplaintResponse> {
    match user.role {
        Role::Student => {}
        Role::Admin => {
            return Err(AppError::Forbidden("only students can submit complaints".to_string()));
        }
    }

    let description = request.description.trim();
    if description.is_empty() {
        return Err(AppError::Validation("description cannot be empty".to_string()));
    }

    let mut complaint = Complaint::new(&user.user_id, description.to_string());
    state.complaints.create(&mut complaint).await?;

    log::info!("✅ Complaint {} created by {}", complaint.id, user.user_id);

    state.notifier.publish(NEW_COMPLAINTS_QUEUE, &complaint.id).await?;

    Ok(complaint.to_response(&user.user_id))
}

/// Admins see every complaint (or a single one when `id` is given);
/// students see only their own and `id` is ignored.
pub async fn list_complaints(
    state: &AppState,
    user: &AuthenticatedUser,
    query: ListComplaintsQuery,
) -> AppResult<Vec<ComplaintResponse>> {
    let status = parse_status_filter(query.status.as_deref())?;

    let complaints = match user.role {
        Role::Admin => match query.id.as_deref().map(str::trim).filter(|id| !id.is_empty()) {
            Some(id) => {
                let complaint = state.complaints.get_by_id(id).await?.ok_or_else(complaint_not_found)?;
                vec![complaint]
            }
            None => state.complaints.list_all(status).await?,
        },
        Role::Student => state.complaints.list_by_owner(&user.user_id, status).await?,
    };

    Ok(complaints
        .iter()
        .map(|complaint| complaint.to_response(&user.user_id))
        .collect())
}

/// Sets a complaint's status, optionally recording an admin comment, then
/// announces the change. The status is validated before anything is read
/// or written, so a bad value leaves the complaint untouched.
pub async fn update_complaint_status(
    state: &AppState,
    admin: &AuthenticatedUser,
    complaint_id: &str,
    request: UpdateStatusRequest,
) -> AppResult<StatusUpdateResponse> {
    let status: ComplaintStatus = request.status.trim().parse()?;

    let comment = request
        .comment
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .map(|content| Comment::new(&admin.user_id, content));

    let updated = state
        .complaints
        .update_status(complaint_id, status, comment)
        .await?
        .ok_or_else(complaint_not_found)?;

    log::info!("✅ Complaint {} set to {} by {}", updated.id, status, admin.user_id);

    state.notifier.publish(STATUS_CHANGED_QUEUE, &updated.id).await?;

    Ok(StatusUpdateResponse {
        message: "Complaint status updated successfully".to_string(),
        complaint_id: updated.id,
        status: updated.status,
    })
}

pub async fn like_complaint(
    state: &AppState,
    user: &AuthenticatedUser,
    complaint_id: &str,
) -> AppResult<ComplaintResponse> {
    let complaint = state
        .complaints
        .like(complaint_id, &user.user_id)
        .await?
        .ok_or_else(complaint_not_found)?;

    Ok(complaint.to_response(&user.user_id))
}

pub async fn unlike_complaint(
    state: &AppState,
    user: &AuthenticatedUser,
    complaint_id: &str,
) -> AppResult<ComplaintResponse> {
    let complaint = state
        .complaints
        .unlike(complaint_id, &user.user_id)
        .await?
        .ok_or_else(complaint_not_found)?;

    Ok(complaint.to_response(&user.user_id))
}
