use serde::Deserialize;

use crate::models::{ProfileUpdate, UserInfo};
use crate::state::AppState;
use crate::utils::{AppError, AppResult};

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub username: Option<String>,
}

impl UpdateProfileRequest {
    /// Blank fields count as absent.
    fn into_update(self) -> ProfileUpdate {
        let clean = |value: Option<String>| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        ProfileUpdate {
            name: clean(self.name),
            username: clean(self.username),
        }
    }
}

pub async fn get_profile(state: &AppState, user_id: &str) -> AppResult<UserInfo> {
    let user = state
        .users
        .get_by_id(user_id)
        .await?
        .ok_or(AppError::UserNotFound)?;

    Ok(UserInfo::from(user))
}

pub async fn update_profile(state: &AppState, user_id: &str, request: UpdateProfileRequest) -> AppResult<UserInfo> {
    let update = request.into_update();
    if update.is_empty() {
        return Err(AppError::Validation(
            "at least one field (name or username) must be provided".to_string(),
        ));
    }

    let user = state.users.update_profile(user_id, &update).await?;

    log::info!("✅ Profile updated for user {}", user.id);

    Ok(UserInfo::from(user))
}
