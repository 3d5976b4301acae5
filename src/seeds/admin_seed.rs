use crate::config::SeedAdmin;
use crate::database::UserStore;
use crate::models::{Role, User};
use crate::services::auth_service::hash_password;
use crate::utils::AppError;

/// Creates the bootstrap admin account.
/// Skipped when a user with that email or username already exists.
pub async fn seed_admin(users: &dyn UserStore, admin: &SeedAdmin, bcrypt_cost: u32) {
    match users.get_by_email(&admin.email).await {
        Ok(Some(_)) => {
            log::info!("👤 Admin seed: {} already exists, skipping", admin.email);
            return;
        }
        Ok(None) => {}
        Err(e) => {
            log::error!("   ❌ Admin seed: lookup failed: {}", e);
            return;
        }
    }

    match users.get_by_username(&admin.username).await {
        Ok(Some(existing)) => {
            log::warn!(
                "⚠️ Admin seed: username {} already belongs to {}, skipping",
                admin.username,
                existing.email
            );
            return;
        }
        Ok(None) => {}
        Err(e) => {
            log::error!("   ❌ Admin seed: lookup failed: {}", e);
            return;
        }
    }

    let password_hash = match hash_password(admin.password.clone(), bcrypt_cost).await {
        Ok(hash) => hash,
        Err(e) => {
            log::error!("   ❌ Admin seed: {}", e);
            return;
        }
    };

    let mut user = User::new(
        admin.email.clone(),
        admin.username.clone(),
        admin.name.clone(),
        password_hash,
        Role::Admin,
    );

    match users.create_user(&mut user).await {
        Ok(()) => log::info!("   ✅ Admin seed: created {} ({})", user.email, user.id),
        // Another instance won the race.
        Err(AppError::EmailTaken) => log::info!("👤 Admin seed: {} already exists, skipping", admin.email),
        Err(e) => log::error!("   ❌ Admin seed: failed to create {}: {}", admin.email, e),
    }
}
