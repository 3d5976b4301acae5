use async_trait::async_trait;
use mongodb::bson::{doc, Document};
use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use mongodb::options::ReturnDocument;
use mongodb::Collection;

use super::{MongoDB, EMAIL_INDEX, USERNAME_INDEX, USERS_COLLECTION};
use crate::models::{ProfileUpdate, User};
use crate::utils::{AppError, AppResult};

/// Credential store. Email and username are unique across all users,
/// enforced by the store at write time.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts the user, assigning an ID when it has none.
    /// Fails with `EmailTaken` or `UsernameTaken` on a uniqueness clash.
    async fn create_user(&self, user: &mut User) -> AppResult<()>;

    async fn get_by_id(&self, id: &str) -> AppResult<Option<User>>;

    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn get_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Applies the name/username change and returns the updated user.
    async fn update_profile(&self, user_id: &str, update: &ProfileUpdate) -> AppResult<User>;
}

pub struct MongoUserStore {
    collection: Collection<User>,
}

impl MongoUserStore {
    pub fn new(db: &MongoDB) -> Self {
        Self {
            collection: db.collection::<User>(USERS_COLLECTION),
        }
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn create_user(&self, user: &mut User) -> AppResult<()> {
        if user.id.is_empty() {
            user.id = uuid::Uuid::new_v4().to_string();
        }

        self.collection
            .insert_one(&*user)
            .await
            .map_err(uniqueness_error)?;

        log::debug!("user {} written to {}", user.id, USERS_COLLECTION);
        Ok(())
    }

    async fn get_by_id(&self, id: &str) -> AppResult<Option<User>> {
        Ok(self.collection.find_one(doc! { "id": id }).await?)
    }

    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.collection.find_one(doc! { "email": email }).await?)
    }

    async fn get_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self.collection.find_one(doc! { "username": username }).await?)
    }

    async fn update_profile(&self, user_id: &str, update: &ProfileUpdate) -> AppResult<User> {
        let mut set = Document::new();
        if let Some(name) = &update.name {
            set.insert("name", name.as_str());
        }
        if let Some(username) = &update.username {
            set.insert("username", username.as_str());
        }

        if set.is_empty() {
            return self.get_by_id(user_id).await?.ok_or(AppError::UserNotFound);
        }

        // The unique username index rejects a clash inside this same write.
        let updated = self
            .collection
            .find_one_and_update(doc! { "id": user_id }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await
            .map_err(uniqueness_error)?;

        match updated {
            Some(user) => {
                log::info!("✅ User profile updated: {}", user_id);
                Ok(user)
            }
            None => Err(AppError::UserNotFound),
        }
    }
}

/// Maps duplicate-key failures on the unique user indexes to conflicts.
fn uniqueness_error(err: MongoError) -> AppError {
    let message = match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == 11000 => {
            Some(write_error.message.clone())
        }
        ErrorKind::Command(command_error) if command_error.code == 11000 => {
            Some(command_error.message.clone())
        }
        _ => None,
    };

    match message {
        Some(message) if message.contains(USERNAME_INDEX) => AppError::UsernameTaken,
        Some(message) if message.contains(EMAIL_INDEX) => AppError::EmailTaken,
        _ => AppError::Database(err),
    }
}
