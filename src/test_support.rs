//! In-memory stand-ins for MongoDB and RabbitMQ.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;

use crate::database::{ComplaintStore, UserStore};
use crate::models::{Comment, Complaint, ComplaintStatus, ProfileUpdate, Role, User};
use crate::services::notification_service::{validate_message, NotificationPublisher};
use crate::services::token_service::TokenService;
use crate::state::AppState;
use crate::utils::{AppError, AppResult};

pub const TEST_SECRET: &str = "test-signing-secret";
pub const TEST_PASSWORD: &str = "password123";

#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl MemoryUserStore {
    pub async fn get(&self, email: &str) -> Option<User> {
        self.users.read().await.iter().find(|u| u.email == email).cloned()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create_user(&self, user: &mut User) -> AppResult<()> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(AppError::EmailTaken);
        }
        if users.iter().any(|u| u.username == user.username) {
            return Err(AppError::UsernameTaken);
        }
        if user.id.is_empty() {
            user.id = uuid::Uuid::new_v4().to_string();
        }
        users.push(user.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: &str) -> AppResult<Option<User>> {
        Ok(self.users.read().await.iter().find(|u| u.id == id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.get(email).await)
    }

    async fn get_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self.users.read().await.iter().find(|u| u.username == username).cloned())
    }

    async fn update_profile(&self, user_id: &str, update: &ProfileUpdate) -> AppResult<User> {
        let mut users = self.users.write().await;
        if let Some(username) = &update.username {
            if users.iter().any(|u| u.id != user_id && &u.username == username) {
                return Err(AppError::UsernameTaken);
            }
        }

        let user = users.iter_mut().find(|u| u.id == user_id).ok_or(AppError::UserNotFound)?;
        if let Some(name) = &update.name {
            user.name = name.clone();
        }
        if let Some(username) = &update.username {
            user.username = username.clone();
        }
        Ok(user.clone())
    }
}

#[derive(Default)]
pub struct MemoryComplaintStore {
    complaints: RwLock<Vec<Complaint>>,
}

impl MemoryComplaintStore {
    pub async fn get(&self, id: &str) -> Option<Complaint> {
        self.complaints.read().await.iter().find(|c| c.id == id).cloned()
    }

    async fn modify<F>(&self, id: &str, change: F) -> AppResult<Option<Complaint>>
    where
        F: FnOnce(&mut Complaint) + Send,
    {
        let mut complaints = self.complaints.write().await;
        Ok(complaints.iter_mut().find(|c| c.id == id).map(|complaint| {
            change(complaint);
            complaint.clone()
        }))
    }
}

fn matches_status(complaint: &Complaint, status: Option<ComplaintStatus>) -> bool {
    status.map_or(true, |s| complaint.status == s)
}

#[async_trait]
impl ComplaintStore for MemoryComplaintStore {
    async fn create(&self, complaint: &mut Complaint) -> AppResult<()> {
        if complaint.id.is_empty() {
            complaint.id = uuid::Uuid::new_v4().to_string();
        }
        self.complaints.write().await.push(complaint.clone());
        Ok(())
    }

    async fn list_by_owner(&self, user_id: &str, status: Option<ComplaintStatus>) -> AppResult<Vec<Complaint>> {
        Ok(self
            .complaints
            .read()
            .await
            .iter()
            .filter(|c| c.user_id == user_id && matches_status(c, status))
            .cloned()
            .collect())
    }

    async fn list_all(&self, status: Option<ComplaintStatus>) -> AppResult<Vec<Complaint>> {
        Ok(self
            .complaints
            .read()
            .await
            .iter()
            .filter(|c| matches_status(c, status))
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, id: &str) -> AppResult<Option<Complaint>> {
        Ok(self.get(id).await)
    }

    async fn update_status(
        &self,
        id: &str,
        status: ComplaintStatus,
        comment: Option<Comment>,
    ) -> AppResult<Option<Complaint>> {
        self.modify(id, move |complaint| {
            complaint.status = status;
            complaint.comments.extend(comment);
        })
        .await
    }

    async fn like(&self, id: &str, user_id: &str) -> AppResult<Option<Complaint>> {
        self.modify(id, |complaint| {
            complaint.add_like(user_id);
        })
        .await
    }

    async fn unlike(&self, id: &str, user_id: &str) -> AppResult<Option<Complaint>> {
        self.modify(id, |complaint| {
            complaint.remove_like(user_id);
        })
        .await
    }

    async fn delete(&self, id: &str) -> AppResult<bool> {
        let mut complaints = self.complaints.write().await;
        let before = complaints.len();
        complaints.retain(|c| c.id != id);
        Ok(complaints.len() != before)
    }
}

/// Records every accepted message. Can be switched to reject everything.
#[derive(Default)]
pub struct RecordingPublisher {
    messages: Mutex<Vec<(String, String)>>,
    failing: AtomicBool,
}

impl RecordingPublisher {
    pub fn messages(&self) -> Vec<(String, String)> {
        self.messages.lock().map(|m| m.clone()).unwrap_or_default()
    }

    pub fn fail_next_publishes(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl NotificationPublisher for RecordingPublisher {
    async fn publish(&self, queue: &str, payload: &str) -> AppResult<()> {
        validate_message(queue, payload)?;
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::QueueRejected(queue.to_string()));
        }
        if let Ok(mut messages) = self.messages.lock() {
            messages.push((queue.to_string(), payload.to_string()));
        }
        Ok(())
    }
}

/// Application state wired to the in-memory fakes, with handles kept for
/// inspecting what the code under test wrote.
pub struct TestContext {
    pub state: AppState,
    pub users: Arc<MemoryUserStore>,
    pub complaints: Arc<MemoryComplaintStore>,
    pub publisher: Arc<RecordingPublisher>,
}

impl TestContext {
    pub fn new() -> Self {
        let users = Arc::new(MemoryUserStore::default());
        let complaints = Arc::new(MemoryComplaintStore::default());
        let publisher = Arc::new(RecordingPublisher::default());

        let state = AppState {
            users: users.clone(),
            complaints: complaints.clone(),
            notifier: publisher.clone(),
            tokens: TokenService::new(TEST_SECRET),
            bcrypt_cost: 4,
            cookie_secure: false,
        };

        Self {
            state,
            users,
            complaints,
            publisher,
        }
    }

    /// Stores a user whose password is `TEST_PASSWORD`.
    pub async fn seed_user(&self, email: &str, username: &str, role: Role) -> User {
        let hash = bcrypt::hash(TEST_PASSWORD, 4).unwrap();
        let mut user = User::new(email.into(), username.into(), "Test User".into(), hash, role);
        self.users.create_user(&mut user).await.unwrap();
        user
    }

    pub fn token_for(&self, user: &User) -> String {
        self.state.tokens.issue(&user.id, &user.email, user.role).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn test_memory_user_lookups() {
        let ctx = TestContext::new();
        let user = ctx.seed_user("a@x.com", "alice", Role::Student).await;

        let found = ctx.users.get_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert!(ctx.users.get_by_username("bob").await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn test_memory_complaint_delete() {
        let store = MemoryComplaintStore::default();
        let mut complaint = Complaint::new("owner", "mould in bathroom".into());
        store.create(&mut complaint).await.unwrap();

        assert!(store.delete(&complaint.id).await.unwrap());
        assert!(store.get(&complaint.id).await.is_none());
        assert!(!store.delete(&complaint.id).await.unwrap());
    }
}
