use std::sync::Arc;

use crate::config::Config;
use crate::database::{ComplaintStore, UserStore};
use crate::services::notification_service::NotificationPublisher;
use crate::services::token_service::TokenService;

/// Everything a request handler needs. Holds no mutable state of its own;
/// all shared state lives behind the stores and the publisher.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub complaints: Arc<dyn ComplaintStore>,
    pub notifier: Arc<dyn NotificationPublisher>,
    pub tokens: TokenService,
    pub bcrypt_cost: u32,
    pub cookie_secure: bool,
}

impl AppState {
    pub fn new(
        config: &Config,
        users: Arc<dyn UserStore>,
        complaints: Arc<dyn ComplaintStore>,
        notifier: Arc<dyn NotificationPublisher>,
    ) -> Self {
        Self {
            users,
            complaints,
            notifier,
            tokens: TokenService::new(&config.jwt_secret),
            bcrypt_cost: config.bcrypt_cost,
            cookie_secure: config.cookie_secure,
        }
    }
}
