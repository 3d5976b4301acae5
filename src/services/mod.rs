pub mod auth_service;
pub mod complaint_service;
pub mod notification_service;
pub mod token_service;
pub mod user_service;

pub use notification_service::AmqpPublisher;
