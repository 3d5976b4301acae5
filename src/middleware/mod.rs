pub mod auth;
pub mod security_headers;

pub use auth::{AuthMiddleware, AuthenticatedUser, RequireAdmin, AUTH_COOKIE};
pub use security_headers::SecurityHeaders;
