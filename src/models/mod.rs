pub mod complaint;
pub mod user;

pub use complaint::*;
pub use user::*;
