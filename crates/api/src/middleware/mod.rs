//! Request extractors and middleware.

pub mod identity;
pub mod json;

pub use identity::{AdminUser, CallerUser};
pub use json::ApiJson;
