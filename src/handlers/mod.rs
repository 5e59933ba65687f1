pub mod admin;
pub mod auth;
pub mod category;
pub mod post;
pub mod subscription;
pub mod upload;

pub use auth::*;
