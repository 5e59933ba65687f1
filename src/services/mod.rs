pub mod auth;
pub mod category;
pub mod email;
pub mod post;
pub mod post_admin;
pub mod seed;
pub mod subscription;
pub mod upload;
