pub mod html;
pub mod jwt;
pub mod password;
pub mod slug;

pub use html::sanitize_html;
pub use jwt::encode_access_token;
pub use password::{hash_password, verify_password};
pub use slug::slugify;
