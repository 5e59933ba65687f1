pub mod category;
pub mod paged;
pub mod post;
pub mod subscription;
pub mod user;

pub use category::{Entity as Category, Model as CategoryModel};
pub use paged::PagedResult;
pub use post::{Entity as Post, Model as PostModel};
pub use subscription::{Entity as Subscription, Model as SubscriptionModel};
pub use user::{Entity as User, Model as UserModel};
