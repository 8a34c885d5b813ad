//! Database entities.

pub mod comment;
pub mod community;
pub mod post;
pub mod report;
pub mod user;

pub use comment::Entity as Comment;
pub use community::Entity as Community;
pub use post::Entity as Post;
pub use report::Entity as Report;
pub use user::Entity as User;
