//! Business logic services.

#![allow(missing_docs)]

pub mod comment;
pub mod community;
pub mod post;
pub mod report;
pub mod token;
pub mod user;

pub use comment::{AddCommentInput, CommentService};
pub use community::{CommunityService, CreateCommunityInput};
pub use post::{
    CreatePostInput, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, Page, PostService, PostStats,
    UpdatePostInput,
};
pub use report::{CreateReportInput, ReportService};
pub use token::{Claims, TokenService};
pub use user::{RegisterInput, UpdateProfileInput, UserService, UserStats};
