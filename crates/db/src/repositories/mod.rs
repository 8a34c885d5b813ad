//! Repository layer.

mod comment;
mod community;
mod post;
mod report;
mod user;

pub use comment::CommentRepository;
pub use community::CommunityRepository;
pub use post::{PostAggregates, PostRepository};
pub use report::ReportRepository;
pub use user::{UserAggregates, UserRepository};

use sea_orm::{DbErr, SqlErr};
use tangle_common::AppError;

/// Map a write error, surfacing unique index violations as `Conflict`.
pub(crate) fn map_write_err(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => AppError::Conflict(detail),
        _ => AppError::Database(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_db_error_maps_to_database() {
        let err = map_write_err(DbErr::Custom("boom".to_string()));
        assert!(matches!(err, AppError::Database(_)));
    }
}
