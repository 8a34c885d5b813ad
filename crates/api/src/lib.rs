//! HTTP API layer for tangle.
//!
//! Route groups per resource, bearer-token middleware, and the extractors
//! that resolve the calling user. Built on Axum 0.8.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::{AppState, auth_middleware};
