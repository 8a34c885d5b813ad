//! Domain services for tangle.

pub mod services;

pub use services::*;
