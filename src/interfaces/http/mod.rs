//! HTTP interface

pub mod cors;
pub mod modules;
pub mod router;

pub use router::{create_api_router, ApiDoc};
