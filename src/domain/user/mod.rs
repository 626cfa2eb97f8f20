//! User aggregate
//!
//! Stored account record, the role allowlist, and the repository port.

pub mod model;
pub mod repository;
pub mod role;

pub use model::{normalize_username, AuthenticatedUser, UserAccount};
pub use repository::UserRepositoryInterface;
pub use role::AllowedRole;
