//! # credential-gate
//!
//! Login service for the project-management frontend. A username and
//! password are checked against the `usuarios` table (bcrypt hashes), the
//! account must be active and hold one of the allowed roles, and the
//! caller gets back the canonical username and role.
//!
//! ## Architecture
//!
//! - **domain**: user account model, allowed roles, repository port
//! - **application**: the authentication service
//! - **infrastructure**: database pool, SeaORM repository, bcrypt, in-memory store
//! - **interfaces**: HTTP API (`/login`, `/health`, `/metrics`, Swagger UI)
//! - **server**: runtime lifecycle and tracing setup

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use application::AuthenticationService;
pub use config::{default_config_path, AppConfig};
pub use domain::{AllowedRole, AuthenticatedUser, UserAccount, UserRepositoryInterface};
pub use infrastructure::{init_database, DatabaseConfig, InMemoryUserRepository};
pub use interfaces::http::create_api_router;
pub use shared::{AuthError, AuthResult};
