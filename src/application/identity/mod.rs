//! Identity module: login authentication
//!
//! Contains the `AuthenticationService`, the single entry point the
//! HTTP layer calls to turn a credential pair into an authorized role.

pub mod service;

pub use service::AuthenticationService;
