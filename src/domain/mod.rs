pub mod user;

pub use user::{
    normalize_username, AllowedRole, AuthenticatedUser, UserAccount, UserRepositoryInterface,
};
