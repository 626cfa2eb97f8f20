use super::AllowedRole;

/// The credential columns of a `usuarios` row.
///
/// `ultimo_login` is write-only from this service's point of view and is
/// never loaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserAccount {
    pub id: i32,
    /// Stored username, in whatever casing the row holds.
    pub username: String,
    /// Bcrypt hash; may carry stray whitespace from manual inserts.
    pub password_hash: String,
    /// Free-text role label, untrimmed.
    pub role: String,
    pub active: bool,
}

/// Result of a successful login.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub username: String,
    pub role: AllowedRole,
}

/// Canonical lookup key for a username: upper-cased, surrounding whitespace removed.
pub fn normalize_username(input: &str) -> String {
    input.trim().to_uppercase()
}
