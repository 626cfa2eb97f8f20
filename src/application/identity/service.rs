//! Login authentication
//!
//! The decision pipeline runs in a fixed order and stops at the first
//! failing step: presence check, lookup by normalized username, active
//! flag, password, role allowlist. Only a fully successful login touches
//! the store a second time (last-login timestamp).

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::domain::{
    normalize_username, AllowedRole, AuthenticatedUser, UserAccount, UserRepositoryInterface,
};
use crate::infrastructure::crypto::password::verify_password;
use crate::shared::{AuthError, AuthResult};

pub struct AuthenticationService {
    repo: Arc<dyn UserRepositoryInterface>,
}

impl AuthenticationService {
    pub fn new(repo: Arc<dyn UserRepositoryInterface>) -> Self {
        Self { repo }
    }

    /// Authenticate a username/password pair and return the account's role.
    ///
    /// Unknown usernames and wrong passwords both yield
    /// [`AuthError::InvalidCredentials`].
    pub async fn authenticate(
        &self,
        username_input: &str,
        password_input: &str,
    ) -> AuthResult<AuthenticatedUser> {
        let started = Instant::now();
        let result = self.run_checks(username_input, password_input).await;

        let outcome = match &result {
            Ok(_) => "success",
            Err(e) => e.outcome(),
        };
        metrics::counter!("auth_login_attempts_total", "outcome" => outcome).increment(1);
        metrics::histogram!("auth_login_duration_seconds", "outcome" => outcome)
            .record(started.elapsed().as_secs_f64());

        result
    }

    async fn run_checks(
        &self,
        username_input: &str,
        password_input: &str,
    ) -> AuthResult<AuthenticatedUser> {
        if username_input.is_empty() || password_input.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let username = normalize_username(username_input);

        let Some(account) = self.repo.find_user_by_username(&username).await? else {
            debug!(username = %username, "Login rejected: unknown username");
            return Err(AuthError::InvalidCredentials);
        };

        if !account.active {
            info!(user_id = account.id, "Login rejected: account inactive");
            return Err(AuthError::InactiveAccount);
        }

        if !password_matches(&account, password_input).await? {
            debug!(user_id = account.id, "Login rejected: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let Some(role) = AllowedRole::parse(&account.role) else {
            info!(
                user_id = account.id,
                role = %account.role.trim(),
                "Login rejected: role not authorized"
            );
            return Err(AuthError::UnauthorizedRole);
        };

        // Best-effort; a failed write is only logged
        if let Err(e) = self.repo.touch_last_login(account.id).await {
            warn!(user_id = account.id, error = %e, "Failed to record last login");
        }

        info!(user_id = account.id, role = %role, "Login succeeded");
        Ok(AuthenticatedUser {
            username: account.username,
            role,
        })
    }
}

/// Compare against the trimmed stored hash on the blocking pool.
///
/// An unparseable hash counts as a mismatch.
async fn password_matches(account: &UserAccount, password: &str) -> AuthResult<bool> {
    let password = password.to_owned();
    let hash = account.password_hash.trim().to_owned();

    let verified = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| AuthError::Internal(format!("password verification task failed: {e}")))?;

    match verified {
        Ok(matches) => Ok(matches),
        Err(e) => {
            warn!(user_id = account.id, error = %e, "Stored password hash is malformed");
            Ok(false)
        }
    }
}
