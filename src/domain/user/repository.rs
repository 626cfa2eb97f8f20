use async_trait::async_trait;

use super::UserAccount;
use crate::shared::StoreResult;

/// Read/touch access to stored user accounts.
#[async_trait]
pub trait UserRepositoryInterface: Send + Sync {
    /// Exact-match lookup on an already normalized username.
    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<UserAccount>>;

    /// Set `last_login_at` to now for the given account.
    async fn touch_last_login(&self, id: i32) -> StoreResult<()>;
}
