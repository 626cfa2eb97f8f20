//! In-memory user store

use std::sync::atomic::{AtomicBool, AtomicI32, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::domain::{UserAccount, UserRepositoryInterface};
use crate::shared::{StoreError, StoreResult};

/// In-memory user store for development and testing.
///
/// Keyed by the stored username; lookups are exact-match like the SQL adapter.
pub struct InMemoryUserRepository {
    users: DashMap<String, UserAccount>,
    last_logins: DashMap<i32, DateTime<Utc>>,
    id_counter: AtomicI32,
    unavailable: AtomicBool,
    touch_failures: AtomicBool,
    lookups: AtomicUsize,
    touches: AtomicUsize,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            last_logins: DashMap::new(),
            id_counter: AtomicI32::new(1),
            unavailable: AtomicBool::new(false),
            touch_failures: AtomicBool::new(false),
            lookups: AtomicUsize::new(0),
            touches: AtomicUsize::new(0),
        }
    }

    /// Insert an account and return its assigned id.
    pub fn insert(
        &self,
        username: impl Into<String>,
        password_hash: impl Into<String>,
        role: impl Into<String>,
        active: bool,
    ) -> i32 {
        let id = self.id_counter.fetch_add(1, Ordering::SeqCst);
        let username = username.into();
        self.users.insert(
            username.clone(),
            UserAccount {
                id,
                username,
                password_hash: password_hash.into(),
                role: role.into(),
                active,
            },
        );
        id
    }

    pub fn get(&self, username: &str) -> Option<UserAccount> {
        self.users.get(username).map(|entry| entry.value().clone())
    }

    /// Last successful `touch_last_login` for the account stored under `username`.
    pub fn last_login(&self, username: &str) -> Option<DateTime<Utc>> {
        let id = self.users.get(username)?.id;
        self.last_logins.get(&id).map(|entry| *entry.value())
    }

    /// Make every call fail as if the database were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Make only `touch_last_login` fail.
    pub fn set_touch_failures(&self, failing: bool) {
        self.touch_failures.store(failing, Ordering::SeqCst);
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn touch_count(&self) -> usize {
        self.touches.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> StoreResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory store marked unavailable".into()));
        }
        Ok(())
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepositoryInterface for InMemoryUserRepository {
    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<UserAccount>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        Ok(self.get(username))
    }

    async fn touch_last_login(&self, id: i32) -> StoreResult<()> {
        self.touches.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;
        if self.touch_failures.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("last login write rejected".into()));
        }

        if self.users.iter().any(|entry| entry.id == id) {
            self.last_logins.insert(id, Utc::now());
        }
        Ok(())
    }
}
