//! In-memory credential store: registered users and password verification.

use parking_lot::Mutex;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, info};

use crate::auth::Identity;

/// A registered user. Immutable after registration; lives for the process
/// lifetime only.
#[derive(Debug, Clone)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub password_hash: String,
}

#[derive(Debug, Error)]
pub enum RegisterError {
    #[error("username taken")]
    UsernameTaken,
    #[error(transparent)]
    Hash(#[from] bcrypt::BcryptError),
}

struct Inner {
    // Keyed by username; usernames are unique and matched case-sensitively
    users: HashMap<String, User>,
    next_id: u64,
}

pub struct UserStore {
    inner: Mutex<Inner>,
    bcrypt_cost: u32,
    /// Hash verified against when the username is unknown, so a missing user
    /// costs roughly the same as a wrong password.
    fallback_hash: String,
}

impl UserStore {
    pub fn new(bcrypt_cost: u32) -> Self {
        let fallback_hash = bcrypt::hash("fallback-password", bcrypt_cost)
            .unwrap_or_else(|_| String::new());

        Self {
            inner: Mutex::new(Inner {
                users: HashMap::new(),
                next_id: 1,
            }),
            bcrypt_cost,
            fallback_hash,
        }
    }

    /// Register a new user, hashing the password with bcrypt. Fails when the
    /// username is already present.
    pub fn register(&self, username: &str, password: &str) -> Result<User, RegisterError> {
        let password_hash = bcrypt::hash(password, self.bcrypt_cost)?;

        let mut inner = self.inner.lock();
        if inner.users.contains_key(username) {
            return Err(RegisterError::UsernameTaken);
        }

        let user = User {
            id: inner.next_id,
            username: username.to_string(),
            password_hash,
        };
        inner.next_id += 1;
        inner.users.insert(username.to_string(), user.clone());

        info!(username, id = user.id, "registered user");
        Ok(user)
    }

    /// Validate a presented username/password pair. Blank credentials fail
    /// fast without a lookup; unknown usernames still burn a bcrypt verify
    /// against a fallback hash before failing.
    pub fn authenticate(&self, username: &str, password: &str) -> Option<Identity> {
        if username.trim().is_empty() || password.trim().is_empty() {
            return None;
        }

        // Clone out of the lock so the bcrypt verify runs without holding it
        let user = self.inner.lock().users.get(username).cloned();

        match user {
            Some(user) => {
                let valid = bcrypt::verify(password, &user.password_hash).unwrap_or(false);
                if valid {
                    Some(Identity::new(user.username, user.id))
                } else {
                    debug!(username, "password mismatch");
                    None
                }
            }
            None => {
                let _ = bcrypt::verify(password, &self.fallback_hash);
                debug!(username, "unknown username");
                None
            }
        }
    }
}
