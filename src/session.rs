//! Session state keyed by a plain username.
//!
//! "Logged in" means a username record exists in storage; there is no
//! authentication beyond that. Task and category records are shared across
//! usernames by design, matching the persisted layout.

use std::path::{Path, PathBuf};

use crate::storage;

/// The login state for the data directory.
#[derive(Debug)]
pub struct Session {
    dir: PathBuf,
    username: Option<String>,
}

impl Session {
    /// Load the persisted username, if any.
    pub fn load(dir: &Path) -> Self {
        Session {
            dir: dir.to_path_buf(),
            username: storage::load_user(dir),
        }
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.username.is_some()
    }

    /// Log in under `name`. Rejects names that trim to empty, leaving the
    /// session unchanged.
    pub fn login(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        storage::save_user(&self.dir, name);
        self.username = Some(name.to_string());
        true
    }

    /// Log out, removing the persisted username record.
    pub fn logout(&mut self) {
        storage::clear_user(&self.dir);
        self.username = None;
    }
}
