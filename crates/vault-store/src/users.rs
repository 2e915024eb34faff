//! Account lookup and uniqueness checks.
//!
//! Username lookups are case-insensitive scans, matching the original
//! single-process scale of the system.

use vault_types::user::User;
use vault_types::ChatId;

use crate::{Result, Store, StoreError};

impl Store {
    /// Insert a new account.
    ///
    /// Fails with [`StoreError::Conflict`] when the id, the username
    /// (case-insensitive), or the linked chat id is already taken.
    pub fn insert_user(&mut self, user: User) -> Result<()> {
        if self.users.contains_key(&user.id) {
            return Err(StoreError::Conflict(format!("user id {}", user.id)));
        }
        if self.username_taken(&user.username) {
            return Err(StoreError::Conflict(format!("username {}", user.username)));
        }
        if let Some(chat_id) = user.chat_id {
            if self.chat_linked(chat_id) {
                return Err(StoreError::Conflict(format!("chat {chat_id}")));
            }
        }
        self.users.insert(user.id.clone(), user);
        Ok(())
    }

    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.get(id)
    }

    pub fn user_mut(&mut self, id: &str) -> Option<&mut User> {
        self.users.get_mut(id)
    }

    /// Case-insensitive username lookup.
    pub fn user_by_username(&self, username: &str) -> Option<&User> {
        self.users
            .values()
            .find(|u| u.username.eq_ignore_ascii_case(username))
    }

    pub fn user_by_chat(&self, chat_id: ChatId) -> Option<&User> {
        self.users.values().find(|u| u.chat_id == Some(chat_id))
    }

    pub fn username_taken(&self, username: &str) -> bool {
        self.user_by_username(username).is_some()
    }

    pub fn chat_linked(&self, chat_id: ChatId) -> bool {
        self.user_by_chat(chat_id).is_some()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}
