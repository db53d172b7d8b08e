//! Session state: bearer token + signed-in user, persisted to storage.
//!
//! DESIGN
//! ======
//! `Session` holds the pure state transitions. `SessionPersistence` hydrates
//! it from storage and writes every new state back. `AuthStore` is the single
//! owning handle the request pipeline and router guard are constructed with;
//! clones share the same session.
//!
//! Token and user are cleared together. A stored profile without a stored
//! token is discarded on hydrate, a profile set while signed out is ignored,
//! and setting an empty token is a logout.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::cell::RefCell;
use std::rc::Rc;

use crate::net::types::User;
use crate::util::storage::KeyValueStorage;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

/// Authenticated identity held by the running client.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user: Option<User>,
}

impl Session {
    /// True iff a non-empty bearer token is present.
    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }

    /// Role identifiers of the current user, empty when signed out.
    pub fn roles(&self) -> &[String] {
        self.user.as_ref().map(|u| u.roles.as_slice()).unwrap_or_default()
    }

    pub fn set_token(&mut self, token: &str) {
        if token.is_empty() {
            self.clear();
        } else {
            token.clone_into(&mut self.token);
        }
    }

    /// Attach the signed-in profile. Ignored without a token, since a
    /// profile alone would not survive a reload.
    pub fn set_user(&mut self, user: User) {
        if !self.is_authenticated() {
            leptos::logging::warn!("auth: ignoring user profile without a session token");
            return;
        }
        self.user = Some(user);
    }

    pub fn clear(&mut self) {
        self.token.clear();
        self.user = None;
    }
}

/// Storage adapter that mirrors a `Session` into two string entries.
#[derive(Clone)]
pub struct SessionPersistence {
    storage: Rc<dyn KeyValueStorage>,
}

impl SessionPersistence {
    pub fn new(storage: Rc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Read the persisted session. Missing entries mean "signed out".
    pub fn hydrate(&self) -> Session {
        let token = self.storage.get(TOKEN_KEY).unwrap_or_default();
        let user = self
            .storage
            .get(USER_KEY)
            .and_then(|raw| match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    leptos::logging::warn!("discarding unreadable stored user: {e}");
                    None
                }
            });

        let mut session = Session::default();
        session.set_token(&token);
        if session.is_authenticated() {
            session.user = user;
        }
        // Drop whatever was inconsistent or unreadable.
        self.persist(&session);
        session
    }

    /// Write `session` to storage, removing entries that are now empty.
    pub fn persist(&self, session: &Session) {
        if session.token.is_empty() {
            self.storage.remove(TOKEN_KEY);
        } else {
            self.storage.set(TOKEN_KEY, &session.token);
        }

        match &session.user {
            Some(user) => match serde_json::to_string(user) {
                Ok(raw) => self.storage.set(USER_KEY, &raw),
                Err(e) => leptos::logging::warn!("failed to serialize user: {e}"),
            },
            None => self.storage.remove(USER_KEY),
        }
    }
}

/// Process-wide session handle.
#[derive(Clone)]
pub struct AuthStore {
    session: Rc<RefCell<Session>>,
    persistence: SessionPersistence,
}

impl AuthStore {
    /// Build the store and rehydrate it from `storage`.
    pub fn initialize(storage: Rc<dyn KeyValueStorage>) -> Self {
        let persistence = SessionPersistence::new(storage);
        let session = persistence.hydrate();
        leptos::logging::log!(
            "session hydrated: authenticated={} user={}",
            session.is_authenticated(),
            session.user.as_ref().map_or("-", |u| u.username.as_str())
        );
        Self { session: Rc::new(RefCell::new(session)), persistence }
    }

    /// Snapshot of the current session.
    pub fn session(&self) -> Session {
        self.session.borrow().clone()
    }

    pub fn token(&self) -> String {
        self.session.borrow().token.clone()
    }

    pub fn user(&self) -> Option<User> {
        self.session.borrow().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.borrow().is_authenticated()
    }

    pub fn set_token(&self, token: &str) {
        self.apply(|s| s.set_token(token));
    }

    pub fn set_user(&self, user: User) {
        self.apply(|s| s.set_user(user));
    }

    /// Replace the whole session after a successful sign-in.
    pub fn login(&self, token: &str, user: User) {
        self.apply(|s| {
            s.set_token(token);
            if s.is_authenticated() {
                s.set_user(user);
            }
        });
    }

    /// Clear token and user, in memory and in storage.
    pub fn logout(&self) {
        self.apply(Session::clear);
    }

    /// Alias of [`AuthStore::logout`] used by the request pipeline.
    pub fn clear_auth(&self) {
        self.logout();
    }

    fn apply<F>(&self, transition: F)
    where
        F: FnOnce(&mut Session),
    {
        let mut session = self.session.borrow_mut();
        transition(&mut session);
        self.persistence.persist(&session);
    }
}
