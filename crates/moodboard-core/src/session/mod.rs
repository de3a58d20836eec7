//! Authentication session and change notifications.
//!
//! A [`Session`] owns an [`IdentityProvider`] and the nullable current user.
//! Views subscribe to session changes and hold the returned
//! [`Subscription`]; dropping it unsubscribes.

mod local;

pub use local::LocalIdentityProvider;

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::rc::{Rc, Weak};
use thiserror::Error;

/// Minimum accepted password length for email sign-up.
pub const MIN_PASSWORD_LEN: usize = 6;

/// How a user authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    Google,
    GitHub,
    /// Email and password.
    Password,
}

impl AuthProvider {
    /// Federated providers offered as one-click sign-in.
    pub fn federated() -> &'static [AuthProvider] {
        &[AuthProvider::Google, AuthProvider::GitHub]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AuthProvider::Google => "Google",
            AuthProvider::GitHub => "GitHub",
            AuthProvider::Password => "Email",
        }
    }
}

impl fmt::Display for AuthProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// An authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub uid: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub provider: AuthProvider,
}

impl User {
    /// Name to show in the UI: display name, then email, then uid.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(&self.uid)
    }
}

/// Authentication errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Sign-in rejected: {0}")]
    Rejected(String),
    #[error("{0} sign-in is not available")]
    ProviderUnavailable(AuthProvider),
    #[error("Incorrect email or password")]
    InvalidCredentials,
    #[error("An account already exists for {0}")]
    AccountExists(String),
    #[error("Password must be at least {} characters", MIN_PASSWORD_LEN)]
    WeakPassword,
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),
}

/// Result type for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;

/// Identity provider capability set.
pub trait IdentityProvider {
    /// Sign in through a federated provider.
    fn sign_in(&mut self, provider: AuthProvider) -> AuthResult<User>;

    fn sign_in_with_email(&mut self, email: &str, password: &str) -> AuthResult<User>;

    /// Create an email account and sign it in.
    fn sign_up(&mut self, email: &str, password: &str, display_name: &str) -> AuthResult<User>;

    fn sign_out(&mut self) -> AuthResult<()>;

    /// User restored by the provider, if any.
    fn current_user(&self) -> Option<User>;
}

type Callback = Box<dyn FnMut(Option<&User>)>;

#[derive(Default)]
struct Subscribers {
    next_id: u64,
    entries: Vec<(u64, Callback)>,
    /// Unsubscribed while their callback list was out for notification.
    removed: HashSet<u64>,
}

impl Subscribers {
    /// Returns the removed callback so the caller can drop it outside the borrow.
    fn unsubscribe(&mut self, id: u64) -> Option<Callback> {
        match self.entries.iter().position(|(entry, _)| *entry == id) {
            Some(index) => Some(self.entries.remove(index).1),
            None => {
                self.removed.insert(id);
                None
            }
        }
    }
}

/// Handle for a session-change callback. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    subscribers: Weak<RefCell<Subscribers>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(subscribers) = self.subscribers.upgrade() {
            let callback = subscribers.borrow_mut().unsubscribe(self.id);
            drop(callback);
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

/// The process-wide authentication session.
pub struct Session {
    provider: Box<dyn IdentityProvider>,
    current: Option<User>,
    subscribers: Rc<RefCell<Subscribers>>,
}

impl Session {
    /// Start a session, restoring whatever user the provider remembers.
    pub fn start(provider: Box<dyn IdentityProvider>) -> Self {
        let current = provider.current_user();
        if let Some(user) = &current {
            log::info!("Session restored for {}", user.label());
        }
        Self {
            provider,
            current,
            subscribers: Rc::new(RefCell::new(Subscribers::default())),
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.current.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.current.is_some()
    }

    pub fn sign_in(&mut self, provider: AuthProvider) -> AuthResult<User> {
        let user = self.provider.sign_in(provider).inspect_err(|e| {
            log::warn!("{} sign-in failed: {}", provider, e);
        })?;
        Ok(self.set_user(user))
    }

    pub fn sign_in_with_email(&mut self, email: &str, password: &str) -> AuthResult<User> {
        let user = self
            .provider
            .sign_in_with_email(email, password)
            .inspect_err(|e| log::warn!("Email sign-in failed: {}", e))?;
        Ok(self.set_user(user))
    }

    pub fn sign_up(
        &mut self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> AuthResult<User> {
        let user = self
            .provider
            .sign_up(email, password, display_name)
            .inspect_err(|e| log::warn!("Sign-up failed: {}", e))?;
        Ok(self.set_user(user))
    }

    /// Sign out. Subscribers are only notified if someone was signed in.
    pub fn sign_out(&mut self) -> AuthResult<()> {
        self.provider.sign_out()?;
        if let Some(user) = self.current.take() {
            log::info!("Signed out {}", user.label());
            self.notify();
        }
        Ok(())
    }

    /// Register `callback` for session changes.
    ///
    /// The callback runs once immediately with the current user, then after
    /// every sign-in and sign-out.
    pub fn subscribe(&self, mut callback: impl FnMut(Option<&User>) + 'static) -> Subscription {
        callback(self.current.as_ref());
        let mut subscribers = self.subscribers.borrow_mut();
        let id = subscribers.next_id;
        subscribers.next_id += 1;
        subscribers.entries.push((id, Box::new(callback)));
        Subscription {
            id,
            subscribers: Rc::downgrade(&self.subscribers),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().entries.len()
    }

    /// End the session lifecycle; all subscribers are dropped.
    pub fn shutdown(&mut self) {
        let entries = {
            let mut subscribers = self.subscribers.borrow_mut();
            subscribers.removed.clear();
            std::mem::take(&mut subscribers.entries)
        };
        drop(entries);
    }

    fn set_user(&mut self, user: User) -> User {
        log::info!("Signed in {} via {}", user.label(), user.provider);
        self.current = Some(user.clone());
        self.notify();
        user
    }

    /// Callbacks run with the subscriber list released, so they may
    /// subscribe or drop subscriptions.
    fn notify(&mut self) {
        let mut taken = std::mem::take(&mut self.subscribers.borrow_mut().entries);
        for (_, callback) in taken.iter_mut() {
            callback(self.current.as_ref());
        }
        let dropped = {
            let mut subscribers = self.subscribers.borrow_mut();
            let removed = std::mem::take(&mut subscribers.removed);
            let (mut kept, dropped): (Vec<_>, Vec<_>) =
                taken.into_iter().partition(|(id, _)| !removed.contains(id));
            // Entries added during notification go after the existing ones.
            kept.append(&mut subscribers.entries);
            subscribers.entries = kept;
            dropped
        };
        drop(dropped);
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("current", &self.current)
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.shutdown();
    }
}
