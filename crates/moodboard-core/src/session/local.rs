//! In-process identity provider.

use super::{AuthError, AuthProvider, AuthResult, IdentityProvider, MIN_PASSWORD_LEN, User};
use std::collections::HashMap;

struct Account {
    password: String,
    user: User,
}

/// Identity provider that keeps everything in memory.
///
/// Federated sign-in succeeds only for providers with a linked profile.
/// Email accounts live for the lifetime of the provider.
#[derive(Default)]
pub struct LocalIdentityProvider {
    linked: HashMap<AuthProvider, User>,
    accounts: HashMap<String, Account>,
    current: Option<User>,
}

impl LocalIdentityProvider {
    /// A provider with nothing linked.
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider with `display_name` linked to every federated provider.
    pub fn with_profile(display_name: &str) -> Self {
        let mut provider = Self::new();
        for kind in AuthProvider::federated() {
            provider.link(*kind, display_name, None);
        }
        provider
    }

    /// Link a federated profile, replacing any existing one.
    pub fn link(&mut self, provider: AuthProvider, display_name: &str, email: Option<&str>) {
        let user = User {
            uid: uuid::Uuid::new_v4().to_string(),
            display_name: non_empty(display_name),
            email: email.map(normalize_email),
            provider,
        };
        self.linked.insert(provider, user);
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }
}

impl IdentityProvider for LocalIdentityProvider {
    fn sign_in(&mut self, provider: AuthProvider) -> AuthResult<User> {
        if provider == AuthProvider::Password {
            return Err(AuthError::Rejected(
                "email sign-in needs an address and password".to_string(),
            ));
        }
        let user = self
            .linked
            .get(&provider)
            .cloned()
            .ok_or(AuthError::ProviderUnavailable(provider))?;
        self.current = Some(user.clone());
        Ok(user)
    }

    fn sign_in_with_email(&mut self, email: &str, password: &str) -> AuthResult<User> {
        let account = self
            .accounts
            .get(&normalize_email(email))
            .filter(|account| account.password == password)
            .ok_or(AuthError::InvalidCredentials)?;
        let user = account.user.clone();
        self.current = Some(user.clone());
        Ok(user)
    }

    fn sign_up(&mut self, email: &str, password: &str, display_name: &str) -> AuthResult<User> {
        let email = normalize_email(email);
        if !is_valid_email(&email) {
            return Err(AuthError::InvalidEmail(email));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword);
        }
        if self.accounts.contains_key(&email) {
            return Err(AuthError::AccountExists(email));
        }

        let user = User {
            uid: uuid::Uuid::new_v4().to_string(),
            display_name: non_empty(display_name),
            email: Some(email.clone()),
            provider: AuthProvider::Password,
        };
        self.accounts.insert(
            email,
            Account {
                password: password.to_string(),
                user: user.clone(),
            },
        );
        self.current = Some(user.clone());
        Ok(user)
    }

    fn sign_out(&mut self) -> AuthResult<()> {
        self.current = None;
        Ok(())
    }

    fn current_user(&self) -> Option<User> {
        self.current.clone()
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_federated_requires_link() {
        let mut provider = LocalIdentityProvider::new();
        assert_eq!(
            provider.sign_in(AuthProvider::Google),
            Err(AuthError::ProviderUnavailable(AuthProvider::Google))
        );
        provider.link(AuthProvider::Google, "Ada", Some("Ada@Example.com"));
        let user = provider.sign_in(AuthProvider::Google).unwrap();
        assert_eq!(user.email.as_deref(), Some("ada@example.com"));
        assert_eq!(provider.current_user(), Some(user));
    }

    #[test]
    fn test_password_provider_rejected_for_federated_sign_in() {
        let mut provider = LocalIdentityProvider::with_profile("Ada");
        assert!(matches!(
            provider.sign_in(AuthProvider::Password),
            Err(AuthError::Rejected(_))
        ));
    }

    #[test]
    fn test_sign_up_then_sign_in() {
        let mut provider = LocalIdentityProvider::new();
        let user = provider.sign_up("ada@example.com", "secret1", "  Ada Lovelace ").unwrap();
        assert_eq!(user.display_name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(user.provider, AuthProvider::Password);

        provider.sign_out().unwrap();
        assert_eq!(provider.current_user(), None);

        let again = provider.sign_in_with_email(" ADA@example.com", "secret1").unwrap();
        assert_eq!(again.uid, user.uid);
    }

    #[test]
    fn test_sign_up_validation() {
        let mut provider = LocalIdentityProvider::new();
        assert!(matches!(
            provider.sign_up("not-an-email", "secret1", ""),
            Err(AuthError::InvalidEmail(_))
        ));
        assert!(matches!(
            provider.sign_up("a@b", "secret1", ""),
            Err(AuthError::InvalidEmail(_))
        ));
        assert_eq!(provider.sign_up("a@b.com", "12345", ""), Err(AuthError::WeakPassword));

        provider.sign_up("a@b.com", "123456", "").unwrap();
        assert_eq!(
            provider.sign_up("A@B.com", "abcdef", ""),
            Err(AuthError::AccountExists("a@b.com".to_string()))
        );
        assert_eq!(provider.account_count(), 1);
    }

    #[test]
    fn test_wrong_password() {
        let mut provider = LocalIdentityProvider::new();
        provider.sign_up("a@b.com", "123456", "").unwrap();
        provider.sign_out().unwrap();
        assert_eq!(
            provider.sign_in_with_email("a@b.com", "654321"),
            Err(AuthError::InvalidCredentials)
        );
        assert_eq!(
            provider.sign_in_with_email("nobody@b.com", "123456"),
            Err(AuthError::InvalidCredentials)
        );
        assert_eq!(provider.current_user(), None);
    }
}
