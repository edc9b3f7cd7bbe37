pub mod session;

pub use session::{Session, clear_session, read_session, write_session};

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::ops::validate::{check_password, is_valid_email};
use crate::store::{DocumentStore, Record, StoreError};

/// Error type for authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("not a valid email address: {0}")]
    InvalidMail(String),
    #[error("an account with this email already exists")]
    MailInUse,
    #[error("password too weak: needs lower and upper case, a digit, a special character, and at least 8 characters")]
    WeakPassword,
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A stored account in the `users` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub mail: String,
    pub password_hash: String,
}

impl Record for UserAccount {
    const COLLECTION: &'static str = "users";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }
}

/// The signed-in identity, as the rest of the application sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: String,
    pub name: String,
    pub mail: String,
}

impl CurrentUser {
    fn from_account(account: &UserAccount) -> Self {
        CurrentUser {
            id: account.id.clone(),
            name: account.name.clone(),
            mail: account.mail.clone(),
        }
    }
}

/// Salted SHA-256 digest of a password. The mail doubles as the salt so
/// equal passwords on different accounts never share a digest.
fn digest(mail: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(mail.to_lowercase().as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    let hash = hasher.finalize();
    hash.iter().map(|b| format!("{b:02x}")).collect()
}

/// Credential checking and session keeping against the `users` collection.
///
/// Accounts live in the document store like every other record; this type
/// only holds who is currently signed in and mirrors it to the session
/// file, so a restart stays signed in.
#[derive(Debug)]
pub struct Authenticator {
    data_dir: PathBuf,
    current: Option<CurrentUser>,
}

impl Authenticator {
    /// Restore the session persisted in the data directory, if any.
    pub fn load(data_dir: &Path) -> Self {
        let current = read_session(data_dir).map(|s| CurrentUser {
            id: s.user_id,
            name: s.name,
            mail: s.mail,
        });
        Authenticator {
            data_dir: data_dir.to_path_buf(),
            current,
        }
    }

    pub fn current_user(&self) -> Option<&CurrentUser> {
        self.current.as_ref()
    }

    /// Create an account and sign it in.
    pub fn sign_up<S: DocumentStore>(
        &mut self,
        store: &mut S,
        name: &str,
        mail: &str,
        password: &str,
    ) -> Result<CurrentUser, AuthError> {
        let mail = mail.trim();
        if !is_valid_email(mail) {
            return Err(AuthError::InvalidMail(mail.to_string()));
        }
        if !check_password(password).ok() {
            return Err(AuthError::WeakPassword);
        }
        let users: Vec<UserAccount> = store.snapshot()?;
        if users.iter().any(|u| u.mail.eq_ignore_ascii_case(mail)) {
            return Err(AuthError::MailInUse);
        }

        let mut account = UserAccount {
            id: String::new(),
            name: name.trim().to_string(),
            mail: mail.to_string(),
            password_hash: digest(mail, password),
        };
        let id = store.add(account.clone())?;
        account.id = id;
        self.set_current(CurrentUser::from_account(&account));
        Ok(CurrentUser::from_account(&account))
    }

    /// Validate credentials against the stored accounts and sign in.
    pub fn sign_in<S: DocumentStore>(
        &mut self,
        store: &S,
        mail: &str,
        password: &str,
    ) -> Result<CurrentUser, AuthError> {
        let mail = mail.trim();
        let users: Vec<UserAccount> = store.snapshot()?;
        let account = users
            .iter()
            .find(|u| u.mail.eq_ignore_ascii_case(mail))
            .ok_or(AuthError::InvalidCredentials)?;
        if account.password_hash != digest(&account.mail, password) {
            return Err(AuthError::InvalidCredentials);
        }
        self.set_current(CurrentUser::from_account(account));
        Ok(CurrentUser::from_account(account))
    }

    pub fn sign_out(&mut self) {
        self.current = None;
        clear_session(&self.data_dir);
    }

    fn set_current(&mut self, user: CurrentUser) {
        let session = Session {
            user_id: user.id.clone(),
            mail: user.mail.clone(),
            name: user.name.clone(),
        };
        // A session that fails to persist only costs a login next start.
        let _ = write_session(&self.data_dir, &session);
        self.current = Some(user);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use tempfile::TempDir;

    const PASSWORD: &str = "Hunter+42x";

    fn signed_up(dir: &Path) -> (Authenticator, MemoryStore) {
        let mut auth = Authenticator::load(dir);
        let mut store = MemoryStore::new();
        auth.sign_up(&mut store, "Ada Lovelace", "ada@example.com", PASSWORD)
            .unwrap();
        (auth, store)
    }

    #[test]
    fn sign_up_signs_in_and_persists_session() {
        let dir = TempDir::new().unwrap();
        let (auth, _store) = signed_up(dir.path());
        assert_eq!(auth.current_user().unwrap().name, "Ada Lovelace");

        // A fresh authenticator restores the session from disk.
        let restored = Authenticator::load(dir.path());
        assert_eq!(restored.current_user().unwrap().mail, "ada@example.com");
    }

    #[test]
    fn sign_in_with_correct_and_wrong_password() {
        let dir = TempDir::new().unwrap();
        let (mut auth, store) = signed_up(dir.path());
        auth.sign_out();
        assert!(auth.current_user().is_none());

        assert!(matches!(
            auth.sign_in(&store, "ada@example.com", "wrong"),
            Err(AuthError::InvalidCredentials)
        ));
        assert!(auth.current_user().is_none());

        auth.sign_in(&store, "ADA@example.com", PASSWORD).unwrap();
        assert_eq!(auth.current_user().unwrap().id, "1");
    }

    #[test]
    fn sign_in_unknown_mail_rejected() {
        let dir = TempDir::new().unwrap();
        let (mut auth, store) = signed_up(dir.path());
        assert!(matches!(
            auth.sign_in(&store, "nobody@example.com", PASSWORD),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn duplicate_mail_rejected() {
        let dir = TempDir::new().unwrap();
        let (mut auth, mut store) = signed_up(dir.path());
        assert!(matches!(
            auth.sign_up(&mut store, "Other", "ADA@EXAMPLE.COM", PASSWORD),
            Err(AuthError::MailInUse)
        ));
    }

    #[test]
    fn weak_password_rejected() {
        let dir = TempDir::new().unwrap();
        let mut auth = Authenticator::load(dir.path());
        let mut store = MemoryStore::new();
        assert!(matches!(
            auth.sign_up(&mut store, "Ada", "ada@example.com", "short"),
            Err(AuthError::WeakPassword)
        ));
    }

    #[test]
    fn invalid_mail_rejected() {
        let dir = TempDir::new().unwrap();
        let mut auth = Authenticator::load(dir.path());
        let mut store = MemoryStore::new();
        assert!(matches!(
            auth.sign_up(&mut store, "Ada", "not-a-mail", PASSWORD),
            Err(AuthError::InvalidMail(_))
        ));
    }

    #[test]
    fn sign_out_clears_session_file() {
        let dir = TempDir::new().unwrap();
        let (mut auth, _store) = signed_up(dir.path());
        auth.sign_out();
        let restored = Authenticator::load(dir.path());
        assert!(restored.current_user().is_none());
    }

    #[test]
    fn digests_are_salted_by_mail() {
        assert_ne!(
            digest("ada@example.com", PASSWORD),
            digest("bob@example.com", PASSWORD)
        );
        // Case of the mail does not change the digest.
        assert_eq!(
            digest("Ada@Example.com", PASSWORD),
            digest("ada@example.com", PASSWORD)
        );
    }

    #[test]
    fn password_hash_not_stored_in_plain() {
        let dir = TempDir::new().unwrap();
        let (_auth, store) = signed_up(dir.path());
        let users: Vec<UserAccount> = store.snapshot().unwrap();
        assert!(!users[0].password_hash.contains(PASSWORD));
        assert_eq!(users[0].password_hash.len(), 64);
    }
}
