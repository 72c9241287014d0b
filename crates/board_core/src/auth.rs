use crate::error::AppError;
use crate::model::{Session, User};
use crate::observe::Listeners;
use crate::storage::{self, KeyValueStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

pub const AUTH_STORAGE_KEY: &str = "auth-storage";
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

pub const DEMO_EMAIL: &str = "intern@demo.com";
pub const DEMO_PASSWORD: &str = "intern123";

pub trait CredentialVerifier {
    /// The identity behind a matching email/password pair, if any.
    fn verify(&self, email: &str, password: &str) -> Option<User>;
}

/// Accepts exactly one email/password pair.
#[derive(Debug, Clone)]
pub struct FixedCredentials {
    email: String,
    password: String,
    user: User,
}

impl FixedCredentials {
    pub fn new<E, P, N>(email: E, password: P, name: N) -> Self
    where
        E: Into<String>,
        P: Into<String>,
        N: Into<String>,
    {
        let email = email.into();
        Self {
            user: User {
                id: "1".to_string(),
                email: email.clone(),
                name: name.into(),
            },
            email,
            password: password.into(),
        }
    }
}

impl Default for FixedCredentials {
    fn default() -> Self {
        Self::new(DEMO_EMAIL, DEMO_PASSWORD, "Intern")
    }
}

impl CredentialVerifier for FixedCredentials {
    fn verify(&self, email: &str, password: &str) -> Option<User> {
        (email == self.email && password == self.password).then(|| self.user.clone())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<User>,
    #[serde(default)]
    is_authenticated: bool,
    #[serde(default)]
    remember_me: bool,
}

impl StoredSession {
    /// Identity only survives a restart when the user asked to be remembered.
    fn from_session(session: &Session) -> Self {
        if session.remember_me {
            Self {
                user: session.user.clone(),
                is_authenticated: session.is_authenticated,
                remember_me: true,
            }
        } else {
            Self {
                user: None,
                is_authenticated: false,
                remember_me: false,
            }
        }
    }

    fn into_session(self) -> Session {
        let user = if self.remember_me && self.is_authenticated {
            self.user
        } else {
            None
        };
        Session {
            is_authenticated: user.is_some(),
            user,
            remember_me: self.remember_me,
            error: None,
        }
    }
}

pub struct AuthStore {
    session: Session,
    verifier: Box<dyn CredentialVerifier>,
    storage: Arc<dyn KeyValueStore>,
    login_delay: Duration,
    listeners: Listeners<Session>,
}

impl AuthStore {
    pub fn load(
        storage: Arc<dyn KeyValueStore>,
        verifier: Box<dyn CredentialVerifier>,
    ) -> Result<Self, AppError> {
        let stored: StoredSession =
            storage::load_blob(storage.as_ref(), AUTH_STORAGE_KEY)?.unwrap_or_default();

        Ok(Self {
            session: stored.into_session(),
            verifier,
            storage,
            login_delay: Duration::ZERO,
            listeners: Listeners::default(),
        })
    }

    /// Artificial latency before each credential check.
    pub fn with_login_delay(mut self, delay: Duration) -> Self {
        self.login_delay = delay;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn user(&self) -> Option<&User> {
        self.session.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated
    }

    pub fn require_user(&self) -> Result<&User, AppError> {
        self.session
            .user
            .as_ref()
            .filter(|_| self.session.is_authenticated)
            .ok_or_else(|| AppError::unauthenticated("login required"))
    }

    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&Session) + 'static,
    {
        self.listeners.add(listener);
    }

    /// Returns whether the credentials matched. A mismatch sets the session
    /// error and leaves the session otherwise untouched.
    pub fn login(
        &mut self,
        email: &str,
        password: &str,
        remember_me: bool,
    ) -> Result<bool, AppError> {
        if !self.login_delay.is_zero() {
            std::thread::sleep(self.login_delay);
        }

        match self.verifier.verify(email, password) {
            Some(user) => {
                tracing::info!(email = %user.email, remember_me, "login succeeded");
                self.session = Session {
                    user: Some(user),
                    is_authenticated: true,
                    remember_me,
                    error: None,
                };
                self.commit()?;
                Ok(true)
            }
            None => {
                tracing::warn!(email, "login rejected");
                self.session.error = Some(INVALID_CREDENTIALS.to_string());
                self.listeners.notify(&self.session);
                Ok(false)
            }
        }
    }

    /// Ends the session. Purging board data is the caller's teardown.
    pub fn logout(&mut self) -> Result<(), AppError> {
        self.session.user = None;
        self.session.is_authenticated = false;
        self.session.error = None;
        self.commit()?;
        tracing::info!("logged out");
        Ok(())
    }

    pub fn clear_error(&mut self) {
        if self.session.error.take().is_some() {
            self.listeners.notify(&self.session);
        }
    }

    fn commit(&mut self) -> Result<(), AppError> {
        let stored = StoredSession::from_session(&self.session);
        storage::save_blob(self.storage.as_ref(), AUTH_STORAGE_KEY, &stored)?;
        self.listeners.notify(&self.session);
        Ok(())
    }
}
