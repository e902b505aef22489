//! Authentication boundary.
//!
//! The session reducer never talks to a backend directly. It hands sign-in
//! and registration requests to an [`AuthGateway`] inside an effect, and the
//! gateway's answer comes back as `CompleteLogin` or `FailLogin`.

use crate::error::{AuthError, ValidationError};
use crate::types::{Role, User, UserId};
use crate::validation::{self, MIN_NAME_LEN};
use futures::future::{BoxFuture, FutureExt};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tamil_tours_core::environment::Clock;

/// Email that receives the admin role from [`MockAuthGateway`] by default
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@tamiltours.com";

/// Simulated network delay of [`MockAuthGateway`] by default, in milliseconds
pub const DEFAULT_LATENCY_MS: u64 = 1000;

// ============================================================================
// Requests
// ============================================================================

/// Sign-in form input
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Email address
    pub email: String,
    /// Password
    pub password: String,
}

impl Credentials {
    /// Creates sign-in input
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Checks the form rules
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for a malformed email or a short password.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::validate_email(&self.email)?;
        validation::validate_password(&self.password)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Registration form input
#[derive(Clone, PartialEq, Eq)]
pub struct Registration {
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// Password
    pub password: String,
    /// Repeated password
    pub confirm_password: String,
    /// Terms and conditions checkbox
    pub accepted_terms: bool,
}

impl Registration {
    /// Checks the form rules
    ///
    /// # Errors
    ///
    /// Returns the first broken rule: name length, email shape, password
    /// length, password confirmation, then the terms checkbox.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::ensure_min_len("name", &self.name, MIN_NAME_LEN)?;
        validation::validate_email(&self.email)?;
        validation::validate_password(&self.password)?;
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        if !self.accepted_terms {
            return Err(ValidationError::TermsNotAccepted);
        }
        Ok(())
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("accepted_terms", &self.accepted_terms)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Gateway
// ============================================================================

/// A granted session: who signed in and the opaque token to persist
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthGrant {
    /// The signed-in user
    pub user: User,
    /// Session token
    pub token: String,
}

/// Backend that turns credentials into a session
///
/// Implementations own any latency; the session reducer stays synchronous.
pub trait AuthGateway: Send + Sync {
    /// Signs an existing user in
    fn sign_in(&self, credentials: Credentials) -> BoxFuture<'static, Result<AuthGrant, AuthError>>;

    /// Creates an account and signs it in
    fn register(&self, registration: Registration)
    -> BoxFuture<'static, Result<AuthGrant, AuthError>>;
}

/// In-process stand-in for an authentication service
///
/// Accepts any well-formed input after a fixed delay. The configured admin
/// email signs in as "Admin User" with the admin role; every other email
/// signs in as "John Doe".
#[derive(Clone)]
pub struct MockAuthGateway {
    latency: Duration,
    admin_email: String,
    clock: Arc<dyn Clock>,
}

impl MockAuthGateway {
    /// Creates a gateway with the default admin email
    #[must_use]
    pub fn new(latency: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            latency,
            admin_email: DEFAULT_ADMIN_EMAIL.to_string(),
            clock,
        }
    }

    /// Grants the admin role to a different email
    #[must_use]
    pub fn with_admin_email(mut self, email: impl Into<String>) -> Self {
        self.admin_email = email.into();
        self
    }

    fn issue_token(&self) -> String {
        format!("mock-jwt-token-{}", self.clock.now().timestamp_millis())
    }

    fn respond(&self, grant: AuthGrant) -> BoxFuture<'static, Result<AuthGrant, AuthError>> {
        let latency = self.latency;
        async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            Ok(grant)
        }
        .boxed()
    }
}

impl fmt::Debug for MockAuthGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockAuthGateway")
            .field("latency", &self.latency)
            .field("admin_email", &self.admin_email)
            .finish_non_exhaustive()
    }
}

impl AuthGateway for MockAuthGateway {
    fn sign_in(&self, credentials: Credentials) -> BoxFuture<'static, Result<AuthGrant, AuthError>> {
        let email = credentials.email.trim().to_string();
        let (name, role) = if email.eq_ignore_ascii_case(&self.admin_email) {
            ("Admin User", Role::Admin)
        } else {
            ("John Doe", Role::User)
        };

        let grant = AuthGrant {
            user: User::new(UserId::new("1"), name, email, role),
            token: self.issue_token(),
        };
        self.respond(grant)
    }

    fn register(
        &self,
        registration: Registration,
    ) -> BoxFuture<'static, Result<AuthGrant, AuthError>> {
        let grant = AuthGrant {
            user: User::new(
                UserId::generate(),
                registration.name.trim(),
                registration.email.trim(),
                Role::User,
            ),
            token: self.issue_token(),
        };
        self.respond(grant)
    }
}
