//! Session store: at most one signed-in identity at a time.
//!
//! Sign-in and registration are commands. They validate the form, mark the
//! session pending and hand the request to the [`AuthGateway`] in an effect.
//! The gateway's answer is fed back as [`SessionAction::CompleteLogin`] or
//! [`SessionAction::FailLogin`]. Token persistence happens in effects too, so
//! the reducer itself never touches storage.

use crate::auth::{AuthGateway, Credentials, Registration};
use crate::error::ValidationError;
use crate::storage::TokenStorage;
use crate::types::{Role, User, UserId};
use crate::validation::ensure_present;
use std::sync::Arc;
use tamil_tours_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};

// ============================================================================
// State
// ============================================================================

/// Current authentication status
///
/// A session is authenticated exactly when both `user` and `token` are set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Signed-in user
    pub user: Option<User>,
    /// Opaque session token
    pub token: Option<String>,
    /// A sign-in or registration is in flight
    pub pending: bool,
    /// Reason the last attempt failed
    pub last_error: Option<String>,
}

impl SessionState {
    /// Creates an unauthenticated session
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the session from a persisted token
    ///
    /// A non-blank token restores the demo identity; anything else starts
    /// unauthenticated.
    #[must_use]
    pub fn restore(token: Option<String>) -> Self {
        match token {
            Some(token) if !token.trim().is_empty() => Self {
                user: Some(demo_user()),
                token: Some(token),
                ..Self::default()
            },
            _ => Self::default(),
        }
    }

    /// Returns true when a user and a token are both present
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.token.is_some()
    }

    /// Marks an attempt as in flight
    pub const fn begin_login(&mut self) {
        self.pending = true;
    }

    /// Replaces the session with `user`
    ///
    /// Calling it again simply replaces the session.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] without touching the session if the
    /// token is blank or the user is malformed.
    pub fn complete_login(&mut self, user: User, token: String) -> Result<(), ValidationError> {
        ensure_present("token", &token)?;
        user.validate()?;

        self.user = Some(user);
        self.token = Some(token);
        self.pending = false;
        self.last_error = None;
        Ok(())
    }

    /// Ends an attempt without changing who is signed in
    pub fn fail_login(&mut self, reason: impl Into<String>) {
        self.pending = false;
        self.last_error = Some(reason.into());
    }

    /// Signs out. Always succeeds.
    pub fn logout(&mut self) {
        self.user = None;
        self.token = None;
        self.pending = false;
    }
}

/// Identity restored from a persisted token
#[must_use]
pub fn demo_user() -> User {
    User::new(UserId::new("1"), "Demo User", "demo@tamiltours.com", Role::User)
}

// ============================================================================
// Actions
// ============================================================================

/// Actions understood by [`SessionReducer`]
#[derive(Clone, Debug)]
pub enum SessionAction {
    // Commands
    /// Sign in with email and password
    SignIn {
        /// Form input
        credentials: Credentials,
    },
    /// Create an account and sign it in
    Register {
        /// Form input
        registration: Registration,
    },

    // Outcomes
    /// An attempt started
    BeginLogin,
    /// The gateway granted a session
    CompleteLogin {
        /// Signed-in user
        user: User,
        /// Session token
        token: String,
    },
    /// The attempt failed
    FailLogin {
        /// Why
        reason: String,
    },
    /// Sign out
    Logout,
}

impl SessionAction {
    /// Returns true for the actions that end an attempt
    #[must_use]
    pub const fn is_login_outcome(&self) -> bool {
        matches!(self, Self::CompleteLogin { .. } | Self::FailLogin { .. })
    }
}

// ============================================================================
// Environment
// ============================================================================

/// Dependencies of the session reducer's effects
#[derive(Clone)]
pub struct SessionEnvironment {
    /// Authentication backend
    pub gateway: Arc<dyn AuthGateway>,
    /// Where the token is persisted
    pub storage: Arc<dyn TokenStorage>,
}

impl SessionEnvironment {
    /// Creates a new `SessionEnvironment`
    #[must_use]
    pub fn new(gateway: Arc<dyn AuthGateway>, storage: Arc<dyn TokenStorage>) -> Self {
        Self { gateway, storage }
    }
}

// ============================================================================
// Reducer
// ============================================================================

/// Reducer for the session store
#[derive(Clone, Debug, Default)]
pub struct SessionReducer;

impl SessionReducer {
    /// Creates a new `SessionReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn persist_token(storage: Arc<dyn TokenStorage>, token: String) -> Effect<SessionAction> {
        Effect::future(async move {
            if let Err(error) = storage.save(&token) {
                tracing::warn!(%error, "Failed to persist session token");
            }
            None
        })
    }

    fn forget_token(storage: Arc<dyn TokenStorage>) -> Effect<SessionAction> {
        Effect::future(async move {
            if let Err(error) = storage.clear() {
                tracing::warn!(%error, "Failed to remove session token");
            }
            None
        })
    }
}

impl Reducer for SessionReducer {
    type State = SessionState;
    type Action = SessionAction;
    type Environment = SessionEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            // ========== Commands ==========
            SessionAction::SignIn { credentials } => {
                if let Err(error) = credentials.validate() {
                    state.last_error = Some(error.to_string());
                    return SmallVec::new();
                }

                state.begin_login();
                state.last_error = None;
                tracing::debug!(email = %credentials.email, "Signing in");

                let gateway = Arc::clone(&env.gateway);
                smallvec![Effect::future(async move {
                    Some(match gateway.sign_in(credentials).await {
                        Ok(grant) => SessionAction::CompleteLogin {
                            user: grant.user,
                            token: grant.token,
                        },
                        Err(error) => SessionAction::FailLogin {
                            reason: error.to_string(),
                        },
                    })
                })]
            },

            SessionAction::Register { registration } => {
                if let Err(error) = registration.validate() {
                    state.last_error = Some(error.to_string());
                    return SmallVec::new();
                }

                state.begin_login();
                state.last_error = None;
                tracing::debug!(email = %registration.email, "Registering");

                let gateway = Arc::clone(&env.gateway);
                smallvec![Effect::future(async move {
                    Some(match gateway.register(registration).await {
                        Ok(grant) => SessionAction::CompleteLogin {
                            user: grant.user,
                            token: grant.token,
                        },
                        Err(error) => SessionAction::FailLogin {
                            reason: error.to_string(),
                        },
                    })
                })]
            },

            // ========== Outcomes ==========
            SessionAction::BeginLogin => {
                state.begin_login();
                SmallVec::new()
            },

            SessionAction::CompleteLogin { user, token } => {
                let user_id = user.id.clone();
                match state.complete_login(user, token.clone()) {
                    Ok(()) => {
                        tracing::info!(user_id = %user_id, "Signed in");
                        smallvec![Self::persist_token(Arc::clone(&env.storage), token)]
                    },
                    Err(error) => {
                        tracing::warn!(%error, "Rejected session grant");
                        state.fail_login(error.to_string());
                        SmallVec::new()
                    },
                }
            },

            SessionAction::FailLogin { reason } => {
                tracing::warn!(%reason, "Sign-in failed");
                state.fail_login(reason);
                SmallVec::new()
            },

            SessionAction::Logout => {
                if let Some(user) = &state.user {
                    tracing::info!(user_id = %user.id, "Signed out");
                }
                state.logout();
                smallvec![Self::forget_token(Arc::clone(&env.storage))]
            },
        }
    }
}
