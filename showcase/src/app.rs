//! Composition root.
//!
//! [`TourismApp`] owns the session, catalog and feedback stores. It does the
//! work that spans stores, which reducers never do: resolving the reviewed
//! tour's title, stamping the author from the session and checking roles.
//!
//! Sign-in and registration are serialized per app: the session store reports
//! login outcomes on one broadcast, so only one attempt waits on it at a time.

use crate::access::{Access, authorize};
use crate::auth::{AuthGateway, Credentials, MockAuthGateway, Registration};
use crate::catalog::{CatalogAction, CatalogReducer, CatalogState, TourSort, search_tours, sort_tours};
use crate::config::ShowcaseConfig;
use crate::error::{AccessError, AppError};
use crate::feedback::{
    FeedbackAction, FeedbackReducer, FeedbackState, RatingSummary, ReviewFilter, ReviewSort,
    filter_reviews, sort_reviews,
};
use crate::seed::SeedData;
use crate::session::{SessionAction, SessionEnvironment, SessionReducer, SessionState};
use crate::storage::{FileTokenStorage, TokenStorage};
use crate::types::{CategoryFilter, Review, ReviewId, Tour, TourId, User};
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tamil_tours_core::environment::{Clock, SystemClock};
use tamil_tours_runtime::Store;
use tokio::sync::Mutex;

/// Avatar given to reviews written through the app
pub const DEFAULT_AVATAR_URL: &str =
    "https://images.pexels.com/photos/1239291/pexels-photo-1239291.jpeg?auto=compress&cs=tinysrgb&w=100";

/// Title recorded when the reviewed tour is not in the catalog
pub const UNKNOWN_TOUR_TITLE: &str = "Unknown Tour";

/// Session store
pub type SessionStore = Store<SessionState, SessionAction, SessionEnvironment, SessionReducer>;

/// Catalog store
pub type CatalogStore = Store<CatalogState, CatalogAction, (), CatalogReducer>;

/// Feedback store
pub type FeedbackStore = Store<FeedbackState, FeedbackAction, (), FeedbackReducer>;

/// External dependencies of the app
#[derive(Clone)]
pub struct AppEnvironment {
    /// Persisted session token
    pub storage: Arc<dyn TokenStorage>,
    /// Authentication backend
    pub gateway: Arc<dyn AuthGateway>,
    /// Time source for review dates
    pub clock: Arc<dyn Clock>,
}

impl AppEnvironment {
    /// Creates a new `AppEnvironment`
    #[must_use]
    pub fn new(
        storage: Arc<dyn TokenStorage>,
        gateway: Arc<dyn AuthGateway>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            storage,
            gateway,
            clock,
        }
    }

    /// File-backed storage and the mock gateway, as configured
    #[must_use]
    pub fn from_config(config: &ShowcaseConfig) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let storage = FileTokenStorage::new(&config.storage.path).with_key(&config.storage.key);
        let gateway = MockAuthGateway::new(config.auth.latency(), Arc::clone(&clock))
            .with_admin_email(&config.auth.admin_email);
        Self::new(Arc::new(storage), Arc::new(gateway), clock)
    }
}

/// Review form input
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewDraft {
    /// Reviewed tour
    pub tour_id: TourId,
    /// Star rating from 1 to 5
    pub rating: u8,
    /// Review text
    pub comment: String,
}

impl ReviewDraft {
    /// Creates review input
    #[must_use]
    pub fn new(tour_id: TourId, rating: u8, comment: impl Into<String>) -> Self {
        Self {
            tour_id,
            rating,
            comment: comment.into(),
        }
    }

    /// Completes the draft into a review
    ///
    /// The tour title is copied now and never refreshed afterwards.
    #[must_use]
    pub fn into_review(self, author: &User, tour: Option<&Tour>, date: NaiveDate) -> Review {
        Review {
            id: ReviewId::generate(),
            author_name: author.name.clone(),
            author_avatar: DEFAULT_AVATAR_URL.to_string(),
            rating: self.rating,
            comment: self.comment.trim().to_string(),
            date,
            tour_id: self.tour_id,
            tour_title: tour.map_or_else(|| UNKNOWN_TOUR_TITLE.to_string(), |tour| tour.title.clone()),
            verified: true,
        }
    }
}

/// Figures shown on the admin dashboard
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct AdminDashboard {
    /// Tours in the catalog
    pub active_tours: usize,
    /// Reviews submitted
    pub total_reviews: usize,
    /// Rating statistics
    pub ratings: RatingSummary,
}

/// The three stores and the dependencies they share
#[derive(Clone)]
pub struct TourismApp {
    session: SessionStore,
    catalog: CatalogStore,
    feedback: FeedbackStore,
    clock: Arc<dyn Clock>,
    auth_timeout: Duration,
    login: Arc<Mutex<()>>,
}

impl TourismApp {
    /// Seeds the stores and restores any persisted session
    ///
    /// A token that cannot be read is logged and the session starts signed
    /// out.
    #[must_use]
    pub fn new(seed: SeedData, environment: AppEnvironment, auth_timeout: Duration) -> Self {
        let token = environment.storage.load().unwrap_or_else(|error| {
            tracing::warn!(%error, "Could not read persisted session token");
            None
        });
        let session = SessionState::restore(token);
        if session.is_authenticated() {
            tracing::info!("Restored persisted session");
        }

        tracing::info!(
            tours = seed.tours.len(),
            reviews = seed.reviews.len(),
            "Seeding stores"
        );

        let session_env = SessionEnvironment::new(
            Arc::clone(&environment.gateway),
            Arc::clone(&environment.storage),
        );

        Self {
            session: Store::new(session, SessionReducer::new(), session_env),
            catalog: Store::new(CatalogState::new(seed.tours), CatalogReducer::new(), ()),
            feedback: Store::new(FeedbackState::new(seed.reviews), FeedbackReducer::new(), ()),
            clock: environment.clock,
            auth_timeout,
            login: Arc::new(Mutex::new(())),
        }
    }

    /// Builds the app from configuration: seed file or bundled fixture,
    /// file token storage and the mock gateway
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Seed`] if the seed fixture cannot be loaded.
    pub fn from_config(config: &ShowcaseConfig) -> Result<Self, AppError> {
        let seed = match &config.seed_path {
            Some(path) => SeedData::from_path(path)?,
            None => SeedData::bundled()?,
        };
        Ok(Self::new(
            seed,
            AppEnvironment::from_config(config),
            config.auth.timeout(),
        ))
    }

    // ========== Session ==========

    /// Signs in and waits for the gateway
    ///
    /// Concurrent calls on the same app take turns. A call that times out
    /// does not cancel the gateway request: a late grant still signs the
    /// session in.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`]: malformed email or short password
    /// - [`AppError::LoginFailed`]: the gateway refused or granted a bad session
    /// - [`AppError::Store`]: no answer within the configured timeout
    pub async fn sign_in(&self, credentials: Credentials) -> Result<User, AppError> {
        credentials.validate()?;
        let _turn = self.login.lock().await;
        let outcome = self
            .session
            .send_and_wait_for(
                SessionAction::SignIn { credentials },
                SessionAction::is_login_outcome,
                self.auth_timeout,
            )
            .await?;
        self.login_result(outcome).await
    }

    /// Registers, signs in and waits for the gateway
    ///
    /// # Errors
    ///
    /// As [`TourismApp::sign_in`], plus the registration form rules.
    pub async fn register(&self, registration: Registration) -> Result<User, AppError> {
        registration.validate()?;
        let _turn = self.login.lock().await;
        let outcome = self
            .session
            .send_and_wait_for(
                SessionAction::Register { registration },
                SessionAction::is_login_outcome,
                self.auth_timeout,
            )
            .await?;
        self.login_result(outcome).await
    }

    async fn login_result(&self, outcome: SessionAction) -> Result<User, AppError> {
        if let SessionAction::FailLogin { reason } = outcome {
            return Err(AppError::LoginFailed(reason));
        }
        self.session
            .state(|s| match &s.user {
                Some(user) if s.is_authenticated() && s.last_error.is_none() => Ok(user.clone()),
                _ => Err(AppError::LoginFailed(
                    s.last_error.clone().unwrap_or_else(|| "Session was not granted".to_string()),
                )),
            })
            .await
    }

    /// Signs out and removes the persisted token
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Store`] if the app is shutting down.
    pub async fn logout(&self) -> Result<(), AppError> {
        let mut handle = self.session.send(SessionAction::Logout).await?;
        handle.wait().await;
        Ok(())
    }

    /// Snapshot of the session
    pub async fn session(&self) -> SessionState {
        self.session.state(Clone::clone).await
    }

    /// Checks the current session against `access`
    ///
    /// # Errors
    ///
    /// Returns [`AccessError`] when the session may not enter.
    pub async fn authorize(&self, access: Access) -> Result<Option<User>, AccessError> {
        self.session
            .state(|s| authorize(s, access).map(|user| user.cloned()))
            .await
    }

    // ========== Catalog ==========

    /// Replaces the tour collection
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Store`] if the app is shutting down.
    pub async fn set_catalog(&self, tours: Vec<Tour>) -> Result<(), AppError> {
        self.catalog.send(CatalogAction::SetCatalog { tours }).await?;
        Ok(())
    }

    /// Shows one category and returns the resulting view
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Store`] if the app is shutting down.
    pub async fn select_category(&self, filter: CategoryFilter) -> Result<Vec<Tour>, AppError> {
        self.catalog.send(CatalogAction::FilterByCategory { filter }).await?;
        Ok(self.catalog.state(|s| s.filtered.clone()).await)
    }

    /// The filtered view, searched and optionally sorted
    pub async fn visible_tours(&self, query: &str, sort: Option<TourSort>) -> Vec<Tour> {
        let found = self.catalog.state(|s| search_tours(&s.filtered, query)).await;
        match sort {
            Some(key) => sort_tours(&found, key),
            None => found,
        }
    }

    /// Snapshot of the catalog
    pub async fn catalog(&self) -> CatalogState {
        self.catalog.state(Clone::clone).await
    }

    // ========== Feedback ==========

    /// Completes a draft from the session and catalog, then submits it
    ///
    /// # Errors
    ///
    /// - [`AppError::Access`]: nobody is signed in
    /// - [`AppError::Validation`]: the rating or comment is invalid
    ///
    /// The reviews are unchanged on error.
    pub async fn submit_review(&self, draft: ReviewDraft) -> Result<Review, AppError> {
        let author = self
            .authorize(Access::Authenticated)
            .await?
            .ok_or(AccessError::NotAuthenticated)?;
        let tour = self.catalog.state(|s| s.find(&draft.tour_id).cloned()).await;
        let review = draft.into_review(&author, tour.as_ref(), self.clock.now().date_naive());
        review.validate()?;

        let mut handle = self
            .feedback
            .send(FeedbackAction::Submit {
                review: review.clone(),
            })
            .await?;
        handle.wait().await;
        Ok(review)
    }

    /// Reviews passing `filter`, ordered by `sort`
    pub async fn reviews(&self, filter: &ReviewFilter, sort: ReviewSort) -> Vec<Review> {
        let matching = self.feedback.state(|s| filter_reviews(&s.reviews, filter)).await;
        sort_reviews(&matching, sort)
    }

    /// Mean rating and histogram over every review
    pub async fn rating_summary(&self) -> RatingSummary {
        self.feedback.state(FeedbackState::aggregate).await
    }

    // ========== Admin ==========

    /// Dashboard figures for administrators
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Access`] unless an administrator is signed in.
    pub async fn admin_dashboard(&self) -> Result<AdminDashboard, AppError> {
        self.authorize(Access::Admin).await?;
        let active_tours = self.catalog.state(|s| s.tours.len()).await;
        let (total_reviews, ratings) = self
            .feedback
            .state(|s| (s.reviews.len(), s.aggregate()))
            .await;
        Ok(AdminDashboard {
            active_tours,
            total_reviews,
            ratings,
        })
    }

    /// Stops accepting actions and waits for pending effects such as token
    /// writes
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Store`] if effects are still running at `timeout`.
    pub async fn shutdown(&self, timeout: Duration) -> Result<(), AppError> {
        self.session.shutdown(timeout).await?;
        self.catalog.shutdown(timeout).await?;
        self.feedback.shutdown(timeout).await?;
        Ok(())
    }
}
