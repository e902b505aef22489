//! Tamil Tours showcase: the state layer of a tourism app.
//!
//! Three stores hold everything the app knows:
//!
//! - **Session**: who is signed in, with the token persisted to local storage
//! - **Catalog**: audio tours and the category-filtered view
//! - **Feedback**: reviews, most recent first, with rating statistics
//!
//! Each store is a [`tamil_tours_runtime::Store`] driven by a pure reducer.
//! [`TourismApp`] owns the three and handles the work that spans them.
//!
//! # Architecture
//!
//! ```text
//!   sign_in ──► SessionReducer ──► effect: AuthGateway::sign_in
//!                     ▲                      │
//!                     └── CompleteLogin ◄────┘ ──► effect: TokenStorage::save
//!
//!   select_category ──► CatalogReducer       (no effects)
//!   submit_review ────► FeedbackReducer      (no effects)
//! ```
//!
//! # Quick Start
//!
//! ```no_run
//! use tamil_tours_showcase::{CategoryFilter, Credentials, ShowcaseConfig, TourismApp};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let app = TourismApp::from_config(&ShowcaseConfig::from_env())?;
//!
//! let nature = app.select_category(CategoryFilter::parse("Nature")).await?;
//! println!("{} nature tours", nature.len());
//!
//! let user = app.sign_in(Credentials::new("admin@tamiltours.com", "secret1")).await?;
//! println!("Signed in as {}", user.name);
//! # Ok(())
//! # }
//! ```

pub mod access;
pub mod app;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod error;
pub mod feedback;
pub mod seed;
pub mod session;
pub mod storage;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use access::{Access, authorize};
pub use app::{AdminDashboard, AppEnvironment, ReviewDraft, TourismApp};
pub use auth::{AuthGateway, AuthGrant, Credentials, MockAuthGateway, Registration};
pub use catalog::{CatalogAction, CatalogReducer, CatalogState, TourSort};
pub use config::ShowcaseConfig;
pub use error::{AccessError, AppError, AuthError, SeedError, StorageError, ValidationError};
pub use feedback::{
    FeedbackAction, FeedbackReducer, FeedbackState, RatingBucket, RatingSummary, ReviewFilter,
    ReviewSort,
};
pub use seed::SeedData;
pub use session::{SessionAction, SessionEnvironment, SessionReducer, SessionState};
pub use storage::{FileTokenStorage, InMemoryTokenStorage, TokenStorage};
pub use types::{
    Category, CategoryFilter, Review, ReviewId, Role, Tour, TourId, User, UserId,
};
