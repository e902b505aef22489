//! Feedback store: submitted reviews, most recent first, and the statistics
//! derived from them.

use crate::error::{UnknownSortKey, ValidationError};
use crate::types::Review;
use crate::validation::{MAX_RATING, MIN_RATING};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tamil_tours_core::{SmallVec, effect::Effect, reducer::Reducer};

// ============================================================================
// State
// ============================================================================

/// Review collection, most recent first
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FeedbackState {
    /// Reviews, newest submission at index 0
    pub reviews: Vec<Review>,
    /// A review load is in flight
    pub loading: bool,
    /// Why the last submission was rejected
    pub last_error: Option<String>,
}

impl FeedbackState {
    /// Creates a store holding `reviews` in the given order
    #[must_use]
    pub fn new(reviews: Vec<Review>) -> Self {
        Self {
            reviews,
            ..Self::default()
        }
    }

    /// Inserts a review at the head of the collection
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] and leaves the collection unchanged if
    /// the rating, comment or tour id is invalid.
    pub fn submit(&mut self, review: Review) -> Result<(), ValidationError> {
        review.validate()?;
        self.reviews.insert(0, review);
        Ok(())
    }

    /// Statistics over the current collection
    #[must_use]
    pub fn aggregate(&self) -> RatingSummary {
        aggregate(&self.reviews)
    }
}

// ============================================================================
// Actions
// ============================================================================

/// Actions understood by [`FeedbackReducer`]
#[derive(Clone, Debug)]
pub enum FeedbackAction {
    /// Add a review
    Submit {
        /// The review, fully populated
        review: Review,
    },
    /// Replace the whole collection
    SetReviews {
        /// New reviews, most recent first
        reviews: Vec<Review>,
    },
    /// Toggle the loading flag
    SetLoading(bool),
}

// ============================================================================
// Reducer
// ============================================================================

/// Reducer for the feedback store
#[derive(Clone, Debug, Default)]
pub struct FeedbackReducer;

impl FeedbackReducer {
    /// Creates a new `FeedbackReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for FeedbackReducer {
    type State = FeedbackState;
    type Action = FeedbackAction;
    type Environment = ();

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            FeedbackAction::Submit { review } => {
                let review_id = review.id.clone();
                let tour_id = review.tour_id.clone();
                match state.submit(review) {
                    Ok(()) => {
                        tracing::info!(review_id = %review_id, tour_id = %tour_id, "Review submitted");
                        state.last_error = None;
                    },
                    Err(error) => {
                        tracing::debug!(%error, "Review rejected");
                        state.last_error = Some(error.to_string());
                    },
                }
            },
            FeedbackAction::SetReviews { reviews } => {
                state.reviews = reviews;
                state.loading = false;
            },
            FeedbackAction::SetLoading(loading) => {
                state.loading = loading;
            },
        }
        SmallVec::new()
    }
}

// ============================================================================
// Queries
// ============================================================================

/// Rating and free-text constraint over reviews
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReviewFilter {
    /// Exact star rating, or any
    pub rating: Option<u8>,
    /// Case-insensitive text matched against tour title, comment and author
    pub query: String,
}

impl ReviewFilter {
    /// A filter that keeps everything
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps only reviews with exactly `rating` stars
    #[must_use]
    pub fn with_rating(mut self, rating: u8) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Keeps only reviews mentioning `query`
    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Sets the rating constraint from a select value
    ///
    /// `"all"` and unrecognized values drop the constraint; `"1"` to `"5"`
    /// select that rating.
    #[must_use]
    pub fn rating_named(mut self, name: &str) -> Self {
        self.rating = name
            .trim()
            .parse::<u8>()
            .ok()
            .filter(|rating| (MIN_RATING..=MAX_RATING).contains(rating));
        self
    }

    /// Returns true if `review` passes both constraints
    #[must_use]
    pub fn matches(&self, review: &Review) -> bool {
        if self.rating.is_some_and(|rating| review.rating != rating) {
            return false;
        }
        let needle = self.query.trim().to_lowercase();
        needle.is_empty()
            || [&review.tour_title, &review.comment, &review.author_name]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Reviews in `view` that pass `filter`, in their original order
#[must_use]
pub fn filter_reviews(view: &[Review], filter: &ReviewFilter) -> Vec<Review> {
    view.iter().filter(|review| filter.matches(review)).cloned().collect()
}

/// Orderings offered by the reviews view
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReviewSort {
    /// Latest date first
    Newest,
    /// Earliest date first
    Oldest,
    /// Most stars first
    HighestRating,
    /// Fewest stars first
    LowestRating,
}

impl ReviewSort {
    /// Returns the key name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::HighestRating => "highest",
            Self::LowestRating => "lowest",
        }
    }
}

impl fmt::Display for ReviewSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewSort {
    type Err = UnknownSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest" => Ok(Self::Newest),
            "oldest" => Ok(Self::Oldest),
            "highest" | "highestrating" => Ok(Self::HighestRating),
            "lowest" | "lowestrating" => Ok(Self::LowestRating),
            _ => Err(UnknownSortKey(s.to_string())),
        }
    }
}

/// Returns `view` ordered by `key`
///
/// Stable: reviews with the same date or rating keep their relative order.
#[must_use]
pub fn sort_reviews(view: &[Review], key: ReviewSort) -> Vec<Review> {
    let mut sorted = view.to_vec();
    match key {
        ReviewSort::Newest => sorted.sort_by(|a, b| b.date.cmp(&a.date)),
        ReviewSort::Oldest => sorted.sort_by_key(|review| review.date),
        ReviewSort::HighestRating => sorted.sort_by(|a, b| b.rating.cmp(&a.rating)),
        ReviewSort::LowestRating => sorted.sort_by_key(|review| review.rating),
    }
    sorted
}

/// Like [`sort_reviews`], keyed by name
///
/// An unknown key returns the view unchanged.
#[must_use]
pub fn sort_reviews_named(view: &[Review], key: &str) -> Vec<Review> {
    key.parse::<ReviewSort>()
        .map_or_else(|_| view.to_vec(), |key| sort_reviews(view, key))
}

// ============================================================================
// Statistics
// ============================================================================

/// Share of reviews with a given star rating
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RatingBucket {
    /// Star value, 1 to 5
    pub stars: u8,
    /// Reviews with this rating
    pub count: usize,
    /// `count` as a percentage of all reviews; 0.0 when there are none
    pub percentage: f64,
}

/// Mean rating and histogram over a set of reviews
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RatingSummary {
    /// Number of reviews
    pub total: usize,
    /// Mean rating, `None` when there are no reviews
    pub average: Option<f64>,
    /// One bucket per star value, from 5 down to 1
    pub buckets: [RatingBucket; 5],
}

impl RatingSummary {
    /// Returns true when no reviews were counted
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Bucket for `stars`, if it is a valid rating
    #[must_use]
    pub fn bucket(&self, stars: u8) -> Option<&RatingBucket> {
        self.buckets.iter().find(|bucket| bucket.stars == stars)
    }
}

/// Mean rating and 5-to-1 histogram of `reviews`
#[must_use]
#[allow(clippy::cast_precision_loss)] // review counts are far below 2^52
pub fn aggregate(reviews: &[Review]) -> RatingSummary {
    let total = reviews.len();
    let sum: u32 = reviews.iter().map(|review| u32::from(review.rating)).sum();
    let average = (total > 0).then(|| f64::from(sum) / total as f64);

    let buckets = [5, 4, 3, 2, 1].map(|stars| {
        let count = reviews.iter().filter(|review| review.rating == stars).count();
        let percentage = if total == 0 {
            0.0
        } else {
            count as f64 * 100.0 / total as f64
        };
        RatingBucket { stars, count, percentage }
    });

    RatingSummary { total, average, buckets }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ReviewId, TourId};
    use chrono::NaiveDate;
    use tamil_tours_testing::{ReducerTest, assertions};

    fn review(id: &str, rating: u8, date: (i32, u32, u32), author: &str, comment: &str) -> Review {
        Review {
            id: ReviewId::new(id),
            author_name: author.to_string(),
            author_avatar: String::new(),
            rating,
            comment: comment.to_string(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            tour_id: TourId::new("1"),
            tour_title: "Meenakshi Temple Heritage Tour".to_string(),
            verified: true,
        }
    }

    fn ids(reviews: &[Review]) -> Vec<&str> {
        reviews.iter().map(|r| r.id.as_str()).collect()
    }

    fn sample() -> Vec<Review> {
        vec![
            review("1", 5, (2024, 1, 15), "Priya Sharma", "Absolutely amazing audio tour!"),
            review("2", 4, (2024, 1, 12), "Rajesh Kumar", "Beautiful tea gardens and views."),
            review("3", 5, (2024, 1, 10), "Anitha Ravi", "Watching the sunrise was magical."),
            review("4", 4, (2024, 1, 8), "Vikram Patel", "Great cultural walk along the beach."),
        ]
    }

    #[test]
    fn valid_review_goes_to_the_front() {
        let fresh = review("9", 3, (2024, 2, 1), "Kavya", "Decent tour, a bit rushed.");

        ReducerTest::new(FeedbackReducer::new())
            .with_env(())
            .given_state(FeedbackState::new(sample()))
            .when_action(FeedbackAction::Submit { review: fresh })
            .then_state(|state| {
                assert_eq!(state.reviews.len(), 5);
                assert_eq!(state.reviews[0].id.as_str(), "9");
                assert!(state.last_error.is_none());
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn short_comment_is_rejected_without_change() {
        ReducerTest::new(FeedbackReducer::new())
            .with_env(())
            .given_state(FeedbackState::new(sample()))
            .when_action(FeedbackAction::Submit {
                review: review("9", 5, (2024, 2, 1), "Kavya", "Too short"),
            })
            .then_state(|state| {
                assert_eq!(state.reviews, sample());
                assert_eq!(
                    state.last_error.as_deref(),
                    Some("comment must be at least 10 characters")
                );
            })
            .run();
    }

    #[test]
    fn out_of_range_rating_is_rejected() {
        let mut state = FeedbackState::new(sample());
        let result = state.submit(review("9", 6, (2024, 2, 1), "Kavya", "Long enough comment"));
        assert_eq!(result, Err(ValidationError::RatingOutOfRange(6)));
        assert_eq!(state.reviews.len(), 4);
    }

    #[test]
    fn set_reviews_replaces_collection() {
        ReducerTest::new(FeedbackReducer::new())
            .with_env(())
            .given_state(FeedbackState::default())
            .when_actions([
                FeedbackAction::SetLoading(true),
                FeedbackAction::SetReviews { reviews: sample() },
            ])
            .then_state(|state| {
                assert_eq!(state.reviews.len(), 4);
                assert!(!state.loading);
            })
            .run();
    }

    #[test]
    fn empty_aggregate_has_no_average_and_zero_percentages() {
        let summary = aggregate(&[]);
        assert!(summary.is_empty());
        assert_eq!(summary.average, None);
        assert_eq!(summary.buckets.map(|b| b.stars), [5, 4, 3, 2, 1]);
        assert!(summary.buckets.iter().all(|b| b.count == 0 && b.percentage == 0.0));
    }

    #[test]
    fn aggregate_counts_each_star_value() {
        let summary = FeedbackState::new(sample()).aggregate();
        assert_eq!(summary.total, 4);
        assert_eq!(summary.average, Some(4.5));
        assert_eq!(summary.bucket(5).map(|b| b.count), Some(2));
        assert_eq!(summary.bucket(4).map(|b| b.percentage), Some(50.0));
        assert_eq!(summary.bucket(1).map(|b| b.percentage), Some(0.0));
        assert!(summary.bucket(0).is_none());
    }

    #[test]
    fn filter_by_rating_and_text() {
        let reviews = sample();
        let fives = filter_reviews(&reviews, &ReviewFilter::new().with_rating(5));
        assert_eq!(ids(&fives), vec!["1", "3"]);

        let by_author = filter_reviews(&reviews, &ReviewFilter::new().with_query("PATEL"));
        assert_eq!(ids(&by_author), vec!["4"]);

        let by_title = filter_reviews(&reviews, &ReviewFilter::new().with_query("meenakshi"));
        assert_eq!(by_title.len(), 4);

        let combined = ReviewFilter::new().with_rating(4).with_query("beach");
        assert_eq!(ids(&filter_reviews(&reviews, &combined)), vec!["4"]);
    }

    #[test]
    fn rating_names_parse_or_fall_back_to_all() {
        assert_eq!(ReviewFilter::new().rating_named("3").rating, Some(3));
        assert_eq!(ReviewFilter::new().rating_named("all").rating, None);
        assert_eq!(ReviewFilter::new().rating_named("9").rating, None);
        assert_eq!(ReviewFilter::new().with_rating(2).rating_named("many").rating, None);
    }

    #[test]
    fn sorts_by_date_and_rating() {
        let reviews = sample();
        assert_eq!(ids(&sort_reviews(&reviews, ReviewSort::Oldest)), vec!["4", "3", "2", "1"]);
        assert_eq!(ids(&sort_reviews(&reviews, ReviewSort::Newest)), vec!["1", "2", "3", "4"]);
        assert_eq!(
            ids(&sort_reviews(&reviews, ReviewSort::HighestRating)),
            vec!["1", "3", "2", "4"]
        );
        assert_eq!(
            ids(&sort_reviews(&reviews, ReviewSort::LowestRating)),
            vec!["2", "4", "1", "3"]
        );
    }

    #[test]
    fn named_sort_accepts_select_values() {
        let reviews = sample();
        assert_eq!(
            sort_reviews_named(&reviews, "highest"),
            sort_reviews(&reviews, ReviewSort::HighestRating)
        );
        assert_eq!(
            sort_reviews_named(&reviews, "lowestRating"),
            sort_reviews(&reviews, ReviewSort::LowestRating)
        );
        assert_eq!(sort_reviews_named(&reviews, "bogus"), reviews);
    }
}
