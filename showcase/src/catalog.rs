//! Catalog store: the tour collection and its category-filtered view.
//!
//! Sorting and searching are read-time queries over any view and never touch
//! store state.

use crate::error::UnknownSortKey;
use crate::types::{CategoryFilter, Tour, TourId};
use std::fmt;
use std::str::FromStr;
use tamil_tours_core::{SmallVec, effect::Effect, reducer::Reducer};

// ============================================================================
// State
// ============================================================================

/// Tour collection in seed order plus the derived view
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CatalogState {
    /// Every tour, in insertion order
    pub tours: Vec<Tour>,
    /// Tours matching `selected`, in insertion order
    pub filtered: Vec<Tour>,
    /// Active category filter
    pub selected: CategoryFilter,
    /// A catalog load is in flight
    pub loading: bool,
}

impl CatalogState {
    /// Creates a catalog showing every tour
    #[must_use]
    pub fn new(tours: Vec<Tour>) -> Self {
        let mut state = Self::default();
        state.set_catalog(tours);
        state
    }

    /// Replaces the collection and resets the view to show everything
    ///
    /// Duplicate ids are kept as given.
    pub fn set_catalog(&mut self, tours: Vec<Tour>) {
        self.filtered.clone_from(&tours);
        self.tours = tours;
        self.selected = CategoryFilter::All;
        self.loading = false;
    }

    /// Recomputes the view for `filter`
    pub fn filter_by_category(&mut self, filter: CategoryFilter) {
        self.filtered = self
            .tours
            .iter()
            .filter(|tour| filter.matches(tour.category))
            .cloned()
            .collect();
        self.selected = filter;
    }

    /// Looks up a tour by id
    #[must_use]
    pub fn find(&self, id: &TourId) -> Option<&Tour> {
        self.tours.iter().find(|tour| &tour.id == id)
    }
}

// ============================================================================
// Actions
// ============================================================================

/// Actions understood by [`CatalogReducer`]
#[derive(Clone, Debug)]
pub enum CatalogAction {
    /// Replace the whole collection
    SetCatalog {
        /// New tours, in display order
        tours: Vec<Tour>,
    },
    /// Show one category, or all of them
    FilterByCategory {
        /// Selection
        filter: CategoryFilter,
    },
    /// Toggle the loading flag
    SetLoading(bool),
}

// ============================================================================
// Reducer
// ============================================================================

/// Reducer for the catalog store
#[derive(Clone, Debug, Default)]
pub struct CatalogReducer;

impl CatalogReducer {
    /// Creates a new `CatalogReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for CatalogReducer {
    type State = CatalogState;
    type Action = CatalogAction;
    type Environment = ();

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            CatalogAction::SetCatalog { tours } => {
                tracing::debug!(count = tours.len(), "Catalog replaced");
                state.set_catalog(tours);
            },
            CatalogAction::FilterByCategory { filter } => {
                if let CategoryFilter::Unrecognized(name) = &filter {
                    tracing::debug!(category = %name, "Unknown category selected");
                }
                state.filter_by_category(filter);
            },
            CatalogAction::SetLoading(loading) => {
                state.loading = loading;
            },
        }
        SmallVec::new()
    }
}

// ============================================================================
// Queries
// ============================================================================

/// Orderings offered by the catalog view
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TourSort {
    /// Highest rating first
    Rating,
    /// Cheapest first
    Price,
    /// Shortest first, by the leading minute count of the duration label
    Duration,
}

impl TourSort {
    /// Returns the key name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rating => "rating",
            Self::Price => "price",
            Self::Duration => "duration",
        }
    }
}

impl fmt::Display for TourSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TourSort {
    type Err = UnknownSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rating" => Ok(Self::Rating),
            "price" => Ok(Self::Price),
            "duration" => Ok(Self::Duration),
            _ => Err(UnknownSortKey(s.to_string())),
        }
    }
}

/// Returns `view` ordered by `key`
///
/// All orderings are stable: equal keys keep their relative order.
#[must_use]
pub fn sort_tours(view: &[Tour], key: TourSort) -> Vec<Tour> {
    let mut sorted = view.to_vec();
    match key {
        TourSort::Rating => sorted.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        TourSort::Price => sorted.sort_by_key(|tour| tour.price),
        TourSort::Duration => sorted.sort_by_key(Tour::duration_minutes),
    }
    sorted
}

/// Like [`sort_tours`], keyed by name
///
/// An unknown key returns the view unchanged.
#[must_use]
pub fn sort_tours_named(view: &[Tour], key: &str) -> Vec<Tour> {
    key.parse::<TourSort>()
        .map_or_else(|_| view.to_vec(), |key| sort_tours(view, key))
}

/// Tours whose title, district or description contains `query`,
/// case-insensitively
///
/// A blank query returns the view unchanged.
#[must_use]
pub fn search_tours(view: &[Tour], query: &str) -> Vec<Tour> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return view.to_vec();
    }
    view.iter()
        .filter(|tour| {
            [&tour.title, &tour.district, &tour.description]
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}
