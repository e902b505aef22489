//! Property tests for the catalog and feedback queries

#![allow(clippy::unwrap_used)]

use chrono::NaiveDate;
use proptest::prelude::*;
use tamil_tours_showcase::catalog::{TourSort, search_tours, sort_tours};
use tamil_tours_showcase::feedback::{ReviewSort, aggregate, sort_reviews};
use tamil_tours_showcase::{
    Category, CategoryFilter, CatalogState, FeedbackState, Review, ReviewId, Tour, TourId,
};

fn category() -> impl Strategy<Value = Category> {
    prop::sample::select(Category::ALL.to_vec())
}

fn tour() -> impl Strategy<Value = Tour> {
    (
        "[0-9]{1,3}",
        category(),
        0u32..=50,
        0u32..1000,
        0u32..200,
        "[a-z ]{0,12}",
    )
        .prop_map(|(id, category, tenths, price, minutes, title)| Tour {
            id: TourId::new(id),
            title,
            district: "Madurai".to_string(),
            duration: format!("{minutes} mins"),
            rating: f64::from(tenths) / 10.0,
            image: String::new(),
            description: String::new(),
            category,
            audio_url: None,
            price,
        })
}

fn review() -> impl Strategy<Value = Review> {
    ("[0-9]{1,3}", 1u8..=5, 1u32..=28, "[a-z]{5,10} [a-z]{5,20}").prop_map(|(id, rating, day, comment)| {
        Review {
            id: ReviewId::new(id),
            author_name: "Visitor".to_string(),
            author_avatar: String::new(),
            rating,
            comment,
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            tour_id: TourId::new("1"),
            tour_title: "Tour".to_string(),
            verified: true,
        }
    })
}

proptest! {
    #[test]
    fn filter_is_the_matching_subsequence(tours in prop::collection::vec(tour(), 0..20), selected in category()) {
        let mut state = CatalogState::new(tours.clone());
        state.filter_by_category(CategoryFilter::Only(selected));

        let expected: Vec<Tour> = tours.iter().filter(|t| t.category == selected).cloned().collect();
        prop_assert_eq!(&state.filtered, &expected);

        state.filter_by_category(CategoryFilter::All);
        prop_assert_eq!(&state.filtered, &tours);
    }

    #[test]
    fn rating_sort_is_non_increasing_stable_and_idempotent(tours in prop::collection::vec(tour(), 0..20)) {
        // Ids record the original position
        let tours: Vec<Tour> = tours
            .into_iter()
            .enumerate()
            .map(|(index, mut tour)| {
                tour.id = TourId::new(index.to_string());
                tour
            })
            .collect();
        let position = |tour: &Tour| tour.id.as_str().parse::<usize>().unwrap();

        let once = sort_tours(&tours, TourSort::Rating);
        prop_assert_eq!(once.len(), tours.len());
        for pair in once.windows(2) {
            prop_assert!(pair[0].rating >= pair[1].rating);
            if pair[0].rating == pair[1].rating {
                prop_assert!(position(&pair[0]) < position(&pair[1]));
            }
        }

        prop_assert_eq!(sort_tours(&once, TourSort::Rating), once);
    }

    #[test]
    fn blank_search_is_identity(tours in prop::collection::vec(tour(), 0..10), blank in "[ \t]{0,4}") {
        prop_assert_eq!(search_tours(&tours, &blank), tours);
    }

    #[test]
    fn valid_submission_goes_first(reviews in prop::collection::vec(review(), 0..10), fresh in review()) {
        let mut state = FeedbackState::new(reviews.clone());
        state.submit(fresh.clone()).unwrap();
        prop_assert_eq!(state.reviews.len(), reviews.len() + 1);
        prop_assert_eq!(&state.reviews[0], &fresh);
    }

    #[test]
    fn short_comment_never_changes_collection(reviews in prop::collection::vec(review(), 0..10), comment in "[a-z]{0,9}") {
        let mut state = FeedbackState::new(reviews.clone());
        let mut short = reviews.first().cloned().unwrap_or_else(|| Review {
            id: ReviewId::new("x"),
            author_name: String::new(),
            author_avatar: String::new(),
            rating: 3,
            comment: String::new(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            tour_id: TourId::new("1"),
            tour_title: String::new(),
            verified: true,
        });
        short.comment = comment;
        prop_assert!(state.submit(short).is_err());
        prop_assert_eq!(state.reviews, reviews);
    }

    #[test]
    fn histogram_accounts_for_every_review(reviews in prop::collection::vec(review(), 0..30)) {
        let summary = aggregate(&reviews);
        let counted: usize = summary.buckets.iter().map(|b| b.count).sum();
        prop_assert_eq!(counted, reviews.len());

        let percent: f64 = summary.buckets.iter().map(|b| b.percentage).sum();
        if reviews.is_empty() {
            prop_assert!(summary.average.is_none());
            prop_assert!(percent.abs() < f64::EPSILON);
        } else {
            prop_assert!((percent - 100.0).abs() < 1e-6);
            let average = summary.average.unwrap();
            prop_assert!((1.0..=5.0).contains(&average));
        }
    }

    #[test]
    fn date_sorts_are_mirror_orders(reviews in prop::collection::vec(review(), 0..15)) {
        let newest = sort_reviews(&reviews, ReviewSort::Newest);
        let oldest = sort_reviews(&reviews, ReviewSort::Oldest);
        prop_assert!(newest.windows(2).all(|w| w[0].date >= w[1].date));
        prop_assert!(oldest.windows(2).all(|w| w[0].date <= w[1].date));
    }
}
