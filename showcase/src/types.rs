//! Domain types for the Tamil Tours showcase.
//!
//! Users, tours and reviews as they appear in the seed fixture and flow
//! through the session, catalog and feedback stores. Field names on the wire
//! are camelCase to match the fixture schema.

use crate::error::ValidationError;
use crate::validation::{ensure_present, is_valid_email};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for a user
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wraps an existing identifier
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Creates a fresh random identifier
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier for a tour
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TourId(String);

impl TourId {
    /// Wraps an existing identifier
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TourId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier for a review
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewId(String);

impl ReviewId {
    /// Wraps an existing identifier
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Creates a fresh random identifier
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the identifier as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Users
// ============================================================================

/// Access role of a signed-in user
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular visitor
    #[default]
    User,
    /// Administrator with access to the dashboard
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => f.write_str("user"),
            Self::Admin => f.write_str("admin"),
        }
    }
}

/// A signed-in identity
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: UserId,
    /// Display name
    pub name: String,
    /// Email address
    pub email: String,
    /// Access role
    pub role: Role,
}

impl User {
    /// Creates a new user
    #[must_use]
    pub fn new(id: UserId, name: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            role,
        }
    }

    /// Returns true for administrators
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }

    /// Checks that the identity is well-formed
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the id or name is blank or the email
    /// is not shaped like an address.
    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_present("user id", self.id.as_str())?;
        ensure_present("name", &self.name)?;
        if !is_valid_email(&self.email) {
            return Err(ValidationError::InvalidEmail(self.email.clone()));
        }
        Ok(())
    }
}

// ============================================================================
// Tours
// ============================================================================

/// Tour category
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Cultural walks and heritage sites
    Culture,
    /// Hills, gardens and coastline
    Nature,
    /// Temple tours
    Temples,
    /// Resort stays
    Resorts,
}

impl Category {
    /// Every category, in display order
    pub const ALL: [Self; 4] = [Self::Culture, Self::Nature, Self::Temples, Self::Resorts];

    /// Returns the category name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Culture => "Culture",
            Self::Nature => "Nature",
            Self::Temples => "Temples",
            Self::Resorts => "Resorts",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category selection for the catalog view
///
/// Parsing never fails: a name that is neither `All` nor a known category
/// is kept as [`CategoryFilter::Unrecognized`] and matches no tour.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CategoryFilter {
    /// Every tour
    #[default]
    All,
    /// Tours of a single category
    Only(Category),
    /// A category name the catalog does not know
    Unrecognized(String),
}

impl CategoryFilter {
    /// Parses a category name, case-insensitively
    #[must_use]
    pub fn parse(name: &str) -> Self {
        let name = name.trim();
        if name.eq_ignore_ascii_case("all") {
            return Self::All;
        }
        Category::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(name))
            .map_or_else(|| Self::Unrecognized(name.to_string()), Self::Only)
    }

    /// Returns true if a tour of `category` belongs in the view
    #[must_use]
    pub fn matches(&self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(selected) => *selected == category,
            Self::Unrecognized(_) => false,
        }
    }
}

impl From<Category> for CategoryFilter {
    fn from(category: Category) -> Self {
        Self::Only(category)
    }
}

impl FromStr for CategoryFilter {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("All"),
            Self::Only(category) => category.fmt(f),
            Self::Unrecognized(name) => f.write_str(name),
        }
    }
}

/// An audio tour offering
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tour {
    /// Unique identifier
    pub id: TourId,
    /// Tour title
    pub title: String,
    /// District the tour takes place in
    pub district: String,
    /// Display duration, e.g. `"45 mins"`
    pub duration: String,
    /// Average rating between 0.0 and 5.0
    pub rating: f64,
    /// Cover image URL
    pub image: String,
    /// Long description
    pub description: String,
    /// Category
    pub category: Category,
    /// Optional audio track URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    /// Price in rupees
    pub price: u32,
}

impl Tour {
    /// Minutes encoded at the start of [`Tour::duration`]
    #[must_use]
    pub fn duration_minutes(&self) -> u32 {
        parse_duration_minutes(&self.duration)
    }

    /// Checks that the record is well-formed
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the id or title is blank or the rating
    /// lies outside 0.0 to 5.0.
    pub fn validate(&self) -> Result<(), ValidationError> {
        ensure_present("tour id", self.id.as_str())?;
        ensure_present("title", &self.title)?;
        if !(0.0..=5.0).contains(&self.rating) {
            return Err(ValidationError::TourRatingOutOfRange(self.rating));
        }
        Ok(())
    }
}

/// Reads the leading minute count of a duration label
///
/// `"45 mins"` is 45. Labels that do not start with a number count as 0.
#[must_use]
pub fn parse_duration_minutes(label: &str) -> u32 {
    let label = label.trim_start();
    let digits = label
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(label, |(end, _)| &label[..end]);
    digits.parse().unwrap_or(0)
}

// ============================================================================
// Reviews
// ============================================================================

/// A visitor's review of a tour
///
/// `tour_title` is captured when the review is written and is not updated
/// if the tour is renamed later.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// Unique identifier
    pub id: ReviewId,
    /// Author display name
    #[serde(rename = "userName")]
    pub author_name: String,
    /// Author avatar URL
    #[serde(rename = "userAvatar")]
    pub author_avatar: String,
    /// Star rating from 1 to 5
    pub rating: u8,
    /// Review text
    pub comment: String,
    /// Submission date
    pub date: NaiveDate,
    /// Reviewed tour
    pub tour_id: TourId,
    /// Title of the reviewed tour at submission time
    #[serde(rename = "tourName")]
    pub tour_title: String,
    /// Whether the author is a verified visitor
    pub verified: bool,
}

impl Review {
    /// Checks the submission rules
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the rating is outside 1 to 5, the
    /// comment is shorter than the minimum, or the tour id is blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        crate::validation::validate_rating(self.rating)?;
        crate::validation::validate_comment(&self.comment)?;
        ensure_present("tour id", self.tour_id.as_str())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_filter_parses_known_names() {
        assert_eq!(CategoryFilter::parse("All"), CategoryFilter::All);
        assert_eq!(CategoryFilter::parse("nature"), CategoryFilter::Only(Category::Nature));
        assert_eq!(
            CategoryFilter::parse("Beaches"),
            CategoryFilter::Unrecognized("Beaches".to_string())
        );
    }

    #[test]
    fn unrecognized_filter_matches_nothing() {
        let filter = CategoryFilter::parse("Beaches");
        assert!(Category::ALL.into_iter().all(|c| !filter.matches(c)));
        assert!(Category::ALL.into_iter().all(|c| CategoryFilter::All.matches(c)));
    }

    #[test]
    fn duration_minutes_reads_leading_number() {
        assert_eq!(parse_duration_minutes("45 mins"), 45);
        assert_eq!(parse_duration_minutes("  120min"), 120);
        assert_eq!(parse_duration_minutes("about an hour"), 0);
        assert_eq!(parse_duration_minutes(""), 0);
    }

    #[test]
    fn user_validation_checks_email_shape() {
        let user = User::new(UserId::new("1"), "Demo", "demo@x.com", Role::User);
        assert!(user.validate().is_ok());

        let broken = User::new(UserId::new("1"), "Demo", "demo-at-x", Role::User);
        assert_eq!(
            broken.validate(),
            Err(ValidationError::InvalidEmail("demo-at-x".to_string()))
        );

        let nameless = User::new(UserId::new("1"), "  ", "demo@x.com", Role::User);
        assert_eq!(nameless.validate(), Err(ValidationError::MissingField("name")));
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(serde_json::from_str::<Role>("\"user\"").unwrap(), Role::User);
    }

    #[test]
    fn tour_rating_must_stay_in_range() {
        let mut tour = Tour {
            id: TourId::new("1"),
            title: "Meenakshi Temple Heritage Tour".to_string(),
            district: "Madurai".to_string(),
            duration: "45 mins".to_string(),
            rating: 4.8,
            image: String::new(),
            description: String::new(),
            category: Category::Temples,
            audio_url: None,
            price: 299,
        };
        assert!(tour.validate().is_ok());

        tour.rating = 5.5;
        assert_eq!(tour.validate(), Err(ValidationError::TourRatingOutOfRange(5.5)));
    }
}
