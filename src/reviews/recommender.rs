// src/reviews/recommender.rs
//! Average rating and best-rated reviews.

use anyhow::Result;
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;
use tracing::warn;

use super::ReviewRecord;

pub const TOP_REVIEWS: usize = 5;

fn leading_number() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\s*(\d+(?:[.,]\d+)?)").expect("rating pattern is valid"))
}

/// Leading numeral of a star-rating text: "4.5 out of 5 stars" → 4.5.
/// A decimal comma is accepted ("4,0 von 5 Sternen").
pub fn parse_rating(text: &str) -> Option<f64> {
    leading_number()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().replace(',', ".").parse().ok())
}

#[derive(Debug, Clone, Serialize)]
pub struct RatedReview {
    pub review: String,
    pub star_rating: String,
    pub rating: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub average_rating: f64,
    pub rated_reviews: usize,
    pub skipped_reviews: usize,
    pub top_reviews: Vec<RatedReview>,
}

/// Mean rating and the [`TOP_REVIEWS`] highest-rated reviews. Ties keep
/// their original order. Records without a numeric rating are skipped;
/// if none parse, this fails.
pub fn recommend(reviews: &[ReviewRecord]) -> Result<Recommendation> {
    let mut rated: Vec<RatedReview> = Vec::with_capacity(reviews.len());
    let mut skipped = 0;

    for record in reviews {
        match parse_rating(&record.star_rating) {
            Some(rating) => rated.push(RatedReview {
                review: record.review.clone(),
                star_rating: record.star_rating.clone(),
                rating,
            }),
            None => {
                warn!("Skipping unparsable rating: {:?}", record.star_rating);
                skipped += 1;
            }
        }
    }

    if rated.is_empty() {
        anyhow::bail!(
            "None of the {} reviews has a numeric star rating",
            reviews.len()
        );
    }

    let average_rating = rated.iter().map(|r| r.rating).sum::<f64>() / rated.len() as f64;
    let rated_reviews = rated.len();

    rated.sort_by(|a, b| b.rating.total_cmp(&a.rating));
    rated.truncate(TOP_REVIEWS);

    Ok(Recommendation {
        average_rating,
        rated_reviews,
        skipped_reviews: skipped,
        top_reviews: rated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(review: &str, rating: &str) -> ReviewRecord {
        ReviewRecord {
            review: review.to_string(),
            star_rating: rating.to_string(),
        }
    }

    #[test]
    fn test_parse_rating_formats() {
        assert_eq!(parse_rating("4.5 out of 5 stars"), Some(4.5));
        assert_eq!(parse_rating("4"), Some(4.0));
        assert_eq!(parse_rating(" 3.0"), Some(3.0));
        assert_eq!(parse_rating("4,0 von 5 Sternen"), Some(4.0));
        assert_eq!(parse_rating("five stars"), None);
        assert_eq!(parse_rating(""), None);
    }

    #[test]
    fn test_average_and_top_five() {
        let reviews = vec![
            record("a", "1.0 out of 5 stars"),
            record("b", "5.0 out of 5 stars"),
            record("c", "3.0 out of 5 stars"),
            record("d", "5.0 out of 5 stars"),
            record("e", "2.0 out of 5 stars"),
            record("f", "4.0 out of 5 stars"),
            record("g", "2.0 out of 5 stars"),
        ];

        let rec = recommend(&reviews).unwrap();
        assert!((rec.average_rating - 22.0 / 7.0).abs() < 1e-12);
        assert_eq!(rec.rated_reviews, 7);

        let order: Vec<&str> = rec.top_reviews.iter().map(|r| r.review.as_str()).collect();
        assert_eq!(order, vec!["b", "d", "f", "c", "e"]);
    }

    #[test]
    fn test_unparsable_ratings_are_skipped() {
        let reviews = vec![record("a", "n/a"), record("b", "4 out of 5")];
        let rec = recommend(&reviews).unwrap();
        assert_eq!(rec.rated_reviews, 1);
        assert_eq!(rec.skipped_reviews, 1);
        assert_eq!(rec.average_rating, 4.0);
    }

    #[test]
    fn test_no_ratings_is_an_error() {
        assert!(recommend(&[record("a", "great")]).is_err());
        assert!(recommend(&[]).is_err());
    }
}
