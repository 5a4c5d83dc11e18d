//! Where to send a customer after they rate a job.
//!
//! Happy customers go to the public review page; everyone else lands on the
//! internal feedback page so the business hears about problems first.

use crate::site::{Page, BUSINESS};

/// Minimum average rating that sends a customer to the public review page
pub const REVIEW_THRESHOLD: f32 = 4.0;

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

#[derive(Debug, Clone, PartialEq)]
pub enum ReviewDestination {
    External(String),
    Internal(Page),
}

/// Average of the ratings in range. Zero means "not rated" and is skipped,
/// as is anything above the scale.
pub fn average_rating(ratings: &[u8]) -> Option<f32> {
    let counted: Vec<f32> = ratings
        .iter()
        .filter(|r| (MIN_RATING..=MAX_RATING).contains(*r))
        .map(|r| f32::from(*r))
        .collect();

    if counted.is_empty() {
        None
    } else {
        Some(counted.iter().sum::<f32>() / counted.len() as f32)
    }
}

pub fn review_destination(ratings: &[u8], review_url: &str) -> ReviewDestination {
    match average_rating(ratings) {
        Some(avg) if avg >= REVIEW_THRESHOLD => ReviewDestination::External(review_url.to_string()),
        _ => ReviewDestination::Internal(Page::Feedback),
    }
}

/// Destination for a customer of this business, using its public review page
pub fn business_review_destination(ratings: &[u8]) -> ReviewDestination {
    review_destination(ratings, BUSINESS.review_url)
}
