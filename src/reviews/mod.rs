// src/reviews/mod.rs
//! Product review scraping and analysis.

pub mod export;
pub mod fetcher;
pub mod jobs;
pub mod model;
pub mod recommender;

pub use fetcher::{FetchOutcome, HttpPageSource, PageResponse, PageSource, ReviewFetcher, StopReason};
pub use jobs::{JobStatus, ScrapeJob, ScrapeJobs};
pub use model::{LabeledReview, ReviewModel, SUMMARY_REVIEW_LIMIT};
pub use recommender::{recommend, Recommendation};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub review: String,
    pub star_rating: String,
}
