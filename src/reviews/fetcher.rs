// src/reviews/fetcher.rs
use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::ReviewRecord;
use crate::config::ScraperConfig;

const REVIEW_SELECTOR: &str = r#"[data-hook="review"]"#;
const BODY_SELECTOR: &str = r#"[data-hook="review-body"]"#;
const RATING_SELECTOR: &str =
    r#"[data-hook="review-star-rating"], [data-hook="cmps-review-star-rating"]"#;

pub struct PageResponse {
    pub status: u16,
    pub body: String,
}

/// Something that can GET a page. Errors are transport failures; a
/// non-success status is still a response.
pub trait PageSource: Send + Sync {
    fn get(&self, url: &str) -> impl Future<Output = Result<PageResponse>> + Send;
}

pub struct HttpPageSource {
    client: Client,
}

impl HttpPageSource {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

impl PageSource for HttpPageSource {
    async fn get(&self, url: &str) -> Result<PageResponse> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to fetch review page")?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .context("Failed to read response body")?;

        Ok(PageResponse { status, body })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StopReason {
    Completed,
    HttpStatus { page: u32, status: u16 },
    TransportError { page: u32, message: String },
    Cancelled { page: u32 },
}

#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub reviews: Vec<ReviewRecord>,
    pub pages_fetched: u32,
    pub stop_reason: StopReason,
}

pub struct ReviewFetcher<S: PageSource = HttpPageSource> {
    source: S,
    max_retries: u32,
    retry_backoff: Duration,
}

impl ReviewFetcher<HttpPageSource> {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        Ok(Self::with_source(HttpPageSource::new(config)?, config))
    }
}

impl<S: PageSource> ReviewFetcher<S> {
    pub fn with_source(source: S, config: &ScraperConfig) -> Self {
        Self {
            source,
            max_retries: config.max_retries,
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
        }
    }

    /// Fetch pages `1..=pages`, calling `on_page` with each page's reviews.
    ///
    /// Any status other than 200, a page that keeps failing after retries,
    /// or `cancel` being set ends the loop; reviews gathered so far are kept.
    pub async fn fetch<F>(
        &self,
        base_url: &str,
        pages: u32,
        cancel: &AtomicBool,
        mut on_page: F,
    ) -> FetchOutcome
    where
        F: FnMut(u32, &[ReviewRecord]) + Send,
    {
        let mut reviews = Vec::new();
        let mut pages_fetched = 0;
        let mut stop_reason = StopReason::Completed;

        for page in 1..=pages {
            if cancel.load(Ordering::SeqCst) {
                info!("Review fetch cancelled before page {}", page);
                stop_reason = StopReason::Cancelled { page };
                break;
            }

            let url = page_url(base_url, page);
            let response = match self.get_with_retries(&url, cancel).await {
                Ok(response) => response,
                Err(_) if cancel.load(Ordering::SeqCst) => {
                    info!("Review fetch cancelled while retrying page {}", page);
                    stop_reason = StopReason::Cancelled { page };
                    break;
                }
                Err(e) => {
                    warn!("Giving up on page {}: {:#}", page, e);
                    stop_reason = StopReason::TransportError {
                        page,
                        message: format!("{:#}", e),
                    };
                    break;
                }
            };

            if response.status != 200 {
                warn!(
                    "Failed to retrieve page {}: HTTP {}",
                    page, response.status
                );
                stop_reason = StopReason::HttpStatus {
                    page,
                    status: response.status,
                };
                break;
            }

            let page_reviews = match parse_reviews(&response.body) {
                Ok(page_reviews) => page_reviews,
                Err(e) => {
                    warn!("Failed to parse page {}: {:#}", page, e);
                    Vec::new()
                }
            };

            info!("Page {}: {} reviews", page, page_reviews.len());
            pages_fetched = page;
            on_page(page, &page_reviews);
            reviews.extend(page_reviews);
        }

        FetchOutcome {
            reviews,
            pages_fetched,
            stop_reason,
        }
    }

    async fn get_with_retries(&self, url: &str, cancel: &AtomicBool) -> Result<PageResponse> {
        let mut attempt = 0;
        loop {
            match self.source.get(url).await {
                Ok(response) => return Ok(response),
                Err(e) if attempt < self.max_retries && !cancel.load(Ordering::SeqCst) => {
                    attempt += 1;
                    warn!(
                        "Request to {} failed (attempt {}/{}): {:#}",
                        url,
                        attempt,
                        self.max_retries + 1,
                        e
                    );
                    tokio::time::sleep(self.retry_backoff * attempt).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

pub fn page_url(base_url: &str, page: u32) -> String {
    format!("{}&pageNumber={}", base_url, page)
}

/// Extract review records from one page of HTML. Blocks without both a
/// non-empty body and a rating are skipped.
pub fn parse_reviews(html: &str) -> Result<Vec<ReviewRecord>> {
    let review_selector = parse_selector(REVIEW_SELECTOR)?;
    let body_selector = parse_selector(BODY_SELECTOR)?;
    let rating_selector = parse_selector(RATING_SELECTOR)?;

    let document = Html::parse_document(html);
    let mut reviews = Vec::new();

    for block in document.select(&review_selector) {
        let review = first_text(&block, &body_selector);
        let star_rating = first_text(&block, &rating_selector);

        match (review, star_rating) {
            (Some(review), Some(star_rating)) => reviews.push(ReviewRecord {
                review,
                star_rating,
            }),
            _ => debug!("Skipping review block without body or rating"),
        }
    }

    Ok(reviews)
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| anyhow::anyhow!("Invalid selector {}: {}", selector, e))
}

fn first_text(block: &ElementRef<'_>, selector: &Selector) -> Option<String> {
    block
        .select(selector)
        .next()
        .map(|element| clean_text(&element.text().collect::<Vec<_>>().join(" ")))
        .filter(|text| !text.is_empty())
}

fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
