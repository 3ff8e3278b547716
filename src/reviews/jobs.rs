// src/reviews/jobs.rs
//! Background scrape jobs with incremental results and cancellation.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, error, info};
use uuid::Uuid;

use super::fetcher::{PageSource, ReviewFetcher, StopReason};
use super::ReviewRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Running,
    Completed,
    Cancelled,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScrapeJob {
    pub id: Uuid,
    pub base_url: String,
    pub pages_requested: u32,
    pub pages_fetched: u32,
    pub status: JobStatus,
    pub reviews: Vec<ReviewRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<StopReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

struct JobEntry {
    job: ScrapeJob,
    cancel: Arc<AtomicBool>,
}

const DEFAULT_RETAINED_JOBS: usize = 50;

/// Job registry. Holds every running job and at most `retained` finished
/// ones; the oldest finished jobs are evicted first.
#[derive(Clone)]
pub struct ScrapeJobs {
    inner: Arc<RwLock<HashMap<Uuid, JobEntry>>>,
    retained: usize,
}

impl Default for ScrapeJobs {
    fn default() -> Self {
        Self::with_retention(DEFAULT_RETAINED_JOBS)
    }
}

impl ScrapeJobs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_retention(retained: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            retained,
        }
    }

    /// Spawn a fetch on the runtime and return its job id immediately.
    pub fn start<S>(&self, fetcher: Arc<ReviewFetcher<S>>, base_url: String, pages: u32) -> Uuid
    where
        S: PageSource + 'static,
    {
        let id = Uuid::new_v4();
        let cancel = Arc::new(AtomicBool::new(false));

        self.write(|jobs| {
            jobs.insert(
                id,
                JobEntry {
                    job: ScrapeJob {
                        id,
                        base_url: base_url.clone(),
                        pages_requested: pages,
                        pages_fetched: 0,
                        status: JobStatus::Running,
                        reviews: Vec::new(),
                        stop_reason: None,
                        error: None,
                        started_at: Utc::now(),
                        finished_at: None,
                    },
                    cancel: cancel.clone(),
                },
            );
            evict_oldest_finished(jobs, self.retained);
        });
        info!("Started scrape job {} for {} ({} pages)", id, base_url, pages);

        let registry = self.clone();
        let fetch = tokio::spawn(async move {
            fetcher
                .fetch(&base_url, pages, &cancel, |page, reviews| {
                    registry.update(id, |job| {
                        job.pages_fetched = page;
                        job.reviews.extend_from_slice(reviews);
                    });
                })
                .await
        });

        let registry = self.clone();
        tokio::spawn(async move {
            match fetch.await {
                Ok(outcome) => {
                    info!(
                        "Scrape job {} finished: {} reviews from {} pages",
                        id,
                        outcome.reviews.len(),
                        outcome.pages_fetched
                    );
                    registry.finish(id, |job| {
                        job.status = match outcome.stop_reason {
                            StopReason::Cancelled { .. } => JobStatus::Cancelled,
                            _ => JobStatus::Completed,
                        };
                        job.pages_fetched = outcome.pages_fetched;
                        job.reviews = outcome.reviews;
                        job.stop_reason = Some(outcome.stop_reason);
                        job.finished_at = Some(Utc::now());
                    });
                }
                Err(e) => {
                    error!("Scrape job {} failed: {}", id, e);
                    registry.finish(id, |job| {
                        job.status = JobStatus::Failed;
                        job.error = Some(e.to_string());
                        job.finished_at = Some(Utc::now());
                    });
                }
            }
        });

        id
    }

    /// Register reviews loaded from elsewhere (e.g. a CSV export) as a finished session.
    pub fn import(&self, reviews: Vec<ReviewRecord>, source: String) -> Uuid {
        let id = Uuid::new_v4();
        let now = Utc::now();
        info!("Imported {} reviews from {} as session {}", reviews.len(), source, id);

        self.write(|jobs| {
            jobs.insert(
                id,
                JobEntry {
                    job: ScrapeJob {
                        id,
                        base_url: source,
                        pages_requested: 0,
                        pages_fetched: 0,
                        status: JobStatus::Completed,
                        reviews,
                        stop_reason: None,
                        error: None,
                        started_at: now,
                        finished_at: Some(now),
                    },
                    cancel: Arc::new(AtomicBool::new(false)),
                },
            );
            evict_oldest_finished(jobs, self.retained);
        });

        id
    }

    pub fn get(&self, id: Uuid) -> Option<ScrapeJob> {
        self.read(|jobs| jobs.get(&id).map(|entry| entry.job.clone()))
    }

    /// Reviews collected so far, or `None` for an unknown job.
    pub fn reviews(&self, id: Uuid) -> Option<Vec<ReviewRecord>> {
        self.read(|jobs| jobs.get(&id).map(|entry| entry.job.reviews.clone()))
    }

    /// Request cancellation. Returns false for unknown or finished jobs.
    pub fn cancel(&self, id: Uuid) -> bool {
        self.read(|jobs| match jobs.get(&id) {
            Some(entry) if entry.job.status == JobStatus::Running => {
                entry.cancel.store(true, Ordering::SeqCst);
                info!("Cancellation requested for scrape job {}", id);
                true
            }
            _ => false,
        })
    }

    /// Number of jobs currently held, running or finished.
    pub fn len(&self) -> usize {
        self.read(|jobs| jobs.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply the final state and evict in one write.
    fn finish(&self, id: Uuid, apply: impl FnOnce(&mut ScrapeJob)) {
        self.write(|jobs| {
            if let Some(entry) = jobs.get_mut(&id) {
                apply(&mut entry.job);
            }
            evict_oldest_finished(jobs, self.retained);
        });
    }

    fn update(&self, id: Uuid, apply: impl FnOnce(&mut ScrapeJob)) {
        self.write(|jobs| {
            if let Some(entry) = jobs.get_mut(&id) {
                apply(&mut entry.job);
            }
        });
    }

    fn read<T>(&self, f: impl FnOnce(&HashMap<Uuid, JobEntry>) -> T) -> T {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    fn write<T>(&self, f: impl FnOnce(&mut HashMap<Uuid, JobEntry>) -> T) -> T {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

fn evict_oldest_finished(jobs: &mut HashMap<Uuid, JobEntry>, retained: usize) {
    let mut finished: Vec<(DateTime<Utc>, Uuid)> = jobs
        .values()
        .filter(|entry| entry.job.status != JobStatus::Running)
        .map(|entry| {
            (
                entry.job.finished_at.unwrap_or(entry.job.started_at),
                entry.job.id,
            )
        })
        .collect();

    if finished.len() <= retained {
        return;
    }

    finished.sort();
    let excess = finished.len() - retained;
    for (_, id) in finished.into_iter().take(excess) {
        jobs.remove(&id);
        debug!("Evicted finished scrape job {}", id);
    }
}
