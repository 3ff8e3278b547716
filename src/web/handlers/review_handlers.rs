// src/web/handlers/review_handlers.rs
use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::reviews::{export, recommend, LabeledReview, Recommendation, ReviewRecord, ScrapeJob};
use crate::web::types::{
    ActionResponse, AppState, CsvResponse, DataResponse, ScrapeRequest, ScrapeStarted,
    StandardErrorResponse, SummaryData,
};

type ErrorJson = Json<StandardErrorResponse>;

const EXPORT_FILENAME: &str = "reviews.csv";

fn parse_job_id(job_id: &str) -> Result<Uuid, ErrorJson> {
    Uuid::parse_str(job_id).map_err(|_| {
        Json(StandardErrorResponse::new(
            format!("Invalid job id '{}'", job_id),
            "INVALID_JOB_ID",
            &["Use the job_id returned when the scrape was started"],
        ))
    })
}

fn job_not_found(id: Uuid) -> ErrorJson {
    Json(StandardErrorResponse::new(
        format!("Scrape job {} not found", id),
        "JOB_NOT_FOUND",
        &["Start a new scrape", "Import a review CSV"],
    ))
}

/// Reviews of a session, failing when the session is unknown or empty.
fn session_reviews(state: &AppState, job_id: &str) -> Result<Vec<ReviewRecord>, ErrorJson> {
    let id = parse_job_id(job_id)?;
    let reviews = state.jobs.reviews(id).ok_or_else(|| job_not_found(id))?;

    if reviews.is_empty() {
        return Err(Json(StandardErrorResponse::new(
            "No reviews collected for this session".to_string(),
            "NO_REVIEWS",
            &[
                "Wait for the scrape to fetch at least one page",
                "Check the product review URL",
            ],
        )));
    }

    Ok(reviews)
}

pub async fn start_scrape_handler(
    request: Json<ScrapeRequest>,
    state: &State<AppState>,
) -> Result<Json<DataResponse<ScrapeStarted>>, ErrorJson> {
    let request = request.into_inner();
    let base_url = request.base_url.trim().to_string();

    if reqwest::Url::parse(&base_url).is_err() {
        return Err(Json(StandardErrorResponse::new(
            format!("Invalid review URL '{}'", base_url),
            "INVALID_URL",
            &["Pass the full product review URL including the scheme"],
        )));
    }

    let pages = state.scraper.clamp_pages(request.pages);
    let id = state.jobs.start(state.fetcher.clone(), base_url, pages);

    Ok(Json(DataResponse::success(
        format!("Scraping {} pages", pages),
        ScrapeStarted {
            job_id: id.to_string(),
            pages,
        },
    )))
}

pub async fn scrape_status_handler(
    job_id: &str,
    state: &State<AppState>,
) -> Result<Json<DataResponse<ScrapeJob>>, ErrorJson> {
    let id = parse_job_id(job_id)?;
    let job = state.jobs.get(id).ok_or_else(|| job_not_found(id))?;

    Ok(Json(DataResponse::success(
        format!(
            "{} reviews from {} pages",
            job.reviews.len(),
            job.pages_fetched
        ),
        job,
    )))
}

pub async fn cancel_scrape_handler(
    job_id: &str,
    state: &State<AppState>,
) -> Result<Json<ActionResponse>, ErrorJson> {
    let id = parse_job_id(job_id)?;
    if state.jobs.get(id).is_none() {
        return Err(job_not_found(id));
    }

    if state.jobs.cancel(id) {
        Ok(Json(ActionResponse::success(
            "Cancellation requested".to_string(),
            "cancel".to_string(),
        )))
    } else {
        Err(Json(StandardErrorResponse::new(
            "Scrape job already finished".to_string(),
            "JOB_FINISHED",
            &["Fetch the job status for its results"],
        )))
    }
}

pub async fn import_reviews_handler(
    csv: String,
    state: &State<AppState>,
) -> Result<Json<DataResponse<ScrapeStarted>>, ErrorJson> {
    let reviews = export::read_csv(csv.as_bytes()).map_err(|e| {
        warn!("Rejected review CSV: {:#}", e);
        Json(StandardErrorResponse::new(
            format!("Invalid review CSV: {:#}", e),
            "INVALID_CSV",
            &["Use the review,star_rating header produced by the export route"],
        ))
    })?;

    if reviews.is_empty() {
        return Err(Json(StandardErrorResponse::new(
            "CSV contains no reviews with both text and rating".to_string(),
            "NO_REVIEWS",
            &["Export a session with at least one review first"],
        )));
    }

    let count = reviews.len();
    let id = state.jobs.import(reviews, "csv upload".to_string());

    Ok(Json(DataResponse::success(
        format!("Imported {} reviews", count),
        ScrapeStarted {
            job_id: id.to_string(),
            pages: 0,
        },
    )))
}

pub async fn summary_handler(
    job_id: &str,
    state: &State<AppState>,
) -> Result<Json<DataResponse<SummaryData>>, ErrorJson> {
    let reviews = session_reviews(state, job_id)?;

    match state.model.summarize(&reviews).await {
        Ok(summary) => {
            info!("Summarized {} reviews for session {}", reviews.len(), job_id);
            Ok(Json(DataResponse::success(
                "Summary generated".to_string(),
                SummaryData {
                    summary,
                    reviews_used: reviews.len().min(crate::reviews::SUMMARY_REVIEW_LIMIT),
                    backend: state.model.backend_name().to_string(),
                },
            )))
        }
        Err(e) => {
            error!("Summarization failed: {:#}", e);
            Err(Json(StandardErrorResponse::new(
                format!("Summarization failed: {:#}", e),
                "MODEL_ERROR",
                &["Check the review model service is running"],
            )))
        }
    }
}

pub async fn sentiment_handler(
    job_id: &str,
    state: &State<AppState>,
) -> Result<Json<DataResponse<Vec<LabeledReview>>>, ErrorJson> {
    let reviews = session_reviews(state, job_id)?;

    match state.model.label(&reviews).await {
        Ok(labeled) => Ok(Json(DataResponse::success(
            format!("Labeled {} reviews", labeled.len()),
            labeled,
        ))),
        Err(e) => {
            error!("Sentiment labeling failed: {:#}", e);
            Err(Json(StandardErrorResponse::new(
                format!("Sentiment analysis failed: {:#}", e),
                "MODEL_ERROR",
                &["Check the review model service is running"],
            )))
        }
    }
}

pub async fn recommendation_handler(
    job_id: &str,
    state: &State<AppState>,
) -> Result<Json<DataResponse<Recommendation>>, ErrorJson> {
    let reviews = session_reviews(state, job_id)?;

    recommend(&reviews)
        .map(|rec| {
            Json(DataResponse::success(
                format!("Average Rating: {:.2}", rec.average_rating),
                rec,
            ))
        })
        .map_err(|e| {
            Json(StandardErrorResponse::new(
                e.to_string(),
                "NO_RATINGS",
                &["None of the star ratings could be read as numbers"],
            ))
        })
}

pub async fn export_handler(job_id: &str, state: &State<AppState>) -> Result<CsvResponse, ErrorJson> {
    let reviews = session_reviews(state, job_id)?;

    export::to_csv_bytes(&reviews)
        .map(|data| CsvResponse::new(data, EXPORT_FILENAME))
        .map_err(|e| {
            error!("CSV export failed: {:#}", e);
            Json(StandardErrorResponse::new(
                "Failed to export reviews".to_string(),
                "EXPORT_ERROR",
                &["Try again in a few moments"],
            ))
        })
}
