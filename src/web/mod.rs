// src/web/mod.rs
//! JSON API served under `/api`.

pub mod handlers;
pub mod types;

pub use handlers::*;
pub use types::*;

use anyhow::{Context, Result};
use rocket::data::{Limits, ToByteUnit};
use rocket::fairing::{Fairing, Info, Kind};
use rocket::form::Form;
use rocket::http::Header;
use rocket::serde::json::Json;
use rocket::{catchers, get, options, post, routes, Build, Request, Response, Rocket, State};
use std::sync::Arc;
use tracing::{error, info};

use crate::config::AppConfig;
use crate::core::Database;
use crate::resume::ResumeParser;
use crate::reviews::{LabeledReview, Recommendation, ReviewFetcher, ReviewModel, ScrapeJob, ScrapeJobs};
use crate::scoring::SimilarityReport;
use crate::skills::{SkillMatcher, SkillVocabulary};

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
    }
}

impl AppState {
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let vocabulary = SkillVocabulary::load(config.skills_path.as_deref())?;
        info!("Skill vocabulary: {} entries", vocabulary.len());

        let db = Database::new(&config.database_path).await?;
        let fetcher = ReviewFetcher::new(&config.scraper)?;
        let model = ReviewModel::from_config(&config.model)?;

        Ok(Self {
            db,
            parser: ResumeParser::new(SkillMatcher::new(Arc::new(vocabulary))),
            fetcher: Arc::new(fetcher),
            jobs: ScrapeJobs::with_retention(config.scraper.retained_jobs),
            model,
            scraper: config.scraper.clone(),
        })
    }
}

// ===== Resume routes =====

#[post("/resumes", data = "<upload>")]
pub async fn upload_resume(
    upload: Form<ResumeUploadForm<'_>>,
    state: &State<AppState>,
) -> Result<Json<DataResponse<ResumeAnalysisData>>, Json<StandardErrorResponse>> {
    handlers::upload_resume_handler(upload, state).await
}

#[get("/resumes")]
pub async fn list_candidates(
    state: &State<AppState>,
) -> Result<Json<DataResponse<Vec<crate::core::Candidate>>>, Json<StandardErrorResponse>> {
    handlers::list_candidates_handler(state).await
}

#[post("/resumes/score", data = "<request>")]
pub async fn score_resume(
    request: Json<ScoreRequest>,
    state: &State<AppState>,
) -> Result<Json<DataResponse<SimilarityReport>>, Json<StandardErrorResponse>> {
    handlers::score_handler(request, state).await
}

// ===== Review routes =====

#[post("/reviews/scrape", data = "<request>")]
pub async fn start_scrape(
    request: Json<ScrapeRequest>,
    state: &State<AppState>,
) -> Result<Json<DataResponse<ScrapeStarted>>, Json<StandardErrorResponse>> {
    handlers::start_scrape_handler(request, state).await
}

#[get("/reviews/scrape/<job_id>")]
pub async fn scrape_status(
    job_id: &str,
    state: &State<AppState>,
) -> Result<Json<DataResponse<ScrapeJob>>, Json<StandardErrorResponse>> {
    handlers::scrape_status_handler(job_id, state).await
}

#[post("/reviews/scrape/<job_id>/cancel")]
pub async fn cancel_scrape(
    job_id: &str,
    state: &State<AppState>,
) -> Result<Json<ActionResponse>, Json<StandardErrorResponse>> {
    handlers::cancel_scrape_handler(job_id, state).await
}

#[post("/reviews/import", data = "<csv>")]
pub async fn import_reviews(
    csv: String,
    state: &State<AppState>,
) -> Result<Json<DataResponse<ScrapeStarted>>, Json<StandardErrorResponse>> {
    handlers::import_reviews_handler(csv, state).await
}

#[post("/reviews/<job_id>/summary")]
pub async fn summarize_reviews(
    job_id: &str,
    state: &State<AppState>,
) -> Result<Json<DataResponse<SummaryData>>, Json<StandardErrorResponse>> {
    handlers::summary_handler(job_id, state).await
}

#[post("/reviews/<job_id>/sentiment")]
pub async fn review_sentiment(
    job_id: &str,
    state: &State<AppState>,
) -> Result<Json<DataResponse<Vec<LabeledReview>>>, Json<StandardErrorResponse>> {
    handlers::sentiment_handler(job_id, state).await
}

#[get("/reviews/<job_id>/recommendation", rank = 2)]
pub async fn review_recommendation(
    job_id: &str,
    state: &State<AppState>,
) -> Result<Json<DataResponse<Recommendation>>, Json<StandardErrorResponse>> {
    handlers::recommendation_handler(job_id, state).await
}

#[get("/reviews/<job_id>/export", rank = 2)]
pub async fn export_reviews(
    job_id: &str,
    state: &State<AppState>,
) -> Result<CsvResponse, Json<StandardErrorResponse>> {
    handlers::export_handler(job_id, state).await
}

#[get("/health")]
pub async fn health(
    state: &State<AppState>,
) -> Result<Json<TextResponse>, Json<StandardErrorResponse>> {
    handlers::health_handler(state).await
}

#[options("/<_..>")]
pub fn options() -> rocket::http::Status {
    rocket::http::Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Invalid request format".to_string(),
        "BAD_REQUEST",
        &[
            "Check your request format",
            "Verify all required fields are present",
        ],
    ))
}

#[rocket::catch(404)]
pub fn not_found() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Route not found".to_string(),
        "NOT_FOUND",
        &["Check the request path and method"],
    ))
}

#[rocket::catch(422)]
pub fn unprocessable() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Request body could not be parsed".to_string(),
        "UNPROCESSABLE",
        &["Verify field names and types"],
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Internal server error".to_string(),
        "INTERNAL_ERROR",
        &[
            "Try again in a few moments",
            "Check the server logs",
        ],
    ))
}

pub fn build_rocket(state: AppState, config: &AppConfig) -> Rocket<Build> {
    let limits = Limits::default()
        .limit("file", 10.mebibytes())
        .limit("data-form", 12.mebibytes())
        .limit("string", 8.mebibytes());

    let figment = rocket::Config::figment()
        .merge(("address", config.server.address.clone()))
        .merge(("port", config.server.port))
        .merge(("limits", limits));

    rocket::custom(figment)
        .attach(Cors)
        .manage(state)
        .register(
            "/api",
            catchers![bad_request, not_found, unprocessable, internal_error],
        )
        .mount(
            "/api",
            routes![
                upload_resume,
                list_candidates,
                score_resume,
                start_scrape,
                scrape_status,
                cancel_scrape,
                import_reviews,
                summarize_reviews,
                review_sentiment,
                review_recommendation,
                export_reviews,
                health,
                options,
            ],
        )
}

pub async fn start_web_server(config: AppConfig) -> Result<()> {
    let state = match AppState::from_config(&config).await {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to initialize application state: {:#}", e);
            return Err(e);
        }
    };

    info!("Starting TalentScope API server");
    info!("Database: {}", config.database_path.display());
    info!(
        "Listening on {}:{}",
        config.server.address, config.server.port
    );

    build_rocket(state, &config)
        .launch()
        .await
        .context("Rocket server failed")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rocket::http::{ContentType, Status};
    use rocket::local::asynchronous::Client;
    use serde_json::Value;
    use std::time::Duration;

    async fn client(dir: &tempfile::TempDir, tweak: impl FnOnce(&mut AppConfig)) -> Client {
        let mut config = AppConfig {
            database_path: dir.path().join("api.db"),
            ..AppConfig::default()
        };
        tweak(&mut config);

        let state = AppState::from_config(&config).await.unwrap();
        Client::tracked(build_rocket(state, &config)).await.unwrap()
    }

    async fn json(response: rocket::local::asynchronous::LocalResponse<'_>) -> Value {
        response.into_json::<Value>().await.unwrap()
    }

    fn multipart_resume(text: &str, job_description: Option<&str>) -> (ContentType, String) {
        let content_type = "multipart/form-data; boundary=X-BOUNDARY"
            .parse::<ContentType>()
            .unwrap();

        let mut parts = vec![
            "--X-BOUNDARY".to_string(),
            r#"Content-Disposition: form-data; name="resume"; filename="resume.txt""#.to_string(),
            "Content-Type: text/plain".to_string(),
            String::new(),
            text.to_string(),
        ];
        if let Some(jd) = job_description {
            parts.extend([
                "--X-BOUNDARY".to_string(),
                r#"Content-Disposition: form-data; name="job_description""#.to_string(),
                String::new(),
                jd.to_string(),
            ]);
        }
        parts.push("--X-BOUNDARY--".to_string());
        parts.push(String::new());

        (content_type, parts.join("\r\n"))
    }

    const RESUME: &str = "Jane Doe\nSenior engineer with 7 years of experience in Python and SQL.";

    #[rocket::async_test]
    async fn test_health() {
        let dir = tempfile::tempdir().unwrap();
        let client = client(&dir, |_| {}).await;

        let response = client.get("/api/health").dispatch().await;
        assert_eq!(response.status(), Status::Ok);
        assert_eq!(
            response.headers().get_one("Access-Control-Allow-Origin"),
            Some("*")
        );
        let body = json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["message"], "OK");
    }

    #[rocket::async_test]
    async fn test_upload_list_and_score() {
        let dir = tempfile::tempdir().unwrap();
        let client = client(&dir, |_| {}).await;

        let (content_type, form) = multipart_resume(RESUME, Some("We need Python and SQL"));
        let response = client
            .post("/api/resumes")
            .header(content_type)
            .body(form)
            .dispatch()
            .await;
        let body = json(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["stored"], true);
        assert_eq!(body["data"]["resume"]["name"], "Jane");
        assert_eq!(body["data"]["resume"]["experience"], "7");
        assert!(body["data"]["score"]["score"].as_f64().unwrap() > 0.0);

        let (content_type, form) = multipart_resume(RESUME, None);
        let response = client
            .post("/api/resumes")
            .header(content_type)
            .body(form)
            .dispatch()
            .await;
        let body = json(response).await;
        assert_eq!(body["data"]["stored"], false);
        assert!(body["data"]["storage_error"].is_string());
        assert!(body["data"].get("score").is_none());

        let body = json(client.get("/api/resumes").dispatch().await).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let response = client
            .post("/api/resumes/score")
            .json(&serde_json::json!({
                "candidate_name": "Jane",
                "job_description": "Python developer"
            }))
            .dispatch()
            .await;
        let body = json(response).await;
        assert_eq!(body["success"], true);
        let required = body["data"]["required_skills"].as_array().unwrap();
        assert!(required.contains(&Value::from("python")));
        assert!(body["data"]["score"].as_f64().unwrap() > 0.0);
    }

    #[rocket::async_test]
    async fn test_score_with_explicit_skills() {
        let dir = tempfile::tempdir().unwrap();
        let client = client(&dir, |_| {}).await;

        let response = client
            .post("/api/resumes/score")
            .json(&serde_json::json!({
                "skills": [],
                "job_description": "Python developer"
            }))
            .dispatch()
            .await;
        let body = json(response).await;
        assert_eq!(body["data"]["score"], 0.0);

        let response = client
            .post("/api/resumes/score")
            .json(&serde_json::json!({ "job_description": "Python" }))
            .dispatch()
            .await;
        assert_eq!(json(response).await["error_code"], "MISSING_RESUME");
    }

    #[rocket::async_test]
    async fn test_unknown_job() {
        let dir = tempfile::tempdir().unwrap();
        let client = client(&dir, |_| {}).await;

        let body = json(client.get("/api/reviews/scrape/not-a-uuid").dispatch().await).await;
        assert_eq!(body["error_code"], "INVALID_JOB_ID");

        let path = format!("/api/reviews/{}/recommendation", uuid::Uuid::new_v4());
        let body = json(client.get(path).dispatch().await).await;
        assert_eq!(body["error_code"], "JOB_NOT_FOUND");
    }

    #[rocket::async_test]
    async fn test_unreachable_scrape_has_no_reviews() {
        let dir = tempfile::tempdir().unwrap();
        let client = client(&dir, |config| {
            config.scraper.max_retries = 0;
            config.scraper.timeout_seconds = 2;
        })
        .await;

        let response = client
            .post("/api/reviews/scrape")
            .json(&serde_json::json!({
                "base_url": "http://127.0.0.1:9/product-reviews/B000?ie=UTF8",
                "pages": 3
            }))
            .dispatch()
            .await;
        let body = json(response).await;
        assert_eq!(body["data"]["pages"], 3);
        let job_id = body["data"]["job_id"].as_str().unwrap().to_string();

        let mut status = Value::Null;
        for _ in 0..100 {
            let body = json(
                client
                    .get(format!("/api/reviews/scrape/{}", job_id))
                    .dispatch()
                    .await,
            )
            .await;
            status = body["data"]["status"].clone();
            if status != "running" {
                assert_eq!(body["data"]["stop_reason"]["kind"], "transport_error");
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert_eq!(status, "completed");

        let body = json(
            client
                .post(format!("/api/reviews/{}/summary", job_id))
                .dispatch()
                .await,
        )
        .await;
        assert_eq!(body["error_code"], "NO_REVIEWS");
    }

    #[rocket::async_test]
    async fn test_cancel_running_scrape() {
        let dir = tempfile::tempdir().unwrap();
        let client = client(&dir, |config| {
            config.scraper.max_retries = 10;
            config.scraper.retry_backoff_ms = 200;
        })
        .await;

        let body = json(
            client
                .post("/api/reviews/scrape")
                .json(&serde_json::json!({
                    "base_url": "http://127.0.0.1:9/product-reviews/B000?ie=UTF8"
                }))
                .dispatch()
                .await,
        )
        .await;
        assert_eq!(body["data"]["pages"], 5);
        let job_id = body["data"]["job_id"].as_str().unwrap().to_string();

        let body = json(
            client
                .post(format!("/api/reviews/scrape/{}/cancel", job_id))
                .dispatch()
                .await,
        )
        .await;
        assert_eq!(body["success"], true);
        assert_eq!(body["action"], "cancel");

        let mut status = Value::Null;
        for _ in 0..100 {
            let body = json(
                client
                    .get(format!("/api/reviews/scrape/{}", job_id))
                    .dispatch()
                    .await,
            )
            .await;
            status = body["data"]["status"].clone();
            if status != "running" {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert_eq!(status, "cancelled");

        let body = json(
            client
                .post(format!("/api/reviews/scrape/{}/cancel", job_id))
                .dispatch()
                .await,
        )
        .await;
        assert_eq!(body["error_code"], "JOB_FINISHED");

        let path = format!("/api/reviews/scrape/{}/cancel", uuid::Uuid::new_v4());
        let body = json(client.post(path).dispatch().await).await;
        assert_eq!(body["error_code"], "JOB_NOT_FOUND");
    }

    #[rocket::async_test]
    async fn test_import_without_usable_rows_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let client = client(&dir, |_| {}).await;

        let csv = "review,star_rating\n,\n   ,4.0 out of 5 stars\n";
        let body = json(client.post("/api/reviews/import").body(csv).dispatch().await).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error_code"], "NO_REVIEWS");
    }

    #[rocket::async_test]
    async fn test_import_then_analyze() {
        let dir = tempfile::tempdir().unwrap();
        let client = client(&dir, |_| {}).await;

        let csv = "review,star_rating\n\
                   Great battery and a bright screen.,5.0 out of 5 stars\n\
                   Broke after a week.,1.0 out of 5 stars\n";
        let body = json(client.post("/api/reviews/import").body(csv).dispatch().await).await;
        assert_eq!(body["success"], true);
        let job_id = body["data"]["job_id"].as_str().unwrap().to_string();

        let body = json(
            client
                .get(format!("/api/reviews/{}/recommendation", job_id))
                .dispatch()
                .await,
        )
        .await;
        assert_eq!(body["data"]["average_rating"], 3.0);
        assert_eq!(
            body["data"]["top_reviews"][0]["review"],
            "Great battery and a bright screen."
        );

        let body = json(
            client
                .post(format!("/api/reviews/{}/summary", job_id))
                .dispatch()
                .await,
        )
        .await;
        assert_eq!(body["data"]["backend"], "lexicon");
        assert_eq!(body["data"]["reviews_used"], 2);

        let body = json(
            client
                .post(format!("/api/reviews/{}/sentiment", job_id))
                .dispatch()
                .await,
        )
        .await;
        assert_eq!(body["data"][0]["sentiment"], "POSITIVE");

        let response = client
            .get(format!("/api/reviews/{}/export", job_id))
            .dispatch()
            .await;
        assert_eq!(response.content_type(), Some(ContentType::CSV));
        assert_eq!(
            response.headers().get_one("Content-Disposition"),
            Some("attachment; filename=\"reviews.csv\"")
        );
        let exported = response.into_string().await.unwrap();
        assert!(exported.starts_with("review,star_rating"));
        assert!(exported.contains("Broke after a week."));
    }
}
