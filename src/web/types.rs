// src/web/types.rs
//! Request/response shapes shared by all API routes.

use rocket::form::FromForm;
use rocket::fs::TempFile;
use rocket::http::ContentType;
use rocket::response::{self, Responder};
use rocket::serde::{Deserialize, Serialize};
use rocket::{Request, Response};
use std::sync::Arc;

use crate::config::ScraperConfig;
use crate::core::Database;
use crate::resume::{ParsedResume, ResumeParser};
use crate::reviews::{ReviewFetcher, ReviewModel, ScrapeJobs};
use crate::scoring::SimilarityReport;

/// Everything the routes need, handed to Rocket as managed state.
pub struct AppState {
    pub db: Database,
    pub parser: ResumeParser,
    pub fetcher: Arc<ReviewFetcher>,
    pub jobs: ScrapeJobs,
    pub model: ReviewModel,
    pub scraper: ScraperConfig,
}

pub struct CsvResponse {
    pub data: Vec<u8>,
    pub filename: String,
}

impl CsvResponse {
    pub fn new(data: Vec<u8>, filename: impl Into<String>) -> Self {
        Self {
            data,
            filename: filename.into(),
        }
    }
}

impl<'r> Responder<'r, 'static> for CsvResponse {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        Response::build()
            .header(ContentType::CSV)
            .raw_header(
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", self.filename),
            )
            .sized_body(self.data.len(), std::io::Cursor::new(self.data))
            .ok()
    }
}

// ===== Requests =====

#[derive(FromForm)]
pub struct ResumeUploadForm<'f> {
    pub resume: TempFile<'f>,
    pub job_description: Option<String>,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct ScoreRequest {
    pub candidate_name: Option<String>,
    pub skills: Option<Vec<String>>,
    pub job_description: String,
}

#[derive(Deserialize)]
#[serde(crate = "rocket::serde")]
pub struct ScrapeRequest {
    pub base_url: String,
    pub pages: Option<u32>,
}

// ===== Response payloads =====

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ResumeAnalysisData {
    pub resume: ParsedResume,
    pub stored: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<SimilarityReport>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ScrapeStarted {
    pub job_id: String,
    pub pages: u32,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct SummaryData {
    pub summary: String,
    pub reviews_used: usize,
    pub backend: String,
}

// ===== Standard envelopes =====

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct TextResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct DataResponse<T> {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub data: T,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct ActionResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub message: String,
    pub action: String,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde")]
pub struct StandardErrorResponse {
    #[serde(rename = "type")]
    pub response_type: ResponseType,
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub suggestions: Vec<String>,
}

#[derive(Serialize)]
#[serde(crate = "rocket::serde", rename_all = "lowercase")]
pub enum ResponseType {
    Text,
    Data,
    Action,
    Error,
}

impl TextResponse {
    pub fn success(message: String) -> Self {
        Self {
            response_type: ResponseType::Text,
            success: true,
            message,
        }
    }
}

impl<T> DataResponse<T> {
    pub fn success(message: String, data: T) -> Self {
        Self {
            response_type: ResponseType::Data,
            success: true,
            message,
            data,
        }
    }
}

impl ActionResponse {
    pub fn success(message: String, action: String) -> Self {
        Self {
            response_type: ResponseType::Action,
            success: true,
            message,
            action,
        }
    }
}

impl StandardErrorResponse {
    pub fn new(error: String, error_code: &str, suggestions: &[&str]) -> Self {
        Self {
            response_type: ResponseType::Error,
            success: false,
            error,
            error_code: error_code.to_string(),
            suggestions: suggestions.iter().map(|s| s.to_string()).collect(),
        }
    }
}
