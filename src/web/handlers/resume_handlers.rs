// src/web/handlers/resume_handlers.rs
use rocket::form::Form;
use rocket::serde::json::Json;
use rocket::State;
use tracing::{error, info, warn};

use crate::core::{Candidate, DuplicateCandidate};
use crate::resume::TextExtractor;
use crate::scoring::{score_report, SimilarityReport};
use crate::web::types::{
    AppState, DataResponse, ResumeAnalysisData, ResumeUploadForm, ScoreRequest,
    StandardErrorResponse,
};

pub async fn upload_resume_handler(
    mut upload: Form<ResumeUploadForm<'_>>,
    state: &State<AppState>,
) -> Result<Json<DataResponse<ResumeAnalysisData>>, Json<StandardErrorResponse>> {
    const MAX_SIZE: u64 = 10 * 1024 * 1024;
    if upload.resume.len() > MAX_SIZE {
        return Err(Json(StandardErrorResponse::new(
            "File size exceeds 10MB limit".to_string(),
            "FILE_TOO_LARGE",
            &["Upload a smaller document (max 10MB)"],
        )));
    }

    let temp_path = std::env::temp_dir().join(format!("resume_upload_{}", uuid::Uuid::new_v4()));

    if let Err(e) = upload.resume.persist_to(&temp_path).await {
        error!("Failed to save uploaded resume: {}", e);
        return Err(Json(StandardErrorResponse::new(
            "Failed to process uploaded file".to_string(),
            "FILE_SAVE_ERROR",
            &["Try uploading the file again"],
        )));
    }

    let extracted = TextExtractor::extract_file(&temp_path).await;
    let _ = tokio::fs::remove_file(&temp_path).await;

    let text = match extracted {
        Ok(text) => text,
        Err(e) => {
            error!("Resume text extraction failed: {:#}", e);
            return Err(Json(StandardErrorResponse::new(
                format!("Could not read resume: {:#}", e),
                "EXTRACTION_ERROR",
                &[
                    "Upload a PDF or plain text file",
                    "Check the document contains selectable text",
                ],
            )));
        }
    };

    let resume = state.parser.parse_text(&text);

    let (stored, candidate_id, storage_error) = match state.db.candidates().insert(&resume).await {
        Ok(candidate) => (true, Some(candidate.id), None),
        Err(e) if e.downcast_ref::<DuplicateCandidate>().is_some() => {
            warn!("{}", e);
            (false, None, Some(e.to_string()))
        }
        Err(e) => {
            error!("Error inserting candidate into the database: {:#}", e);
            (
                false,
                None,
                Some(format!("Error inserting data into the database: {:#}", e)),
            )
        }
    };

    let score = upload
        .job_description
        .as_deref()
        .map(str::trim)
        .filter(|jd| !jd.is_empty())
        .map(|jd| {
            let required = state.parser.matcher().extract(jd);
            score_report(resume.skills.clone(), required)
        });

    if let Some(report) = &score {
        info!("Resume score for {}: {:.4}", resume.name, report.score);
    }

    let message = if stored {
        format!("Candidate {} added successfully", resume.name)
    } else {
        format!("Resume for {} parsed but not stored", resume.name)
    };

    Ok(Json(DataResponse::success(
        message,
        ResumeAnalysisData {
            resume,
            stored,
            candidate_id,
            storage_error,
            score,
        },
    )))
}

pub async fn list_candidates_handler(
    state: &State<AppState>,
) -> Result<Json<DataResponse<Vec<Candidate>>>, Json<StandardErrorResponse>> {
    match state.db.candidates().list_all().await {
        Ok(candidates) => Ok(Json(DataResponse::success(
            format!("{} parsed resumes", candidates.len()),
            candidates,
        ))),
        Err(e) => {
            error!("Failed to list candidates: {:#}", e);
            Err(Json(StandardErrorResponse::new(
                "Failed to load candidates".to_string(),
                "DATABASE_ERROR",
                &["Try again in a few moments"],
            )))
        }
    }
}

pub async fn score_handler(
    request: Json<ScoreRequest>,
    state: &State<AppState>,
) -> Result<Json<DataResponse<SimilarityReport>>, Json<StandardErrorResponse>> {
    let request = request.into_inner();

    let resume_skills = match (request.candidate_name, request.skills) {
        (Some(name), _) => match state.db.candidates().find_by_name(&name).await {
            Ok(Some(candidate)) => candidate.skills,
            Ok(None) => {
                return Err(Json(StandardErrorResponse::new(
                    format!("Candidate '{}' not found", name),
                    "CANDIDATE_NOT_FOUND",
                    &["Upload the resume first", "Check the candidate name"],
                )))
            }
            Err(e) => {
                error!("Failed to look up candidate {}: {:#}", name, e);
                return Err(Json(StandardErrorResponse::new(
                    "Failed to load candidate".to_string(),
                    "DATABASE_ERROR",
                    &["Try again in a few moments"],
                )));
            }
        },
        (None, Some(skills)) => skills,
        (None, None) => {
            return Err(Json(StandardErrorResponse::new(
                "Either candidate_name or skills is required".to_string(),
                "MISSING_RESUME",
                &["Pass a stored candidate name", "Pass a list of resume skills"],
            )))
        }
    };

    let required = state.parser.matcher().extract(&request.job_description);
    let report = score_report(resume_skills, required);

    Ok(Json(DataResponse::success(
        format!("Resume Score: {}", report.score),
        report,
    )))
}
