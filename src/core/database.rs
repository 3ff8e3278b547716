// src/core/database.rs
//! Candidate storage on a local SQLite file.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::fmt;
use std::path::Path;
use tracing::info;

use crate::resume::ParsedResume;

const SKILL_SEPARATOR: &str = ",";

// ===== Connection Management =====

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open (or create) the database file and ensure the schema exists.
    pub async fn new(database_path: &Path) -> Result<Self> {
        if let Some(parent) = database_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .context("Failed to create database directory")?;
            }
        }

        let database_url = format!("sqlite:{}?mode=rwc", database_path.display());
        let pool = SqlitePool::connect(&database_url).await.with_context(|| {
            format!("Failed to connect to database: {}", database_path.display())
        })?;

        info!(
            "Database connection established: {}",
            database_path.display()
        );

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn candidates(&self) -> CandidateRepository<'_> {
        CandidateRepository::new(&self.pool)
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS candidates (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT UNIQUE,
                skills TEXT,
                experience TEXT,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .context("Failed to create candidates table")?;

        info!("Database migrations completed");
        Ok(())
    }

    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("Database health check failed")?;
        Ok(())
    }
}

// ===== Candidate Models =====

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub id: i64,
    pub name: String,
    pub skills: Vec<String>,
    pub experience: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct CandidateRow {
    id: i64,
    name: Option<String>,
    skills: Option<String>,
    experience: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<CandidateRow> for Candidate {
    fn from(row: CandidateRow) -> Self {
        Self {
            id: row.id,
            name: row.name.unwrap_or_default(),
            skills: split_skills(row.skills.as_deref().unwrap_or_default()),
            experience: row.experience,
            created_at: row.created_at,
        }
    }
}

fn join_skills(skills: &[String]) -> String {
    skills.join(SKILL_SEPARATOR)
}

fn split_skills(stored: &str) -> Vec<String> {
    stored
        .split(SKILL_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Raised when a candidate with the same name is already stored.
#[derive(Debug)]
pub struct DuplicateCandidate(pub String);

impl fmt::Display for DuplicateCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Candidate '{}' already exists", self.0)
    }
}

impl std::error::Error for DuplicateCandidate {}

// ===== Candidate Repository =====

pub struct CandidateRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CandidateRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a parsed resume. A name clash yields [`DuplicateCandidate`].
    pub async fn insert(&self, resume: &ParsedResume) -> Result<Candidate> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO candidates (name, skills, experience, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&resume.name)
        .bind(join_skills(&resume.skills))
        .bind(&resume.experience)
        .bind(now)
        .execute(self.pool)
        .await;

        let result = match result {
            Ok(result) => result,
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                return Err(DuplicateCandidate(resume.name.clone()).into());
            }
            Err(e) => return Err(e).context("Failed to insert candidate"),
        };

        let candidate = Candidate {
            id: result.last_insert_rowid(),
            name: resume.name.clone(),
            skills: resume.skills.clone(),
            experience: resume.experience.clone(),
            created_at: now,
        };

        info!(
            "Stored candidate {} (id {}) with {} skills",
            candidate.name,
            candidate.id,
            candidate.skills.len()
        );
        Ok(candidate)
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Candidate>> {
        let row = sqlx::query_as::<_, CandidateRow>(
            r#"
            SELECT id, name, skills, experience, created_at
            FROM candidates
            WHERE name = ?
            "#,
        )
        .bind(name)
        .fetch_optional(self.pool)
        .await
        .context("Failed to look up candidate")?;

        Ok(row.map(Candidate::from))
    }

    pub async fn list_all(&self) -> Result<Vec<Candidate>> {
        let rows = sqlx::query_as::<_, CandidateRow>(
            r#"
            SELECT id, name, skills, experience, created_at
            FROM candidates
            ORDER BY id ASC
            "#,
        )
        .fetch_all(self.pool)
        .await
        .context("Failed to list candidates")?;

        Ok(rows.into_iter().map(Candidate::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resume(name: &str, skills: &[&str], experience: Option<&str>) -> ParsedResume {
        ParsedResume {
            name: name.to_string(),
            skills: skills.iter().map(|s| s.to_string()).collect(),
            experience: experience.map(str::to_string),
        }
    }

    async fn open() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(&dir.path().join("nested").join("candidates.db"))
            .await
            .unwrap();
        (dir, db)
    }

    #[test]
    fn test_skill_round_trip_through_text_column() {
        let skills = vec!["python".to_string(), "node.js".to_string()];
        assert_eq!(split_skills(&join_skills(&skills)), skills);
        assert!(split_skills("").is_empty());
    }

    #[tokio::test]
    async fn test_insert_and_list() {
        let (_dir, db) = open().await;
        let repo = db.candidates();

        repo.insert(&resume("Jane", &["python", "sql"], Some("3")))
            .await
            .unwrap();
        repo.insert(&resume("Ada", &[], None)).await.unwrap();

        let all = repo.list_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Jane");
        assert_eq!(all[0].skills, vec!["python", "sql"]);
        assert_eq!(all[0].experience.as_deref(), Some("3"));
        assert!(all[1].skills.is_empty());
        assert_eq!(all[1].experience, None);
    }

    #[tokio::test]
    async fn test_duplicate_name_is_rejected() {
        let (_dir, db) = open().await;
        let repo = db.candidates();

        repo.insert(&resume("Jane", &["python"], None)).await.unwrap();
        let err = repo
            .insert(&resume("Jane", &["java"], None))
            .await
            .unwrap_err();

        assert!(err.downcast_ref::<DuplicateCandidate>().is_some());
        let stored = repo.find_by_name("Jane").await.unwrap().unwrap();
        assert_eq!(stored.skills, vec!["python"]);
    }

    #[tokio::test]
    async fn test_find_missing_candidate() {
        let (_dir, db) = open().await;
        assert!(db.candidates().find_by_name("nobody").await.unwrap().is_none());
        db.health_check().await.unwrap();
    }
}
