// src/cli.rs
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::core::{Database, DuplicateCandidate};
use crate::resume::ResumeParser;
use crate::reviews::{export, recommend, ReviewFetcher, ReviewModel, ReviewRecord, StopReason};
use crate::scoring::score_report;
use crate::skills::{SkillMatcher, SkillVocabulary};
use crate::utils::read_text_input;

#[derive(Parser)]
#[command(name = "talentscope")]
#[command(about = "Resume scoring and product review analysis")]
pub struct Cli {
    /// YAML configuration file (defaults to ./talentscope.yaml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API
    Serve {
        #[arg(long)]
        port: Option<u16>,
    },
    /// Parse a resume, store it and optionally score it
    Parse {
        file: PathBuf,
        /// Job description text, or a path to a document containing it
        #[arg(long)]
        jd: Option<String>,
        /// Print the parsed resume without inserting it
        #[arg(long)]
        no_store: bool,
    },
    /// List stored candidates
    Candidates,
    /// Score a resume against a job description
    Score {
        #[arg(long)]
        resume: PathBuf,
        #[arg(long)]
        jd: String,
    },
    /// Product review scraping and analysis
    #[command(subcommand)]
    Reviews(ReviewCommand),
}

#[derive(Subcommand)]
pub enum ReviewCommand {
    /// Fetch reviews from a paginated review listing
    Scrape {
        url: String,
        #[arg(long)]
        pages: Option<u32>,
        /// Write the fetched reviews to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Summarize the reviews in an exported CSV
    Summarize(CsvInput),
    /// Label each review in an exported CSV as positive or negative
    Sentiment(CsvInput),
    /// Average rating and top reviews of an exported CSV
    Recommend(CsvInput),
}

#[derive(Args)]
pub struct CsvInput {
    #[arg(long)]
    pub csv: PathBuf,
}

pub async fn handle_command(cli: Cli, mut config: AppConfig) -> Result<()> {
    match cli.command {
        Command::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            crate::web::start_web_server(config).await
        }
        Command::Parse { file, jd, no_store } => {
            let parser = build_parser(&config)?;
            let resume = parser.parse_file(&file).await?;

            println!("Name:       {}", resume.name);
            println!("Skills:     {}", resume.skills.join(", "));
            println!(
                "Experience: {}",
                resume.experience.as_deref().unwrap_or("None")
            );

            if !no_store {
                let db = Database::new(&config.database_path).await?;
                match db.candidates().insert(&resume).await {
                    Ok(candidate) => {
                        println!("✅ Candidate {} added successfully (id {})", candidate.name, candidate.id);
                    }
                    Err(e) if e.downcast_ref::<DuplicateCandidate>().is_some() => {
                        warn!("{}", e);
                        println!("❌ {}", e);
                    }
                    Err(e) => {
                        error!("Error inserting data into the database: {:#}", e);
                        println!("❌ Error inserting data into the database: {:#}", e);
                    }
                }
            }

            if let Some(jd) = jd {
                let jd = read_text_input(&jd).await?;
                let report = score_report(resume.skills, parser.matcher().extract(&jd));
                println!("Required:   {}", report.required_skills.join(", "));
                println!("Resume Score: {}", report.score);
            }
            Ok(())
        }
        Command::Candidates => {
            let db = Database::new(&config.database_path).await?;
            let candidates = db.candidates().list_all().await?;

            if candidates.is_empty() {
                println!("No parsed resumes yet.");
            }
            for c in candidates {
                println!(
                    "{:>4}  {:<20} {:<6} {}",
                    c.id,
                    c.name,
                    c.experience.as_deref().unwrap_or("-"),
                    c.skills.join(", ")
                );
            }
            Ok(())
        }
        Command::Score { resume, jd } => {
            let parser = build_parser(&config)?;
            let parsed = parser.parse_file(&resume).await?;
            let jd = read_text_input(&jd).await?;

            let report = score_report(parsed.skills, parser.matcher().extract(&jd));
            println!("Resume skills:   {}", report.resume_skills.join(", "));
            println!("Required skills: {}", report.required_skills.join(", "));
            println!("Resume Score: {}", report.score);
            Ok(())
        }
        Command::Reviews(command) => handle_review_command(command, &config).await,
    }
}

async fn handle_review_command(command: ReviewCommand, config: &AppConfig) -> Result<()> {
    match command {
        ReviewCommand::Scrape { url, pages, csv } => {
            let pages = config.scraper.clamp_pages(pages);
            let fetcher = ReviewFetcher::new(&config.scraper)?;

            let cancel = Arc::new(AtomicBool::new(false));
            let on_interrupt = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    info!("Interrupted, stopping after the current page");
                    on_interrupt.store(true, Ordering::SeqCst);
                }
            });

            let outcome = fetcher
                .fetch(&url, pages, &cancel, |page, reviews| {
                    println!("Page {}: {} reviews", page, reviews.len());
                })
                .await;

            match &outcome.stop_reason {
                StopReason::Completed => {}
                reason => println!("Stopped early: {:?}", reason),
            }
            println!(
                "✅ {} reviews from {} pages",
                outcome.reviews.len(),
                outcome.pages_fetched
            );

            if let Some(path) = csv {
                export::save_csv(&path, &outcome.reviews)?;
                println!("Saved to {}", path.display());
            }
            Ok(())
        }
        ReviewCommand::Summarize(input) => {
            let reviews = load_session(&input)?;
            let model = ReviewModel::from_config(&config.model)?;
            let summary = model.summarize(&reviews).await?;
            println!("{}", summary);
            Ok(())
        }
        ReviewCommand::Sentiment(input) => {
            let reviews = load_session(&input)?;
            let model = ReviewModel::from_config(&config.model)?;
            for labeled in model.label(&reviews).await? {
                println!(
                    "{:?} ({:.2})  {}",
                    labeled.sentiment, labeled.score, labeled.review
                );
            }
            Ok(())
        }
        ReviewCommand::Recommend(input) => {
            let reviews = load_session(&input)?;
            let rec = recommend(&reviews)?;

            println!("Average Rating: {:.2}", rec.average_rating);
            if rec.skipped_reviews > 0 {
                println!("({} reviews without a numeric rating skipped)", rec.skipped_reviews);
            }
            println!("Top Reviews:");
            for review in rec.top_reviews {
                println!("  [{}] {}", review.star_rating, review.review);
            }
            Ok(())
        }
    }
}

fn build_parser(config: &AppConfig) -> Result<ResumeParser> {
    let vocabulary = SkillVocabulary::load(config.skills_path.as_deref())?;
    Ok(ResumeParser::new(SkillMatcher::new(Arc::new(vocabulary))))
}

fn load_session(input: &CsvInput) -> Result<Vec<ReviewRecord>> {
    let reviews = export::load_csv(&input.csv)
        .with_context(|| format!("Failed to load reviews from {}", input.csv.display()))?;
    if reviews.is_empty() {
        anyhow::bail!("No reviews in {}; scrape some first", input.csv.display());
    }
    Ok(reviews)
}
