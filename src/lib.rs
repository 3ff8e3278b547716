// src/lib.rs
//! TalentScope: resume parsing and scoring, plus product review scraping
//! and analysis, served over a Rocket JSON API and a CLI.

pub mod cli;
pub mod config;
pub mod core;
pub mod resume;
pub mod reviews;
pub mod scoring;
pub mod skills;
pub mod utils;
pub mod web;

pub use config::AppConfig;
pub use web::start_web_server;
