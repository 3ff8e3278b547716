// src/core/mod.rs
//! Storage and outbound service plumbing shared by both flows.

pub mod database;
pub mod service_client;

pub use database::{Candidate, CandidateRepository, Database, DuplicateCandidate};
pub use service_client::ModelServiceClient;
