// src/web/handlers/mod.rs
pub mod resume_handlers;
pub mod review_handlers;
pub mod system_handlers;

pub use resume_handlers::*;
pub use review_handlers::*;
pub use system_handlers::*;
