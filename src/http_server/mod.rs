//! # HTTP Server Module
//!
//! Serves the student API over axum.
//!
//! # Endpoints
//!
//! - `/` - Plain-text liveness message
//! - `/health` - Version and store status
//! - `/students` - List and create students
//! - `/students/:id` - Update and delete a student

pub mod config;
pub mod observability_routes;
pub mod server;

pub use config::ServerConfig;
pub use server::{open_store, HttpServer};
