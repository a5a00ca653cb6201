//! studentdb - A student records service over a pluggable document store
//!
//! - `schema`: statically typed student validation
//! - `storage`: document store engines and the store client
//! - `rest_api`: record store facade and `/students` routes
//! - `http_server`: router assembly and server lifecycle
//! - `cli`: command-line entry point and configuration layering
//! - `observability`: structured logging

pub mod cli;
pub mod http_server;
pub mod observability;
pub mod rest_api;
pub mod schema;
pub mod storage;
