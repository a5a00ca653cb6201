//! # Student REST API Module
//!
//! The record store facade and the `/students` HTTP routes over it.

pub mod body;
pub mod database;
pub mod errors;
pub mod response;
pub mod server;

pub use body::StudentBody;
pub use database::StudentFacade;
pub use errors::{Failure, RestError, RestResult};
pub use response::{FailureEnvelope, ListEnvelope, ResultEnvelope, Status};
pub use server::student_routes;
