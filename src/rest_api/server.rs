//! # Student HTTP Routes
//!
//! Axum handlers for the `/students` collection.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};

use crate::storage::Document;

use super::body::StudentBody;
use super::database::StudentFacade;
use super::errors::{Failure, RestError};
use super::response::{ListEnvelope, ResultEnvelope};

const LIST_FAILED: &str = "Error fetching students";
const CREATE_FAILED: &str = "Error creating students";
const UPDATE_FAILED: &str = "Error updating student details";
const DELETE_FAILED: &str = "Error deleting student";

const CREATED: &str = "New student added successfully";
const UPDATED: &str = "Student details updated successfully";
const DELETED: &str = "Student deleted successfully";

/// Shared state type
type FacadeState = Arc<StudentFacade>;

/// Builds the `/students` router
pub fn student_routes(facade: StudentFacade) -> Router {
    Router::new()
        .route("/students", get(list_handler).post(create_handler))
        .route("/students/:id", patch(update_handler).delete(delete_handler))
        .with_state(Arc::new(facade))
}

/// List students handler
async fn list_handler(
    State(facade): State<FacadeState>,
) -> Result<Json<ListEnvelope<Document>>, Failure> {
    let students = facade.list().await.map_err(Failure::with(LIST_FAILED))?;
    Ok(Json(ListEnvelope::new(students)))
}

/// Create student handler
async fn create_handler(
    State(facade): State<FacadeState>,
    body: Result<StudentBody, RestError>,
) -> Result<(StatusCode, Json<ResultEnvelope<Document>>), Failure> {
    let StudentBody(candidate) = body.map_err(Failure::with(CREATE_FAILED))?;
    let created = facade
        .create(&candidate)
        .await
        .map_err(Failure::with(CREATE_FAILED))?;

    Ok((
        StatusCode::CREATED,
        Json(ResultEnvelope::new(CREATED, Some(created))),
    ))
}

/// Update student handler; `result` is the prior version or null
async fn update_handler(
    State(facade): State<FacadeState>,
    Path(id): Path<String>,
    body: Result<StudentBody, RestError>,
) -> Result<Json<ResultEnvelope<Document>>, Failure> {
    let StudentBody(candidate) = body.map_err(Failure::with(UPDATE_FAILED))?;
    let prior = facade
        .update_by_id(&id, &candidate)
        .await
        .map_err(Failure::with(UPDATE_FAILED))?;

    Ok(Json(ResultEnvelope::new(UPDATED, prior)))
}

/// Delete student handler; `result` is the removed document or null
async fn delete_handler(
    State(facade): State<FacadeState>,
    Path(id): Path<String>,
) -> Result<Json<ResultEnvelope<Document>>, Failure> {
    let removed = facade
        .delete_by_id(&id)
        .await
        .map_err(Failure::with(DELETE_FAILED))?;

    Ok(Json(ResultEnvelope::new(DELETED, removed)))
}
