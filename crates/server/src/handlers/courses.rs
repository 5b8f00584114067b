use crate::state::AppState;
use axum::{extract::State, Json};
use coursemate_rag::CourseAnalytics;
use std::sync::Arc;

/// GET /api/courses - Course count and titles
pub async fn courses_handler(State(state): State<Arc<AppState>>) -> Json<CourseAnalytics> {
    Json(state.rag.course_analytics().await)
}
