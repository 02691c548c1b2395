//! Dashboard count handlers.

use axum::{extract::State, Json};

use crate::{dtos::CountResponse, error::AppError, AppState};

/// Total number of customers.
pub async fn customers_total(
    State(state): State<AppState>,
) -> Result<Json<CountResponse>, AppError> {
    let count = state.db.count_customers().await?;
    Ok(Json(CountResponse { count }))
}

/// Total number of invoices.
pub async fn invoices_total(
    State(state): State<AppState>,
) -> Result<Json<CountResponse>, AppError> {
    let count = state.db.count_invoices().await?;
    Ok(Json(CountResponse { count }))
}
