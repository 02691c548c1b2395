//! Catalog handlers.

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    dtos::{CreateProductRequest, ProductResponse},
    error::AppError,
    models::CreateProduct,
    utils::validation::ValidatedJson,
    AppState,
};

/// List all products.
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let products = state.db.list_products().await?;

    Ok(Json(products.into_iter().map(ProductResponse::from).collect()))
}

/// Add a new product to the catalog.
pub async fn create_product(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), AppError> {
    tracing::info!(name = %payload.name, "Adding product");

    let product = state
        .db
        .create_product(&CreateProduct {
            name: payload.name,
            price: payload.price,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ProductResponse::from(product))))
}
