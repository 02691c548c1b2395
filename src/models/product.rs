use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Catalog product.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub product_id: i64,
    pub product_name: String,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Input for adding a product to the catalog.
#[derive(Debug, Clone)]
pub struct CreateProduct {
    pub name: String,
    pub price: Decimal,
}
