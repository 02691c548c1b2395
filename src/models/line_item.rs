use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Line item attached to an invoice. `line_total` is a snapshot of
/// `price * quantity` taken when the item was attached; later price changes
/// on the product do not touch it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LineItem {
    pub invoice_detail_id: i64,
    pub invoice_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub tax_id: i64,
    pub line_total: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Input for attaching a line item to an existing invoice.
#[derive(Debug, Clone)]
pub struct CreateLineItem {
    pub invoice_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub tax_id: i64,
}

/// Row shape for the invoice detail view (joined with product).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InvoiceDetailRow {
    pub product_name: String,
    pub quantity: i32,
    pub price: Decimal,
    pub line_total: Decimal,
}
