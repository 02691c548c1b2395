//! Invoice model and payment-term arithmetic.

use chrono::{DateTime, Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Grace period between invoice date and due date, in calendar days.
pub const PAYMENT_TERMS_DAYS: u64 = 30;

/// Due date for an invoice issued on `invoice_date`.
///
/// Computed on the invoice's own calendar date; the caller's timezone never
/// enters into it.
pub fn due_date_for(invoice_date: NaiveDate) -> NaiveDate {
    invoice_date + Days::new(PAYMENT_TERMS_DAYS)
}

/// Invoice header row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Invoice {
    pub invoice_id: i64,
    pub customer_id: i64,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Invoice header composed with the resolved customer's display name.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InvoiceWithCustomer {
    pub invoice_id: i64,
    pub customer_id: i64,
    pub customer_name: String,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Row shape for the invoice listing (joined with customer name).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InvoiceListRow {
    pub invoice_id: i64,
    pub customer_name: String,
    pub invoice_date: NaiveDate,
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Input for creating an invoice.
#[derive(Debug, Clone)]
pub struct CreateInvoice {
    pub customer_name: String,
    pub invoice_date: NaiveDate,
    pub amount: Decimal,
}

/// One cart entry to be attached as a line item during invoice creation.
#[derive(Debug, Clone)]
pub struct CartLine {
    pub product_id: i64,
    pub quantity: i32,
    pub tax_id: i64,
}
