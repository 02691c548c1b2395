//! Request and response bodies for the HTTP surface.
//!
//! Request field names follow the wire contract consumed by the admin UI
//! (`customerName`, `invoiceID`, ...). Monetary values serialize as decimal
//! strings.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::{InvoiceDetailRow, InvoiceListRow, InvoiceWithCustomer, LineItem, Product};

// -----------------------------------------------------------------------------
// Requests
// -----------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(custom(function = not_blank))]
    pub name: String,
    #[validate(custom(function = non_negative))]
    pub price: Decimal,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvoiceRequest {
    #[validate(custom(function = not_blank))]
    pub customer_name: String,
    pub invoice_date: NaiveDate,
    #[validate(custom(function = non_negative))]
    pub amount: Decimal,
    /// Optional cart. When present, the invoice and all line items are
    /// persisted in one transaction and the stored total is the sum of the
    /// computed line totals.
    #[serde(default)]
    #[validate(nested)]
    pub items: Option<Vec<CartItemRequest>>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CartItemRequest {
    #[serde(rename = "productID")]
    pub product_id: i64,
    #[validate(range(min = 1))]
    pub quantity: i32,
    #[serde(rename = "taxID")]
    pub tax_id: i64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddLineItemRequest {
    #[serde(rename = "invoiceID")]
    pub invoice_id: i64,
    #[serde(rename = "productID")]
    pub product_id: i64,
    #[validate(range(min = 1))]
    pub quantity: i32,
    #[serde(rename = "taxID")]
    pub tax_id: i64,
}

// -----------------------------------------------------------------------------
// Responses
// -----------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub product_id: i64,
    pub name: String,
    pub price: Decimal,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            product_id: product.product_id,
            name: product.product_name,
            price: product.price,
        }
    }
}

/// Composed invoice returned from creation: header fields plus the resolved
/// customer's display name. `amount` mirrors `totalAmount`, which is the
/// field name the admin UI reads after submitting the form.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceResponse {
    pub invoice_id: i64,
    pub customer_id: i64,
    pub customer_name: String,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub total_amount: Decimal,
    pub amount: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<InvoiceWithCustomer> for InvoiceResponse {
    fn from(invoice: InvoiceWithCustomer) -> Self {
        Self {
            invoice_id: invoice.invoice_id,
            customer_id: invoice.customer_id,
            customer_name: invoice.customer_name,
            invoice_date: invoice.invoice_date,
            due_date: invoice.due_date,
            total_amount: invoice.total_amount,
            amount: invoice.total_amount,
            created_at: invoice.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceListResponse {
    pub invoice_id: i64,
    pub customer_name: String,
    pub invoice_date: NaiveDate,
    pub total_amount: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<InvoiceListRow> for InvoiceListResponse {
    fn from(row: InvoiceListRow) -> Self {
        Self {
            invoice_id: row.invoice_id,
            customer_name: row.customer_name,
            invoice_date: row.invoice_date,
            total_amount: row.total_amount,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InvoiceCreatedResponse {
    #[serde(rename = "invoiceID")]
    pub invoice_id: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddLineItemResponse {
    pub message: String,
    pub line_total: Decimal,
}

impl From<LineItem> for AddLineItemResponse {
    fn from(item: LineItem) -> Self {
        Self {
            message: "Invoice details added successfully".to_string(),
            line_total: item.line_total,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDetailResponse {
    pub product_name: String,
    pub quantity: i32,
    pub price: Decimal,
    pub line_total: Decimal,
}

impl From<InvoiceDetailRow> for InvoiceDetailResponse {
    fn from(row: InvoiceDetailRow) -> Self {
        Self {
            product_name: row.product_name,
            quantity: row.quantity,
            price: row.price,
            line_total: row.line_total,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: i64,
}

// -----------------------------------------------------------------------------
// Field validators
// -----------------------------------------------------------------------------

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_blank"));
    }
    Ok(())
}

fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        return Err(ValidationError::new("non_negative"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_customer_name_fails_validation() {
        let request = CreateInvoiceRequest {
            customer_name: "   ".to_string(),
            invoice_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            amount: Decimal::from(100),
            items: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn zero_amount_is_accepted() {
        let request = CreateInvoiceRequest {
            customer_name: "Alice".to_string(),
            invoice_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            amount: Decimal::ZERO,
            items: None,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn negative_amount_fails_validation() {
        let request = CreateInvoiceRequest {
            customer_name: "Alice".to_string(),
            invoice_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            amount: Decimal::from(-1),
            items: None,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn negative_product_price_fails_validation() {
        let request = CreateProductRequest {
            name: "Widget".to_string(),
            price: Decimal::from(-5),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn zero_quantity_cart_item_fails_validation() {
        let request = CreateInvoiceRequest {
            customer_name: "Alice".to_string(),
            invoice_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            amount: Decimal::ZERO,
            items: Some(vec![CartItemRequest {
                product_id: 1,
                quantity: 0,
                tax_id: 1,
            }]),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn request_field_names_follow_wire_contract() {
        let body = serde_json::json!({
            "invoiceID": 1,
            "productID": 2,
            "quantity": 3,
            "taxID": 4
        });
        let request: AddLineItemRequest = serde_json::from_value(body).unwrap();
        assert_eq!(request.invoice_id, 1);
        assert_eq!(request.product_id, 2);
        assert_eq!(request.quantity, 3);
        assert_eq!(request.tax_id, 4);
    }
}
