//! Invoice workflow handlers.
//!
//! `create_invoice` is the atomic path: header plus any cart lines commit in
//! one transaction. `create_invoice_header` + `add_line_item` are the legacy
//! two-phase flow used by the cart UI; atomicity there only covers each call.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    dtos::{
        AddLineItemRequest, AddLineItemResponse, CreateInvoiceRequest, InvoiceCreatedResponse,
        InvoiceDetailResponse, InvoiceListResponse, InvoiceResponse,
    },
    error::AppError,
    models::{CartLine, CreateInvoice, CreateLineItem},
    utils::validation::ValidatedJson,
    AppState,
};

fn cart_lines(payload: &CreateInvoiceRequest) -> Vec<CartLine> {
    payload
        .items
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|item| CartLine {
            product_id: item.product_id,
            quantity: item.quantity,
            tax_id: item.tax_id,
        })
        .collect()
}

/// List all invoices with customer names and creation timestamps.
pub async fn list_invoices(
    State(state): State<AppState>,
) -> Result<Json<Vec<InvoiceListResponse>>, AppError> {
    let invoices = state.db.list_invoices().await?;

    Ok(Json(
        invoices.into_iter().map(InvoiceListResponse::from).collect(),
    ))
}

/// Create an invoice and respond with the composed record.
pub async fn create_invoice(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateInvoiceRequest>,
) -> Result<(StatusCode, Json<InvoiceResponse>), AppError> {
    let items = cart_lines(&payload);

    tracing::info!(
        customer_name = %payload.customer_name,
        invoice_date = %payload.invoice_date,
        line_items = items.len(),
        "Creating invoice"
    );

    let invoice = state
        .db
        .create_invoice(
            &CreateInvoice {
                customer_name: payload.customer_name,
                invoice_date: payload.invoice_date,
                amount: payload.amount,
            },
            &items,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(InvoiceResponse::from(invoice))))
}

/// Create an invoice header and respond with the generated id only, for the
/// cart flow that attaches line items in follow-up calls.
pub async fn create_invoice_header(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateInvoiceRequest>,
) -> Result<(StatusCode, Json<InvoiceCreatedResponse>), AppError> {
    tracing::info!(
        customer_name = %payload.customer_name,
        invoice_date = %payload.invoice_date,
        "Creating invoice header"
    );

    let invoice = state
        .db
        .create_invoice(
            &CreateInvoice {
                customer_name: payload.customer_name,
                invoice_date: payload.invoice_date,
                amount: payload.amount,
            },
            &[],
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(InvoiceCreatedResponse {
            invoice_id: invoice.invoice_id,
        }),
    ))
}

/// Attach one line item to an existing invoice.
pub async fn add_line_item(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<AddLineItemRequest>,
) -> Result<(StatusCode, Json<AddLineItemResponse>), AppError> {
    tracing::info!(
        invoice_id = %payload.invoice_id,
        product_id = %payload.product_id,
        quantity = payload.quantity,
        "Attaching line item"
    );

    let line_item = state
        .db
        .add_line_item(&CreateLineItem {
            invoice_id: payload.invoice_id,
            product_id: payload.product_id,
            quantity: payload.quantity,
            tax_id: payload.tax_id,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AddLineItemResponse::from(line_item)),
    ))
}

/// Detail view for one invoice: product name, quantity, price and line total
/// per line item. An invoice without line items yields an empty array.
pub async fn get_invoice_details(
    State(state): State<AppState>,
    Path(invoice_id): Path<i64>,
) -> Result<Json<Vec<InvoiceDetailResponse>>, AppError> {
    let details = state.db.get_invoice_details(invoice_id).await?;

    Ok(Json(
        details.into_iter().map(InvoiceDetailResponse::from).collect(),
    ))
}
