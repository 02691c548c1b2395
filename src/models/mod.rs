//! Domain models for invoice-admin-service.

mod customer;
mod invoice;
mod line_item;
mod product;

pub use customer::Customer;
pub use invoice::{
    due_date_for, CartLine, CreateInvoice, Invoice, InvoiceListRow, InvoiceWithCustomer,
    PAYMENT_TERMS_DAYS,
};
pub use line_item::{CreateLineItem, InvoiceDetailRow, LineItem};
pub use product::{CreateProduct, Product};
