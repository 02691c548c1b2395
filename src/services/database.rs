//! Database service for invoice-admin-service.
//!
//! Owns the connection pool and every store operation. Invoice creation
//! (customer resolution, header insert, optional line items) runs inside a
//! single transaction; the legacy per-item attach path is its own
//! transaction per call.

use crate::error::AppError;
use crate::models::{
    due_date_for, CartLine, CreateInvoice, CreateLineItem, CreateProduct, Customer, Invoice,
    InvoiceDetailRow, InvoiceListRow, InvoiceWithCustomer, LineItem, Product,
};
use crate::services::metrics::{
    CUSTOMERS_CREATED_TOTAL, DB_QUERY_DURATION, INVOICES_CREATED_TOTAL, LINE_ITEMS_CREATED_TOTAL,
};
use rust_decimal::Decimal;
use sqlx::postgres::{PgConnection, PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, instrument};

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool.
    #[instrument(skip(database_url), fields(service = "invoice-admin-service"))]
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, AppError> {
        info!(
            max_connections = max_connections,
            min_connections = min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check database health.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;
        Ok(())
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Product Operations
    // -------------------------------------------------------------------------

    /// List all products in id order.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_products"])
            .start_timer();

        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT product_id, product_name, price, created_at
            FROM products
            ORDER BY product_id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list products: {}", e)))?;

        timer.observe_duration();

        Ok(products)
    }

    /// Add a product to the catalog.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_product(&self, input: &CreateProduct) -> Result<Product, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_product"])
            .start_timer();

        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (product_name, price)
            VALUES ($1, $2)
            RETURNING product_id, product_name, price, created_at
            "#,
        )
        .bind(&input.name)
        .bind(input.price)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create product: {}", e)))?;

        timer.observe_duration();

        info!(product_id = %product.product_id, name = %product.product_name, "Product created");

        Ok(product)
    }

    // -------------------------------------------------------------------------
    // Invoice Operations
    // -------------------------------------------------------------------------

    /// Resolve a customer by case-insensitive name, creating one with empty
    /// contact fields when no row matches. On multiple matches the lowest
    /// customer id wins (see DESIGN.md).
    async fn resolve_customer(
        conn: &mut PgConnection,
        customer_name: &str,
    ) -> Result<Customer, AppError> {
        let existing = sqlx::query_as::<_, Customer>(
            r#"
            SELECT customer_id, name, email, phone, address, created_at
            FROM customers
            WHERE lower(name) = lower($1)
            ORDER BY customer_id
            LIMIT 1
            "#,
        )
        .bind(customer_name)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to look up customer: {}", e))
        })?;

        if let Some(customer) = existing {
            return Ok(customer);
        }

        let customer = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (name, email, phone, address)
            VALUES ($1, '', '', '')
            RETURNING customer_id, name, email, phone, address, created_at
            "#,
        )
        .bind(customer_name)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to create customer: {}", e))
        })?;

        CUSTOMERS_CREATED_TOTAL.inc();

        info!(
            customer_id = %customer.customer_id,
            name = %customer.name,
            "Customer created during invoice creation"
        );

        Ok(customer)
    }

    /// Look up a product's current price inside a transaction.
    async fn product_price(conn: &mut PgConnection, product_id: i64) -> Result<Decimal, AppError> {
        sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT price FROM products WHERE product_id = $1
            "#,
        )
        .bind(product_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to look up product: {}", e)))?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Product {} not found", product_id)))
    }

    /// Create an invoice, resolving the customer and attaching any supplied
    /// cart lines, all in one transaction.
    ///
    /// With an empty cart the stored total is the caller's amount; otherwise
    /// it is the sum of the line totals computed from current product prices.
    #[instrument(skip(self, input, items), fields(customer_name = %input.customer_name))]
    pub async fn create_invoice(
        &self,
        input: &CreateInvoice,
        items: &[CartLine],
    ) -> Result<InvoiceWithCustomer, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_invoice"])
            .start_timer();

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        let customer = Self::resolve_customer(&mut tx, &input.customer_name).await?;
        let due_date = due_date_for(input.invoice_date);

        // Price the cart first so the header carries the final total.
        let mut priced = Vec::with_capacity(items.len());
        let mut items_total = Decimal::ZERO;
        for line in items {
            let price = Self::product_price(&mut tx, line.product_id).await?;
            let line_total = price * Decimal::from(line.quantity);
            items_total += line_total;
            priced.push((line, line_total));
        }

        let total_amount = if items.is_empty() {
            input.amount
        } else {
            items_total
        };

        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            INSERT INTO invoices (customer_id, invoice_date, due_date, total_amount)
            VALUES ($1, $2, $3, $4)
            RETURNING invoice_id, customer_id, invoice_date, due_date, total_amount, created_at
            "#,
        )
        .bind(customer.customer_id)
        .bind(input.invoice_date)
        .bind(due_date)
        .bind(total_amount)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create invoice: {}", e)))?;

        for (line, line_total) in &priced {
            sqlx::query(
                r#"
                INSERT INTO invoice_details (invoice_id, product_id, quantity, tax_id, line_total)
                VALUES ($1, $2, $3, $4, $5)
                "#,
            )
            .bind(invoice.invoice_id)
            .bind(line.product_id)
            .bind(line.quantity)
            .bind(line.tax_id)
            .bind(*line_total)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to create line item: {}", e))
            })?;
        }

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit transaction: {}", e))
        })?;

        timer.observe_duration();
        INVOICES_CREATED_TOTAL.inc();
        LINE_ITEMS_CREATED_TOTAL.inc_by(priced.len() as f64);

        info!(
            invoice_id = %invoice.invoice_id,
            customer_id = %customer.customer_id,
            total_amount = %invoice.total_amount,
            line_items = priced.len(),
            "Invoice created"
        );

        Ok(InvoiceWithCustomer {
            invoice_id: invoice.invoice_id,
            customer_id: invoice.customer_id,
            customer_name: customer.name,
            invoice_date: invoice.invoice_date,
            due_date: invoice.due_date,
            total_amount: invoice.total_amount,
            created_at: invoice.created_at,
        })
    }

    /// List all invoices joined with customer display names, in id order.
    #[instrument(skip(self))]
    pub async fn list_invoices(&self) -> Result<Vec<InvoiceListRow>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_invoices"])
            .start_timer();

        let invoices = sqlx::query_as::<_, InvoiceListRow>(
            r#"
            SELECT i.invoice_id, c.name AS customer_name, i.invoice_date, i.total_amount, i.created_at
            FROM invoices i
            JOIN customers c ON i.customer_id = c.customer_id
            ORDER BY i.invoice_id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list invoices: {}", e)))?;

        timer.observe_duration();

        Ok(invoices)
    }

    // -------------------------------------------------------------------------
    // Line Item Operations
    // -------------------------------------------------------------------------

    /// Attach one line item to an existing invoice.
    ///
    /// The line total snapshots `price * quantity` at call time; later price
    /// changes do not touch stored rows. This is the legacy per-item path:
    /// each call is its own transaction, so a failure partway through a cart
    /// leaves the invoice partially itemized.
    #[instrument(
        skip(self, input),
        fields(invoice_id = %input.invoice_id, product_id = %input.product_id)
    )]
    pub async fn add_line_item(&self, input: &CreateLineItem) -> Result<LineItem, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["add_line_item"])
            .start_timer();

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT invoice_id FROM invoices WHERE invoice_id = $1
            "#,
        )
        .bind(input.invoice_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to look up invoice: {}", e)))?
        .ok_or_else(|| {
            AppError::NotFound(anyhow::anyhow!("Invoice {} not found", input.invoice_id))
        })?;

        let price = Self::product_price(&mut tx, input.product_id).await?;
        let line_total = price * Decimal::from(input.quantity);

        let line_item = sqlx::query_as::<_, LineItem>(
            r#"
            INSERT INTO invoice_details (invoice_id, product_id, quantity, tax_id, line_total)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING invoice_detail_id, invoice_id, product_id, quantity, tax_id, line_total, created_at
            "#,
        )
        .bind(input.invoice_id)
        .bind(input.product_id)
        .bind(input.quantity)
        .bind(input.tax_id)
        .bind(line_total)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to add line item: {}", e)))?;

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit transaction: {}", e))
        })?;

        timer.observe_duration();
        LINE_ITEMS_CREATED_TOTAL.inc();

        info!(
            invoice_detail_id = %line_item.invoice_detail_id,
            line_total = %line_item.line_total,
            "Line item added"
        );

        Ok(line_item)
    }

    /// Get the detail rows for one invoice (empty when it has no items).
    #[instrument(skip(self), fields(invoice_id = %invoice_id))]
    pub async fn get_invoice_details(
        &self,
        invoice_id: i64,
    ) -> Result<Vec<InvoiceDetailRow>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_invoice_details"])
            .start_timer();

        let details = sqlx::query_as::<_, InvoiceDetailRow>(
            r#"
            SELECT p.product_name, d.quantity, p.price, d.line_total
            FROM invoice_details d
            JOIN products p ON d.product_id = p.product_id
            WHERE d.invoice_id = $1
            ORDER BY d.invoice_detail_id
            "#,
        )
        .bind(invoice_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to get invoice details: {}", e))
        })?;

        timer.observe_duration();

        Ok(details)
    }

    // -------------------------------------------------------------------------
    // Dashboard Counts
    // -------------------------------------------------------------------------

    /// Count customer rows.
    #[instrument(skip(self))]
    pub async fn count_customers(&self) -> Result<i64, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["count_customers"])
            .start_timer();

        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to count customers: {}", e))
            })?;

        timer.observe_duration();

        Ok(count)
    }

    /// Count invoice rows.
    #[instrument(skip(self))]
    pub async fn count_invoices(&self) -> Result<i64, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["count_invoices"])
            .start_timer();

        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM invoices")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to count invoices: {}", e))
            })?;

        timer.observe_duration();

        Ok(count)
    }
}
