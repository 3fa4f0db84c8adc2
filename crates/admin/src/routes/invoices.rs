//! Invoice-management route handlers.
//!
//! Invoices are cut from placed orders: the amount snapshots the order's
//! charged total at creation time and does not track later order edits.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::instrument;
use uuid::Uuid;

use adas_kitchen_backend::docstore::{Invoice, InvoiceRecord};
use adas_kitchen_core::{InvoiceId, InvoiceStatus, OrderId};

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireStaff;
use crate::routes::orders::StatusOption;
use crate::state::AppState;

/// Invoice row for the listing and detail pages.
#[derive(Clone)]
pub struct InvoiceRowView {
    pub id: String,
    pub number: String,
    pub order_id: String,
    pub customer_email: String,
    pub amount: String,
    pub status: String,
    pub issued_at: String,
}

impl From<&Invoice> for InvoiceRowView {
    fn from(invoice: &Invoice) -> Self {
        Self {
            id: invoice.id.to_string(),
            number: invoice.number.clone(),
            order_id: invoice.order_id.to_string(),
            customer_email: invoice.customer_email.clone(),
            amount: invoice.amount.to_string(),
            status: invoice.status.label().to_owned(),
            issued_at: invoice.issued_at.format("%b %-d, %Y").to_string(),
        }
    }
}

/// Invoice listing template.
#[derive(Template, WebTemplate)]
#[template(path = "invoices/index.html")]
pub struct InvoicesIndexTemplate {
    pub invoices: Vec<InvoiceRowView>,
}

/// Invoice detail template.
#[derive(Template, WebTemplate)]
#[template(path = "invoices/show.html")]
pub struct InvoiceShowTemplate {
    pub invoice: InvoiceRowView,
    pub statuses: Vec<StatusOption>,
}

/// Create-invoice form data.
#[derive(Debug, Deserialize)]
pub struct CreateInvoiceForm {
    pub order_id: String,
}

/// Status transition form data.
#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: String,
}

fn invoice_number() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("INV-{}", id.chars().take(8).collect::<String>().to_uppercase())
}

fn status_options(selected: InvoiceStatus) -> Vec<StatusOption> {
    InvoiceStatus::ALL
        .into_iter()
        .map(|status| StatusOption {
            value: status.as_str().to_owned(),
            label: status.label().to_owned(),
            selected: selected == status,
        })
        .collect()
}

/// List invoices, newest first.
#[instrument(skip(state, _staff))]
pub async fn index(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
) -> Result<InvoicesIndexTemplate> {
    let mut invoices = state.docstore().list_invoices().await?;
    invoices.sort_by(|a, b| b.issued_at.cmp(&a.issued_at));

    Ok(InvoicesIndexTemplate {
        invoices: invoices.iter().map(InvoiceRowView::from).collect(),
    })
}

/// Create an invoice from a placed order.
#[instrument(skip(state, _staff, form))]
pub async fn create(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    Form(form): Form<CreateInvoiceForm>,
) -> Result<Redirect> {
    let order_id = OrderId::new(form.order_id.trim());
    let order = state.docstore().get_order(&order_id).await?;

    let record = InvoiceRecord {
        number: invoice_number(),
        order_id: order.id.clone(),
        customer_email: order.customer_email.clone(),
        amount: order.total,
        status: InvoiceStatus::Draft,
        issued_at: Utc::now(),
    };

    let invoice = state.docstore().create_invoice(&record).await?;
    tracing::info!(number = %invoice.number, order_id = %order.id, "invoice created");

    Ok(Redirect::to(&format!("/invoices/{}", invoice.id)))
}

/// Show one invoice.
#[instrument(skip(state, _staff))]
pub async fn show(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    Path(id): Path<String>,
) -> Result<InvoiceShowTemplate> {
    let invoice = state.docstore().get_invoice(&InvoiceId::new(id)).await?;

    Ok(InvoiceShowTemplate {
        statuses: status_options(invoice.status),
        invoice: InvoiceRowView::from(&invoice),
    })
}

/// Transition an invoice's status.
#[instrument(skip(state, _staff, form))]
pub async fn set_status(
    State(state): State<AppState>,
    RequireStaff(_staff): RequireStaff,
    Path(id): Path<String>,
    Form(form): Form<StatusForm>,
) -> Result<Redirect> {
    let status = form
        .status
        .parse::<InvoiceStatus>()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let id = InvoiceId::new(id);
    state.docstore().set_invoice_status(&id, status).await?;
    tracing::info!(invoice_id = %id, status = status.as_str(), "invoice status updated");

    Ok(Redirect::to(&format!("/invoices/{id}")))
}
