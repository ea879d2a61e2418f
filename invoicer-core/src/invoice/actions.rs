//! Create, update and delete actions behind the dashboard forms
//!
//! Each mutating action answers with the route the client should be sent to.
//! Listings always read the store, so there is no cached view to invalidate
//! after a write.

use super::form::{InvoiceForm, InvoiceFormError, InvoiceStatus};
use super::store::{Invoice, InvoiceStore};
use crate::error::StoreError;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InvoiceError {
    #[error(transparent)]
    Form(#[from] InvoiceFormError),

    #[error("invoice not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Figures shown on the landing route
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InvoiceSummary {
    pub invoice_count: usize,
    pub paid_count: usize,
    pub pending_count: usize,
    /// Cents
    pub total_paid: i64,
    /// Cents
    pub total_pending: i64,
}

pub struct InvoiceActions {
    store: Arc<dyn InvoiceStore>,
    invoices_route: String,
}

impl InvoiceActions {
    /// Actions redirecting to `<protected_prefix>/invoices`
    pub fn new(store: Arc<dyn InvoiceStore>, protected_prefix: &str) -> Self {
        let invoices_route = format!("{}/invoices", protected_prefix.trim_end_matches('/'));
        Self { store, invoices_route }
    }

    pub fn invoices_route(&self) -> &str {
        &self.invoices_route
    }

    pub async fn create_invoice(
        &self,
        fields: &HashMap<String, String>,
    ) -> Result<String, InvoiceError> {
        let invoice = Invoice::create(InvoiceForm::parse(fields)?);
        let id = invoice.id.clone();
        self.store.insert(invoice).await?;

        log::info!("Invoice created: {}", id);
        Ok(self.invoices_route.clone())
    }

    pub async fn update_invoice(
        &self,
        id: &str,
        fields: &HashMap<String, String>,
    ) -> Result<String, InvoiceError> {
        let changes = InvoiceForm::parse(fields)?;
        if self.store.update(id, &changes).await?.is_none() {
            return Err(InvoiceError::NotFound(id.to_string()));
        }

        log::info!("Invoice updated: {}", id);
        Ok(self.invoices_route.clone())
    }

    pub async fn delete_invoice(&self, id: &str) -> Result<String, InvoiceError> {
        if !self.store.delete(id).await? {
            return Err(InvoiceError::NotFound(id.to_string()));
        }

        log::info!("Invoice deleted: {}", id);
        Ok(self.invoices_route.clone())
    }

    pub async fn list(&self) -> Result<Vec<Invoice>, InvoiceError> {
        Ok(self.store.list().await?)
    }

    pub async fn summary(&self) -> Result<InvoiceSummary, InvoiceError> {
        let invoices = self.store.list().await?;

        let mut summary = InvoiceSummary { invoice_count: invoices.len(), ..Default::default() };
        for invoice in &invoices {
            match invoice.status {
                InvoiceStatus::Paid => {
                    summary.paid_count += 1;
                    summary.total_paid = summary.total_paid.saturating_add(invoice.amount);
                }
                InvoiceStatus::Pending => {
                    summary.pending_count += 1;
                    summary.total_pending = summary.total_pending.saturating_add(invoice.amount);
                }
            }
        }

        Ok(summary)
    }
}
