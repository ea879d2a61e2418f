//! Invoice storage

use super::form::{InvoiceForm, InvoiceStatus};
use crate::error::{StoreError, StoreResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A stored invoice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: String,
    pub customer_id: String,
    /// Amount in cents
    pub amount: i64,
    pub status: InvoiceStatus,
    /// UTC day of creation, serialized as `YYYY-MM-DD`
    pub date: NaiveDate,
}

impl Invoice {
    /// New invoice dated today (UTC) with a fresh id
    pub fn create(form: InvoiceForm) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            customer_id: form.customer_id,
            amount: form.amount,
            status: form.status,
            date: chrono::Utc::now().date_naive(),
        }
    }
}

/// Invoice persistence
#[async_trait::async_trait]
pub trait InvoiceStore: Send + Sync {
    async fn insert(&self, invoice: Invoice) -> StoreResult<()>;

    /// Replace customer, amount and status; `Ok(None)` if the id is unknown
    async fn update(&self, id: &str, changes: &InvoiceForm) -> StoreResult<Option<Invoice>>;

    /// `Ok(false)` if the id is unknown
    async fn delete(&self, id: &str) -> StoreResult<bool>;

    async fn get(&self, id: &str) -> StoreResult<Option<Invoice>>;

    /// All invoices, newest first
    async fn list(&self) -> StoreResult<Vec<Invoice>>;
}

#[async_trait::async_trait]
impl<S: InvoiceStore + ?Sized> InvoiceStore for Arc<S> {
    async fn insert(&self, invoice: Invoice) -> StoreResult<()> {
        (**self).insert(invoice).await
    }

    async fn update(&self, id: &str, changes: &InvoiceForm) -> StoreResult<Option<Invoice>> {
        (**self).update(id, changes).await
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        (**self).delete(id).await
    }

    async fn get(&self, id: &str) -> StoreResult<Option<Invoice>> {
        (**self).get(id).await
    }

    async fn list(&self) -> StoreResult<Vec<Invoice>> {
        (**self).list().await
    }
}

/// In-memory invoice store, kept in insertion order
#[derive(Clone, Default)]
pub struct MemoryInvoiceStore {
    invoices: Arc<RwLock<Vec<Invoice>>>,
}

impl MemoryInvoiceStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Vec<Invoice>>> {
        self.invoices
            .read()
            .map_err(|_| StoreError::Invariant("invoice list lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Vec<Invoice>>> {
        self.invoices
            .write()
            .map_err(|_| StoreError::Invariant("invoice list lock poisoned".to_string()))
    }
}

#[async_trait::async_trait]
impl InvoiceStore for MemoryInvoiceStore {
    async fn insert(&self, invoice: Invoice) -> StoreResult<()> {
        let mut invoices = self.write()?;
        if invoices.iter().any(|i| i.id == invoice.id) {
            return Err(StoreError::Invariant(format!("duplicate invoice id {}", invoice.id)));
        }
        invoices.push(invoice);
        Ok(())
    }

    async fn update(&self, id: &str, changes: &InvoiceForm) -> StoreResult<Option<Invoice>> {
        let mut invoices = self.write()?;
        let Some(invoice) = invoices.iter_mut().find(|i| i.id == id) else {
            return Ok(None);
        };

        invoice.customer_id = changes.customer_id.clone();
        invoice.amount = changes.amount;
        invoice.status = changes.status;
        Ok(Some(invoice.clone()))
    }

    async fn delete(&self, id: &str) -> StoreResult<bool> {
        let mut invoices = self.write()?;
        let before = invoices.len();
        invoices.retain(|i| i.id != id);
        Ok(invoices.len() < before)
    }

    async fn get(&self, id: &str) -> StoreResult<Option<Invoice>> {
        Ok(self.read()?.iter().find(|i| i.id == id).cloned())
    }

    async fn list(&self) -> StoreResult<Vec<Invoice>> {
        let mut invoices: Vec<Invoice> = self.read()?.iter().rev().cloned().collect();
        // Stable: same-day invoices stay in reverse insertion order.
        invoices.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(invoices)
    }
}
