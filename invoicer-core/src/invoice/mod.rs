//! Invoice records and the form actions that mutate them

pub mod actions;
pub mod form;
pub mod store;

pub use actions::{InvoiceActions, InvoiceError, InvoiceSummary};
pub use form::{InvoiceForm, InvoiceFormError, InvoiceStatus};
pub use store::{Invoice, InvoiceStore, MemoryInvoiceStore};
