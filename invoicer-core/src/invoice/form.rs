//! Invoice form parsing
//!
//! Fields arrive as decoded `application/x-www-form-urlencoded` text. The
//! amount is typed in currency units and stored in cents.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Largest amount (in currency units) that still fits the cents column
const MAX_AMOUNT: f64 = 90_000_000_000_000.0;

/// Payment status of an invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Pending,
    Paid,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(InvoiceStatus::Pending),
            "paid" => Ok(InvoiceStatus::Paid),
            other => Err(format!("unknown invoice status: {}", other)),
        }
    }
}

/// Validated create/update payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceForm {
    pub customer_id: String,
    /// Amount in cents
    pub amount: i64,
    pub status: InvoiceStatus,
}

/// Per-field validation failures, keyed by form field name
#[derive(Debug, Clone, Default, Error, PartialEq, Eq)]
#[error("invalid invoice form: {}", describe(.fields))]
pub struct InvoiceFormError {
    pub fields: BTreeMap<&'static str, &'static str>,
}

fn describe(fields: &BTreeMap<&'static str, &'static str>) -> String {
    fields.iter().map(|(field, msg)| format!("{}: {}", field, msg)).collect::<Vec<_>>().join("; ")
}

impl InvoiceFormError {
    pub fn get(&self, field: &str) -> Option<&'static str> {
        self.fields.get(field).copied()
    }

    fn add(&mut self, field: &'static str, message: &'static str) {
        self.fields.insert(field, message);
    }
}

impl InvoiceForm {
    /// Validate the `customerId`, `amount` and `status` fields
    ///
    /// Every failing field is reported, not just the first one.
    pub fn parse(fields: &HashMap<String, String>) -> Result<Self, InvoiceFormError> {
        let mut errors = InvoiceFormError::default();

        let customer_id = fields.get("customerId").map(|s| s.trim()).unwrap_or_default();
        if customer_id.is_empty() {
            errors.add("customerId", "Please select a customer.");
        }

        let amount = match parse_amount(fields.get("amount").map(String::as_str)) {
            Some(cents) => cents,
            None => {
                errors.add("amount", "Please enter an amount greater than $0.");
                0
            }
        };

        let status = fields.get("status").and_then(|s| s.parse::<InvoiceStatus>().ok());
        if status.is_none() {
            errors.add("status", "Please select an invoice status.");
        }

        match status {
            Some(status) if errors.fields.is_empty() => {
                Ok(Self { customer_id: customer_id.to_string(), amount, status })
            }
            _ => Err(errors),
        }
    }
}

/// Text amount to cents, `None` unless finite and at least one cent
fn parse_amount(raw: Option<&str>) -> Option<i64> {
    let value: f64 = raw?.trim().parse().ok()?;
    if !value.is_finite() || value <= 0.0 || value > MAX_AMOUNT {
        return None;
    }

    let cents = (value * 100.0).round() as i64;
    (cents > 0).then_some(cents)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_valid_form() {
        let form = InvoiceForm::parse(&fields(&[
            ("customerId", "3958dc9e-712f-4377-85e9-fec4b6a6442a"),
            ("amount", "157.95"),
            ("status", "paid"),
        ]))
        .unwrap();

        assert_eq!(form.customer_id, "3958dc9e-712f-4377-85e9-fec4b6a6442a");
        assert_eq!(form.amount, 15795);
        assert_eq!(form.status, InvoiceStatus::Paid);
    }

    #[test]
    fn test_amount_rounds_to_cents() {
        // 0.1 + 0.2 style float noise must not leak into the stored value.
        assert_eq!(parse_amount(Some("19.99")), Some(1999));
        assert_eq!(parse_amount(Some("0.016")), Some(2));
        assert_eq!(parse_amount(Some(" 42 ")), Some(4200));
    }

    #[test]
    fn test_bad_amounts() {
        for raw in ["", "abc", "0", "-5", "NaN", "inf", "0.001", "1e300"] {
            assert_eq!(parse_amount(Some(raw)), None, "{}", raw);
        }
        assert_eq!(parse_amount(None), None);
    }

    #[test]
    fn test_all_field_errors_collected() {
        let err = InvoiceForm::parse(&fields(&[("amount", "zero"), ("status", "overdue")])).unwrap_err();

        assert_eq!(err.fields.len(), 3);
        assert_eq!(err.get("customerId"), Some("Please select a customer."));
        assert_eq!(err.get("amount"), Some("Please enter an amount greater than $0."));
        assert_eq!(err.get("status"), Some("Please select an invoice status."));
        assert!(err.to_string().starts_with("invalid invoice form: amount:"));
    }

    #[test]
    fn test_status_is_case_sensitive() {
        let err = InvoiceForm::parse(&fields(&[
            ("customerId", "c-1"),
            ("amount", "10"),
            ("status", "Paid"),
        ]))
        .unwrap_err();
        assert_eq!(err.fields.keys().copied().collect::<Vec<_>>(), vec!["status"]);
    }

    #[test]
    fn test_status_serde() {
        assert_eq!(serde_json::to_string(&InvoiceStatus::Pending).unwrap(), "\"pending\"");
        assert_eq!("paid".parse::<InvoiceStatus>(), Ok(InvoiceStatus::Paid));
    }
}
