use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod calendar;
pub mod csv_export;
pub mod filters;
pub mod payment;
pub mod permissions;
pub mod totals;

pub use calendar::{CalendarCell, CalendarCursor, CalendarGrid, DaySummary, SummaryBucket};
pub use filters::{MonthFilter, PayableFilter, PayableFilterQuery, StatusFilter};
pub use payment::{PartialPaymentOutcome, PaymentValidationError};
pub use permissions::{PermissionSet, Resource};
pub use totals::PayableTotals;

/// Default IVA rate applied when a payable requires tax
pub const DEFAULT_TAX_RATE: f64 = 0.16;

/// Maximum length of a payable concept
pub const MAX_CONCEPT_LENGTH: usize = 256;

/// Payable account ID in format: "cxp-<epoch_millis>-<4 hex chars>"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayableAccount {
    pub id: String,
    /// Free-text description of the obligation
    #[serde(rename = "concepto")]
    pub concept: String,
    #[serde(rename = "monto_neto")]
    pub net_amount: f64,
    /// Net amount plus IVA when `requires_tax` is set, otherwise the net amount
    #[serde(rename = "monto_con_iva")]
    pub amount_with_tax: f64,
    #[serde(rename = "requiere_iva")]
    pub requires_tax: bool,
    #[serde(rename = "categoria", default)]
    pub category: String,
    #[serde(rename = "proveedor_id", default)]
    pub provider_id: Option<String>,
    /// Due date (YYYY-MM-DD)
    #[serde(rename = "fecha")]
    pub due_date: NaiveDate,
    #[serde(rename = "pagado")]
    pub is_paid: bool,
    /// Running total paid so far while the account is not fully paid
    #[serde(rename = "pagos_parciales", default)]
    pub partial_payments: f64,
    #[serde(rename = "monto_transferencia", default)]
    pub transfer_amount: Option<f64>,
    #[serde(rename = "monto_efectivo", default)]
    pub cash_amount: Option<f64>,
}

impl PayableAccount {
    /// Generate a payable ID from a timestamp and a short random suffix
    pub fn generate_id(epoch_millis: u64, suffix: &str) -> String {
        format!("cxp-{}-{}", epoch_millis, suffix)
    }

    /// Parse a payable ID to extract its timestamp
    pub fn parse_id(id: &str) -> Result<u64, PayableIdError> {
        let parts: Vec<&str> = id.split('-').collect();
        if parts.len() != 3 || parts[0] != "cxp" {
            return Err(PayableIdError::InvalidFormat);
        }
        parts[1]
            .parse::<u64>()
            .map_err(|_| PayableIdError::InvalidTimestamp)
    }

    /// Amount considered paid: the full amount once paid, otherwise the partial payments
    pub fn paid_so_far(&self) -> f64 {
        if self.is_paid {
            self.amount_with_tax
        } else {
            self.partial_payments
        }
    }

    /// Remaining unpaid balance, never negative
    pub fn outstanding(&self) -> f64 {
        (self.amount_with_tax - self.paid_so_far()).max(0.0)
    }

    /// Unpaid and due strictly before `today`
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.is_paid && self.due_date < today
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PayableIdError {
    InvalidFormat,
    InvalidTimestamp,
}

impl fmt::Display for PayableIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayableIdError::InvalidFormat => write!(f, "Invalid payable ID format"),
            PayableIdError::InvalidTimestamp => write!(f, "Invalid timestamp in payable ID"),
        }
    }
}

impl std::error::Error for PayableIdError {}

/// Round a monetary value to cents
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Derive the amount with tax from the net amount
pub fn amount_with_tax(net_amount: f64, requires_tax: bool, tax_rate: f64) -> f64 {
    if requires_tax {
        round_cents(net_amount * (1.0 + tax_rate))
    } else {
        net_amount
    }
}

/// Body of POST and PUT requests on payable accounts.
///
/// `amount_with_tax` is not part of the input: the backend always derives it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayableInput {
    #[serde(rename = "concepto")]
    pub concept: String,
    #[serde(rename = "monto_neto")]
    pub net_amount: f64,
    #[serde(rename = "requiere_iva", default)]
    pub requires_tax: bool,
    #[serde(rename = "categoria", default)]
    pub category: String,
    #[serde(rename = "proveedor_id", default)]
    pub provider_id: Option<String>,
    #[serde(rename = "fecha")]
    pub due_date: NaiveDate,
    #[serde(rename = "pagado", default)]
    pub is_paid: bool,
    #[serde(rename = "pagos_parciales", default)]
    pub partial_payments: f64,
    #[serde(rename = "monto_transferencia", default)]
    pub transfer_amount: Option<f64>,
    #[serde(rename = "monto_efectivo", default)]
    pub cash_amount: Option<f64>,
}

impl From<&PayableAccount> for PayableInput {
    fn from(account: &PayableAccount) -> Self {
        Self {
            concept: account.concept.clone(),
            net_amount: account.net_amount,
            requires_tax: account.requires_tax,
            category: account.category.clone(),
            provider_id: account.provider_id.clone(),
            due_date: account.due_date,
            is_paid: account.is_paid,
            partial_payments: account.partial_payments,
            transfer_amount: account.transfer_amount,
            cash_amount: account.cash_amount,
        }
    }
}

/// Validation errors for payable form input
#[derive(Debug, Clone, PartialEq)]
pub enum PayableValidationError {
    EmptyConcept,
    ConceptTooLong(usize),
    InvalidNetAmount(f64),
    NegativePartialPayments(f64),
    NegativeBreakdown(&'static str),
}

impl fmt::Display for PayableValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayableValidationError::EmptyConcept => write!(f, "El concepto es obligatorio"),
            PayableValidationError::ConceptTooLong(len) => write!(
                f,
                "El concepto tiene {} caracteres (máximo {})",
                len, MAX_CONCEPT_LENGTH
            ),
            PayableValidationError::InvalidNetAmount(amount) => {
                write!(f, "El monto neto debe ser mayor a cero (recibido {})", amount)
            }
            PayableValidationError::NegativePartialPayments(amount) => {
                write!(f, "Los pagos parciales no pueden ser negativos (recibido {})", amount)
            }
            PayableValidationError::NegativeBreakdown(field) => {
                write!(f, "El campo {} no puede ser negativo", field)
            }
        }
    }
}

impl std::error::Error for PayableValidationError {}

impl PayableInput {
    /// Check the form invariants shared by the client and the server
    pub fn validate(&self) -> Result<(), PayableValidationError> {
        validate_payable_fields(
            &self.concept,
            self.net_amount,
            self.partial_payments,
            self.transfer_amount,
            self.cash_amount,
        )
    }
}

/// Field rules of a payable record, independent of the carrier type
pub fn validate_payable_fields(
    concept: &str,
    net_amount: f64,
    partial_payments: f64,
    transfer_amount: Option<f64>,
    cash_amount: Option<f64>,
) -> Result<(), PayableValidationError> {
    let concept = concept.trim();
    if concept.is_empty() {
        return Err(PayableValidationError::EmptyConcept);
    }
    let len = concept.chars().count();
    if len > MAX_CONCEPT_LENGTH {
        return Err(PayableValidationError::ConceptTooLong(len));
    }
    if !net_amount.is_finite() || net_amount <= 0.0 {
        return Err(PayableValidationError::InvalidNetAmount(net_amount));
    }
    if !partial_payments.is_finite() || partial_payments < 0.0 {
        return Err(PayableValidationError::NegativePartialPayments(partial_payments));
    }
    if transfer_amount.is_some_and(|a| a < 0.0) {
        return Err(PayableValidationError::NegativeBreakdown("monto_transferencia"));
    }
    if cash_amount.is_some_and(|a| a < 0.0) {
        return Err(PayableValidationError::NegativeBreakdown("monto_efectivo"));
    }
    Ok(())
}

/// Body of POST /api/cuentas-pagar/:id/abonos
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialPaymentRequest {
    #[serde(rename = "monto")]
    pub amount: f64,
}

/// Response of POST /api/cuentas-pagar/:id/abonos
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartialPaymentResponse {
    pub account: PayableAccount,
    pub newly_paid: bool,
    pub overpaid_by: Option<f64>,
}

/// Response after deleting a payable account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeletePayableResponse {
    pub id: String,
    pub success_message: String,
}

/// Provider referenced by payable accounts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Provider {
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(default)]
    pub rfc: Option<String>,
    #[serde(rename = "contacto", default)]
    pub contact: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateProviderRequest {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(default)]
    pub rfc: Option<String>,
    #[serde(rename = "contacto", default)]
    pub contact: Option<String>,
}

/// Expense category used to classify payable accounts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateCategoryRequest {
    #[serde(rename = "nombre")]
    pub name: String,
}

/// Error body returned by every failing endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Log line forwarded by the frontend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: String,
    pub message: String,
    pub component: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogResponse {
    pub success: bool,
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn payable(id: &str, due: &str, amount_with_tax: f64, is_paid: bool, partial: f64) -> PayableAccount {
        PayableAccount {
            id: id.to_string(),
            concept: format!("Concepto {}", id),
            net_amount: amount_with_tax,
            amount_with_tax,
            requires_tax: false,
            category: "Servicios".to_string(),
            provider_id: Some("prov-1".to_string()),
            due_date: NaiveDate::parse_from_str(due, "%Y-%m-%d").unwrap(),
            is_paid,
            partial_payments: partial,
            transfer_amount: None,
            cash_amount: None,
        }
    }
}
