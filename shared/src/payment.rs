//! Partial payment ("abono") rule.
//!
//! The account flips to paid as soon as the accumulated partial payments
//! reach the amount with tax. Overpayments are accepted and reported through
//! `PartialPaymentOutcome::overpaid_by`.

use crate::{round_cents, PayableAccount};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum PaymentValidationError {
    EmptyAmount,
    NotANumber(String),
    NotPositive(f64),
}

impl fmt::Display for PaymentValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentValidationError::EmptyAmount => write!(f, "Ingresa el monto del abono"),
            PaymentValidationError::NotANumber(input) => {
                write!(f, "'{}' no es un monto válido", input)
            }
            PaymentValidationError::NotPositive(amount) => {
                write!(f, "El abono debe ser mayor a cero (recibido {})", amount)
            }
        }
    }
}

impl std::error::Error for PaymentValidationError {}

/// Parse the amount typed by the user. Accepts a leading `$` and thousands separators.
pub fn parse_payment_amount(input: &str) -> Result<f64, PaymentValidationError> {
    let cleaned: String = input
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    if cleaned.is_empty() {
        return Err(PaymentValidationError::EmptyAmount);
    }
    let amount = cleaned
        .parse::<f64>()
        .map_err(|_| PaymentValidationError::NotANumber(input.trim().to_string()))?;
    validate_payment_amount(amount)
}

pub fn validate_payment_amount(amount: f64) -> Result<f64, PaymentValidationError> {
    if !amount.is_finite() {
        return Err(PaymentValidationError::NotANumber(amount.to_string()));
    }
    if amount <= 0.0 {
        return Err(PaymentValidationError::NotPositive(amount));
    }
    Ok(amount)
}

#[derive(Debug, Clone, PartialEq)]
pub struct PartialPaymentOutcome {
    /// Full record to send back with PUT
    pub updated: PayableAccount,
    /// The payment moved the account from pending to paid
    pub newly_paid: bool,
    /// Amount paid beyond `amount_with_tax`, if any
    pub overpaid_by: Option<f64>,
}

/// Apply a partial payment to a copy of the account
pub fn apply_partial_payment(
    account: &PayableAccount,
    amount: f64,
) -> Result<PartialPaymentOutcome, PaymentValidationError> {
    let amount = validate_payment_amount(amount)?;
    let new_total = round_cents(account.partial_payments + amount);
    let is_paid = new_total >= account.amount_with_tax;
    let overpaid = round_cents(new_total - account.amount_with_tax);

    let mut updated = account.clone();
    updated.partial_payments = new_total;
    updated.is_paid = is_paid;

    Ok(PartialPaymentOutcome {
        newly_paid: is_paid && !account.is_paid,
        overpaid_by: if overpaid > 0.0 { Some(overpaid) } else { None },
        updated,
    })
}
