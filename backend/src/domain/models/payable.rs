//! Domain model for a payable account.
//!
//! Field order matches the columns of `cuentas_pagar.csv`.
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::PayableAccount;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payable {
    pub id: String,
    #[serde(rename = "concepto")]
    pub concept: String,
    #[serde(rename = "monto_neto")]
    pub net_amount: f64,
    #[serde(rename = "monto_con_iva")]
    pub amount_with_tax: f64,
    #[serde(rename = "requiere_iva")]
    pub requires_tax: bool,
    #[serde(rename = "categoria", default)]
    pub category: String,
    #[serde(rename = "proveedor_id", default)]
    pub provider_id: Option<String>,
    #[serde(rename = "fecha")]
    pub due_date: NaiveDate,
    #[serde(rename = "pagado")]
    pub is_paid: bool,
    #[serde(rename = "pagos_parciales", default)]
    pub partial_payments: f64,
    #[serde(rename = "monto_transferencia", default)]
    pub transfer_amount: Option<f64>,
    #[serde(rename = "monto_efectivo", default)]
    pub cash_amount: Option<f64>,
}

impl Payable {
    /// New ID: `cxp-<epoch_millis>-<4 hex chars>`
    pub fn generate_id(epoch_millis: u64) -> String {
        let suffix: String = Uuid::new_v4().simple().to_string().chars().take(4).collect();
        PayableAccount::generate_id(epoch_millis, &suffix)
    }
}

impl From<&Payable> for PayableAccount {
    fn from(payable: &Payable) -> Self {
        PayableAccount {
            id: payable.id.clone(),
            concept: payable.concept.clone(),
            net_amount: payable.net_amount,
            amount_with_tax: payable.amount_with_tax,
            requires_tax: payable.requires_tax,
            category: payable.category.clone(),
            provider_id: payable.provider_id.clone(),
            due_date: payable.due_date,
            is_paid: payable.is_paid,
            partial_payments: payable.partial_payments,
            transfer_amount: payable.transfer_amount,
            cash_amount: payable.cash_amount,
        }
    }
}

impl From<PayableAccount> for Payable {
    fn from(account: PayableAccount) -> Self {
        Payable {
            id: account.id,
            concept: account.concept,
            net_amount: account.net_amount,
            amount_with_tax: account.amount_with_tax,
            requires_tax: account.requires_tax,
            category: account.category,
            provider_id: account.provider_id,
            due_date: account.due_date,
            is_paid: account.is_paid,
            partial_payments: account.partial_payments,
            transfer_amount: account.transfer_amount,
            cash_amount: account.cash_amount,
        }
    }
}
