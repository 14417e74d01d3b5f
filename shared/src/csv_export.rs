//! CSV encoding of payable accounts.
//!
//! Used both for the client-side export of selected rows and for the
//! server-side export endpoint. Quoting follows RFC 4180 via the `csv` crate.

use crate::PayableAccount;
use chrono::NaiveDate;
use std::fmt;

pub const CSV_HEADER: [&str; 12] = [
    "id",
    "concepto",
    "monto_neto",
    "monto_con_iva",
    "requiere_iva",
    "categoria",
    "proveedor_id",
    "fecha",
    "pagado",
    "pagos_parciales",
    "monto_transferencia",
    "monto_efectivo",
];

#[derive(Debug)]
pub enum CsvExportError {
    Csv(csv::Error),
    Flush(String),
    Encoding(std::string::FromUtf8Error),
}

impl fmt::Display for CsvExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CsvExportError::Csv(e) => write!(f, "CSV write error: {}", e),
            CsvExportError::Flush(e) => write!(f, "CSV flush error: {}", e),
            CsvExportError::Encoding(e) => write!(f, "CSV encoding error: {}", e),
        }
    }
}

impl std::error::Error for CsvExportError {}

impl From<csv::Error> for CsvExportError {
    fn from(e: csv::Error) -> Self {
        CsvExportError::Csv(e)
    }
}

fn format_amount(amount: f64) -> String {
    format!("{:.2}", amount)
}

fn format_optional_amount(amount: Option<f64>) -> String {
    amount.map(format_amount).unwrap_or_default()
}

/// Fields of one row, in `CSV_HEADER` order
pub fn payable_record(account: &PayableAccount) -> [String; 12] {
    [
        account.id.clone(),
        account.concept.clone(),
        format_amount(account.net_amount),
        format_amount(account.amount_with_tax),
        account.requires_tax.to_string(),
        account.category.clone(),
        account.provider_id.clone().unwrap_or_default(),
        account.due_date.format("%Y-%m-%d").to_string(),
        account.is_paid.to_string(),
        format_amount(account.partial_payments),
        format_optional_amount(account.transfer_amount),
        format_optional_amount(account.cash_amount),
    ]
}

/// Write the header and one row per account
pub fn write_payables_csv<W: std::io::Write>(
    writer: W,
    items: &[PayableAccount],
) -> Result<(), CsvExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(CSV_HEADER)?;
    for account in items {
        csv_writer.write_record(payable_record(account))?;
    }
    csv_writer
        .flush()
        .map_err(|e| CsvExportError::Flush(e.to_string()))?;
    Ok(())
}

/// Attachment name of an export made on `date`
pub fn export_filename(date: NaiveDate) -> String {
    format!("cuentas_por_pagar_{}.csv", date.format("%Y%m%d"))
}

/// Encode the accounts into an in-memory CSV document
pub fn payables_to_csv(items: &[PayableAccount]) -> Result<String, CsvExportError> {
    let mut buffer = Vec::new();
    write_payables_csv(&mut buffer, items)?;
    String::from_utf8(buffer).map_err(CsvExportError::Encoding)
}
