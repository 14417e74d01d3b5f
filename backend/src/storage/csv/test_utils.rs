//! Test utilities for CSV storage
//!
//! `TestEnvironment` owns a temporary data directory that is removed when the
//! environment is dropped, even if the test panics.

use anyhow::Result;
use chrono::NaiveDate;
use std::fs;
use tempfile::TempDir;

use super::connection::CsvConnection;
use crate::domain::models::Payable;

pub struct TestEnvironment {
    pub connection: CsvConnection,
    _temp_dir: TempDir, // Keep alive to prevent cleanup
}

impl TestEnvironment {
    /// Create a new test environment with a temporary directory
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let connection = CsvConnection::new(temp_dir.path())?;
        Ok(Self {
            connection,
            _temp_dir: temp_dir,
        })
    }

    /// Replace the permission table
    pub fn write_permissions(&self, yaml: &str) -> Result<()> {
        fs::write(self.connection.permissions_file_path(), yaml)?;
        Ok(())
    }
}

/// Unpaid payable without tax and without partial payments
pub fn sample_payable(id: &str, due: &str, amount: f64) -> Payable {
    Payable {
        id: id.to_string(),
        concept: format!("Concepto {}", id),
        net_amount: amount,
        amount_with_tax: amount,
        requires_tax: false,
        category: "Servicios".to_string(),
        provider_id: Some("prov-1".to_string()),
        due_date: NaiveDate::parse_from_str(due, "%Y-%m-%d").unwrap(),
        is_paid: false,
        partial_payments: 0.0,
        transfer_amount: None,
        cash_amount: None,
    }
}
