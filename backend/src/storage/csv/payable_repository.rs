use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, warn};

use super::connection::{CsvConnection, PAYABLES_HEADER};
use crate::domain::models::Payable;
use crate::storage::traits::{PayableChange, PayableModification, PayableStorage};

/// CSV-based payable repository backed by `cuentas_pagar.csv`
#[derive(Clone)]
pub struct PayableRepository {
    connection: CsvConnection,
}

impl PayableRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_payables(&self) -> Result<Vec<Payable>> {
        self.connection.read_records(&self.connection.payables_file_path())
    }

    fn write_payables(&self, payables: &[Payable]) -> Result<()> {
        self.connection
            .write_records(&self.connection.payables_file_path(), &PAYABLES_HEADER, payables)
    }
}

#[async_trait]
impl PayableStorage for PayableRepository {
    async fn list_payables(&self) -> Result<Vec<Payable>> {
        self.read_payables()
    }

    async fn get_payable(&self, id: &str) -> Result<Option<Payable>> {
        Ok(self.read_payables()?.into_iter().find(|p| p.id == id))
    }

    async fn store_payable(&self, payable: &Payable) -> Result<()> {
        let _guard = self.connection.lock_for_write().await;
        let mut payables = self.read_payables()?;
        if payables.iter().any(|p| p.id == payable.id) {
            anyhow::bail!("Payable {} already exists", payable.id);
        }
        payables.push(payable.clone());
        self.write_payables(&payables)?;
        debug!("Stored payable {}", payable.id);
        Ok(())
    }

    async fn update_payable(&self, payable: &Payable) -> Result<bool> {
        let _guard = self.connection.lock_for_write().await;
        let mut payables = self.read_payables()?;
        match payables.iter_mut().find(|p| p.id == payable.id) {
            Some(existing) => {
                *existing = payable.clone();
                self.write_payables(&payables)?;
                debug!("Updated payable {}", payable.id);
                Ok(true)
            }
            None => {
                warn!("Update of unknown payable {}", payable.id);
                Ok(false)
            }
        }
    }

    async fn modify_payable(&self, id: &str, change: PayableChange) -> Result<PayableModification> {
        let _guard = self.connection.lock_for_write().await;
        let mut payables = self.read_payables()?;
        let Some(existing) = payables.iter_mut().find(|p| p.id == id) else {
            return Ok(PayableModification::NotFound);
        };

        let previous = existing.clone();
        if let Err(reason) = change(existing) {
            debug!("Change to payable {} rejected: {}", id, reason);
            return Ok(PayableModification::Rejected(reason));
        }
        // The change closure must not move the record to another ID
        existing.id = previous.id.clone();
        let updated = existing.clone();

        self.write_payables(&payables)?;
        debug!("Modified payable {}", id);
        Ok(PayableModification::Modified { previous, updated })
    }

    async fn delete_payable(&self, id: &str) -> Result<bool> {
        let _guard = self.connection.lock_for_write().await;
        let mut payables = self.read_payables()?;
        let before = payables.len();
        payables.retain(|p| p.id != id);
        if payables.len() == before {
            return Ok(false);
        }
        self.write_payables(&payables)?;
        debug!("Deleted payable {}", id);
        Ok(true)
    }
}
