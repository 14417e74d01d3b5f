//! CSV export of payable accounts.
//!
//! Filters with the same engine the list view uses, sorts by due date
//! descending and encodes through `shared::csv_export`.

use anyhow::anyhow;
use shared::{csv_export, filters, PayableAccount};
use tracing::info;

use crate::domain::commands::export::{ExportPayablesQuery, ExportPayablesResult};
use crate::domain::errors::DomainResult;
use crate::domain::payable_service::PayableService;
use crate::storage::Connection;

#[derive(Clone)]
pub struct ExportService<C: Connection> {
    payable_service: PayableService<C>,
}

impl<C: Connection> ExportService<C> {
    pub fn new(payable_service: PayableService<C>) -> Self {
        Self { payable_service }
    }

    pub async fn export_payables_csv(&self, query: ExportPayablesQuery) -> DomainResult<ExportPayablesResult> {
        let payables = self.payable_service.list_payables().await?;
        let accounts: Vec<PayableAccount> = payables.iter().map(PayableAccount::from).collect();

        let mut selected = filters::apply_filters(&accounts, &query.filter);
        filters::sort_by_due_date_desc(&mut selected);

        let csv_content = csv_export::payables_to_csv(&selected)
            .map_err(|e| anyhow!("Failed to encode export: {}", e))?;

        info!(
            "Exported {} of {} payables (filters active: {})",
            selected.len(),
            accounts.len(),
            query.filter.is_active()
        );

        Ok(ExportPayablesResult {
            filename: csv_export::export_filename(query.export_date),
            csv_content,
            row_count: selected.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::payables::SavePayableCommand;
    use crate::storage::csv::test_utils::TestEnvironment;
    use chrono::NaiveDate;
    use shared::{MonthFilter, PayableFilter, StatusFilter};
    use std::sync::Arc;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    async fn seed(service: &PayableService<crate::storage::CsvConnection>, concept: &str, due: &str, paid: bool) {
        service
            .create_payable(SavePayableCommand {
                concept: concept.to_string(),
                net_amount: 100.0,
                requires_tax: false,
                category: "Servicios".to_string(),
                provider_id: None,
                due_date: date(due),
                is_paid: paid,
                partial_payments: 0.0,
                transfer_amount: None,
                cash_amount: None,
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_export_filters_and_sorts() {
        let env = TestEnvironment::new().unwrap();
        let payable_service = PayableService::new(Arc::new(env.connection.clone()), 0.16);
        seed(&payable_service, "Renta mayo", "2025-05-01", true).await;
        seed(&payable_service, "Renta junio", "2025-06-01", false).await;
        seed(&payable_service, "Luz junio", "2025-06-20", false).await;
        let service = ExportService::new(payable_service);

        let result = service
            .export_payables_csv(ExportPayablesQuery {
                filter: PayableFilter {
                    month: MonthFilter::Month(6),
                    status: StatusFilter::Pending,
                    ..Default::default()
                },
                export_date: date("2025-06-21"),
            })
            .await
            .unwrap();

        assert_eq!(result.row_count, 2);
        assert_eq!(result.filename, "cuentas_por_pagar_20250621.csv");
        let lines: Vec<&str> = result.csv_content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("id,concepto,"));
        assert!(lines[1].contains("Luz junio"));
        assert!(lines[2].contains("Renta junio"));
    }

    #[tokio::test]
    async fn test_export_without_filters_includes_everything() {
        let env = TestEnvironment::new().unwrap();
        let payable_service = PayableService::new(Arc::new(env.connection.clone()), 0.16);
        seed(&payable_service, "Renta mayo", "2025-05-01", true).await;
        seed(&payable_service, "Renta junio", "2025-06-01", false).await;
        let service = ExportService::new(payable_service);

        let result = service
            .export_payables_csv(ExportPayablesQuery {
                filter: PayableFilter::default(),
                export_date: date("2025-06-21"),
            })
            .await
            .unwrap();
        assert_eq!(result.row_count, 2);
    }
}
