//! Export decision for the payables table.
//!
//! With rows selected the CSV is built in the browser from exactly those
//! rows. Otherwise the server builds it from the active filters.

use shared::csv_export::{payables_to_csv, CsvExportError};
use shared::{PayableAccount, PayableFilter};

use super::api::ApiClient;

/// Attachment name of a client-side export of selected rows
pub const SELECTION_FILENAME: &str = "cuentas_por_pagar_seleccion.csv";

#[derive(Debug, Clone, PartialEq)]
pub enum ExportPlan {
    /// Client-side CSV of the selected rows
    Selected {
        filename: String,
        rows: Vec<PayableAccount>,
    },
    /// Server-side CSV of the filtered collection
    Server { url: String },
}

/// Selected ids are resolved against `items` in table order; unknown ids are ignored
pub fn plan_export(
    client: &ApiClient,
    items: &[PayableAccount],
    selected_ids: &[String],
    filter: &PayableFilter,
) -> ExportPlan {
    let rows: Vec<PayableAccount> = items
        .iter()
        .filter(|account| selected_ids.iter().any(|id| *id == account.id))
        .cloned()
        .collect();
    if rows.is_empty() {
        ExportPlan::Server {
            url: client.export_url(filter),
        }
    } else {
        ExportPlan::Selected {
            filename: SELECTION_FILENAME.to_string(),
            rows,
        }
    }
}

pub fn selected_rows_csv(rows: &[PayableAccount]) -> Result<String, CsvExportError> {
    payables_to_csv(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shared::{MonthFilter, StatusFilter};

    fn account(id: &str) -> PayableAccount {
        PayableAccount {
            id: id.to_string(),
            concept: format!("Concepto {}", id),
            net_amount: 100.0,
            amount_with_tax: 116.0,
            requires_tax: true,
            category: "Servicios".to_string(),
            provider_id: None,
            due_date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
            is_paid: false,
            partial_payments: 0.0,
            transfer_amount: None,
            cash_amount: None,
        }
    }

    fn client() -> ApiClient {
        ApiClient::with_base_url("http://localhost:3000".to_string())
    }

    #[test]
    fn test_nothing_selected_without_filters_uses_bare_server_url() {
        let plan = plan_export(&client(), &[account("a")], &[], &PayableFilter::default());
        assert_eq!(
            plan,
            ExportPlan::Server {
                url: "http://localhost:3000/api/cuentas-pagar/export".to_string()
            }
        );
    }

    #[test]
    fn test_nothing_selected_forwards_filters_to_server() {
        let filter = PayableFilter {
            month: MonthFilter::Month(3),
            status: StatusFilter::Pending,
            ..Default::default()
        };
        let plan = plan_export(&client(), &[account("a")], &[], &filter);
        assert_eq!(
            plan,
            ExportPlan::Server {
                url: "http://localhost:3000/api/cuentas-pagar/export?filtroMes=3&estadoFiltro=pendientes"
                    .to_string()
            }
        );
    }

    #[test]
    fn test_selection_exports_exactly_selected_rows_in_table_order() {
        let items = vec![account("a"), account("b"), account("c")];
        let selected = vec!["c".to_string(), "a".to_string(), "missing".to_string()];
        match plan_export(&client(), &items, &selected, &PayableFilter::default()) {
            ExportPlan::Selected { filename, rows } => {
                assert_eq!(filename, "cuentas_por_pagar_seleccion.csv");
                let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
                assert_eq!(ids, vec!["a", "c"]);
            }
            other => panic!("expected client-side export, got {:?}", other),
        }
    }

    #[test]
    fn test_stale_selection_falls_back_to_server() {
        let selected = vec!["gone".to_string()];
        let plan = plan_export(&client(), &[account("a")], &selected, &PayableFilter::default());
        assert!(matches!(plan, ExportPlan::Server { .. }));
    }

    #[test]
    fn test_selected_rows_csv_has_header_and_one_line_per_row() {
        let csv = selected_rows_csv(&[account("a"), account("b")]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("a,"));
    }
}
