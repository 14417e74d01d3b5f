//! Domain-level command and query types
//! These structs are used by services inside the domain layer and are **not**
//! exposed over the public API. The REST layer maps the public DTOs defined in
//! the `shared` crate to these internal types.

pub mod payables {
    use super::super::models::Payable;
    use chrono::NaiveDate;

    /// Mutable fields of a payable, used for both create and full update.
    /// `amount_with_tax` is absent: the service derives it.
    #[derive(Debug, Clone)]
    pub struct SavePayableCommand {
        pub concept: String,
        pub net_amount: f64,
        pub requires_tax: bool,
        pub category: String,
        pub provider_id: Option<String>,
        pub due_date: NaiveDate,
        pub is_paid: bool,
        pub partial_payments: f64,
        pub transfer_amount: Option<f64>,
        pub cash_amount: Option<f64>,
    }

    /// Apply an "abono" to an unpaid payable.
    #[derive(Debug, Clone)]
    pub struct ApplyPartialPaymentCommand {
        pub payable_id: String,
        pub amount: f64,
    }

    /// Result of applying a partial payment.
    #[derive(Debug, Clone)]
    pub struct PartialPaymentResult {
        pub payable: Payable,
        pub newly_paid: bool,
        pub overpaid_by: Option<f64>,
    }

    /// Result of deleting a payable.
    #[derive(Debug, Clone)]
    pub struct DeletePayableResult {
        pub deleted_id: String,
        pub success_message: String,
    }
}

pub mod reference {
    /// Input for creating a provider.
    #[derive(Debug, Clone)]
    pub struct CreateProviderCommand {
        pub name: String,
        pub rfc: Option<String>,
        pub contact: Option<String>,
    }

    /// Input for creating a category.
    #[derive(Debug, Clone)]
    pub struct CreateCategoryCommand {
        pub name: String,
    }
}

pub mod export {
    use chrono::NaiveDate;
    use shared::PayableFilter;

    /// Export of the payables matching a filter.
    #[derive(Debug, Clone)]
    pub struct ExportPayablesQuery {
        pub filter: PayableFilter,
        /// Date stamped into the file name
        pub export_date: NaiveDate,
    }

    /// Encoded CSV document ready to be sent as an attachment.
    #[derive(Debug, Clone)]
    pub struct ExportPayablesResult {
        pub filename: String,
        pub csv_content: String,
        pub row_count: usize,
    }
}
