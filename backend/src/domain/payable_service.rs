//! Payable account service: CRUD, paid toggle and partial payments.
use crate::domain::{
    commands::payables::{
        ApplyPartialPaymentCommand, DeletePayableResult, PartialPaymentResult, SavePayableCommand,
    },
    errors::{DomainError, DomainResult},
    models::Payable,
};
use crate::storage::{Connection, PayableModification, PayableStorage, ProviderStorage};
use anyhow::Context;
use shared::{payment, round_cents, validate_payable_fields, PayableAccount};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{info, warn};

#[derive(Clone)]
pub struct PayableService<C: Connection> {
    payable_repository: C::PayableRepository,
    provider_repository: C::ProviderRepository,
    tax_rate: f64,
}

impl<C: Connection> PayableService<C> {
    pub fn new(connection: Arc<C>, tax_rate: f64) -> Self {
        Self {
            payable_repository: connection.create_payable_repository(),
            provider_repository: connection.create_provider_repository(),
            tax_rate,
        }
    }

    /// All payables, most recent due date first
    pub async fn list_payables(&self) -> DomainResult<Vec<Payable>> {
        let mut payables = self.payable_repository.list_payables().await?;
        payables.sort_by(|a, b| b.due_date.cmp(&a.due_date).then_with(|| b.id.cmp(&a.id)));
        Ok(payables)
    }

    pub async fn get_payable(&self, id: &str) -> DomainResult<Payable> {
        self.payable_repository
            .get_payable(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    pub async fn create_payable(&self, command: SavePayableCommand) -> DomainResult<Payable> {
        let command = self.validate(command).await?;

        let now_millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .context("System clock is before the Unix epoch")?
            .as_millis() as u64;
        let payable = self.build_payable(Payable::generate_id(now_millis), command);

        self.payable_repository.store_payable(&payable).await?;
        info!(
            "Created payable {} ({}, {:.2})",
            payable.id, payable.concept, payable.amount_with_tax
        );
        Ok(payable)
    }

    /// Replace every mutable field, re-deriving the amount with tax
    pub async fn update_payable(&self, id: &str, command: SavePayableCommand) -> DomainResult<Payable> {
        let command = self.validate(command).await?;
        let payable = self.build_payable(id.to_string(), command);

        if !self.payable_repository.update_payable(&payable).await? {
            return Err(not_found(id));
        }
        info!("Updated payable {}", payable.id);
        Ok(payable)
    }

    pub async fn toggle_paid(&self, id: &str) -> DomainResult<Payable> {
        let outcome = self
            .payable_repository
            .modify_payable(
                id,
                Box::new(|payable: &mut Payable| {
                    payable.is_paid = !payable.is_paid;
                    Ok(())
                }),
            )
            .await?;
        let (_, updated) = modified(id, outcome)?;
        info!("Payable {} marked as {}", id, if updated.is_paid { "paid" } else { "pending" });
        Ok(updated)
    }

    /// Add an "abono"; the payable becomes paid once payments reach the amount with tax
    pub async fn apply_partial_payment(
        &self,
        command: ApplyPartialPaymentCommand,
    ) -> DomainResult<PartialPaymentResult> {
        let amount = payment::validate_payment_amount(command.amount)?;

        // Paid check and payment rule run on the record read under the write lock
        let outcome = self
            .payable_repository
            .modify_payable(
                &command.payable_id,
                Box::new(move |payable: &mut Payable| {
                    if payable.is_paid {
                        return Err(format!("La cuenta {} ya está pagada", payable.id));
                    }
                    let account = PayableAccount::from(&*payable);
                    let outcome = payment::apply_partial_payment(&account, amount).map_err(|e| e.to_string())?;
                    *payable = Payable::from(outcome.updated);
                    Ok(())
                }),
            )
            .await?;
        let (previous, updated) = modified(&command.payable_id, outcome)?;

        let overpaid = round_cents(updated.partial_payments - updated.amount_with_tax);
        let overpaid_by = (overpaid > 0.0).then_some(overpaid);
        if let Some(excess) = overpaid_by {
            warn!("Payable {} overpaid by {:.2}", updated.id, excess);
        }
        info!(
            "Applied partial payment of {:.2} to {} (total {:.2} of {:.2})",
            amount, updated.id, updated.partial_payments, updated.amount_with_tax
        );

        Ok(PartialPaymentResult {
            newly_paid: updated.is_paid && !previous.is_paid,
            overpaid_by,
            payable: updated,
        })
    }

    pub async fn delete_payable(&self, id: &str) -> DomainResult<DeletePayableResult> {
        if !self.payable_repository.delete_payable(id).await? {
            return Err(not_found(id));
        }
        info!("Deleted payable {}", id);
        Ok(DeletePayableResult {
            deleted_id: id.to_string(),
            success_message: format!("Cuenta por pagar {} eliminada", id),
        })
    }

    /// Check field rules and that the referenced provider exists
    async fn validate(&self, mut command: SavePayableCommand) -> DomainResult<SavePayableCommand> {
        validate_payable_fields(
            &command.concept,
            command.net_amount,
            command.partial_payments,
            command.transfer_amount,
            command.cash_amount,
        )?;

        command.concept = command.concept.trim().to_string();
        command.category = command.category.trim().to_string();
        command.provider_id = command
            .provider_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty());

        if let Some(provider_id) = &command.provider_id {
            if self.provider_repository.get_provider(provider_id).await?.is_none() {
                return Err(DomainError::Validation(format!(
                    "Proveedor {} no encontrado",
                    provider_id
                )));
            }
        }
        Ok(command)
    }

    fn build_payable(&self, id: String, command: SavePayableCommand) -> Payable {
        Payable {
            id,
            amount_with_tax: shared::amount_with_tax(command.net_amount, command.requires_tax, self.tax_rate),
            concept: command.concept,
            net_amount: command.net_amount,
            requires_tax: command.requires_tax,
            category: command.category,
            provider_id: command.provider_id,
            due_date: command.due_date,
            is_paid: command.is_paid,
            partial_payments: round_cents(command.partial_payments),
            transfer_amount: command.transfer_amount,
            cash_amount: command.cash_amount,
        }
    }
}

fn not_found(id: &str) -> DomainError {
    DomainError::NotFound(format!("Cuenta por pagar {} no encontrada", id))
}

/// Previous and stored record, or the matching domain error
fn modified(id: &str, outcome: PayableModification) -> DomainResult<(Payable, Payable)> {
    match outcome {
        PayableModification::Modified { previous, updated } => Ok((previous, updated)),
        PayableModification::Rejected(reason) => Err(DomainError::Validation(reason)),
        PayableModification::NotFound => Err(not_found(id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::test_utils::TestEnvironment;
    use crate::storage::CsvConnection;
    use chrono::NaiveDate;
    use shared::Provider;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn command(concept: &str, net_amount: f64, requires_tax: bool, due: &str) -> SavePayableCommand {
        SavePayableCommand {
            concept: concept.to_string(),
            net_amount,
            requires_tax,
            category: "Servicios".to_string(),
            provider_id: None,
            due_date: date(due),
            is_paid: false,
            partial_payments: 0.0,
            transfer_amount: None,
            cash_amount: None,
        }
    }

    fn setup() -> (TestEnvironment, PayableService<CsvConnection>) {
        let env = TestEnvironment::new().unwrap();
        let service = PayableService::new(Arc::new(env.connection.clone()), 0.16);
        (env, service)
    }

    #[tokio::test]
    async fn test_create_derives_amount_with_tax() {
        let (_env, service) = setup();

        let with_tax = service
            .create_payable(command("Renta", 1000.0, true, "2025-06-10"))
            .await
            .unwrap();
        assert_eq!(with_tax.amount_with_tax, 1160.0);
        assert!(with_tax.id.starts_with("cxp-"));

        let without_tax = service
            .create_payable(command("Agua", 300.0, false, "2025-06-11"))
            .await
            .unwrap();
        assert_eq!(without_tax.amount_with_tax, 300.0);
        assert_ne!(with_tax.id, without_tax.id);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_input() {
        let (_env, service) = setup();

        let err = service
            .create_payable(command("  ", 100.0, false, "2025-06-10"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = service
            .create_payable(command("Renta", -5.0, false, "2025-06-10"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        assert!(service.list_payables().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_checks_provider_exists() {
        let (env, service) = setup();
        let mut cmd = command("Renta", 100.0, false, "2025-06-10");
        cmd.provider_id = Some("prov-9".to_string());
        let err = service.create_payable(cmd.clone()).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let provider_repo = crate::storage::Connection::create_provider_repository(&env.connection);
        provider_repo
            .store_provider(&Provider {
                id: "prov-9".to_string(),
                name: "Inmobiliaria".to_string(),
                rfc: None,
                contact: None,
            })
            .await
            .unwrap();
        let created = service.create_payable(cmd).await.unwrap();
        assert_eq!(created.provider_id.as_deref(), Some("prov-9"));
    }

    #[tokio::test]
    async fn test_blank_provider_is_stored_as_none() {
        let (_env, service) = setup();
        let mut cmd = command("  Renta  ", 100.0, false, "2025-06-10");
        cmd.provider_id = Some("   ".to_string());
        let created = service.create_payable(cmd).await.unwrap();
        assert_eq!(created.provider_id, None);
        assert_eq!(created.concept, "Renta");
    }

    #[tokio::test]
    async fn test_list_sorted_by_due_date_desc() {
        let (_env, service) = setup();
        for (concept, due) in [("A", "2025-06-10"), ("B", "2025-07-01"), ("C", "2025-05-20")] {
            service.create_payable(command(concept, 10.0, false, due)).await.unwrap();
        }

        let concepts: Vec<String> = service
            .list_payables()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.concept)
            .collect();
        assert_eq!(concepts, vec!["B", "A", "C"]);
    }

    #[tokio::test]
    async fn test_update_replaces_fields_and_rederives_tax() {
        let (_env, service) = setup();
        let created = service
            .create_payable(command("Renta", 1000.0, false, "2025-06-10"))
            .await
            .unwrap();

        let mut cmd = command("Renta julio", 2000.0, true, "2025-07-10");
        cmd.partial_payments = 500.0;
        let updated = service.update_payable(&created.id, cmd).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.amount_with_tax, 2320.0);
        assert_eq!(updated.partial_payments, 500.0);
        assert_eq!(service.get_payable(&created.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_unknown_is_not_found() {
        let (_env, service) = setup();
        let err = service
            .update_payable("cxp-1-ffff", command("Renta", 10.0, false, "2025-06-10"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_toggle_paid_flips_flag() {
        let (_env, service) = setup();
        let created = service
            .create_payable(command("Renta", 100.0, false, "2025-06-10"))
            .await
            .unwrap();

        assert!(service.toggle_paid(&created.id).await.unwrap().is_paid);
        assert!(!service.toggle_paid(&created.id).await.unwrap().is_paid);
        assert!(matches!(
            service.toggle_paid("cxp-1-ffff").await.unwrap_err(),
            DomainError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn test_partial_payments_accumulate_until_paid() {
        let (_env, service) = setup();
        let created = service
            .create_payable(command("Renta", 1000.0, false, "2025-06-10"))
            .await
            .unwrap();

        let first = service
            .apply_partial_payment(ApplyPartialPaymentCommand { payable_id: created.id.clone(), amount: 400.0 })
            .await
            .unwrap();
        assert_eq!(first.payable.partial_payments, 400.0);
        assert!(!first.payable.is_paid);
        assert!(!first.newly_paid);

        let second = service
            .apply_partial_payment(ApplyPartialPaymentCommand { payable_id: created.id.clone(), amount: 600.0 })
            .await
            .unwrap();
        assert_eq!(second.payable.partial_payments, 1000.0);
        assert!(second.payable.is_paid);
        assert!(second.newly_paid);
        assert_eq!(second.overpaid_by, None);

        let stored = PayableAccount::from(&service.get_payable(&created.id).await.unwrap());
        assert_eq!(stored.outstanding(), 0.0);
    }

    #[tokio::test]
    async fn test_overpayment_is_reported() {
        let (_env, service) = setup();
        let created = service
            .create_payable(command("Renta", 100.0, false, "2025-06-10"))
            .await
            .unwrap();

        let result = service
            .apply_partial_payment(ApplyPartialPaymentCommand { payable_id: created.id.clone(), amount: 150.0 })
            .await
            .unwrap();
        assert!(result.payable.is_paid);
        assert_eq!(result.overpaid_by, Some(50.0));
    }

    #[tokio::test]
    async fn test_partial_payment_rejections() {
        let (_env, service) = setup();
        let created = service
            .create_payable(command("Renta", 100.0, false, "2025-06-10"))
            .await
            .unwrap();

        let err = service
            .apply_partial_payment(ApplyPartialPaymentCommand { payable_id: created.id.clone(), amount: 0.0 })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = service
            .apply_partial_payment(ApplyPartialPaymentCommand { payable_id: "cxp-1-ffff".to_string(), amount: 10.0 })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));

        service.toggle_paid(&created.id).await.unwrap();
        let err = service
            .apply_partial_payment(ApplyPartialPaymentCommand { payable_id: created.id.clone(), amount: 10.0 })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn test_concurrent_partial_payments_cannot_overpay() {
        let (_env, service) = setup();
        for _ in 0..10 {
            let created = service
                .create_payable(command("Renta", 1000.0, false, "2025-06-10"))
                .await
                .unwrap();
            service
                .apply_partial_payment(ApplyPartialPaymentCommand { payable_id: created.id.clone(), amount: 400.0 })
                .await
                .unwrap();

            let first = service.clone();
            let second = service.clone();
            let (id_a, id_b) = (created.id.clone(), created.id.clone());
            let (a, b) = tokio::join!(
                tokio::spawn(async move {
                    first
                        .apply_partial_payment(ApplyPartialPaymentCommand { payable_id: id_a, amount: 600.0 })
                        .await
                }),
                tokio::spawn(async move {
                    second
                        .apply_partial_payment(ApplyPartialPaymentCommand { payable_id: id_b, amount: 600.0 })
                        .await
                }),
            );
            let results = [a.unwrap(), b.unwrap()];

            assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
            assert!(results
                .iter()
                .any(|r| matches!(r, Err(DomainError::Validation(msg)) if msg.contains("ya está pagada"))));
            let stored = service.get_payable(&created.id).await.unwrap();
            assert_eq!(stored.partial_payments, 1000.0);
            assert!(stored.is_paid);
        }
    }

    #[tokio::test]
    async fn test_delete_payable() {
        let (_env, service) = setup();
        let created = service
            .create_payable(command("Renta", 100.0, false, "2025-06-10"))
            .await
            .unwrap();

        let result = service.delete_payable(&created.id).await.unwrap();
        assert_eq!(result.deleted_id, created.id);
        assert!(matches!(
            service.get_payable(&created.id).await.unwrap_err(),
            DomainError::NotFound(_)
        ));
        assert!(matches!(
            service.delete_payable(&created.id).await.unwrap_err(),
            DomainError::NotFound(_)
        ));
    }
}
