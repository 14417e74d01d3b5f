use crate::domain::commands::payables::SavePayableCommand;
use crate::domain::models::Payable as DomainPayable;
use shared::{PayableAccount, PayableInput};

pub struct PayableMapper;

impl PayableMapper {
    pub fn to_command(dto: PayableInput) -> SavePayableCommand {
        SavePayableCommand {
            concept: dto.concept,
            net_amount: dto.net_amount,
            requires_tax: dto.requires_tax,
            category: dto.category,
            provider_id: dto.provider_id,
            due_date: dto.due_date,
            is_paid: dto.is_paid,
            partial_payments: dto.partial_payments,
            transfer_amount: dto.transfer_amount,
            cash_amount: dto.cash_amount,
        }
    }

    pub fn to_dto(domain: DomainPayable) -> PayableAccount {
        PayableAccount::from(&domain)
    }

    pub fn to_dtos(domain: Vec<DomainPayable>) -> Vec<PayableAccount> {
        domain.into_iter().map(Self::to_dto).collect()
    }
}
