use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::loans::models::Loan;
use crate::features::loans::services::fetch_loan;
use crate::features::notifications::dispatch::{loan_label, usable_phones, Recipients, Scenario};
use crate::features::notifications::dtos::NotifyResponseDto;
use crate::features::staff::StaffService;
use crate::modules::sms::{EazySmsClient, SmsError};

pub struct NotificationService {
    pool: PgPool,
    staff: Arc<StaffService>,
    sms: Arc<EazySmsClient>,
}

impl NotificationService {
    pub fn new(pool: PgPool, staff: Arc<StaffService>, sms: Arc<EazySmsClient>) -> Self {
        Self { pool, staff, sms }
    }

    /// Send the SMS for `scenario` about the loan with `loan_id`
    pub async fn notify_by_id(&self, scenario: Scenario, loan_id: Uuid) -> Result<NotifyResponseDto> {
        if !self.sms.is_configured() {
            return Err(SmsError::NotConfigured.into());
        }
        let loan = fetch_loan(&self.pool, loan_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Loan not found".to_string()))?;
        self.notify(scenario, &loan).await
    }

    pub async fn notify(&self, scenario: Scenario, loan: &Loan) -> Result<NotifyResponseDto> {
        let phones = self.recipient_phones(scenario, loan).await?;
        if phones.is_empty() {
            info!(
                "No recipients for scenario {} on loan {}",
                u8::from(scenario),
                loan.id
            );
            return Ok(NotifyResponseDto::no_recipients());
        }

        let label = loan_label(
            loan.loan_reference_number.as_deref(),
            Some(loan.customer_name.as_str()),
        );
        self.sms.send(&phones, &scenario.message(&label)).await?;

        info!(
            "SMS sent for scenario {} on loan {} to {} recipient(s)",
            u8::from(scenario),
            loan.id,
            phones.len()
        );
        Ok(NotifyResponseDto::sent())
    }

    /// Notify without failing the caller; returns whether the gateway accepted the message
    pub async fn notify_best_effort(&self, scenario: Scenario, loan: &Loan) -> bool {
        if !self.sms.is_configured() {
            debug!("SMS disabled; skipping scenario {} for loan {}", u8::from(scenario), loan.id);
            return false;
        }
        match self.notify(scenario, loan).await {
            Ok(outcome) => outcome.sent,
            Err(e) => {
                warn!(
                    "Notification for scenario {} on loan {} failed: {}",
                    u8::from(scenario),
                    loan.id,
                    e
                );
                false
            }
        }
    }

    async fn recipient_phones(&self, scenario: Scenario, loan: &Loan) -> Result<Vec<String>> {
        let phones = match scenario.recipients() {
            Recipients::AllApprovers => self.staff.approver_phones().await?,
            Recipients::Owner => self.staff.phone_of(loan.sale_id).await?.into_iter().collect(),
            Recipients::AssignedApproverOrAll => {
                let assigned = match loan.approver_id {
                    Some(id) => self.staff.phone_of(id).await?,
                    None => None,
                };
                match assigned {
                    Some(phone) if !phone.trim().is_empty() => vec![phone],
                    _ => self.staff.approver_phones().await?,
                }
            }
        };
        Ok(usable_phones(phones))
    }
}
