use chrono::Utc;
use chrono_tz::Tz;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::attachments::AttachmentService;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::loans::dtos::{
    Collateral, HistoryEntryDto, LoanDetailDto, LoanListQuery, LoanMutationResponseDto,
    LoanRequestDto, LoanResponseDto,
};
use crate::features::loans::models::{ApprovalHistoryEntry, Loan};
use crate::features::loans::reference::next_reference;
use crate::features::loans::services::loan_queries::{
    can_view, fetch_loan_for_update, find_visible_loan,
};
use crate::features::loans::workflow::{transition, Actor, LoanAction, SideEffect};
use crate::features::notifications::{NotificationService, Scenario};
use crate::shared::types::Meta;

/// The `sale_id` a listing is restricted to; `None` lists every loan
fn list_owner(user: &AuthenticatedUser) -> Option<Uuid> {
    (!user.can_view_all_loans()).then_some(user.staff_id)
}

type LoanQuery<'q> = QueryAs<'q, Postgres, Loan, PgArguments>;

/// Bind the 20 editable columns as `$1..$20`, in the order of `EDITABLE_COLUMNS`
fn bind_editable<'q>(
    query: LoanQuery<'q>,
    dto: &'q LoanRequestDto,
    collateral: &'q Collateral,
) -> LoanQuery<'q> {
    let vehicle = collateral.vehicle();
    let residence = collateral.residence();

    query
        .bind(dto.customer_name.trim())
        .bind(dto.id_card_number.as_deref())
        .bind(dto.birth_date)
        .bind(dto.borrower_info.clone().map(Json))
        .bind(dto.loan_type)
        .bind(vehicle.map(|v| v.brand.trim()))
        .bind(vehicle.and_then(|v| v.model.as_deref()))
        .bind(vehicle.and_then(|v| v.car_type.as_deref()))
        .bind(vehicle.and_then(|v| v.fuel_type.as_deref()))
        .bind(vehicle.and_then(|v| v.registration_date))
        .bind(vehicle.and_then(|v| v.registration_province.as_deref()))
        .bind(vehicle.and_then(|v| v.license_plate.as_deref()))
        .bind(vehicle.and_then(|v| v.details.as_deref()))
        .bind(residence.map(|r| r.address.trim()))
        .bind(residence.and_then(|r| r.land_deed_no.as_deref()))
        .bind(residence.and_then(|r| r.details.as_deref()))
        .bind(dto.loan_amount)
        .bind(dto.closing_amount)
        .bind(dto.term_months)
        .bind(dto.interest_rate)
}

const EDITABLE_COLUMNS: &str = "customer_name, id_card_number, birth_date, borrower_info, loan_type, \
     car_brand, car_model, car_type, car_fuel_type, registration_date, registration_province, \
     license_plate, car_details, residence_address, land_deed_no, residence_details, \
     loan_amount, closing_amount, term_months, interest_rate";

const LIST_FILTER: &str = r#"
    WHERE ($1::uuid IS NULL OR sale_id = $1)
      AND ($2::loan_status IS NULL OR status = $2)
      AND ($3::text IS NULL OR customer_name ILIKE $3 OR license_plate ILIKE $3)
      AND ($4::date IS NULL OR submission_date >= $4)
      AND ($5::date IS NULL OR submission_date <= $5)
"#;

pub struct LoanService {
    pool: PgPool,
    timezone: Tz,
    attachments: Arc<AttachmentService>,
    notifications: Arc<NotificationService>,
}

impl LoanService {
    pub fn new(
        pool: PgPool,
        timezone: Tz,
        attachments: Arc<AttachmentService>,
        notifications: Arc<NotificationService>,
    ) -> Self {
        Self {
            pool,
            timezone,
            attachments,
            notifications,
        }
    }

    /// Submit a new case: mint its reference, store it as pending_review, alert approvers
    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        dto: LoanRequestDto,
    ) -> Result<LoanMutationResponseDto> {
        let collateral = dto.collateral()?;
        let now = Utc::now();
        let submission_date = dto
            .submission_date
            .unwrap_or_else(|| now.with_timezone(&self.timezone).date_naive());

        let mut tx = self.pool.begin().await?;

        let reference = next_reference(&mut *tx, self.timezone, now).await?;

        let sql = format!(
            r#"
            INSERT INTO loans ({}, sale_id, sales_name, loan_reference_number, submission_date, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20,
                    $21, $22, $23, $24, 'pending_review')
            RETURNING *
            "#,
            EDITABLE_COLUMNS
        );
        let loan = bind_editable(sqlx::query_as::<_, Loan>(&sql), &dto, &collateral)
            .bind(user.staff_id)
            .bind(&user.name)
            .bind(&reference)
            .bind(submission_date)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(
            "Loan created: id={}, reference={}, sale_id={}",
            loan.id, reference, loan.sale_id
        );

        let notified = self
            .notifications
            .notify_best_effort(Scenario::NewSubmission, &loan)
            .await;

        Ok(LoanMutationResponseDto {
            loan: loan.into(),
            notified,
        })
    }

    /// Newest first; salespeople only see their own cases
    pub async fn list(
        &self,
        user: &AuthenticatedUser,
        query: &LoanListQuery,
    ) -> Result<(Vec<LoanResponseDto>, Meta)> {
        let pagination = query.pagination();
        let owner = list_owner(user);
        let search = query.search_pattern();

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM loans {}", LIST_FILTER))
            .bind(owner)
            .bind(query.status)
            .bind(&search)
            .bind(query.submitted_from)
            .bind(query.submitted_to)
            .fetch_one(&self.pool)
            .await?;

        let loans = sqlx::query_as::<_, Loan>(&format!(
            "SELECT * FROM loans {} ORDER BY created_at DESC LIMIT $6 OFFSET $7",
            LIST_FILTER
        ))
        .bind(owner)
        .bind(query.status)
        .bind(&search)
        .bind(query.submitted_from)
        .bind(query.submitted_to)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await?;

        debug!("Listed {} of {} loans for {}", loans.len(), total, user.staff_id);

        Ok((
            loans.into_iter().map(LoanResponseDto::from).collect(),
            pagination.meta(total),
        ))
    }

    pub async fn get_detail(&self, user: &AuthenticatedUser, id: Uuid) -> Result<LoanDetailDto> {
        let loan = find_visible_loan(&self.pool, user, id).await?;
        let attachments = self.attachments.list_for_loan(loan.id).await?;
        let history = self.fetch_history(loan.id).await?;

        Ok(LoanDetailDto {
            loan: loan.into(),
            attachments,
            history,
        })
    }

    pub async fn history(&self, user: &AuthenticatedUser, id: Uuid) -> Result<Vec<HistoryEntryDto>> {
        let loan = find_visible_loan(&self.pool, user, id).await?;
        self.fetch_history(loan.id).await
    }

    /// Owner edits the case and sends it back to review
    pub async fn update(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        dto: LoanRequestDto,
    ) -> Result<LoanMutationResponseDto> {
        let collateral = dto.collateral()?;

        let mut tx = self.pool.begin().await?;
        let loan = self.load_for_action(&mut tx, user, id).await?;
        let outcome = transition(loan.status, self.actor(user, &loan), &LoanAction::Resubmit)?;

        let sql = format!(
            r#"
            UPDATE loans
            SET ({}) = ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20),
                submission_date = COALESCE($21, submission_date),
                status = $22,
                updated_at = NOW()
            WHERE id = $23
            RETURNING *
            "#,
            EDITABLE_COLUMNS
        );
        let updated = bind_editable(sqlx::query_as::<_, Loan>(&sql), &dto, &collateral)
            .bind(dto.submission_date)
            .bind(outcome.new_status)
            .bind(loan.id)
            .fetch_one(&mut *tx)
            .await?;

        let scenarios = self.apply_history(&mut tx, user, loan.id, &outcome.effects).await?;
        tx.commit().await?;

        info!("Loan resubmitted: id={}, by={}", updated.id, user.staff_id);
        self.finish(updated, scenarios).await
    }

    /// Approve, reject or return a pending case
    pub async fn decide(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        action: LoanAction,
    ) -> Result<LoanMutationResponseDto> {
        let mut tx = self.pool.begin().await?;
        let loan = self.load_for_action(&mut tx, user, id).await?;
        let outcome = transition(loan.status, self.actor(user, &loan), &action)?;

        let updated = sqlx::query_as::<_, Loan>(
            r#"
            UPDATE loans
            SET status = $1,
                approver_id = $2,
                approver_name = $3,
                approver_comment = $4,
                updated_at = NOW()
            WHERE id = $5
            RETURNING *
            "#,
        )
        .bind(outcome.new_status)
        .bind(user.staff_id)
        .bind(&user.name)
        .bind(action.approver_comment())
        .bind(loan.id)
        .fetch_one(&mut *tx)
        .await?;

        let scenarios = self.apply_history(&mut tx, user, loan.id, &outcome.effects).await?;
        tx.commit().await?;

        info!(
            "Loan {}: id={}, {} -> {}, by={}",
            action.name(),
            updated.id,
            loan.status,
            updated.status,
            user.staff_id
        );
        self.finish(updated, scenarios).await
    }

    fn actor(&self, user: &AuthenticatedUser, loan: &Loan) -> Actor {
        Actor {
            role: user.role,
            is_owner: loan.is_owned_by(user.staff_id),
        }
    }

    /// Lock the row; a loan the user may not see reads as not found
    async fn load_for_action(
        &self,
        tx: &mut sqlx::Transaction<'_, Postgres>,
        user: &AuthenticatedUser,
        id: Uuid,
    ) -> Result<Loan> {
        fetch_loan_for_update(&mut **tx, id)
            .await?
            .filter(|loan| can_view(user, loan))
            .ok_or_else(|| AppError::NotFound("Loan not found".to_string()))
    }

    /// Write history effects inside the transaction; hand back the notifications for after commit
    async fn apply_history(
        &self,
        tx: &mut sqlx::Transaction<'_, Postgres>,
        user: &AuthenticatedUser,
        loan_id: Uuid,
        effects: &[SideEffect],
    ) -> Result<Vec<Scenario>> {
        let mut scenarios = Vec::new();
        for effect in effects {
            match effect {
                SideEffect::AppendHistory { action, comment } => {
                    sqlx::query(
                        r#"
                        INSERT INTO loan_approval_history (loan_id, action, comment, staff_name)
                        VALUES ($1, $2, $3, $4)
                        "#,
                    )
                    .bind(loan_id)
                    .bind(*action)
                    .bind(comment)
                    .bind(&user.name)
                    .execute(&mut **tx)
                    .await?;
                }
                SideEffect::Notify(scenario) => scenarios.push(*scenario),
            }
        }
        Ok(scenarios)
    }

    async fn finish(&self, loan: Loan, scenarios: Vec<Scenario>) -> Result<LoanMutationResponseDto> {
        let mut notified = false;
        for scenario in scenarios {
            notified |= self.notifications.notify_best_effort(scenario, &loan).await;
        }
        Ok(LoanMutationResponseDto {
            loan: loan.into(),
            notified,
        })
    }

    async fn fetch_history(&self, loan_id: Uuid) -> Result<Vec<HistoryEntryDto>> {
        let entries = sqlx::query_as::<_, ApprovalHistoryEntry>(
            "SELECT * FROM loan_approval_history WHERE loan_id = $1 ORDER BY created_at ASC",
        )
        .bind(loan_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries.into_iter().map(HistoryEntryDto::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{approver_user, manager_user, sale_user};

    #[test]
    fn test_list_is_scoped_to_the_salesperson() {
        let sale = sale_user();
        assert_eq!(list_owner(&sale), Some(sale.staff_id));
        assert_eq!(list_owner(&approver_user()), None);
        assert_eq!(list_owner(&manager_user()), None);
    }

    #[test]
    fn test_list_filter_binds_owner_first() {
        assert!(LIST_FILTER.contains("($1::uuid IS NULL OR sale_id = $1)"));
    }
}
