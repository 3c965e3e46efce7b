//! Loan row access shared by the loan and attachment services.

use sqlx::{PgConnection, PgExecutor, PgPool};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::loans::models::Loan;

pub async fn fetch_loan<'e, E>(executor: E, id: Uuid) -> Result<Option<Loan>>
where
    E: PgExecutor<'e>,
{
    let loan = sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = $1")
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(loan)
}

/// Row-locks the loan until the surrounding transaction ends
pub async fn fetch_loan_for_update(conn: &mut PgConnection, id: Uuid) -> Result<Option<Loan>> {
    let loan = sqlx::query_as::<_, Loan>("SELECT * FROM loans WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(loan)
}

/// Whether `user` may read `loan`: approvers and managers see everything, sales only their own
pub fn can_view(user: &AuthenticatedUser, loan: &Loan) -> bool {
    user.can_view_all_loans() || loan.is_owned_by(user.staff_id)
}

/// A loan owned by someone else reads as not found
fn visible_to(user: &AuthenticatedUser, loan: Option<Loan>) -> Result<Loan> {
    match loan {
        Some(loan) if can_view(user, &loan) => Ok(loan),
        _ => Err(AppError::NotFound("Loan not found".to_string())),
    }
}

/// Only the owning salesperson may change a loan, and only while it is editable
pub fn ensure_editable(user: &AuthenticatedUser, loan: &Loan) -> Result<()> {
    if !loan.is_owned_by(user.staff_id) {
        return Err(AppError::Forbidden(
            "Only the owning salesperson may change this loan".to_string(),
        ));
    }
    if !loan.status.is_editable() {
        return Err(AppError::Conflict(format!(
            "Loan in status '{}' can no longer be changed",
            loan.status
        )));
    }
    Ok(())
}

/// Load a loan the user may see
pub async fn find_visible_loan(pool: &PgPool, user: &AuthenticatedUser, id: Uuid) -> Result<Loan> {
    visible_to(user, fetch_loan(pool, id).await?)
}

/// Load a loan the user owns and may still edit (sale role, editable status)
pub async fn find_editable_loan(pool: &PgPool, user: &AuthenticatedUser, id: Uuid) -> Result<Loan> {
    let loan = find_visible_loan(pool, user, id).await?;
    ensure_editable(user, &loan)?;
    Ok(loan)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::loans::models::LoanStatus;
    use crate::shared::test_helpers::{approver_user, manager_user, sale_user, sample_loan};

    #[test]
    fn test_sale_sees_only_own_loans() {
        let owner = sale_user();
        let other = sale_user();
        let loan = sample_loan(owner.staff_id, LoanStatus::PendingReview);

        assert!(can_view(&owner, &loan));
        assert!(!can_view(&other, &loan));
        assert!(can_view(&approver_user(), &loan));
        assert!(can_view(&manager_user(), &loan));
    }

    #[test]
    fn test_foreign_loan_reads_as_not_found() {
        let owner = sale_user();
        let loan = sample_loan(owner.staff_id, LoanStatus::PendingReview);

        let result = visible_to(&sale_user(), Some(loan.clone()));
        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert!(matches!(visible_to(&owner, None), Err(AppError::NotFound(_))));
        assert_eq!(visible_to(&owner, Some(loan.clone())).unwrap().id, loan.id);
        assert_eq!(visible_to(&approver_user(), Some(loan.clone())).unwrap().id, loan.id);
    }

    #[test]
    fn test_only_owner_may_edit() {
        let owner = sale_user();
        let loan = sample_loan(owner.staff_id, LoanStatus::PendingReview);

        assert!(ensure_editable(&owner, &loan).is_ok());
        assert!(matches!(
            ensure_editable(&approver_user(), &loan),
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            ensure_editable(&manager_user(), &loan),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_decided_loans_are_locked() {
        let owner = sale_user();
        for status in [LoanStatus::Approved, LoanStatus::Rejected] {
            let loan = sample_loan(owner.staff_id, status);
            assert!(matches!(
                ensure_editable(&owner, &loan),
                Err(AppError::Conflict(_))
            ));
        }

        let returned = sample_loan(owner.staff_id, LoanStatus::ReturnedForRevision);
        assert!(ensure_editable(&owner, &returned).is_ok());
    }
}
