//! Loan application lifecycle operations

use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiError;
use crate::loan::model::{
    CreateLoanRequest, ListLoansQuery, LoanApplication, LoanStatistics, LoanStatus,
    LoanWithFarmer, UpdateLoanStatusRequest,
};
use crate::loan::policy::LoanPolicy;
use crate::models::Actor;

const DEFAULT_REJECTION_REASON: &str = "No reason provided";

#[derive(Clone)]
pub struct LoanService {
    pool: PgPool,
    policy: LoanPolicy,
}

impl LoanService {
    pub fn new(pool: PgPool, policy: LoanPolicy) -> Self {
        Self { pool, policy }
    }

    /// Submit a new application on behalf of the calling farmer.
    ///
    /// The caller never chooses the owner, status or interest rate: the
    /// owner is the authenticated farmer, status starts at `pending` and
    /// the rate comes from the configured policy.
    pub async fn create_loan_application(
        &self,
        actor: &Actor,
        input: CreateLoanRequest,
    ) -> Result<LoanApplication, ApiError> {
        if !actor.is_farmer() {
            return Err(ApiError::Forbidden(
                "Only farmers can submit loan applications".to_string(),
            ));
        }

        input.validate()?;
        self.policy.validate_create(&input)?;

        let loan = sqlx::query_as::<_, LoanApplication>(
            r#"
            INSERT INTO loan_applications (
                id, farmer_id, amount, purpose, term_months, status,
                interest_rate_bps, collateral, crop_type, farm_details,
                land_size_acres, documents, applied_date, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(actor.id)
        .bind(input.amount)
        .bind(input.purpose.trim())
        .bind(input.term_months)
        .bind(LoanStatus::Pending)
        .bind(self.policy.default_interest_rate_bps)
        .bind(input.collateral)
        .bind(input.crop_type)
        .bind(input.farm_details)
        .bind(input.land_size_acres)
        .bind(input.documents)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(
            loan_id = %loan.id,
            farmer_id = %actor.id,
            amount = loan.amount,
            "Loan application submitted"
        );

        Ok(loan)
    }

    /// List every application with farmer contact details, optionally
    /// filtered by status. Administrator only.
    pub async fn list_all(
        &self,
        actor: &Actor,
        query: ListLoansQuery,
    ) -> Result<Vec<LoanWithFarmer>, ApiError> {
        self.require_admin(actor)?;

        let mut builder = QueryBuilder::new(
            r#"
            SELECT l.*, u.name AS farmer_name, u.email AS farmer_email,
                   u.farm_name AS farmer_farm_name
            FROM loan_applications l
            JOIN users u ON u.id = l.farmer_id
            "#,
        );

        if let Some(status) = query.status {
            builder.push(" WHERE l.status = ");
            builder.push_bind(status);
        }

        builder.push(" ORDER BY l.applied_date DESC");

        let loans = builder
            .build_query_as::<LoanWithFarmer>()
            .fetch_all(&self.pool)
            .await?;

        Ok(loans)
    }

    /// List the calling farmer's own applications, newest first.
    pub async fn list_for_farmer(&self, actor: &Actor) -> Result<Vec<LoanApplication>, ApiError> {
        if !actor.is_farmer() {
            return Err(ApiError::Forbidden(
                "Only farmers have a personal application list".to_string(),
            ));
        }

        let loans = sqlx::query_as::<_, LoanApplication>(
            r#"
            SELECT * FROM loan_applications
            WHERE farmer_id = $1
            ORDER BY applied_date DESC
            "#,
        )
        .bind(actor.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(loans)
    }

    /// Fetch a single application. Farmers may only read their own;
    /// administrators may read any.
    pub async fn get_loan(&self, actor: &Actor, loan_id: Uuid) -> Result<LoanApplication, ApiError> {
        let loan = sqlx::query_as::<_, LoanApplication>(
            "SELECT * FROM loan_applications WHERE id = $1",
        )
        .bind(loan_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("Loan application not found".to_string()))?;

        if !actor.is_admin() && loan.farmer_id != actor.id {
            return Err(ApiError::Forbidden(
                "You do not have access to this loan application".to_string(),
            ));
        }

        Ok(loan)
    }

    /// Decide a pending application. Administrator only.
    ///
    /// The status change is a single conditional UPDATE guarded on
    /// `status = 'pending'`, so two concurrent decisions cannot both win:
    /// the loser matches zero rows and reports the conflict.
    pub async fn update_status(
        &self,
        actor: &Actor,
        loan_id: Uuid,
        request: UpdateLoanStatusRequest,
    ) -> Result<LoanApplication, ApiError> {
        self.require_admin(actor)?;

        let updated = match request.status {
            LoanStatus::Approved => {
                sqlx::query_as::<_, LoanApplication>(
                    r#"
                    UPDATE loan_applications
                    SET status = $2, approved_date = NOW(), updated_at = NOW()
                    WHERE id = $1 AND status = $3
                    RETURNING *
                    "#,
                )
                .bind(loan_id)
                .bind(LoanStatus::Approved)
                .bind(LoanStatus::Pending)
                .fetch_optional(&self.pool)
                .await?
            }
            LoanStatus::Rejected => {
                let reason = request
                    .rejection_reason
                    .as_deref()
                    .map(str::trim)
                    .filter(|r| !r.is_empty())
                    .unwrap_or(DEFAULT_REJECTION_REASON);

                sqlx::query_as::<_, LoanApplication>(
                    r#"
                    UPDATE loan_applications
                    SET status = $2, rejected_date = NOW(), rejection_reason = $3,
                        updated_at = NOW()
                    WHERE id = $1 AND status = $4
                    RETURNING *
                    "#,
                )
                .bind(loan_id)
                .bind(LoanStatus::Rejected)
                .bind(reason)
                .bind(LoanStatus::Pending)
                .fetch_optional(&self.pool)
                .await?
            }
            other => {
                return Err(ApiError::InvalidTransition(format!(
                    "status can only be set to approved or rejected, not {}",
                    other.as_str()
                )));
            }
        };

        match updated {
            Some(loan) => {
                tracing::info!(
                    loan_id = %loan.id,
                    status = loan.status.as_str(),
                    admin_id = %actor.id,
                    "Loan application decided"
                );
                Ok(loan)
            }
            None => Err(self.explain_failed_transition(loan_id, request.status).await?),
        }
    }

    /// Aggregate counts and amounts across all applications. Administrator
    /// only.
    pub async fn statistics(&self, actor: &Actor) -> Result<LoanStatistics, ApiError> {
        self.require_admin(actor)?;

        let stats = sqlx::query_as::<_, LoanStatistics>(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = 'pending') AS pending,
                COUNT(*) FILTER (WHERE status = 'approved') AS approved,
                COUNT(*) FILTER (WHERE status = 'rejected') AS rejected,
                COUNT(*) FILTER (WHERE status = 'completed') AS completed,
                COALESCE(SUM(amount), 0)::BIGINT AS total_amount,
                COALESCE(SUM(amount) FILTER (WHERE status = 'approved'), 0)::BIGINT
                    AS total_approved_amount
            FROM loan_applications
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(stats)
    }

    fn require_admin(&self, actor: &Actor) -> Result<(), ApiError> {
        if actor.is_admin() {
            Ok(())
        } else {
            Err(ApiError::Forbidden(
                "Administrator access required".to_string(),
            ))
        }
    }

    /// After a guarded UPDATE matched nothing, work out whether the loan is
    /// missing or already decided so the caller gets the right error.
    async fn explain_failed_transition(
        &self,
        loan_id: Uuid,
        requested: LoanStatus,
    ) -> Result<ApiError, ApiError> {
        let current = sqlx::query_scalar::<_, LoanStatus>(
            "SELECT status FROM loan_applications WHERE id = $1",
        )
        .bind(loan_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(match current {
            None => ApiError::NotFound("Loan application not found".to_string()),
            Some(status) => ApiError::InvalidTransition(format!(
                "cannot move a {} application to {}",
                status.as_str(),
                requested.as_str()
            )),
        })
    }
}
