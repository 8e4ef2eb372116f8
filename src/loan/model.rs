//! Loan application models for Naturopura

use serde::{Deserialize, Serialize};
use sqlx::types::chrono::{DateTime, Utc};
use uuid::Uuid;
use validator::Validate;

/// Loan application status
///
/// `Completed` is declared in the schema but no operation produces it; the
/// only transitions are `Pending -> Approved` and `Pending -> Rejected`.
#[derive(Debug, Serialize, Deserialize, sqlx::Type, Clone, Copy, PartialEq, Eq)]
#[sqlx(type_name = "loan_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    Pending,
    Approved,
    Rejected,
    Completed,
}

impl LoanStatus {
    /// Whether an admin decision may move a loan from `self` to `target`.
    pub fn can_transition_to(self, target: LoanStatus) -> bool {
        matches!(
            (self, target),
            (LoanStatus::Pending, LoanStatus::Approved)
                | (LoanStatus::Pending, LoanStatus::Rejected)
        )
    }

    /// Terminal states admit no further transition.
    pub fn is_terminal(self) -> bool {
        matches!(self, LoanStatus::Approved | LoanStatus::Rejected)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LoanStatus::Pending => "pending",
            LoanStatus::Approved => "approved",
            LoanStatus::Rejected => "rejected",
            LoanStatus::Completed => "completed",
        }
    }
}

/// Loan application model
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct LoanApplication {
    pub id: Uuid,
    pub farmer_id: Uuid,
    pub amount: i64, // whole rupees
    pub purpose: String,
    pub term_months: i32,
    pub status: LoanStatus,
    pub interest_rate_bps: i32, // basis points, assigned from policy at creation
    pub collateral: Option<String>,
    pub crop_type: Option<String>,
    pub land_size_acres: Option<f64>,
    pub farm_details: Option<String>,
    pub documents: Option<Vec<String>>,
    pub applied_date: DateTime<Utc>,
    pub approved_date: Option<DateTime<Utc>>,
    pub rejected_date: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub completed_date: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// Request DTO for a farmer submitting a loan application
///
/// Static shape rules live here; the configured business rules (amount
/// bounds, purpose and term allow-lists) are checked by [`LoanPolicy`].
///
/// [`LoanPolicy`]: crate::loan::LoanPolicy
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLoanRequest {
    #[validate(range(min = 1, message = "must be greater than zero"))]
    pub amount: i64,
    #[validate(
        length(min = 1, message = "is required"),
        custom = "crate::models::validate_not_blank"
    )]
    pub purpose: String,
    #[validate(range(min = 1, message = "must be a positive number of months"))]
    pub term_months: i32,
    pub collateral: Option<String>,
    pub crop_type: Option<String>,
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub land_size_acres: Option<f64>,
    pub farm_details: Option<String>,
    pub documents: Option<Vec<String>>,
}

/// Request DTO for an admin deciding a pending application
///
/// Any status other than `approved`/`rejected` is accepted by the parser and
/// refused by the service as an invalid transition, so the client sees a 409
/// rather than a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct UpdateLoanStatusRequest {
    pub status: LoanStatus,
    pub rejection_reason: Option<String>,
}

/// Query parameters for the admin loan list
#[derive(Debug, Deserialize)]
pub struct ListLoansQuery {
    pub status: Option<LoanStatus>,
}

/// Loan application joined with the owning farmer, for the admin view.
/// A read-only projection; nothing here is stored denormalized.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct LoanWithFarmer {
    pub id: Uuid,
    pub farmer_id: Uuid,
    pub amount: i64,
    pub purpose: String,
    pub term_months: i32,
    pub status: LoanStatus,
    pub interest_rate_bps: i32,
    pub collateral: Option<String>,
    pub crop_type: Option<String>,
    pub land_size_acres: Option<f64>,
    pub farm_details: Option<String>,
    pub documents: Option<Vec<String>>,
    pub applied_date: DateTime<Utc>,
    pub approved_date: Option<DateTime<Utc>>,
    pub rejected_date: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub completed_date: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,

    // Farmer fields
    pub farmer_name: String,
    pub farmer_email: String,
    pub farmer_farm_name: Option<String>,
}

/// Aggregated loan figures for the admin dashboard
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct LoanStatistics {
    pub total: i64,
    pub pending: i64,
    pub approved: i64,
    pub rejected: i64,
    pub completed: i64,
    pub total_amount: i64,
    pub total_approved_amount: i64,
}
