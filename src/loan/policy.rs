//! Configurable lending rules
//!
//! The two Naturopura frontends historically disagreed on business rules
//! (enum vs free-text purpose, bounded vs unbounded amount, different
//! default interest rates), so none of them are hard-coded: they live in a
//! [`LoanPolicy`] loaded from the environment at startup. The defaults
//! reproduce the stricter variant.

use validator::{ValidationError, ValidationErrors};

use crate::loan::model::CreateLoanRequest;

/// Default closed amount range in rupees.
pub const DEFAULT_AMOUNT_BOUNDS: (i64, i64) = (10_000, 1_000_000);

/// Default purpose allow-list.
pub const DEFAULT_PURPOSES: [&str; 5] = ["seeds", "equipment", "irrigation", "land", "other"];

/// Default term allow-list: 3 and 6 months, then 1/2/5 years.
pub const DEFAULT_TERMS_MONTHS: [i32; 5] = [3, 6, 12, 24, 60];

/// Default interest rate in basis points (8%).
pub const DEFAULT_INTEREST_RATE_BPS: i32 = 800;

/// Business rules applied to loan application submissions.
#[derive(Debug, Clone)]
pub struct LoanPolicy {
    /// Closed `[min, max]` range for `amount`; `None` means unbounded
    /// (positivity is still required by the request DTO).
    pub amount_bounds: Option<(i64, i64)>,
    /// Allow-list for `purpose`; `None` means free text.
    pub allowed_purposes: Option<Vec<String>>,
    /// Allow-list for `term_months`; `None` means any positive month count.
    pub allowed_terms_months: Option<Vec<i32>>,
    /// Interest rate stamped on every new application, never client-supplied.
    pub default_interest_rate_bps: i32,
}

impl Default for LoanPolicy {
    fn default() -> Self {
        Self {
            amount_bounds: Some(DEFAULT_AMOUNT_BOUNDS),
            allowed_purposes: Some(DEFAULT_PURPOSES.iter().map(|s| s.to_string()).collect()),
            allowed_terms_months: Some(DEFAULT_TERMS_MONTHS.to_vec()),
            default_interest_rate_bps: DEFAULT_INTEREST_RATE_BPS,
        }
    }
}

impl LoanPolicy {
    /// A policy with every configurable rule relaxed: free-text purpose,
    /// unbounded amount, any positive term.
    pub fn unrestricted(default_interest_rate_bps: i32) -> Self {
        Self {
            amount_bounds: None,
            allowed_purposes: None,
            allowed_terms_months: None,
            default_interest_rate_bps,
        }
    }

    /// Check the configured rules against a submission, reporting failures
    /// per field.
    pub fn validate_create(&self, request: &CreateLoanRequest) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Some((min, max)) = self.amount_bounds {
            if request.amount < min || request.amount > max {
                let mut err = ValidationError::new("amount_bounds");
                err.message = Some(format!("must be between {} and {} rupees", min, max).into());
                errors.add("amount", err);
            }
        }

        if let Some(allowed) = &self.allowed_purposes {
            let purpose = request.purpose.trim();
            if !allowed.iter().any(|p| p.eq_ignore_ascii_case(purpose)) {
                let mut err = ValidationError::new("purpose_allow_list");
                err.message = Some(format!("must be one of: {}", allowed.join(", ")).into());
                errors.add("purpose", err);
            }
        }

        if let Some(allowed) = &self.allowed_terms_months {
            if !allowed.contains(&request.term_months) {
                let terms: Vec<String> = allowed.iter().map(|t| t.to_string()).collect();
                let mut err = ValidationError::new("term_allow_list");
                err.message =
                    Some(format!("must be one of: {} (months)", terms.join(", ")).into());
                errors.add("term_months", err);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(amount: i64, purpose: &str, term_months: i32) -> CreateLoanRequest {
        CreateLoanRequest {
            amount,
            purpose: purpose.to_string(),
            term_months,
            collateral: None,
            crop_type: None,
            land_size_acres: None,
            farm_details: None,
            documents: None,
        }
    }

    #[test]
    fn test_default_policy_values() {
        let policy = LoanPolicy::default();
        assert_eq!(policy.amount_bounds, Some((10_000, 1_000_000)));
        assert_eq!(policy.default_interest_rate_bps, 800);
        assert!(policy.allowed_purposes.is_some());
        assert_eq!(policy.allowed_terms_months, Some(vec![3, 6, 12, 24, 60]));
    }

    #[test]
    fn test_amount_bounds_edges() {
        let policy = LoanPolicy::default();

        assert!(policy.validate_create(&request(10_000, "seeds", 6)).is_ok());
        assert!(policy
            .validate_create(&request(1_000_000, "seeds", 6))
            .is_ok());
        assert!(policy.validate_create(&request(9_999, "seeds", 6)).is_err());
        assert!(policy
            .validate_create(&request(1_000_001, "seeds", 6))
            .is_err());
    }

    #[test]
    fn test_unbounded_amount_accepts_any_positive() {
        let policy = LoanPolicy::unrestricted(500);
        assert!(policy.validate_create(&request(1, "anything", 7)).is_ok());
        assert!(policy
            .validate_create(&request(50_000_000, "custom purpose", 120))
            .is_ok());
    }

    #[test]
    fn test_purpose_allow_list() {
        let policy = LoanPolicy::default();

        for purpose in DEFAULT_PURPOSES {
            assert!(
                policy.validate_create(&request(50_000, purpose, 12)).is_ok(),
                "purpose {:?} should be allowed",
                purpose
            );
        }

        let err = policy
            .validate_create(&request(50_000, "vacation", 12))
            .unwrap_err();
        assert!(err.field_errors().contains_key("purpose"));
    }

    #[test]
    fn test_purpose_comparison_is_case_insensitive() {
        let policy = LoanPolicy::default();
        assert!(policy
            .validate_create(&request(50_000, "Equipment", 12))
            .is_ok());
        assert!(policy
            .validate_create(&request(50_000, " IRRIGATION ", 12))
            .is_ok());
    }

    #[test]
    fn test_term_allow_list() {
        let policy = LoanPolicy::default();
        assert!(policy.validate_create(&request(50_000, "seeds", 60)).is_ok());

        let err = policy
            .validate_create(&request(50_000, "seeds", 7))
            .unwrap_err();
        assert!(err.field_errors().contains_key("term_months"));
    }

    #[test]
    fn test_multiple_failures_reported_together() {
        let policy = LoanPolicy::default();
        let err = policy
            .validate_create(&request(5_000, "vacation", 7))
            .unwrap_err();
        let fields = err.field_errors();
        assert!(fields.contains_key("amount"));
        assert!(fields.contains_key("purpose"));
        assert!(fields.contains_key("term_months"));
    }
}
