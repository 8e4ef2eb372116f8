//! Back-office management of farmer accounts

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::error::ApiError;
use crate::models::{User, UserRole};

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateFarmerRequest {
    #[validate(
        length(min = 1, message = "must not be empty"),
        custom = "crate::models::validate_not_blank"
    )]
    pub name: Option<String>,
    pub farm_name: Option<String>,
    pub phone: Option<String>,
}

/// Outcome of removing a farmer account.
#[derive(Debug, Serialize)]
pub struct FarmerDeletion {
    pub farmer_id: Uuid,
    pub loans_deleted: u64,
}

#[derive(Clone)]
pub struct FarmerService {
    pool: PgPool,
}

impl FarmerService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_farmers(&self) -> Result<Vec<User>, ApiError> {
        let farmers = sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE role = $1 ORDER BY created_at DESC",
        )
        .bind(UserRole::Farmer)
        .fetch_all(&self.pool)
        .await?;

        Ok(farmers)
    }

    pub async fn get_farmer(&self, farmer_id: Uuid) -> Result<User, ApiError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1 AND role = $2")
            .bind(farmer_id)
            .bind(UserRole::Farmer)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ApiError::NotFound("Farmer not found".to_string()))
    }

    /// Update contact details. Absent fields keep their current values.
    pub async fn update_farmer(
        &self,
        farmer_id: Uuid,
        input: UpdateFarmerRequest,
    ) -> Result<User, ApiError> {
        input.validate()?;

        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                farm_name = COALESCE($3, farm_name),
                phone = COALESCE($4, phone),
                updated_at = NOW()
            WHERE id = $1 AND role = $5
            RETURNING *
            "#,
        )
        .bind(farmer_id)
        .bind(input.name.as_deref().map(str::trim))
        .bind(input.farm_name)
        .bind(input.phone)
        .bind(UserRole::Farmer)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ApiError::NotFound("Farmer not found".to_string()))
    }

    /// Remove a farmer and every application they submitted, atomically.
    pub async fn delete_farmer(&self, farmer_id: Uuid) -> Result<FarmerDeletion, ApiError> {
        let mut tx = self.pool.begin().await?;

        let loans_deleted = sqlx::query("DELETE FROM loan_applications WHERE farmer_id = $1")
            .bind(farmer_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let users_deleted = sqlx::query("DELETE FROM users WHERE id = $1 AND role = $2")
            .bind(farmer_id)
            .bind(UserRole::Farmer)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if users_deleted == 0 {
            tx.rollback().await?;
            return Err(ApiError::NotFound("Farmer not found".to_string()));
        }

        tx.commit().await?;

        tracing::info!(
            farmer_id = %farmer_id,
            loans_deleted,
            "Farmer account removed"
        );

        Ok(FarmerDeletion {
            farmer_id,
            loans_deleted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_accepts_absent_fields() {
        let request = UpdateFarmerRequest {
            name: None,
            farm_name: None,
            phone: None,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_update_request_rejects_blank_name() {
        let request = UpdateFarmerRequest {
            name: Some("   ".to_string()),
            farm_name: None,
            phone: None,
        };
        let err = request.validate().unwrap_err();
        assert!(err.field_errors().contains_key("name"));
    }
}
