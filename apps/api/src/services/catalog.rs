//! # Catalog Service
//!
//! Reference data: finished products and suppliers. Create, list, get and
//! soft delete; no lifecycle beyond the active flag.

use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use fabstock_core::validation::{
    optional_text, validate_delivery_days, validate_email, validate_name, validate_non_negative,
    validate_optional_barcode, validate_reference,
};
use fabstock_core::{FinishedProduct, Supplier};
use fabstock_db::repository::generate_id;
use fabstock_db::Database;

use crate::error::{ApiError, ApiResult};

// =============================================================================
// Inputs
// =============================================================================

/// Finished product creation form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFinishedProductInput {
    pub name: String,
    pub reference: String,
    pub barcode: Option<String>,
    pub category: Option<String>,
    pub production_unit: Option<String>,
    pub production_time_minutes: Option<i64>,
    #[serde(default)]
    pub target_stock: i64,
    pub sale_price_cents: Option<i64>,
    pub production_instructions: Option<String>,
}

/// Supplier creation form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSupplierInput {
    pub name: String,
    pub contact: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[serde(default)]
    pub average_delivery_days: i64,
}

// =============================================================================
// Service
// =============================================================================

#[derive(Debug, Clone)]
pub struct CatalogService {
    db: Database,
}

impl CatalogService {
    pub fn new(db: Database) -> Self {
        CatalogService { db }
    }

    // ===== Finished products =====

    /// Creates an active finished product with zero current stock.
    pub async fn create_finished_product(
        &self,
        input: CreateFinishedProductInput,
        user_id: &str,
    ) -> ApiResult<FinishedProduct> {
        let name = validate_name(&input.name)?;
        let reference = validate_reference(&input.reference)?;
        let barcode = validate_optional_barcode(input.barcode.as_deref())?;
        validate_non_negative("targetStock", input.target_stock)?;
        if let Some(minutes) = input.production_time_minutes {
            validate_non_negative("productionTimeMinutes", minutes)?;
        }
        if let Some(cents) = input.sale_price_cents {
            validate_non_negative("salePriceCents", cents)?;
        }

        let now = Utc::now();
        let product = FinishedProduct {
            id: generate_id(),
            name,
            reference,
            barcode,
            category: optional_text(input.category.as_deref()),
            production_unit: optional_text(input.production_unit.as_deref()),
            production_time_minutes: input.production_time_minutes,
            target_stock: input.target_stock,
            current_stock: 0,
            sale_price_cents: input.sale_price_cents,
            production_instructions: optional_text(input.production_instructions.as_deref()),
            is_active: true,
            created_at: now,
            updated_at: now,
            created_by: user_id.to_string(),
        };

        let product = self.db.finished_products().insert(&product).await?;
        info!(id = %product.id, reference = %product.reference, user = %user_id, "Finished product created");
        Ok(product)
    }

    pub async fn list_finished_products(&self) -> ApiResult<Vec<FinishedProduct>> {
        Ok(self.db.finished_products().list_active().await?)
    }

    pub async fn get_finished_product(&self, id: &str) -> ApiResult<FinishedProduct> {
        self.db
            .finished_products()
            .get_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Finished product", id))
    }

    pub async fn deactivate_finished_product(&self, id: &str, user_id: &str) -> ApiResult<()> {
        self.db.finished_products().soft_delete(id).await?;
        info!(id = %id, user = %user_id, "Finished product deactivated");
        Ok(())
    }

    // ===== Suppliers =====

    /// Creates an active supplier.
    ///
    /// Email is optional but must contain `@` when given; the delivery delay
    /// is a whole number of days.
    pub async fn create_supplier(&self, input: CreateSupplierInput, user_id: &str) -> ApiResult<Supplier> {
        let name = validate_name(&input.name)?;
        let email = validate_email(input.email.as_deref())?;
        validate_delivery_days(input.average_delivery_days)?;

        let now = Utc::now();
        let supplier = Supplier {
            id: generate_id(),
            name,
            contact: optional_text(input.contact.as_deref()),
            email,
            phone: optional_text(input.phone.as_deref()),
            address: optional_text(input.address.as_deref()),
            average_delivery_days: input.average_delivery_days,
            is_active: true,
            created_at: now,
            updated_at: now,
            created_by: user_id.to_string(),
        };

        let supplier = self.db.suppliers().insert(&supplier).await?;
        info!(id = %supplier.id, name = %supplier.name, user = %user_id, "Supplier created");
        Ok(supplier)
    }

    pub async fn list_suppliers(&self) -> ApiResult<Vec<Supplier>> {
        Ok(self.db.suppliers().list_active().await?)
    }

    pub async fn get_supplier(&self, id: &str) -> ApiResult<Supplier> {
        self.db
            .suppliers()
            .get_by_id(id)
            .await?
            .ok_or_else(|| ApiError::not_found("Supplier", id))
    }

    pub async fn deactivate_supplier(&self, id: &str, user_id: &str) -> ApiResult<()> {
        self.db.suppliers().soft_delete(id).await?;
        info!(id = %id, user = %user_id, "Supplier deactivated");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use fabstock_db::DbConfig;

    async fn service() -> CatalogService {
        CatalogService::new(Database::new(DbConfig::in_memory()).await.unwrap())
    }

    #[tokio::test]
    async fn test_finished_product_requires_reference() {
        let service = service().await;
        let err = service
            .create_finished_product(
                CreateFinishedProductInput {
                    name: "Confiture".to_string(),
                    reference: " ".to_string(),
                    ..Default::default()
                },
                "user-1",
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "reference is required");
    }

    #[tokio::test]
    async fn test_finished_products_listed_by_name() {
        let service = service().await;
        for (name, reference) in [("Pesto", "PF-2"), ("Confiture", "PF-1")] {
            service
                .create_finished_product(
                    CreateFinishedProductInput {
                        name: name.to_string(),
                        reference: reference.to_string(),
                        target_stock: 20,
                        ..Default::default()
                    },
                    "user-1",
                )
                .await
                .unwrap();
        }

        let products = service.list_finished_products().await.unwrap();
        let names: Vec<_> = products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Confiture", "Pesto"]);
        assert!(products.iter().all(|p| p.current_stock == 0));

        service.deactivate_finished_product(&products[0].id, "user-1").await.unwrap();
        assert_eq!(service.list_finished_products().await.unwrap().len(), 1);
        // Still readable by id
        assert!(!service.get_finished_product(&products[0].id).await.unwrap().is_active);
    }

    #[tokio::test]
    async fn test_supplier_email_must_contain_at() {
        let service = service().await;
        let err = service
            .create_supplier(
                CreateSupplierInput {
                    name: "Primeurs du Sud".to_string(),
                    email: Some("contact.primeurs.fr".to_string()),
                    ..Default::default()
                },
                "user-1",
            )
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_supplier_lifecycle() {
        let service = service().await;
        let supplier = service
            .create_supplier(
                CreateSupplierInput {
                    name: "Primeurs du Sud".to_string(),
                    email: Some("contact@primeurs.fr".to_string()),
                    average_delivery_days: 2,
                    ..Default::default()
                },
                "user-1",
            )
            .await
            .unwrap();

        assert_eq!(service.get_supplier(&supplier.id).await.unwrap().name, "Primeurs du Sud");
        service.deactivate_supplier(&supplier.id, "user-1").await.unwrap();
        assert!(service.list_suppliers().await.unwrap().is_empty());

        let err = service.deactivate_supplier("missing", "user-1").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
