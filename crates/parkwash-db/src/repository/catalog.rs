//! # Catalog Repository
//!
//! Database operations for the VehicleType and Service reference tables.
//!
//! The engine reads this data and never writes it; the insert/update
//! methods exist for setup tooling (seed binary, back-office screens).

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use parkwash_core::{Service, VehicleType};

/// Repository for catalog reference data.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    // =========================================================================
    // Vehicle Types
    // =========================================================================

    /// Gets a vehicle type by ID.
    pub async fn get_vehicle_type(&self, id: &str) -> DbResult<Option<VehicleType>> {
        let vehicle_type = sqlx::query_as::<_, VehicleType>(
            r#"
            SELECT
                id, name,
                hourly_rate_cents, fraction_price_cents, fraction_minutes,
                daily_rate_cents, is_active, created_at, updated_at
            FROM vehicle_types
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vehicle_type)
    }

    /// Lists active vehicle types, ordered by name.
    pub async fn list_active_vehicle_types(&self) -> DbResult<Vec<VehicleType>> {
        let types = sqlx::query_as::<_, VehicleType>(
            r#"
            SELECT
                id, name,
                hourly_rate_cents, fraction_price_cents, fraction_minutes,
                daily_rate_cents, is_active, created_at, updated_at
            FROM vehicle_types
            WHERE is_active = 1
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(types)
    }

    /// Inserts a vehicle type.
    pub async fn insert_vehicle_type(&self, vehicle_type: &VehicleType) -> DbResult<()> {
        debug!(id = %vehicle_type.id, name = %vehicle_type.name, "inserting vehicle type");

        sqlx::query(
            r#"
            INSERT INTO vehicle_types (
                id, name,
                hourly_rate_cents, fraction_price_cents, fraction_minutes,
                daily_rate_cents, is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&vehicle_type.id)
        .bind(&vehicle_type.name)
        .bind(vehicle_type.hourly_rate_cents)
        .bind(vehicle_type.fraction_price_cents)
        .bind(vehicle_type.fraction_minutes)
        .bind(vehicle_type.daily_rate_cents)
        .bind(vehicle_type.is_active)
        .bind(vehicle_type.created_at)
        .bind(vehicle_type.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Counts vehicle types (seed guard).
    pub async fn count_vehicle_types(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM vehicle_types")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // =========================================================================
    // Services
    // =========================================================================

    /// Gets a service by ID.
    pub async fn get_service(&self, id: &str) -> DbResult<Option<Service>> {
        let service = sqlx::query_as::<_, Service>(
            r#"
            SELECT
                id, name, price_cents, duration_minutes,
                is_active, created_at, updated_at
            FROM services
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(service)
    }

    /// Lists active services, ordered by name.
    pub async fn list_active_services(&self) -> DbResult<Vec<Service>> {
        let services = sqlx::query_as::<_, Service>(
            r#"
            SELECT
                id, name, price_cents, duration_minutes,
                is_active, created_at, updated_at
            FROM services
            WHERE is_active = 1
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(services)
    }

    /// Inserts a service.
    pub async fn insert_service(&self, service: &Service) -> DbResult<()> {
        debug!(id = %service.id, name = %service.name, "inserting service");

        sqlx::query(
            r#"
            INSERT INTO services (
                id, name, price_cents, duration_minutes,
                is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&service.id)
        .bind(&service.name)
        .bind(service.price_cents)
        .bind(service.duration_minutes)
        .bind(service.is_active)
        .bind(service.created_at)
        .bind(service.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
