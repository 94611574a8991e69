// src/db/property_repo.rs

use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{
    common::error::AppError,
    models::crm::{CreatePropertyPayload, Property, PropertyPhoto, UpdatePropertyPayload},
};

#[derive(Clone)]
pub struct PropertyRepository {
    pool: PgPool,
}

impl PropertyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Listagem do painel: filtros exatos de status e tipo
    pub async fn list(
        &self,
        tenant_id: i32,
        status: Option<&str>,
        r#type: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Property>, AppError> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT * FROM properties WHERE tenant_id = ");
        qb.push_bind(tenant_id);
        if let Some(status) = status {
            qb.push(" AND status = ").push_bind(status);
        }
        if let Some(kind) = r#type {
            qb.push(" AND type = ").push_bind(kind);
        }
        qb.push(" ORDER BY created_at DESC LIMIT ").push_bind(limit);
        qb.push(" OFFSET ").push_bind(offset);

        let list = qb
            .build_query_as::<Property>()
            .fetch_all(&self.pool)
            .await?;
        Ok(list)
    }

    // Busca usada pelo MCP: bairro por ILIKE parcial, teto de valor cobre
    // venda OU aluguel.
    pub async fn search(
        &self,
        tenant_id: i32,
        neighborhood: Option<&str>,
        r#type: Option<&str>,
        max_value: Option<Decimal>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Property>, AppError> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT * FROM properties WHERE tenant_id = ");
        qb.push_bind(tenant_id);
        if let Some(neighborhood) = neighborhood {
            qb.push(" AND address_neighborhood ILIKE ")
                .push_bind(format!("%{}%", neighborhood));
        }
        if let Some(kind) = r#type {
            qb.push(" AND type = ").push_bind(kind);
        }
        if let Some(max) = max_value {
            qb.push(" AND (value_sale <= ").push_bind(max);
            qb.push(" OR value_rent <= ").push_bind(max);
            qb.push(")");
        }
        qb.push(" ORDER BY created_at DESC LIMIT ").push_bind(limit);
        qb.push(" OFFSET ").push_bind(offset);

        let list = qb
            .build_query_as::<Property>()
            .fetch_all(&self.pool)
            .await?;
        Ok(list)
    }

    pub async fn find(&self, id: i32, tenant_id: i32) -> Result<Option<Property>, AppError> {
        let maybe_property = sqlx::query_as::<_, Property>(
            "SELECT * FROM properties WHERE id = $1 AND tenant_id = $2",
        )
        .bind(id)
        .bind(tenant_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_property)
    }

    pub async fn exists(&self, id: i32, tenant_id: i32) -> Result<bool, AppError> {
        let row: Option<(i32,)> =
            sqlx::query_as("SELECT id FROM properties WHERE id = $1 AND tenant_id = $2")
                .bind(id)
                .bind(tenant_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.is_some())
    }

    pub async fn create(
        &self,
        tenant_id: i32,
        payload: &CreatePropertyPayload,
    ) -> Result<Property, AppError> {
        let property = sqlx::query_as::<_, Property>(
            r#"
            INSERT INTO properties (
                tenant_id, type, title,
                address_street, address_number, address_complement,
                address_neighborhood, address_city, address_state, address_zip,
                value_sale, value_rent, status, description,
                bedrooms, bathrooms, parking_spaces, area_m2, code,
                is_highlight, metadata
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                    $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21)
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(payload.r#type.as_deref().unwrap_or("apartment"))
        .bind(payload.title.as_deref())
        .bind(payload.address_street.as_deref())
        .bind(payload.address_number.as_deref())
        .bind(payload.address_complement.as_deref())
        .bind(payload.address_neighborhood.as_deref())
        .bind(payload.address_city.as_deref())
        .bind(payload.address_state.as_deref())
        .bind(payload.address_zip.as_deref())
        .bind(payload.value_sale)
        .bind(payload.value_rent)
        .bind(payload.status.as_deref().unwrap_or("available"))
        .bind(payload.description.as_deref())
        .bind(payload.bedrooms)
        .bind(payload.bathrooms)
        .bind(payload.parking_spaces)
        .bind(payload.area_m2)
        .bind(payload.code.as_deref())
        .bind(payload.is_highlight.unwrap_or(false))
        .bind(payload.metadata.as_ref())
        .fetch_one(&self.pool)
        .await?;
        Ok(property)
    }

    pub async fn update(
        &self,
        id: i32,
        tenant_id: i32,
        payload: &UpdatePropertyPayload,
    ) -> Result<Option<Property>, AppError> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("UPDATE properties SET updated_at = now()");
        if let Some(kind) = &payload.r#type {
            qb.push(", type = ").push_bind(kind.as_str());
        }
        if let Some(status) = &payload.status {
            qb.push(", status = ").push_bind(status.as_str());
        }
        if let Some(title) = &payload.title {
            qb.push(", title = ").push_bind(title.as_deref());
        }
        if let Some(street) = &payload.address_street {
            qb.push(", address_street = ").push_bind(street.as_deref());
        }
        if let Some(number) = &payload.address_number {
            qb.push(", address_number = ").push_bind(number.as_deref());
        }
        if let Some(complement) = &payload.address_complement {
            qb.push(", address_complement = ").push_bind(complement.as_deref());
        }
        if let Some(neighborhood) = &payload.address_neighborhood {
            qb.push(", address_neighborhood = ").push_bind(neighborhood.as_deref());
        }
        if let Some(city) = &payload.address_city {
            qb.push(", address_city = ").push_bind(city.as_deref());
        }
        if let Some(state) = &payload.address_state {
            qb.push(", address_state = ").push_bind(state.as_deref());
        }
        if let Some(zip) = &payload.address_zip {
            qb.push(", address_zip = ").push_bind(zip.as_deref());
        }
        if let Some(value_sale) = &payload.value_sale {
            qb.push(", value_sale = ").push_bind(*value_sale);
        }
        if let Some(value_rent) = &payload.value_rent {
            qb.push(", value_rent = ").push_bind(*value_rent);
        }
        if let Some(description) = &payload.description {
            qb.push(", description = ").push_bind(description.as_deref());
        }
        if let Some(bedrooms) = &payload.bedrooms {
            qb.push(", bedrooms = ").push_bind(*bedrooms);
        }
        if let Some(bathrooms) = &payload.bathrooms {
            qb.push(", bathrooms = ").push_bind(*bathrooms);
        }
        if let Some(parking) = &payload.parking_spaces {
            qb.push(", parking_spaces = ").push_bind(*parking);
        }
        if let Some(area) = &payload.area_m2 {
            qb.push(", area_m2 = ").push_bind(*area);
        }
        if let Some(code) = &payload.code {
            qb.push(", code = ").push_bind(code.as_deref());
        }
        if let Some(is_highlight) = &payload.is_highlight {
            qb.push(", is_highlight = ").push_bind(*is_highlight);
        }
        if let Some(metadata) = &payload.metadata {
            qb.push(", metadata = ").push_bind(metadata.as_ref());
        }
        qb.push(" WHERE id = ").push_bind(id);
        qb.push(" AND tenant_id = ").push_bind(tenant_id);
        qb.push(" RETURNING *");

        let property = qb
            .build_query_as::<Property>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(property)
    }

    // As fotos têm ON DELETE CASCADE, mas a exclusão explícita mantém o
    // comportamento óbvio mesmo se o schema mudar.
    pub async fn delete(&self, id: i32, tenant_id: i32) -> Result<(), AppError> {
        sqlx::query("DELETE FROM property_photos WHERE property_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        sqlx::query("DELETE FROM properties WHERE id = $1 AND tenant_id = $2")
            .bind(id)
            .bind(tenant_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // =========================================================================
    //  FOTOS
    // =========================================================================
    // O escopo de tenant das fotos passa pelo imóvel, já verificado pelo
    // handler antes de chegar aqui.

    pub async fn list_photos(&self, property_id: i32) -> Result<Vec<PropertyPhoto>, AppError> {
        let photos = sqlx::query_as::<_, PropertyPhoto>(
            "SELECT * FROM property_photos WHERE property_id = $1 ORDER BY sort_order ASC, id ASC",
        )
        .bind(property_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(photos)
    }

    pub async fn add_photo(
        &self,
        property_id: i32,
        url: &str,
        sort_order: i32,
    ) -> Result<PropertyPhoto, AppError> {
        let photo = sqlx::query_as::<_, PropertyPhoto>(
            r#"
            INSERT INTO property_photos (property_id, url, sort_order)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(property_id)
        .bind(url)
        .bind(sort_order)
        .fetch_one(&self.pool)
        .await?;
        Ok(photo)
    }

    pub async fn delete_photo(&self, photo_id: i32, property_id: i32) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM property_photos WHERE id = $1 AND property_id = $2")
            .bind(photo_id)
            .bind(property_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
