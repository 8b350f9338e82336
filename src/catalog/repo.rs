use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{Category, NewService, Service, ServiceRow};
use crate::store::StoreResult;

const SERVICE_COLUMNS: &str =
    "id, name, description, price, duration_minutes, image, category, available";

pub async fn find_by_id(db: &PgPool, id: Uuid) -> StoreResult<Option<Service>> {
    let row = sqlx::query_as::<_, ServiceRow>(&format!(
        "SELECT {SERVICE_COLUMNS} FROM services WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(db)
    .await?;
    Ok(row.map(Service::try_from).transpose()?)
}

pub async fn list_available(db: &PgPool, category: Option<Category>) -> StoreResult<Vec<Service>> {
    let rows = sqlx::query_as::<_, ServiceRow>(&format!(
        r#"
        SELECT {SERVICE_COLUMNS}
        FROM services
        WHERE available AND ($1::text IS NULL OR category = $1)
        ORDER BY name
        "#
    ))
    .bind(category.map(|c| c.as_str()))
    .fetch_all(db)
    .await?;
    let services = rows
        .into_iter()
        .map(Service::try_from)
        .collect::<anyhow::Result<Vec<_>>>()?;
    Ok(services)
}

/// Insert or refresh a catalog entry by name. Keeps the id stable so
/// existing reservations keep pointing at it.
pub async fn upsert(db: &PgPool, new: &NewService) -> StoreResult<Service> {
    let row = sqlx::query_as::<_, ServiceRow>(&format!(
        r#"
        INSERT INTO services (name, description, price, duration_minutes, image, category)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (name) DO UPDATE
            SET description = EXCLUDED.description,
                price = EXCLUDED.price,
                duration_minutes = EXCLUDED.duration_minutes,
                image = EXCLUDED.image,
                category = EXCLUDED.category,
                available = TRUE
        RETURNING {SERVICE_COLUMNS}
        "#
    ))
    .bind(&new.name)
    .bind(&new.description)
    .bind(new.price)
    .bind(new.duration_minutes)
    .bind(&new.image)
    .bind(new.category.as_str())
    .fetch_one(db)
    .await?;
    Ok(Service::try_from(row)?)
}
