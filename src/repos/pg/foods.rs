/*
 * Responsibility
 * - comidas table CRUD
 */
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use crate::repos::error::RepoResult;
use crate::repos::food_repo::{Food, FoodFields, FoodRepo};
use crate::repos::page::{Page, PageRequest};

#[derive(Debug, FromRow)]
struct FoodRow {
    id: i64,
    nombre: String,
    pais_origen: String,
}

impl From<FoodRow> for Food {
    fn from(row: FoodRow) -> Self {
        Food {
            id: row.id,
            name: row.nombre,
            origin_country: row.pais_origen,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PgFoodRepo {
    db: PgPool,
}

impl PgFoodRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FoodRepo for PgFoodRepo {
    async fn list(&self, page: PageRequest) -> RepoResult<Page<Food>> {
        let rows = sqlx::query_as::<_, FoodRow>(
            r#"
            SELECT id, nombre, pais_origen
            FROM comidas
            ORDER BY id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.db)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comidas")
            .fetch_one(&self.db)
            .await?;

        Ok(Page {
            content: rows.into_iter().map(Food::from).collect(),
            request: page,
            total_elements: total.max(0) as u64,
        })
    }

    async fn get(&self, id: i64) -> RepoResult<Option<Food>> {
        let row = sqlx::query_as::<_, FoodRow>(
            r#"
            SELECT id, nombre, pais_origen
            FROM comidas
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(Food::from))
    }

    async fn create(&self, fields: FoodFields) -> RepoResult<Food> {
        let row = sqlx::query_as::<_, FoodRow>(
            r#"
            INSERT INTO comidas (nombre, pais_origen)
            VALUES ($1, $2)
            RETURNING id, nombre, pais_origen
            "#,
        )
        .bind(&fields.name)
        .bind(&fields.origin_country)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into())
    }

    async fn update(&self, id: i64, fields: FoodFields) -> RepoResult<Option<Food>> {
        let row = sqlx::query_as::<_, FoodRow>(
            r#"
            UPDATE comidas
            SET nombre = $2, pais_origen = $3
            WHERE id = $1
            RETURNING id, nombre, pais_origen
            "#,
        )
        .bind(id)
        .bind(&fields.name)
        .bind(&fields.origin_country)
        .fetch_optional(&self.db)
        .await?;

        Ok(row.map(Food::from))
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM comidas
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
