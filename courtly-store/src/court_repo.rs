use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use courtly_core::catalog::{seed_courts, Court};
use courtly_core::repository::{CourtRepository, StoreError};

/// Courts from the `courts` table, falling back to the seed list while the
/// table has no active rows.
pub struct PgCourtRepository {
    pool: PgPool,
}

impl PgCourtRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CourtRow {
    id: String,
    name: String,
    description: Option<String>,
    price_per_hour: Option<i64>,
    active: bool,
}

impl From<CourtRow> for Court {
    fn from(row: CourtRow) -> Self {
        Court {
            id: row.id,
            name: row.name,
            description: row.description,
            price_per_hour: row.price_per_hour,
            active: row.active,
        }
    }
}

#[async_trait]
impl CourtRepository for PgCourtRepository {
    async fn list_courts(&self) -> Result<Vec<Court>, StoreError> {
        let rows = sqlx::query_as::<_, CourtRow>(
            "SELECT id, name, description, price_per_hour, active FROM courts WHERE active ORDER BY sort_order, id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        if rows.is_empty() {
            debug!("No courts configured in store, serving seed list");
            return Ok(seed_courts());
        }
        Ok(rows.into_iter().map(Court::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // One test owns the table; parallel tests would see each other's rows.
    #[tokio::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_lists_active_courts_by_sort_order_with_seed_fallback() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must point at a scratch database");
        let db = crate::DbClient::new(&url, 2).await.unwrap();
        db.migrate().await.unwrap();
        sqlx::query("DELETE FROM courts").execute(&db.pool).await.unwrap();
        let repo = PgCourtRepository::new(db.pool.clone());

        assert_eq!(repo.list_courts().await.unwrap(), seed_courts());

        sqlx::query(
            "INSERT INTO courts (id, name, description, price_per_hour, active, sort_order) VALUES \
             ('court-b', 'Court B', 'Indoor', 80000, TRUE, 1), \
             ('court-a', 'Court A', NULL, NULL, TRUE, 2), \
             ('court-c', 'Court C', NULL, NULL, TRUE, 1), \
             ('court-x', 'Closed', NULL, NULL, FALSE, 0)",
        )
        .execute(&db.pool)
        .await
        .unwrap();

        let courts = repo.list_courts().await.unwrap();
        let ids: Vec<&str> = courts.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["court-b", "court-c", "court-a"]);
        assert_eq!(courts[0].description.as_deref(), Some("Indoor"));
        assert_eq!(courts[0].price_per_hour, Some(80_000));

        sqlx::query("UPDATE courts SET active = FALSE").execute(&db.pool).await.unwrap();
        assert_eq!(repo.list_courts().await.unwrap(), seed_courts());

        sqlx::query("DELETE FROM courts").execute(&db.pool).await.unwrap();
    }
}
