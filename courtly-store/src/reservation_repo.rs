use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use courtly_core::pii::Masked;
use courtly_core::repository::{ReservationRepository, StoreError};
use courtly_core::reservation::{NewReservation, Reservation, ReservationStatus};

pub struct PgReservationRepository {
    pool: PgPool,
}

impl PgReservationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ReservationRow {
    id: Uuid,
    date: String,
    timeslot_id: String,
    court_id: String,
    user_email: String,
    amount: i64,
    status: String,
    created_at: i64,
    payment_ref: String,
}

impl TryFrom<ReservationRow> for Reservation {
    type Error = StoreError;

    fn try_from(row: ReservationRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<ReservationStatus>()
            .map_err(|e| StoreError::Corrupt(format!("reservation {}: {}", row.id, e)))?;

        Ok(Reservation {
            id: row.id,
            date: row.date,
            timeslot_id: row.timeslot_id,
            court_id: row.court_id,
            user_email: Masked(row.user_email),
            amount: row.amount,
            status,
            created_at: row.created_at,
            payment_ref: row.payment_ref,
        })
    }
}

fn unavailable(err: sqlx::Error) -> StoreError {
    StoreError::Unavailable(err.to_string())
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

const SELECT_COLUMNS: &str =
    "SELECT id, date, timeslot_id, court_id, user_email, amount, status, created_at, payment_ref FROM reservations";

#[async_trait]
impl ReservationRepository for PgReservationRepository {
    async fn find_by_slot(
        &self,
        date: &str,
        timeslot_id: &str,
        court_id: Option<&str>,
    ) -> Result<Vec<Reservation>, StoreError> {
        let sql = format!(
            "{} WHERE date = $1 AND timeslot_id = $2 AND status = $3 AND ($4::TEXT IS NULL OR court_id = $4) ORDER BY created_at",
            SELECT_COLUMNS
        );
        let rows = sqlx::query_as::<_, ReservationRow>(&sql)
            .bind(date)
            .bind(timeslot_id)
            .bind(ReservationStatus::Paid.as_str())
            .bind(court_id)
            .fetch_all(&self.pool)
            .await
            .map_err(unavailable)?;

        rows.into_iter().map(Reservation::try_from).collect()
    }

    async fn insert_batch(&self, batch: &[NewReservation]) -> Result<Vec<Reservation>, StoreError> {
        let mut tx = self.pool.begin().await.map_err(unavailable)?;
        let mut written = Vec::with_capacity(batch.len());

        for new in batch {
            let id = Uuid::new_v4();
            let result = sqlx::query(
                r#"
                INSERT INTO reservations (id, date, timeslot_id, court_id, user_email, amount, status, created_at, payment_ref)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(id)
            .bind(&new.key.date)
            .bind(&new.key.timeslot_id)
            .bind(&new.key.court_id)
            .bind(new.user_email.expose())
            .bind(new.amount)
            .bind(new.status.as_str())
            .bind(new.created_at)
            .bind(&new.payment_ref)
            .execute(&mut *tx)
            .await;

            match result {
                Ok(_) => written.push(Reservation::from_new(id, new)),
                // Dropping the transaction rolls back the rows already inserted.
                Err(err) if is_unique_violation(&err) => {
                    warn!("Reservation conflict on {} for payment {}", new.key, new.payment_ref);
                    return Err(StoreError::Conflict(new.key.clone()));
                }
                Err(err) => return Err(unavailable(err)),
            }
        }

        tx.commit().await.map_err(|err| {
            if is_unique_violation(&err) {
                batch
                    .first()
                    .map(|n| StoreError::Conflict(n.key.clone()))
                    .unwrap_or_else(|| unavailable(err))
            } else {
                unavailable(err)
            }
        })?;

        info!("Stored {} reservation(s)", written.len());
        Ok(written)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Reservation>, StoreError> {
        let sql = format!("{} WHERE id = $1", SELECT_COLUMNS);
        let row = sqlx::query_as::<_, ReservationRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(unavailable)?;

        row.map(Reservation::try_from).transpose()
    }

    async fn find_by_payment_ref(&self, payment_ref: &str) -> Result<Vec<Reservation>, StoreError> {
        let sql = format!("{} WHERE payment_ref = $1 ORDER BY date, timeslot_id", SELECT_COLUMNS);
        let rows = sqlx::query_as::<_, ReservationRow>(&sql)
            .bind(payment_ref)
            .fetch_all(&self.pool)
            .await
            .map_err(unavailable)?;

        rows.into_iter().map(Reservation::try_from).collect()
    }
}
