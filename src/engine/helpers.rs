use sqlx::{types::Json, Executor, PgConnection, Row};
use uuid::Uuid;

use crate::{
    entities::{normalize_email, Account, Booking, RateTable},
    error::Error,
};

const RATES_KEY: &str = "rates";

/// Current rate table, or the defaults when none has been stored yet.
#[tracing::instrument(skip(conn))]
pub async fn fetch_rates(conn: &mut PgConnection) -> Result<RateTable, Error> {
    let maybe_result = conn
        .fetch_optional(sqlx::query("SELECT data FROM settings WHERE key = $1").bind(RATES_KEY))
        .await?;

    match maybe_result {
        Some(row) => {
            let Json(rates): Json<RateTable> = row.try_get("data")?;
            Ok(rates)
        }
        None => Ok(RateTable::default()),
    }
}

#[tracing::instrument(skip(conn))]
pub async fn fetch_rates_for_update(conn: &mut PgConnection) -> Result<RateTable, Error> {
    let maybe_result = conn
        .fetch_optional(
            sqlx::query("SELECT data FROM settings WHERE key = $1 FOR UPDATE").bind(RATES_KEY),
        )
        .await?;

    match maybe_result {
        Some(row) => {
            let Json(rates): Json<RateTable> = row.try_get("data")?;
            Ok(rates)
        }
        None => Ok(RateTable::default()),
    }
}

/// Stores the default table unless one exists, so `fetch_rates_for_update`
/// always has a row to lock.
#[tracing::instrument(skip(conn))]
pub async fn seed_rates(conn: &mut PgConnection) -> Result<(), Error> {
    conn.execute(
        sqlx::query(
            "INSERT INTO settings (key, data) VALUES ($1, $2) ON CONFLICT (key) DO NOTHING",
        )
        .bind(RATES_KEY)
        .bind(Json(RateTable::default())),
    )
    .await?;

    Ok(())
}

#[tracing::instrument(skip(conn))]
pub async fn store_rates(conn: &mut PgConnection, rates: &RateTable) -> Result<(), Error> {
    conn.execute(
        sqlx::query(
            "INSERT INTO settings (key, data) VALUES ($1, $2) ON CONFLICT (key) DO UPDATE SET data = EXCLUDED.data",
        )
        .bind(RATES_KEY)
        .bind(Json(rates)),
    )
    .await?;

    Ok(())
}

#[tracing::instrument(skip(conn))]
pub async fn fetch_booking(conn: &mut PgConnection, id: &Uuid) -> Result<Booking, Error> {
    let Json(booking): Json<Booking> = conn
        .fetch_optional(sqlx::query("SELECT data FROM bookings WHERE id = $1").bind(id))
        .await?
        .ok_or_else(Error::not_found_error)?
        .try_get("data")?;

    Ok(booking)
}

#[tracing::instrument(skip(conn))]
pub async fn fetch_booking_for_update(
    conn: &mut PgConnection,
    id: &Uuid,
) -> Result<Booking, Error> {
    let Json(booking): Json<Booking> = conn
        .fetch_optional(
            sqlx::query("SELECT data FROM bookings WHERE id = $1 FOR UPDATE").bind(id),
        )
        .await?
        .ok_or_else(Error::not_found_error)?
        .try_get("data")?;

    Ok(booking)
}

#[tracing::instrument(skip(conn, booking), fields(id = %booking.id))]
pub async fn insert_booking(conn: &mut PgConnection, booking: &Booking) -> Result<(), Error> {
    conn.execute(
        sqlx::query(
            "INSERT INTO bookings (id, customer_id, status, created_at, data) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&booking.id)
        .bind(&booking.customer_id)
        .bind(booking.status.name())
        .bind(&booking.created_at)
        .bind(Json(booking)),
    )
    .await?;

    Ok(())
}

#[tracing::instrument(skip(conn, booking), fields(id = %booking.id))]
pub async fn update_booking(conn: &mut PgConnection, booking: &Booking) -> Result<(), Error> {
    conn.execute(
        sqlx::query("UPDATE bookings SET status = $2, data = $3 WHERE id = $1")
            .bind(&booking.id)
            .bind(booking.status.name())
            .bind(Json(booking)),
    )
    .await?;

    Ok(())
}

#[tracing::instrument(skip(conn))]
pub async fn fetch_account(conn: &mut PgConnection, id: &Uuid) -> Result<Account, Error> {
    let Json(account): Json<Account> = conn
        .fetch_optional(sqlx::query("SELECT data FROM accounts WHERE id = $1").bind(id))
        .await?
        .ok_or_else(Error::not_found_error)?
        .try_get("data")?;

    Ok(account)
}

#[tracing::instrument(skip(conn))]
pub async fn fetch_account_for_update(
    conn: &mut PgConnection,
    id: &Uuid,
) -> Result<Account, Error> {
    let Json(account): Json<Account> = conn
        .fetch_optional(
            sqlx::query("SELECT data FROM accounts WHERE id = $1 FOR UPDATE").bind(id),
        )
        .await?
        .ok_or_else(Error::not_found_error)?
        .try_get("data")?;

    Ok(account)
}

#[tracing::instrument(skip(conn))]
pub async fn fetch_account_by_email(
    conn: &mut PgConnection,
    email: &str,
) -> Result<Option<Account>, Error> {
    let maybe_result = conn
        .fetch_optional(
            sqlx::query("SELECT data FROM accounts WHERE email = $1").bind(normalize_email(email)),
        )
        .await?;

    match maybe_result {
        Some(row) => {
            let Json(account): Json<Account> = row.try_get("data")?;
            Ok(Some(account))
        }
        None => Ok(None),
    }
}

#[tracing::instrument(skip(conn, account), fields(id = %account.id))]
pub async fn insert_account(conn: &mut PgConnection, account: &Account) -> Result<(), Error> {
    conn.execute(
        sqlx::query("INSERT INTO accounts (id, email, data) VALUES ($1, $2, $3)")
            .bind(&account.id)
            .bind(&account.email)
            .bind(Json(account)),
    )
    .await
    .map_err(|err| {
        if is_unique_violation(&err) {
            Error::duplicate_account_error()
        } else {
            Error::from(err)
        }
    })?;

    Ok(())
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505"))
}

#[tracing::instrument(skip(conn, account), fields(id = %account.id))]
pub async fn update_account(conn: &mut PgConnection, account: &Account) -> Result<(), Error> {
    conn.execute(
        sqlx::query("UPDATE accounts SET data = $2 WHERE id = $1")
            .bind(&account.id)
            .bind(Json(account)),
    )
    .await?;

    Ok(())
}
