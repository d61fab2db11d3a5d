use super::helpers::{
    fetch_booking, fetch_booking_for_update, fetch_rates, insert_booking, update_booking,
};
use super::{price_request, Engine};

use async_trait::async_trait;
use futures::TryStreamExt;
use sqlx::{types::Json, Acquire, Executor, Row};
use uuid::Uuid;

use crate::{
    api::BookingAPI,
    auth::{Platform, User},
    entities::{Booking, BookingFilter, BookingRequest, BookingStatus},
    error::Error,
};

impl Engine {
    /// Applies one status change under a row lock.
    async fn transition_booking<F>(
        &self,
        user: User,
        id: Uuid,
        action: &'static str,
        apply: F,
    ) -> Result<Booking, Error>
    where
        F: FnOnce(&mut Booking) -> Result<(), Error> + Send,
    {
        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin().await?;

        let mut booking = fetch_booking_for_update(&mut tx, &id).await?;

        self.authorize(user, action, booking.clone())?;

        apply(&mut booking)?;

        update_booking(&mut tx, &booking).await?;

        tx.commit().await?;

        tracing::info!(%id, status = %booking.status.name(), "booking updated");
        self.remote.sync_booking(&booking);

        Ok(booking)
    }
}

#[async_trait]
impl BookingAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn create_booking(&self, user: User, request: BookingRequest) -> Result<Booking, Error> {
        self.authorize(user.clone(), "create_booking", Platform::default())?;

        let rates = {
            let mut conn = self.pool.acquire().await?;
            fetch_rates(&mut conn).await?
        };

        let quote_request = request.quote_request();
        let priced = price_request(self.distance.as_ref(), &rates, &quote_request).await;

        let booking = Booking::new(user.id, request, priced);

        let mut conn = self.pool.acquire().await?;
        insert_booking(&mut conn, &booking).await?;

        tracing::info!(id = %booking.id, total = booking.quote.total, "booking created");
        self.remote.sync_booking(&booking);

        Ok(booking)
    }

    #[tracing::instrument(skip(self))]
    async fn find_booking(&self, user: User, id: Uuid) -> Result<Booking, Error> {
        let mut conn = self.pool.acquire().await?;

        let booking = fetch_booking(&mut conn, &id).await?;

        self.authorize(user, "read", booking.clone())?;

        Ok(booking)
    }

    #[tracing::instrument(skip(self))]
    async fn list_bookings(
        &self,
        user: User,
        filter: BookingFilter,
    ) -> Result<Vec<Booking>, Error> {
        if let Some(status) = &filter.status {
            if !BookingStatus::NAMES.contains(&status.as_str()) {
                return Err(Error::invalid_input_error());
            }
        }

        let customer_id = if self.is_allowed(user.clone(), "list_all_bookings", Platform::default())? {
            None
        } else {
            Some(user.id)
        };

        let mut conn = self.pool.acquire().await?;

        let mut results = conn.fetch(
            sqlx::query(
                "SELECT data FROM bookings WHERE ($1::UUID IS NULL OR customer_id = $1) AND ($2::VARCHAR IS NULL OR status = $2) ORDER BY created_at DESC",
            )
            .bind(customer_id)
            .bind(filter.status),
        );

        let mut bookings = vec![];

        while let Some(row) = results.try_next().await? {
            let Json(booking): Json<Booking> = row.try_get("data")?;
            bookings.push(booking);
        }

        Ok(bookings)
    }

    #[tracing::instrument(skip(self))]
    async fn accept_booking(&self, user: User, id: Uuid) -> Result<Booking, Error> {
        self.transition_booking(user, id, "accept", |booking| booking.accept())
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn collect_booking(&self, user: User, id: Uuid) -> Result<Booking, Error> {
        self.transition_booking(user, id, "collect", |booking| booking.collect())
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn deliver_booking(&self, user: User, id: Uuid) -> Result<Booking, Error> {
        self.transition_booking(user, id, "deliver", |booking| booking.deliver())
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn cancel_booking(
        &self,
        user: User,
        id: Uuid,
        reason: Option<String>,
    ) -> Result<Booking, Error> {
        self.transition_booking(user, id, "cancel", move |booking| booking.cancel(reason))
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn delete_booking(&self, user: User, id: Uuid) -> Result<(), Error> {
        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin().await?;

        let booking = fetch_booking_for_update(&mut tx, &id).await?;

        self.authorize(user, "delete", booking)?;

        tx.execute(sqlx::query("DELETE FROM bookings WHERE id = $1").bind(&id))
            .await?;

        tx.commit().await?;

        tracing::info!(%id, "booking deleted");
        self.remote.sync_deletion(id);

        Ok(())
    }
}
