use super::helpers::{fetch_rates, fetch_rates_for_update, store_rates};
use super::Engine;

use async_trait::async_trait;
use sqlx::Acquire;

use crate::{
    api::SettingsAPI,
    auth::{Platform, User},
    entities::{RateTable, RateTableUpdate},
    error::Error,
};

#[async_trait]
impl SettingsAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn find_rates(&self, user: User) -> Result<RateTable, Error> {
        self.authorize(user, "read_rates", Platform::default())?;

        let mut conn = self.pool.acquire().await?;

        fetch_rates(&mut conn).await
    }

    #[tracing::instrument(skip(self))]
    async fn update_rates(&self, user: User, update: RateTableUpdate) -> Result<RateTable, Error> {
        self.authorize(user, "update_rates", Platform::default())?;

        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin().await?;

        let current = fetch_rates_for_update(&mut tx).await?;
        let rates = update.apply(&current);
        rates.validate()?;

        store_rates(&mut tx, &rates).await?;

        tx.commit().await?;

        tracing::info!(?rates, "rate table updated");

        Ok(rates)
    }
}
