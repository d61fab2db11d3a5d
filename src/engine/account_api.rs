use super::helpers::{
    fetch_account, fetch_account_for_update, insert_account, update_account,
};
use super::Engine;

use async_trait::async_trait;
use futures::TryStreamExt;
use sqlx::{types::Json, Acquire, Executor, Row};
use uuid::Uuid;

use crate::{
    api::AccountAPI,
    auth::{Platform, User},
    entities::{Account, CreateAccountParams, Permission, RegisterParams, Role},
    error::Error,
};

fn validate_identity(name: &str, email: &str) -> Result<(), Error> {
    let email = email.trim();

    if name.trim().is_empty() || email.len() < 3 || !email.contains('@') {
        return Err(Error::invalid_input_error());
    }

    Ok(())
}

#[async_trait]
impl AccountAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn register_customer(&self, params: RegisterParams) -> Result<Account, Error> {
        validate_identity(&params.name, &params.email)?;

        let account = Account::new(params.name, params.email, Role::Customer, vec![]);

        let mut conn = self.pool.acquire().await?;
        insert_account(&mut conn, &account).await?;

        tracing::info!(id = %account.id, "customer registered");

        Ok(account)
    }

    #[tracing::instrument(skip(self))]
    async fn create_account(
        &self,
        user: User,
        params: CreateAccountParams,
    ) -> Result<Account, Error> {
        self.authorize(user.clone(), "manage_accounts", Platform::default())?;

        if params.role == Role::Admin {
            self.authorize(user, "manage_admins", Platform::default())?;
        }

        validate_identity(&params.name, &params.email)?;

        let account = Account::new(params.name, params.email, params.role, params.permissions);

        let mut conn = self.pool.acquire().await?;
        insert_account(&mut conn, &account).await?;

        tracing::info!(id = %account.id, role = %account.role.name(), "account created");

        Ok(account)
    }

    #[tracing::instrument(skip(self))]
    async fn find_account(&self, user: User, id: Uuid) -> Result<Account, Error> {
        let mut conn = self.pool.acquire().await?;

        let account = fetch_account(&mut conn, &id).await?;

        self.authorize(user, "read", account.clone())?;

        Ok(account)
    }

    #[tracing::instrument(skip(self))]
    async fn list_accounts(&self, user: User) -> Result<Vec<Account>, Error> {
        self.authorize(user, "manage_accounts", Platform::default())?;

        let mut conn = self.pool.acquire().await?;

        let mut results = conn.fetch(sqlx::query("SELECT data FROM accounts ORDER BY email"));

        let mut accounts = vec![];

        while let Some(row) = results.try_next().await? {
            let Json(account): Json<Account> = row.try_get("data")?;
            accounts.push(account);
        }

        Ok(accounts)
    }

    #[tracing::instrument(skip(self))]
    async fn update_account_permissions(
        &self,
        user: User,
        id: Uuid,
        permissions: Vec<Permission>,
    ) -> Result<Account, Error> {
        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin().await?;

        let mut account = fetch_account_for_update(&mut tx, &id).await?;

        self.authorize(user, "update", account.clone())?;

        if account.role != Role::Worker {
            return Err(Error::invalid_invocation_error());
        }

        account.set_permissions(permissions);

        update_account(&mut tx, &account).await?;

        tx.commit().await?;

        tracing::info!(%id, permissions = ?account.permissions, "permissions updated");

        Ok(account)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_account(&self, user: User, id: Uuid) -> Result<(), Error> {
        if user.id == id {
            return Err(Error::invalid_invocation_error());
        }

        let mut conn = self.pool.acquire().await?;
        let mut tx = conn.begin().await?;

        let account = fetch_account_for_update(&mut tx, &id).await?;

        self.authorize(user.clone(), "delete", account.clone())?;

        if account.role == Role::Admin {
            self.authorize(user, "manage_admins", Platform::default())?;
        }

        tx.execute(sqlx::query("DELETE FROM accounts WHERE id = $1").bind(&id))
            .await?;

        tx.commit().await?;

        tracing::info!(%id, "account deleted");

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn resolve_user(&self, id: Uuid) -> Result<User, Error> {
        let mut conn = self.pool.acquire().await?;

        let account = fetch_account(&mut conn, &id).await.map_err(|err| {
            if err.is_not_found_error() {
                Error::unauthorized_error()
            } else {
                err
            }
        })?;

        Ok(User::from(&account))
    }
}

#[test]
fn identity_validation() {
    assert!(validate_identity("Ada", "ada@example.com").is_ok());
    assert!(validate_identity(" ", "ada@example.com").is_err());
    assert!(validate_identity("Ada", "ada.example.com").is_err());
    assert!(validate_identity("Ada", "").is_err());
}
