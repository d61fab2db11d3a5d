use axum::extract::{Extension, Json, Path};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::User;
use crate::entities::{Account, CreateAccountParams, Permission, RegisterParams};
use crate::error::Error;
use crate::server::DynAPI;

#[derive(Serialize, Deserialize)]
pub struct UpdatePermissionsParams {
    permissions: Vec<Permission>,
}

pub async fn register(
    Extension(api): Extension<DynAPI>,
    Json(params): Json<RegisterParams>,
) -> Result<Json<Account>, Error> {
    let account = api.register_customer(params).await?;

    Ok(account.into())
}

pub async fn create(
    Extension(api): Extension<DynAPI>,
    user: User,
    Json(params): Json<CreateAccountParams>,
) -> Result<Json<Account>, Error> {
    let account = api.create_account(user, params).await?;

    Ok(account.into())
}

pub async fn find(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<Uuid>,
) -> Result<Json<Account>, Error> {
    let account = api.find_account(user, id).await?;

    Ok(account.into())
}

pub async fn list(
    Extension(api): Extension<DynAPI>,
    user: User,
) -> Result<Json<Vec<Account>>, Error> {
    let accounts = api.list_accounts(user).await?;

    Ok(accounts.into())
}

pub async fn update_permissions(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<Uuid>,
    Json(params): Json<UpdatePermissionsParams>,
) -> Result<Json<Account>, Error> {
    let account = api
        .update_account_permissions(user, id, params.permissions)
        .await?;

    Ok(account.into())
}

pub async fn delete(
    Extension(api): Extension<DynAPI>,
    user: User,
    Path(id): Path<Uuid>,
) -> Result<Json<()>, Error> {
    api.delete_account(user, id).await?;

    Ok(().into())
}
