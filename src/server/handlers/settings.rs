use axum::extract::{Extension, Json};

use crate::auth::User;
use crate::entities::{RateTable, RateTableUpdate};
use crate::error::Error;
use crate::server::DynAPI;

pub async fn find_rates(
    Extension(api): Extension<DynAPI>,
    user: User,
) -> Result<Json<RateTable>, Error> {
    let rates = api.find_rates(user).await?;

    Ok(rates.into())
}

pub async fn update_rates(
    Extension(api): Extension<DynAPI>,
    user: User,
    Json(update): Json<RateTableUpdate>,
) -> Result<Json<RateTable>, Error> {
    let rates = api.update_rates(user, update).await?;

    Ok(rates.into())
}
