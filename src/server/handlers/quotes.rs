use axum::extract::{Extension, Json};

use crate::auth::User;
use crate::entities::{QuoteRequest, QuoteResponse};
use crate::error::Error;
use crate::server::DynAPI;

pub async fn create(
    Extension(api): Extension<DynAPI>,
    user: User,
    Json(request): Json<QuoteRequest>,
) -> Result<Json<QuoteResponse>, Error> {
    let quote = api.create_quote(user, request).await?;

    Ok(quote.into())
}
