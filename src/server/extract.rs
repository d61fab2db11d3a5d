use async_trait::async_trait;
use axum::extract::{Extension, FromRequest, RequestParts};
use axum::http::HeaderMap;
use uuid::Uuid;

use crate::auth::User;
use crate::error::Error;
use crate::server::DynAPI;

/// Set by the gateway in front of this service once it has authenticated the
/// caller.
pub const ACCOUNT_HEADER: &str = "x-account-id";

#[async_trait]
impl<B> FromRequest<B> for User
where
    B: Send,
{
    type Rejection = Error;

    async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
        let Extension(api) = Extension::<DynAPI>::from_request(req)
            .await
            .map_err(|_| Error::unexpected_error())?;

        let id = account_id(req.headers()).ok_or_else(Error::unauthorized_error)?;

        api.resolve_user(id).await
    }
}

fn account_id(headers: &HeaderMap) -> Option<Uuid> {
    headers
        .get(ACCOUNT_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Uuid::parse_str(value.trim()).ok())
}

#[test]
fn reads_account_header() {
    let id = Uuid::new_v4();

    let mut headers = HeaderMap::new();
    assert_eq!(account_id(&headers), None);

    headers.insert(ACCOUNT_HEADER, "not-a-uuid".parse().unwrap());
    assert_eq!(account_id(&headers), None);

    headers.insert(ACCOUNT_HEADER, id.to_string().parse().unwrap());
    assert_eq!(account_id(&headers), Some(id));
}
