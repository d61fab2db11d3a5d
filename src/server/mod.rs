mod extract;
mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{get, patch, post},
    Router,
};

pub use extract::ACCOUNT_HEADER;

use crate::server::handlers::{accounts, bookings, quotes, settings};
use crate::{api::API, error::Error};

type DynAPI = Arc<dyn API + Send + Sync>;

pub fn router<T: API + Sync + Send + 'static>(api: T) -> Router {
    let api = Arc::new(api) as DynAPI;

    Router::new()
        .route("/accounts/register", post(accounts::register))
        .route("/accounts", post(accounts::create).get(accounts::list))
        .route("/accounts/:id", get(accounts::find).delete(accounts::delete))
        .route(
            "/accounts/:id/permissions",
            patch(accounts::update_permissions),
        )
        .route(
            "/settings/rates",
            get(settings::find_rates).patch(settings::update_rates),
        )
        .route("/quotes", post(quotes::create))
        .route("/bookings", post(bookings::create).get(bookings::list))
        .route("/bookings/:id", get(bookings::find).delete(bookings::delete))
        .route("/bookings/:id/accept", patch(bookings::accept))
        .route("/bookings/:id/collect", patch(bookings::collect))
        .route("/bookings/:id/deliver", patch(bookings::deliver))
        .route("/bookings/:id/cancel", patch(bookings::cancel))
        .layer(Extension(api))
}

pub async fn serve<T: API + Sync + Send + 'static>(api: T, addr: SocketAddr) -> Result<(), Error> {
    let app = router(api);

    tracing::info!("listening on {}", addr);

    axum::Server::bind(&addr)
        .serve(app.into_make_service())
        .await
        .map_err(|err| {
            tracing::error!(%err, "server stopped");
            Error::unexpected_error()
        })
}
