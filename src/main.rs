use std::sync::Arc;

use courier::config::Config;
use courier::db::PgPool;
use courier::engine::Engine;
use courier::error::Error;
use courier::external::{google_maps::GoogleMaps, remote_store::RemoteStore};
use courier::server::serve;

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;

    let PgPool(pool) = PgPool::new(&config.database_url, config.database_max_connections).await?;

    let distance = GoogleMaps::new(
        config.google_maps_api_base.clone(),
        config.google_maps_api_key.clone(),
    );
    let remote = RemoteStore::new(config.remote_store_url.clone());

    let engine = Engine::new(pool, Arc::new(distance), remote).await?;

    if let Some(email) = &config.admin_email {
        engine.ensure_admin(email).await?;
    }

    serve(engine, config.bind_addr).await
}
