pub mod google_maps;
pub mod remote_store;

use async_trait::async_trait;

use crate::entities::DistanceOutcome;

/// Measures driving distance between two formatted addresses.
///
/// Lookup failures are reported as [`DistanceOutcome::Unavailable`] rather
/// than as errors; pricing has a defined answer for them.
#[async_trait]
pub trait DistanceProvider {
    async fn measure(&self, origin: &str, destination: &str) -> DistanceOutcome;
}
