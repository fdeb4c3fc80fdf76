//! IP-to-country lookup implementations.

use async_trait::async_trait;

use crate::domain::ports::GeoLookup;

/// Lookup that never resolves a country. Used when no geo data source is
/// configured; every click lands in the "Unknown" bucket.
pub struct NullGeoLookup;

#[async_trait]
impl GeoLookup for NullGeoLookup {
    async fn country(&self, _ip: &str) -> Option<String> {
        None
    }
}
