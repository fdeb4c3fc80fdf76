//! IP-to-country lookup capability.

use async_trait::async_trait;

/// Miss-tolerant geo lookup. `None` means unknown origin; the caller
/// substitutes the "Unknown" bucket. Lookups never fail the request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GeoLookup: Send + Sync {
    async fn country(&self, ip: &str) -> Option<String>;
}
