//! The host resolver as a provider.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::future::Future;
use std::pin::Pin;
use tokio::net::lookup_host;
use tokio::time::Duration;

use super::{Provider, QueryError};

//------------ SystemProvider -------------------------------------------------

/// A provider that resolves through the operating system's resolver.
///
/// Resolution happens via [`tokio::net::lookup_host`], so whatever the host
/// is configured to use (`/etc/resolv.conf`, local caches, etc.) is what
/// gets measured. Lookup failures classify as resolution failures and are
/// therefore retryable.
#[derive(Clone, Debug, Default)]
pub struct SystemProvider;

impl SystemProvider {
    /// Creates a new system resolver provider.
    pub fn new() -> Self {
        SystemProvider
    }

    /// Resolves the domain, deduplicating addresses in first-seen order.
    async fn lookup(&self, domain: &str) -> Result<Vec<String>, QueryError> {
        let found = lookup_host((domain, 0)).await.map_err(|err| {
            QueryError::Resolution(format!(
                "system resolver failed for {}: {}",
                domain, err
            ))
        })?;

        let mut addresses = Vec::new();
        for addr in found {
            let ip = addr.ip().to_string();
            if !addresses.contains(&ip) {
                addresses.push(ip);
            }
        }
        Ok(addresses)
    }
}

impl Provider for SystemProvider {
    fn name(&self) -> &str {
        "system"
    }

    fn query<'a>(
        &'a self,
        domain: &'a str,
        _timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<String>, QueryError>> + Send + 'a>>
    {
        Box::pin(self.lookup(domain))
    }
}

//============ Testing =======================================================

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn localhost_resolves_without_duplicates() {
        let provider = SystemProvider::new();
        let addresses = provider
            .query("localhost", Duration::from_secs(5))
            .await
            .unwrap();
        assert!(!addresses.is_empty());
        let mut deduped = addresses.clone();
        deduped.dedup();
        assert_eq!(addresses, deduped);
    }

    #[tokio::test]
    async fn nonsense_name_is_a_resolution_failure() {
        let provider = SystemProvider::new();
        let err = provider
            .query("no-such-host.invalid", Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, QueryError::Resolution(_)));
    }
}
