use std::time::Duration;

use reqwest::Url;

use crate::{
    api::solutronic::{Error, HostKey, Resolver, TransportError},
    prelude::*,
};

/// Fetches the telemetry page through the resolver.
///
/// An inverter may move its page between the root and the sub-path after a firmware update
/// or a reboot, so a failing cached endpoint gets re-probed once within the same fetch.
#[must_use]
pub struct Fetcher {
    resolver: Resolver,
    timeout: Duration,
}

impl Fetcher {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    pub const fn new(resolver: Resolver, timeout: Duration) -> Self {
        Self { resolver, timeout }
    }

    #[instrument(skip_all, fields(host = %host))]
    pub async fn fetch(&self, host: &HostKey) -> Result<String, Error> {
        let Some(url) = self.resolver.cached(host).await else {
            return self.resolve_and_fetch(host).await;
        };
        let error = match self.get(&url).await {
            Ok(body) => return Ok(body),
            Err(error) => error,
        };
        info!(%url, %error, "cached endpoint failed, re-probing…");
        self.resolver.invalidate(host).await;
        match self.resolve_and_fetch(host).await {
            Err(Error::NoEndpointFound { .. }) => Err(Error::FetchFailed { url, source: error }),
            result => result,
        }
    }

    /// Fetch from a freshly resolved endpoint, evicting it if it fails.
    async fn resolve_and_fetch(&self, host: &HostKey) -> Result<String, Error> {
        let url = self.resolver.resolve(host).await?;
        match self.get(&url).await {
            Ok(body) => Ok(body),
            Err(source) => {
                self.resolver.invalidate(host).await;
                Err(Error::FetchFailed { url, source })
            }
        }
    }

    async fn get(&self, url: &Url) -> Result<String, TransportError> {
        let page = self.resolver.transport.get(url, self.timeout).await?;
        if page.status.is_success() {
            debug!(len = page.body.len(), "fetched");
            Ok(page.body)
        } else {
            Err(TransportError::Status(page.status))
        }
    }
}
