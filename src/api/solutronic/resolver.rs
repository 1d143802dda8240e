use std::{collections::HashMap, sync::Arc, time::Duration};

use bon::Builder;
use http::StatusCode;
use itertools::iproduct;
use reqwest::Url;
use tokio::sync::Mutex;

use crate::{
    api::solutronic::{Error, HostKey, Transport},
    prelude::*,
};

/// Working endpoint per host, may be shared between resolvers.
pub type EndpointCache = Arc<Mutex<HashMap<HostKey, Url>>>;

/// Finds the port and path combination which serves the telemetry page.
#[must_use]
#[derive(Builder)]
pub struct Resolver {
    pub(super) transport: Arc<dyn Transport>,

    /// Candidate ports in the order of preference.
    #[builder(default = Resolver::DEFAULT_PORTS.to_vec())]
    ports: Vec<u16>,

    /// Candidate paths in the order of preference.
    #[builder(default = Resolver::DEFAULT_PATHS.iter().map(ToString::to_string).collect())]
    paths: Vec<String>,

    #[builder(default = Resolver::DEFAULT_PROBE_TIMEOUT)]
    probe_timeout: Duration,

    #[builder(default)]
    cache: EndpointCache,
}

impl Resolver {
    pub const DEFAULT_PORTS: [u16; 2] = [8888, 80];
    pub const DEFAULT_PATHS: [&'static str; 2] = ["/solutronic/", "/"];
    pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(8);

    /// Get the cached endpoint, or probe for a new one.
    pub async fn resolve(&self, host: &HostKey) -> Result<Url, Error> {
        match self.cached(host).await {
            Some(url) => Ok(url),
            None => self.probe(host).await,
        }
    }

    pub async fn cached(&self, host: &HostKey) -> Option<Url> {
        self.cache.lock().await.get(host).cloned()
    }

    /// Forget the endpoint so that the next resolution probes again.
    pub async fn invalidate(&self, host: &HostKey) {
        if let Some(url) = self.cache.lock().await.remove(host) {
            info!(%host, %url, "invalidated the endpoint");
        }
    }

    /// Try all the candidates in order, and cache the first one which answers `200 OK`.
    #[instrument(skip_all, fields(host = %host))]
    pub async fn probe(&self, host: &HostKey) -> Result<Url, Error> {
        for (port, path) in iproduct!(&self.ports, &self.paths) {
            let url = host.endpoint(*port, path)?;
            match self.transport.get(&url, self.probe_timeout).await {
                Ok(page) if page.status == StatusCode::OK => {
                    info!(%url, "found the endpoint");
                    self.cache.lock().await.insert(host.clone(), url.clone());
                    return Ok(url);
                }
                Ok(page) => {
                    debug!(%url, status = %page.status, "skipping");
                }
                Err(error) => {
                    debug!(%url, %error, "not responding");
                }
            }
        }
        Err(Error::NoEndpointFound {
            host: host.to_string(),
            ports: self.ports.clone(),
            paths: self.paths.clone(),
        })
    }
}
