use std::time::Duration;

use async_trait::async_trait;
use http::StatusCode;
use reqwest::{Client, Url};

use crate::{api::solutronic::TransportError, prelude::*};

#[must_use]
pub struct Page {
    pub status: StatusCode,
    pub body: String,
}

/// Single bounded HTTP GET, the only thing the resolver and the fetcher need from the network.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &Url, timeout: Duration) -> Result<Page, TransportError>;
}

pub struct HttpTransport(Client);

impl HttpTransport {
    /// Some inverter firmwares answer properly only to something that looks like a browser.
    const USER_AGENT: &'static str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
                                      (KHTML, like Gecko) Chrome/123.0 Safari/537.36";

    pub fn new() -> Result<Self> {
        Ok(Self(Client::builder().user_agent(Self::USER_AGENT).build()?))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip_all, level = Level::DEBUG, fields(url = %url))]
    async fn get(&self, url: &Url, timeout: Duration) -> Result<Page, TransportError> {
        let exchange = async {
            let response = self.0.get(url.clone()).send().await?;
            let status = response.status();
            let body = response.text().await?;
            Ok::<_, reqwest::Error>(Page { status, body })
        };
        let page = tokio::time::timeout(timeout, exchange)
            .await
            .map_err(|_| TransportError::Timeout)??;
        debug!(status = %page.status, len = page.body.len(), "received");
        Ok(page)
    }
}
