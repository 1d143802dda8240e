use http::StatusCode;
use reqwest::Url;

/// Failure of a single HTTP exchange.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("timed out")]
    Timeout,

    #[error("unexpected status {0}")]
    Status(StatusCode),

    #[error(transparent)]
    Request(#[from] reqwest::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("`{host}` is not a valid inverter address")]
    InvalidHost {
        host: String,

        #[source]
        source: url::ParseError,
    },

    #[error("no responding endpoint found on `{host}` (ports {ports:?}, paths {paths:?})")]
    NoEndpointFound { host: String, ports: Vec<u16>, paths: Vec<String> },

    #[error("failed to fetch `{url}`")]
    FetchFailed {
        url: Url,

        #[source]
        source: TransportError,
    },
}
