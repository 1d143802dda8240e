use std::{
    fmt::{Display, Formatter},
    net::Ipv4Addr,
};

use reqwest::Url;
use url::Host;

use crate::api::solutronic::Error;

/// Inverter address stripped of any scheme, port, and path the user may have typed.
#[must_use]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct HostKey(Host);

impl HostKey {
    pub fn parse(address: &str) -> Result<Self, Error> {
        let address = address.trim();
        let with_scheme =
            if address.contains("://") { address.to_owned() } else { format!("http://{address}") };
        let invalid_host = |source| Error::InvalidHost { host: address.to_owned(), source };
        let url = Url::parse(&with_scheme).map_err(invalid_host)?;
        let host = url.host().ok_or_else(|| invalid_host(url::ParseError::EmptyHost))?;
        Ok(Self(host.to_owned()))
    }

    /// Build the endpoint URL for the port and path candidate.
    pub fn endpoint(&self, port: u16, path: &str) -> Result<Url, Error> {
        let path = path.trim_matches('/');
        let url = if path.is_empty() {
            format!("http://{}:{port}/", self.0)
        } else {
            format!("http://{}:{port}/{path}/", self.0)
        };
        Url::parse(&url).map_err(|source| Error::InvalidHost { host: self.to_string(), source })
    }
}

impl From<Ipv4Addr> for HostKey {
    fn from(address: Ipv4Addr) -> Self {
        Self(Host::Ipv4(address))
    }
}

impl Display for HostKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}
