use std::{
    fmt::{Display, Formatter},
    net::Ipv4Addr,
    str::FromStr,
    sync::Arc,
    time::Duration,
};

use bon::Builder;
use futures_util::{StreamExt, stream};
use http::StatusCode;

use crate::{
    api::solutronic::{HostKey, Transport},
    prelude::*,
};

/// IPv4 network in CIDR notation, for example `192.168.1.0/24`.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Subnet {
    network: Ipv4Addr,
    prefix: u8,
}

impl Subnet {
    const PREFIXES: std::ops::RangeInclusive<u8> = 16..=32;

    /// Host addresses, without the network and broadcast ones unless it is a point-to-point
    /// or a single-address network.
    pub fn hosts(&self) -> impl Iterator<Item = Ipv4Addr> + use<> {
        let first = u32::from(self.network);
        let last = first | u32::MAX.checked_shr(u32::from(self.prefix)).unwrap_or(0);
        let range = if self.prefix < 31 { (first + 1)..=(last - 1) } else { first..=last };
        range.map(Ipv4Addr::from)
    }
}

impl FromStr for Subnet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (address, prefix) = s.split_once('/').context("expected `address/prefix`")?;
        let address: Ipv4Addr =
            address.trim().parse().with_context(|| format!("invalid address `{address}`"))?;
        let prefix: u8 =
            prefix.trim().parse().with_context(|| format!("invalid prefix `{prefix}`"))?;
        ensure!(Self::PREFIXES.contains(&prefix), "the prefix must be within {:?}", Self::PREFIXES);
        let mask = u32::MAX << (32 - u32::from(prefix));
        Ok(Self { network: Ipv4Addr::from(u32::from(address) & mask), prefix })
    }
}

impl Display for Subnet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.network, self.prefix)
    }
}

/// Looks for inverters by probing the primary endpoint of every address in a subnet.
#[must_use]
#[derive(Builder)]
pub struct Scanner {
    transport: Arc<dyn Transport>,

    #[builder(default = Scanner::DEFAULT_PORT)]
    port: u16,

    #[builder(default = Scanner::DEFAULT_PATH.to_owned())]
    path: String,

    #[builder(default = Scanner::DEFAULT_TIMEOUT)]
    timeout: Duration,

    #[builder(default = Scanner::DEFAULT_CONCURRENCY)]
    concurrency: usize,
}

impl Scanner {
    pub const DEFAULT_PORT: u16 = 8888;
    pub const DEFAULT_PATH: &'static str = "/solutronic/";
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);
    pub const DEFAULT_CONCURRENCY: usize = 64;

    /// Get the addresses which answered `200 OK`, in ascending order.
    #[instrument(skip_all, fields(subnet = %subnet))]
    pub async fn scan(&self, subnet: &Subnet) -> Vec<Ipv4Addr> {
        info!(concurrency = self.concurrency, timeout = ?self.timeout, "scanning…");
        let mut found: Vec<Ipv4Addr> = stream::iter(subnet.hosts())
            .map(|address| async move { self.is_inverter(address).await.then_some(address) })
            .buffer_unordered(self.concurrency.max(1))
            .filter_map(|address| async move { address })
            .collect()
            .await;
        found.sort_unstable();
        info!(n_found = found.len(), "done");
        found
    }

    async fn is_inverter(&self, address: Ipv4Addr) -> bool {
        let url = match HostKey::from(address).endpoint(self.port, &self.path) {
            Ok(url) => url,
            Err(error) => {
                debug!(%address, %error, "skipping");
                return false;
            }
        };
        match self.transport.get(&url, self.timeout).await {
            Ok(page) if page.status == StatusCode::OK => {
                info!(%url, "found");
                true
            }
            Ok(page) => {
                debug!(%url, status = %page.status, "not an inverter");
                false
            }
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::solutronic::testing::ScriptedTransport;

    #[test]
    fn parse_subnet_ok() -> Result {
        let subnet: Subnet = "192.168.1.77/24".parse()?;
        assert_eq!(subnet.to_string(), "192.168.1.0/24");
        Ok(())
    }

    #[test]
    fn parse_subnet_err() {
        assert!("192.168.1.0".parse::<Subnet>().is_err());
        assert!("192.168.1.0/8".parse::<Subnet>().is_err());
        assert!("192.168.1.0/33".parse::<Subnet>().is_err());
        assert!("inverter.lan/24".parse::<Subnet>().is_err());
    }

    #[test]
    fn hosts_ok() -> Result {
        let hosts: Vec<_> = "10.0.0.0/29".parse::<Subnet>()?.hosts().collect();
        assert_eq!(hosts.len(), 6);
        assert_eq!(hosts.first(), Some(&Ipv4Addr::new(10, 0, 0, 1)));
        assert_eq!(hosts.last(), Some(&Ipv4Addr::new(10, 0, 0, 6)));
        assert_eq!("192.168.0.0/16".parse::<Subnet>()?.hosts().count(), 65534);
        Ok(())
    }

    #[test]
    fn hosts_small_networks_ok() -> Result {
        let point_to_point: Vec<_> = "10.0.0.0/31".parse::<Subnet>()?.hosts().collect();
        assert_eq!(point_to_point, [Ipv4Addr::new(10, 0, 0, 0), Ipv4Addr::new(10, 0, 0, 1)]);
        let single: Vec<_> = "10.0.0.9/32".parse::<Subnet>()?.hosts().collect();
        assert_eq!(single, [Ipv4Addr::new(10, 0, 0, 9)]);
        Ok(())
    }

    #[tokio::test]
    async fn scan_ok() -> Result {
        let transport = Arc::new(ScriptedTransport::default());
        transport.serve("http://10.0.0.5:8888/solutronic/", "");
        transport.serve("http://10.0.0.2:8888/solutronic/", "");
        transport.respond("http://10.0.0.3:8888/solutronic/", StatusCode::NOT_FOUND, "");
        let scanner = Scanner::builder().transport(transport.clone()).concurrency(4).build();

        let found = scanner.scan(&"10.0.0.0/29".parse()?).await;

        assert_eq!(found, [Ipv4Addr::new(10, 0, 0, 2), Ipv4Addr::new(10, 0, 0, 5)]);
        assert_eq!(transport.requests().len(), 6);
        Ok(())
    }
}
