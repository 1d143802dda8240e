use std::{sync::Arc, time::Duration};

use clap::Parser;

use crate::{
    api::solutronic::{HttpTransport, Scanner, Subnet},
    prelude::*,
};

#[derive(Parser)]
pub struct DiscoverArgs {
    /// Subnet to scan, for example `192.168.1.0/24`.
    #[clap(env = "DISCOVERY_SUBNET")]
    subnet: Subnet,

    #[clap(long, env = "DISCOVERY_PORT", default_value = "8888")]
    port: u16,

    #[clap(long, env = "DISCOVERY_PATH", default_value = "/solutronic/")]
    path: String,

    /// Timeout for each address.
    #[clap(long, env = "DISCOVERY_TIMEOUT", default_value = "1s")]
    timeout: humantime::Duration,

    /// Maximum number of the addresses probed at the same time.
    #[clap(long, env = "DISCOVERY_CONCURRENCY", default_value = "64")]
    concurrency: usize,
}

impl DiscoverArgs {
    pub async fn run(self) -> Result {
        ensure!(self.concurrency != 0, "the concurrency must be positive");
        let found = Scanner::builder()
            .transport(Arc::new(HttpTransport::new()?))
            .port(self.port)
            .path(self.path)
            .timeout(Duration::from(self.timeout))
            .concurrency(self.concurrency)
            .build()
            .scan(&self.subnet)
            .await;
        if found.is_empty() {
            warn!(subnet = %self.subnet, "no inverters found");
        }
        for address in found {
            println!("{address}");
        }
        Ok(())
    }
}
