use std::{sync::Arc, time::Duration};

use clap::Parser;

use crate::{
    api::solutronic::{Fetcher, HostKey, HttpTransport, Resolver},
    core::{accumulator::LifetimeEnergy, coordinator::Coordinator},
    prelude::*,
};

#[derive(Parser)]
pub struct InverterArgs {
    /// Inverter address, optionally with a scheme, port, or path which are ignored.
    #[clap(long = "host", env = "INVERTER_HOST")]
    host: String,

    /// Candidate ports in the order of preference.
    #[clap(long, env = "INVERTER_PORTS", value_delimiter = ',', default_value = "8888,80")]
    ports: Vec<u16>,

    /// Candidate paths in the order of preference.
    #[clap(long, env = "INVERTER_PATHS", value_delimiter = ',', default_value = "/solutronic/,/")]
    paths: Vec<String>,

    /// Timeout for each probed port and path combination.
    #[clap(long, env = "PROBE_TIMEOUT", default_value = "8s")]
    probe_timeout: humantime::Duration,

    /// Timeout for the actual page fetch.
    #[clap(long, env = "FETCH_TIMEOUT", default_value = "10s")]
    fetch_timeout: humantime::Duration,
}

impl InverterArgs {
    pub fn coordinator(&self, lifetime_energy: LifetimeEnergy) -> Result<Coordinator> {
        let probe_timeout = Duration::from(self.probe_timeout);
        let fetch_timeout = Duration::from(self.fetch_timeout);
        ensure!(
            probe_timeout < fetch_timeout,
            "the probe timeout ({}) must be shorter than the fetch timeout ({})",
            self.probe_timeout,
            self.fetch_timeout,
        );
        ensure!(!self.ports.is_empty(), "at least one port is required");
        ensure!(!self.paths.is_empty(), "at least one path is required");

        let resolver = Resolver::builder()
            .transport(Arc::new(HttpTransport::new()?))
            .ports(self.ports.clone())
            .paths(self.paths.clone())
            .probe_timeout(probe_timeout)
            .build();
        Ok(Coordinator::builder()
            .fetcher(Fetcher::new(resolver, fetch_timeout))
            .host(HostKey::parse(&self.host)?)
            .lifetime_energy(lifetime_energy)
            .build())
    }
}
