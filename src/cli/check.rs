use clap::Parser;

use crate::{
    cli::inverter::InverterArgs,
    core::accumulator::LifetimeEnergy,
    prelude::*,
    tables::{build_metadata_table, build_readings_table},
};

#[derive(Parser)]
pub struct CheckArgs {
    #[clap(flatten)]
    inverter: InverterArgs,
}

impl CheckArgs {
    pub async fn run(self) -> Result {
        let update = self
            .inverter
            .coordinator(LifetimeEnergy::default())?
            .check()
            .await
            .context("the inverter did not respond")?;
        if update.snapshot.readings.is_empty() {
            warn!("the page contains no readings");
        }
        info!(n_readings = update.snapshot.readings.len(), "the inverter is reachable");
        println!("{}", build_metadata_table(&update.metadata));
        println!("{}", build_readings_table(&update));
        Ok(())
    }
}
