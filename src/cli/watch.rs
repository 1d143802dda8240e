use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::{
    cli::inverter::InverterArgs,
    core::{accumulator::LifetimeEnergy, metadata::DeviceMetadata, snapshot::Update},
    prelude::*,
    quantity::energy::KilowattHours,
    signal::shutdown_signal,
    tables::{build_metadata_table, build_readings_table},
};

#[derive(Parser)]
pub struct WatchArgs {
    #[clap(flatten)]
    inverter: InverterArgs,

    #[clap(long, env = "POLLING_INTERVAL", default_value = "5s")]
    polling_interval: humantime::Duration,

    #[clap(long, env = "OUTPUT", value_enum, default_value = "table")]
    output: Output,

    /// Lifetime energy in kilowatt-hours at the start of the current day.
    ///
    /// Without it, the inverter-reported lifetime energy is taken on the first poll.
    #[clap(long, env = "LIFETIME_ENERGY_SEED")]
    lifetime_energy_seed: Option<KilowattHours>,
}

#[derive(Copy, Clone, ValueEnum)]
enum Output {
    /// Human-readable tables.
    Table,

    /// One JSON object per line.
    Json,
}

impl WatchArgs {
    pub async fn run(self) -> Result {
        let polling_interval = Duration::from(self.polling_interval);
        ensure!(!polling_interval.is_zero(), "the polling interval must be positive");

        let lifetime_energy =
            self.lifetime_energy_seed.map_or_else(LifetimeEnergy::default, LifetimeEnergy::seeded);
        let coordinator = self.inverter.coordinator(lifetime_energy)?;
        let mut updates = coordinator.subscribe();

        info!(?polling_interval, "watching…");
        let poller = tokio::spawn(coordinator.run(polling_interval, shutdown_signal()));
        let mut last_metadata: Option<DeviceMetadata> = None;
        while updates.changed().await.is_ok() {
            let Some(update) = updates.borrow_and_update().clone() else {
                continue;
            };
            match self.output {
                Output::Table => {
                    if last_metadata.as_ref() != Some(&update.metadata) {
                        println!("{}", build_metadata_table(&update.metadata));
                        last_metadata = Some(update.metadata.clone());
                    }
                    println!("{}", build_readings_table(&update));
                }
                Output::Json => {
                    println!("{}", to_json_line(&update)?);
                }
            }
        }
        poller.await?;
        Ok(())
    }
}

fn to_json_line(update: &Update) -> Result<String> {
    serde_json::to_string(update).context("failed to serialize the update")
}
