use std::{pin::pin, sync::Arc, time::Duration};

use bon::Builder;
use chrono::Local;
use tokio::{
    sync::watch,
    time::{MissedTickBehavior, interval},
};

use crate::{
    api::solutronic::{self, Fetcher, HostKey, extract_metadata, parse_readings},
    core::{
        accumulator::LifetimeEnergy,
        keys,
        metadata::DeviceMetadata,
        reading::Readings,
        snapshot::{PollSnapshot, Update, total_power},
    },
    prelude::*,
    quantity::{energy::KilowattHours, power::Watts},
};

/// Polls a single inverter and publishes a complete update after every cycle.
///
/// A failed cycle never propagates: it publishes a fallback snapshot instead.
#[must_use]
#[derive(Builder)]
pub struct Coordinator {
    fetcher: Fetcher,
    host: HostKey,

    #[builder(default)]
    lifetime_energy: LifetimeEnergy,

    #[builder(skip)]
    metadata: DeviceMetadata,

    /// Readings of the last successful cycle, including the computed ones.
    #[builder(skip)]
    last_live: Option<Readings>,

    #[builder(skip)]
    is_offline: bool,

    #[builder(skip = watch::Sender::new(None))]
    sender: watch::Sender<Option<Arc<Update>>>,
}

impl Coordinator {
    /// Subscribe to the updates, [`None`] until the first cycle completes.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<Update>>> {
        self.sender.subscribe()
    }

    /// Poll on the fixed interval until the shutdown future resolves.
    ///
    /// The first cycle starts immediately, and a slow cycle delays the following ones instead
    /// of bursting.
    pub async fn run(mut self, period: Duration, shutdown: impl Future<Output = ()>) {
        let mut interval = interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut shutdown = pin!(shutdown);

        loop {
            tokio::select! {
                () = &mut shutdown => {
                    info!("stopping…");
                    break;
                }
                _ = interval.tick() => {
                    self.poll().await;
                }
            }
        }
    }

    /// Run one cycle and publish its outcome.
    #[instrument(skip_all, fields(host = %self.host))]
    pub async fn poll(&mut self) -> Arc<Update> {
        let snapshot = match self.fetcher.fetch(&self.host).await {
            Ok(body) => {
                if self.is_offline {
                    info!("the inverter is back online");
                    self.is_offline = false;
                }
                self.process(&body)
            }
            Err(error) => {
                if self.is_offline {
                    debug!(%error, "still unavailable");
                } else {
                    warn!("the inverter is unavailable: {:#}", anyhow::Error::new(error));
                    self.is_offline = true;
                }
                PollSnapshot::fallback(self.last_live.as_ref())
            }
        };
        let update =
            Arc::new(Update { snapshot, metadata: self.metadata.clone(), updated_at: Local::now() });
        self.sender.send_replace(Some(Arc::clone(&update)));
        update
    }

    /// Fetch and parse once without touching the state, to confirm that the host is an inverter.
    #[instrument(skip_all, fields(host = %self.host))]
    pub async fn check(&self) -> Result<Update, solutronic::Error> {
        let body = self.fetcher.fetch(&self.host).await?;
        let mut readings = parse_readings(&body);
        let mut metadata = self.metadata.clone();
        metadata.merge(extract_metadata(&body));
        if let Some(serial_number) = readings.get(keys::SERIAL_NUMBER) {
            metadata.set_serial_number(serial_number);
        }
        if let Some(total_power) = total_power(&readings) {
            readings.insert(keys::TOTAL_POWER, total_power.0);
        }
        Ok(Update { snapshot: PollSnapshot::live(readings), metadata, updated_at: Local::now() })
    }

    fn process(&mut self, body: &str) -> PollSnapshot {
        let mut readings = parse_readings(body);
        self.metadata.merge(extract_metadata(body));
        if let Some(serial_number) = readings.get(keys::SERIAL_NUMBER) {
            self.metadata.set_serial_number(serial_number);
        }

        let total_power = total_power(&readings);
        if let Some(total_power) = total_power {
            readings.insert(keys::TOTAL_POWER, total_power.0);
        }
        let lifetime_energy = self.lifetime_energy.update(
            readings.number(keys::DAILY_ENERGY).map(KilowattHours),
            readings.number(keys::DEVICE_LIFETIME_ENERGY).map(KilowattHours),
            total_power.unwrap_or(Watts::ZERO),
        );
        if let Some(lifetime_energy) = lifetime_energy {
            readings.insert(keys::DERIVED_LIFETIME_ENERGY, lifetime_energy.0);
        }

        debug!(n_readings = readings.len(), ?total_power, ?lifetime_energy, "processed");
        self.last_live = Some(readings.clone());
        PollSnapshot::live(readings)
    }
}
