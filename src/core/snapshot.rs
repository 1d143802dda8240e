use chrono::{DateTime, Local};
use serde::Serialize;

use crate::{
    core::{
        keys,
        metadata::DeviceMetadata,
        reading::{Reading, Readings},
    },
    quantity::power::Watts,
};

/// Complete output of one poll cycle: either live readings with the computed fields,
/// or a fallback built from the last live one.
#[must_use]
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PollSnapshot {
    pub readings: Readings,
    pub is_fallback: bool,
}

impl PollSnapshot {
    pub const fn live(readings: Readings) -> Self {
        Self { readings, is_fallback: false }
    }

    /// Zero the instantaneous readings, and carry the cumulative ones over from the last live
    /// snapshot.
    ///
    /// Without any live snapshot yet, the cumulative readings are zeroes as well.
    pub fn fallback(last_live: Option<&Readings>) -> Self {
        let mut readings: Readings =
            keys::ZEROED_ON_FALLBACK.into_iter().map(|key| (key, Reading::Number(0.0))).collect();
        for key in keys::RETAINED_ON_FALLBACK {
            match last_live {
                Some(last_live) => {
                    if let Some(reading) = last_live.get(key) {
                        readings.insert(key, reading.clone());
                    }
                }
                None => readings.insert(key, Reading::Number(0.0)),
            }
        }
        Self { readings, is_fallback: true }
    }
}

/// Sum of the reported per-phase powers, [`None`] when no phase is reported.
#[must_use]
pub fn total_power(readings: &Readings) -> Option<Watts> {
    let mut phases = readings
        .iter()
        .filter(|(key, _)| key.starts_with(keys::PHASE_POWER_PREFIX))
        .filter_map(|(_, reading)| reading.as_number())
        .map(Watts)
        .peekable();
    phases.peek().is_some().then(|| phases.sum())
}

/// What the coordinator publishes after every cycle.
#[must_use]
#[derive(Clone, Debug, Serialize)]
pub struct Update {
    pub snapshot: PollSnapshot,
    pub metadata: DeviceMetadata,
    pub updated_at: DateTime<Local>,
}

impl Update {
    #[must_use]
    pub const fn is_success(&self) -> bool {
        !self.snapshot.is_fallback
    }
}
