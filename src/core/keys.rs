//! Reading keys as the inverter template names them, plus the ones computed here.

/// Energy produced today, reset at local midnight.
pub const DAILY_ENERGY: &str = "ET";

/// Device-reported lifetime energy.
pub const DEVICE_LIFETIME_ENERGY: &str = "EG";

pub const SERIAL_NUMBER: &str = "SN";

/// Prefix of the per-phase AC power readings: `PACL1`, `PACL2`, `PACL3`.
pub const PHASE_POWER_PREFIX: &str = "PACL";

/// Sum of the reported per-phase powers.
pub const TOTAL_POWER: &str = "PAC_TOTAL";

/// Monotonic lifetime energy reconstructed from the daily counter.
pub const DERIVED_LIFETIME_ENERGY: &str = "LIFETIME_DERIVED";

/// Instantaneous readings which get zeroed while the inverter is unreachable.
pub const ZEROED_ON_FALLBACK: [&str; 16] = [
    "PAC", TOTAL_POWER, "PACL1", "PACL2", "PACL3", "UDC1", "UDC2", "UDC3", "IDC1", "IDC2", "IDC3",
    "MAXP", "ETA", "UACL1", "UACL2", "UACL3",
];

/// Cumulative readings which keep their last known values while the inverter is unreachable.
pub const RETAINED_ON_FALLBACK: [&str; 3] =
    [DAILY_ENERGY, DEVICE_LIFETIME_ENERGY, DERIVED_LIFETIME_ENERGY];
