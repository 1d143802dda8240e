use std::fmt::{Display, Formatter};

use derive_more::From;
use indexmap::{IndexMap, map};
use serde::{Deserialize, Serialize};

/// Single value from the inverter telemetry table.
#[must_use]
#[derive(Clone, Debug, PartialEq, From, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reading {
    Number(f64),

    /// Anything that could not be coerced to a number, kept verbatim.
    Text(String),
}

impl Reading {
    /// Coerce the raw table cell.
    ///
    /// The inverter uses a comma as the decimal separator, and then a dot may only be
    /// a thousands separator.
    pub fn parse(raw: &str) -> Self {
        let normalized =
            if raw.contains(',') { raw.replace('.', "").replace(',', ".") } else { raw.to_owned() };
        match normalized.parse::<f64>() {
            Ok(number) if number.is_finite() => Self::Number(number),
            _ => Self::Text(raw.to_owned()),
        }
    }

    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(number) => Some(*number),
            Self::Text(_) => None,
        }
    }
}

impl Display for Reading {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(number) => Display::fmt(number, f),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// Reading key to value mapping.
///
/// A missing key means that the device did not report it, which is not the same as zero.
/// Keys keep the order they were inserted in, which is the row order of the device page.
#[must_use]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Readings(IndexMap<String, Reading>);

impl Readings {
    pub fn insert(&mut self, key: impl Into<String>, reading: impl Into<Reading>) {
        self.0.insert(key.into(), reading.into());
    }

    pub fn get(&self, key: &str) -> Option<&Reading> {
        self.0.get(key)
    }

    #[must_use]
    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Reading::as_number)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> map::Iter<'_, String, Reading> {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<Reading>> FromIterator<(K, V)> for Readings {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iterator: T) -> Self {
        Self(iterator.into_iter().map(|(key, value)| (key.into(), value.into())).collect())
    }
}

impl<'a> IntoIterator for &'a Readings {
    type Item = (&'a String, &'a Reading);
    type IntoIter = map::Iter<'a, String, Reading>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_comma_decimal_ok() {
        assert_eq!(Reading::parse("1.500,5"), Reading::Number(1500.5));
        assert_eq!(Reading::parse("8,3"), Reading::Number(8.3));
    }

    #[test]
    fn parse_dot_decimal_ok() {
        assert_eq!(Reading::parse("8.2"), Reading::Number(8.2));
        assert_eq!(Reading::parse("4500"), Reading::Number(4500.0));
    }

    #[test]
    fn parse_text_ok() {
        assert_eq!(Reading::parse("Einspeisen"), Reading::Text("Einspeisen".to_owned()));
        assert_eq!(Reading::parse("inf"), Reading::Text("inf".to_owned()));
        assert_eq!(Reading::parse(""), Reading::Text(String::new()));
    }

    #[test]
    fn number_ignores_text() {
        let readings: Readings =
            [("PAC", Reading::Number(1.0)), ("STATE", Reading::from("MPP".to_owned()))]
                .into_iter()
                .collect();
        assert_eq!(readings.number("PAC"), Some(1.0));
        assert_eq!(readings.number("STATE"), None);
        assert_eq!(readings.number("UDC1"), None);
    }

    #[test]
    fn serialize_ok() -> anyhow::Result<()> {
        let readings: Readings =
            [("ET", Reading::Number(12.5)), ("SN", Reading::from("A1".to_owned()))]
                .into_iter()
                .collect();
        assert_eq!(serde_json::to_string(&readings)?, r#"{"ET":12.5,"SN":"A1"}"#);
        Ok(())
    }

    #[test]
    fn serialize_in_insertion_order() -> anyhow::Result<()> {
        let mut readings: Readings = [("SN", "A1".to_owned())].into_iter().collect();
        readings.insert("PAC", 4500.0);
        readings.insert("ET", 12.5);
        assert_eq!(serde_json::to_string(&readings)?, r#"{"SN":"A1","PAC":4500.0,"ET":12.5}"#);
        Ok(())
    }
}
