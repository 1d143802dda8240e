use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::{
    core::reading::{Reading, Readings},
    prelude::*,
};

static TABLE: LazyLock<Selector> = LazyLock::new(|| selector("table"));
static ROW: LazyLock<Selector> = LazyLock::new(|| selector("tr"));
static CELL: LazyLock<Selector> = LazyLock::new(|| selector("td"));

pub(super) fn selector(selectors: &str) -> Selector {
    Selector::parse(selectors).expect("the selector must be valid")
}

/// Parse the telemetry table.
///
/// The template renders one reading per row as `index | key | separator | value`, so only
/// the rows with exactly four cells are taken into account. Only the first table matters.
pub fn parse_readings(body: &str) -> Readings {
    let document = Html::parse_document(body);
    let Some(table) = document.select(&TABLE).next() else {
        debug!("no table on the page");
        return Readings::default();
    };
    let readings: Readings = table.select(&ROW).filter_map(parse_row).collect();
    debug!(n_readings = readings.len(), "parsed");
    readings
}

fn parse_row(row: ElementRef<'_>) -> Option<(String, Reading)> {
    let cells: Vec<_> = row.select(&CELL).collect();
    let [_, key, _, value] = cells.as_slice() else {
        return None;
    };
    let key = text_of(*key);
    if key.is_empty() {
        return None;
    }
    let value = text_of(*value).replace('\u{a0}', "");
    Some((key, Reading::parse(value.trim())))
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_owned()
}
