use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::core::{
    keys,
    metadata::DeviceMetadata,
    reading::{Reading, Readings},
    snapshot::Update,
};

pub fn build_readings_table(update: &Update) -> Table {
    let color = if update.is_success() { Color::Green } else { Color::DarkYellow };
    let mut table = new_table();
    table.set_header(vec![
        Cell::new(update.updated_at.format("%H:%M:%S")).add_attribute(Attribute::Dim),
        Cell::new(if update.is_success() { "live" } else { "fallback" }).fg(color),
    ]);
    add_reading_rows(&mut table, &update.snapshot.readings);
    table
}

pub fn build_metadata_table(metadata: &DeviceMetadata) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Manufacturer", "Model", "Firmware", "Serial number"]);
    table.add_row(vec![
        Cell::new(&metadata.manufacturer),
        Cell::new(&metadata.model),
        Cell::new(&metadata.firmware),
        Cell::new(metadata.serial_number.as_deref().unwrap_or("unknown")),
    ]);
    table
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table
}

fn add_reading_rows(table: &mut Table, readings: &Readings) {
    for (key, reading) in readings {
        let is_computed = key == keys::TOTAL_POWER || key == keys::DERIVED_LIFETIME_ENERGY;
        let key_cell = Cell::new(key);
        let key_cell = if is_computed { key_cell.fg(Color::Cyan) } else { key_cell };
        let value_cell = match reading {
            Reading::Number(_) => Cell::new(reading).set_alignment(CellAlignment::Right),
            Reading::Text(_) => Cell::new(reading).add_attribute(Attribute::Italic),
        };
        table.add_row(vec![key_cell, value_cell]);
    }
}
