use anyhow::{Context, Result};
use std::path::Path;
use tripweave_core::{Agenda, ItineraryItem};

/// Read a JSON array of items and validate it as an agenda.
pub fn load_agenda(path: &Path) -> Result<Agenda> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read agenda: {}", path.display()))?;
    let items: Vec<ItineraryItem> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse agenda: {}", path.display()))?;
    Agenda::from_items(items).with_context(|| format!("Invalid agenda: {}", path.display()))
}

pub fn agenda_json(items: &[ItineraryItem]) -> Result<String> {
    serde_json::to_string_pretty(items).context("Failed to serialize agenda")
}

pub fn save_agenda(path: &Path, items: &[ItineraryItem]) -> Result<()> {
    let json = agenda_json(items)?;
    std::fs::write(path, json + "\n")
        .with_context(|| format!("Failed to write agenda: {}", path.display()))
}
