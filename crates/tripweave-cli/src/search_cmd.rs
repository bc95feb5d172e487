use crate::agenda_file::{load_agenda, save_agenda};
use anyhow::{Context, Result, bail};
use std::path::Path;
use tracing::info;
use tripweave_core::time::is_canonical;
use tripweave_core::{ItineraryItem, normalize_time};

/// Where and when to add a picked search result.
#[derive(Debug, Clone, Default)]
pub struct AddTarget<'a> {
    pub agenda: Option<&'a Path>,
    /// 1-based option number.
    pub pick: Option<usize>,
    pub at: Option<&'a str>,
}

/// Select option `pick` (1-based) from `options`.
pub fn pick_option<T: Clone>(options: &[T], pick: usize) -> Result<T> {
    if pick == 0 || pick > options.len() {
        bail!(
            "--pick {} is out of range: {} options returned",
            pick,
            options.len()
        );
    }
    Ok(options[pick - 1].clone())
}

/// Append `item` to the agenda file, optionally rescheduled to `at`.
pub fn add_to_agenda(path: &Path, mut item: ItineraryItem, at: Option<&str>) -> Result<()> {
    if let Some(at) = at {
        let time = normalize_time(at);
        if !is_canonical(&time) {
            bail!("--at '{}' is not a valid time", at);
        }
        item.time = time;
    }

    let mut agenda = load_agenda(path)?;
    let title = item.title.clone();
    agenda.push(item);
    save_agenda(path, agenda.items())?;
    info!("Added '{}' to {}", title, path.display());
    Ok(())
}

/// Print `options` as JSON, then add the picked one if asked to.
pub fn finish_search<T, F>(options: &[T], target: &AddTarget<'_>, into_item: F) -> Result<()>
where
    T: Clone + serde::Serialize,
    F: FnOnce(T) -> ItineraryItem,
{
    let json = serde_json::to_string_pretty(options).context("Failed to serialize options")?;
    println!("{json}");

    match (target.agenda, target.pick) {
        (Some(path), Some(pick)) => {
            let option = pick_option(options, pick)?;
            add_to_agenda(path, into_item(option), target.at)
        }
        (Some(_), None) => bail!("--add-to needs --pick to choose an option"),
        _ => Ok(()),
    }
}
