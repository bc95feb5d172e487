//! Reconciliation of model-proposed items against the user's agenda.
//!
//! The model only regenerates title, kind, time, description and price.
//! Everything else (flight metadata, stay dates, pin state) is recovered
//! from the source items here.

use crate::bracket::bracket_flights;
use crate::time::{canonical_clock, minutes_since_midnight};
use crate::{CandidateItem, ItemDetails, ItineraryItem, PRICE_TBD};
use tracing::debug;

/// Best-effort match: same title, or same kind at the same clock time.
///
/// Two unrelated items sharing a time slot will match; callers should treat
/// the result as a hint, not an identity.
pub fn find_source_match<'a>(
    candidate: &CandidateItem,
    sources: &'a [ItineraryItem],
) -> Option<&'a ItineraryItem> {
    let candidate_time = canonical_clock(&candidate.time);
    sources.iter().find(|source| {
        source.title == candidate.title
            || (source.kind() == candidate.kind && canonical_clock(&source.time) == candidate_time)
    })
}

/// True if some pinned source item has this title and clock time.
pub fn is_pinned_slot(title: &str, time: &str, sources: &[ItineraryItem]) -> bool {
    let time = canonical_clock(time);
    sources
        .iter()
        .filter(|s| s.pinned)
        .any(|s| s.title == title && canonical_clock(&s.time) == time)
}

/// Build a typed item from a candidate, inheriting details from its match.
fn reconcile_item(candidate: &CandidateItem, sources: &[ItineraryItem]) -> ItineraryItem {
    let source = find_source_match(candidate, sources);

    // Details only carry over between items of the same kind.
    let mut details = match source {
        Some(s) if s.kind() == candidate.kind => s.details.clone(),
        _ => ItemDetails::empty(candidate.kind),
    };

    let price = candidate
        .price
        .clone()
        .filter(|p| !p.trim().is_empty())
        .or_else(|| source.and_then(|s| s.details.price().map(String::from)))
        .unwrap_or_else(|| PRICE_TBD.to_string());
    details.set_price(Some(price));

    let time = canonical_clock(&candidate.time);
    let mut item = ItineraryItem::new(candidate.title.clone(), time, details)
        .with_description(candidate.description.clone());
    item.pinned = is_pinned_slot(&item.title, &item.time, sources);
    item
}

/// Re-insert pinned source items the model left out.
///
/// A restored item goes before the first non-leading item whose clock time
/// is later; bracketing afterwards settles the flights.
pub fn restore_pinned(
    mut items: Vec<ItineraryItem>,
    sources: &[ItineraryItem],
) -> Vec<ItineraryItem> {
    for pinned in sources.iter().filter(|s| s.pinned) {
        let time = canonical_clock(&pinned.time);
        let present = items
            .iter()
            .any(|i| i.title == pinned.title && canonical_clock(&i.time) == time);
        if present {
            continue;
        }

        debug!("Restoring pinned item '{}' missing from candidate", pinned.title);
        let mut restored = pinned.clone();
        restored.time = time;
        restored.pinned = true;

        let at = minutes_since_midnight(&restored.time)
            .and_then(|minutes| {
                items.iter().skip(1).position(|i| {
                    minutes_since_midnight(&i.time).is_some_and(|other| other > minutes)
                })
            })
            .map(|p| p + 1)
            .unwrap_or(items.len());
        items.insert(at, restored);
    }
    items
}

/// Turn a candidate itinerary into typed items.
///
/// Never fails: unmatched candidates keep only what the model supplied.
/// Pin state is recomputed from the sources, missing pinned items are
/// restored, and the result is flight-bracketed.
pub fn reconcile(candidates: &[CandidateItem], sources: &[ItineraryItem]) -> Vec<ItineraryItem> {
    let items: Vec<ItineraryItem> = candidates
        .iter()
        .map(|c| reconcile_item(c, sources))
        .collect();
    bracket_flights(restore_pinned(items, sources))
}
