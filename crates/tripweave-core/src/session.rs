//! State of one advisory view.
//!
//! `Idle -> Loading -> Ready | Failed`. Every round is started through a
//! [`RoundTicket`]; an outcome is accepted only for the ticket of the round
//! currently loading, so a response that lands after the view was closed
//! (or reopened) is dropped.

use crate::merge::apply_selection;
use crate::{AdviceResult, ItineraryItem};
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub enum AdvisoryStatus<E> {
    Idle,
    Loading,
    Ready(AdviceResult),
    Failed(E),
}

/// Which itinerary the user highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Original,
    Alternative(usize),
}

/// Proof that a round was started by this session at this epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundTicket {
    session: Uuid,
    epoch: u64,
}

#[derive(Debug)]
pub struct AdvisorySession<E> {
    id: Uuid,
    epoch: u64,
    open: bool,
    status: AdvisoryStatus<E>,
    selection: Option<Selection>,
}

impl<E> Default for AdvisorySession<E> {
    fn default() -> Self {
        Self {
            id: Uuid::new_v4(),
            epoch: 0,
            open: false,
            status: AdvisoryStatus::Idle,
            selection: None,
        }
    }
}

impl<E> AdvisorySession<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> &AdvisoryStatus<E> {
        &self.status
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status, AdvisoryStatus::Loading)
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Open the view. With nothing cached and no prior error this starts a
    /// round and hands back its ticket.
    pub fn open(&mut self) -> Option<RoundTicket> {
        self.open = true;
        match self.status {
            AdvisoryStatus::Idle => Some(self.begin()),
            _ => None,
        }
    }

    /// User-triggered retry after a failure.
    pub fn retry(&mut self) -> Option<RoundTicket> {
        if self.open && matches!(self.status, AdvisoryStatus::Failed(_)) {
            Some(self.begin())
        } else {
            None
        }
    }

    /// Record the outcome of a round. Returns false when the ticket is stale
    /// and the outcome was discarded.
    pub fn complete(&mut self, ticket: RoundTicket, outcome: Result<AdviceResult, E>) -> bool {
        if ticket != self.current_ticket() || !self.is_loading() {
            debug!(
                "Discarding stale advisory outcome (epoch {} vs {})",
                ticket.epoch, self.epoch
            );
            return false;
        }
        self.status = match outcome {
            Ok(result) => {
                info!(
                    "Advisory round ready with {} alternatives",
                    result.alternative_itineraries.len()
                );
                AdvisoryStatus::Ready(result)
            }
            Err(e) => AdvisoryStatus::Failed(e),
        };
        true
    }

    /// Close the view, discarding any in-flight or finished round.
    pub fn close(&mut self) {
        self.open = false;
        self.status = AdvisoryStatus::Idle;
        self.selection = None;
        self.epoch += 1;
    }

    /// Highlight an itinerary. Returns its items, or `None` if there is no
    /// result or the index does not exist.
    pub fn select(&mut self, selection: Selection) -> Option<&[ItineraryItem]> {
        let AdvisoryStatus::Ready(result) = &self.status else {
            return None;
        };
        let items = items_for(result, selection)?;
        self.selection = Some(selection);
        Some(items)
    }

    pub fn selected_items(&self) -> Option<&[ItineraryItem]> {
        let AdvisoryStatus::Ready(result) = &self.status else {
            return None;
        };
        items_for(result, self.selection?)
    }

    /// Apply the highlighted itinerary: fresh identifiers, then the view
    /// closes.
    pub fn apply(&mut self) -> Option<Vec<ItineraryItem>> {
        let applied = apply_selection(self.selected_items()?);
        self.close();
        Some(applied)
    }

    fn begin(&mut self) -> RoundTicket {
        self.epoch += 1;
        self.status = AdvisoryStatus::Loading;
        self.selection = None;
        self.current_ticket()
    }

    fn current_ticket(&self) -> RoundTicket {
        RoundTicket {
            session: self.id,
            epoch: self.epoch,
        }
    }
}

fn items_for(result: &AdviceResult, selection: Selection) -> Option<&[ItineraryItem]> {
    match selection {
        Selection::Original => Some(&result.original_itinerary),
        Selection::Alternative(i) => result
            .alternative_itineraries
            .get(i)
            .map(|alt| alt.items.as_slice()),
    }
}
